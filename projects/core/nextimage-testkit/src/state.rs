//! Call spies, the error slot, allocation tracking and failure injection.
//!
//! Everything except the allocation registry is per thread, matching a `libnextimage` built
//! with a thread-local error slot and keeping parallel tests apart. Allocations are registered
//! globally with their creating thread, so an object may be released on another thread and
//! still be accounted to its creator.

use nextimage_sys::NextImageStatus;
use parking_lot::{Mutex, const_mutex};
use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::ffi::{CString, c_char};
use std::thread::{self, ThreadId};

struct Allocation {
    owner: ThreadId,
    len: usize,
}

static ALLOCATIONS: Mutex<BTreeMap<usize, Allocation>> = const_mutex(BTreeMap::new());

/// A failure armed with [`fail_next`].
#[derive(Debug, Clone)]
pub(crate) struct Failure {
    pub status: NextImageStatus,
    pub message: Option<String>,
    pub partial: bool,
}

#[derive(Default)]
struct ThreadState {
    error: Option<CString>,
    calls: HashMap<&'static str, usize>,
    total_calls: usize,
    double_frees: usize,
    null_defaults: bool,
    fail_next_create: Option<Option<String>>,
    fail_next: Option<Failure>,
    last_options: HashMap<&'static str, Box<dyn Any>>,
}

thread_local! {
    static STATE: RefCell<ThreadState> = RefCell::default();
}

fn with<R>(f: impl FnOnce(&mut ThreadState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Number of times the native symbol `name` was called on this thread.
pub fn calls(name: &str) -> usize {
    with(|state| state.calls.get(name).copied().unwrap_or(0))
}

/// Number of native calls of any kind made on this thread, including error-slot accessors.
pub fn total_calls() -> usize {
    with(|state| state.total_calls)
}

/// Native allocations created on this thread that are still alive.
pub fn live_allocations() -> usize {
    let current = thread::current().id();
    ALLOCATIONS
        .lock()
        .values()
        .filter(|allocation| allocation.owner == current)
        .count()
}

/// Frees of pointers that were not (or no longer) allocated.
pub fn double_frees() -> usize {
    with(|state| state.double_frees)
}

/// Writes `message` into this thread's error slot, as a failing entry point would.
pub fn set_error(message: &str) {
    let message = CString::new(message.replace('\0', " ")).ok();
    with(|state| state.error = message);
}

/// Makes every `*_create_default_options` return null until reset.
pub fn set_null_defaults(enabled: bool) {
    with(|state| state.null_defaults = enabled);
}

/// Makes the next command or instance constructor return null, recording `message` if given.
pub fn fail_next_create(message: Option<&str>) {
    with(|state| state.fail_next_create = Some(message.map(str::to_owned)));
}

/// Makes the next `run`/`encode`/`decode` return `status`.
///
/// With `partial`, the failing call also leaves an allocated output behind, which the caller
/// is still responsible for freeing.
pub fn fail_next(status: NextImageStatus, message: Option<&str>, partial: bool) {
    let failure = Failure {
        status,
        message: message.map(str::to_owned),
        partial,
    };
    with(|state| state.fail_next = Some(failure));
}

/// Copy of the options the last constructor of `family` received (or the defaults it applied
/// for a null pointer). Metadata pointers inside are not valid anymore.
///
/// Families are named after their symbol prefix: `cwebp`, `avifdec`, `webp_encoder`, ...
pub fn last_options<T: Copy + 'static>(family: &str) -> Option<T> {
    with(|state| {
        state
            .last_options
            .get(family)
            .and_then(|options| options.downcast_ref::<T>())
            .copied()
    })
}

pub(crate) fn record(name: &'static str) {
    with(|state| {
        *state.calls.entry(name).or_insert(0) += 1;
        state.total_calls += 1;
    });
}

pub(crate) fn clear_error() {
    with(|state| state.error = None);
}

pub(crate) fn error_ptr() -> *const c_char {
    with(|state| {
        state
            .error
            .as_ref()
            .map_or(core::ptr::null(), |message| message.as_ptr())
    })
}

pub(crate) fn null_defaults() -> bool {
    with(|state| state.null_defaults)
}

/// Consumes an armed constructor failure. `Some(message)` if the constructor must fail.
pub(crate) fn take_create_failure() -> Option<Option<String>> {
    with(|state| state.fail_next_create.take())
}

pub(crate) fn take_failure() -> Option<Failure> {
    with(|state| state.fail_next.take())
}

pub(crate) fn store_options<T: Copy + 'static>(family: &'static str, options: T) {
    with(|state| {
        state.last_options.insert(family, Box::new(options));
    });
}

fn register(addr: usize, len: usize) {
    let owner = thread::current().id();
    ALLOCATIONS.lock().insert(addr, Allocation { owner, len });
}

fn unregister(addr: usize) -> Option<usize> {
    let removed = ALLOCATIONS.lock().remove(&addr).map(|allocation| allocation.len);
    if removed.is_none() {
        with(|state| state.double_frees += 1);
    }
    removed
}

/// Moves `bytes` into a tracked native allocation. `bytes` must not be empty.
pub(crate) fn alloc_bytes(bytes: Vec<u8>) -> *mut u8 {
    let len = bytes.len();
    let ptr = Box::into_raw(bytes.into_boxed_slice()).cast::<u8>();
    register(ptr as usize, len);
    ptr
}

/// Releases a pointer returned by [`alloc_bytes`]. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or have been returned by [`alloc_bytes`].
pub(crate) unsafe fn free_bytes(ptr: *mut u8) {
    if ptr.is_null() {
        return;
    }

    if let Some(len) = unregister(ptr as usize) {
        // SAFETY: allocated by `alloc_bytes` with this length and unregistered exactly once.
        drop(unsafe { Box::from_raw(core::ptr::slice_from_raw_parts_mut(ptr, len)) });
    }
}

/// Moves `value` into a tracked native allocation.
pub(crate) fn alloc_object<T>(value: T) -> *mut T {
    let ptr = Box::into_raw(Box::new(value));
    register(ptr as usize, core::mem::size_of::<T>());
    ptr
}

/// Releases a pointer returned by [`alloc_object`]. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or have been returned by [`alloc_object::<T>`].
pub(crate) unsafe fn free_object<T>(ptr: *mut T) {
    if ptr.is_null() {
        return;
    }

    if unregister(ptr as usize).is_some() {
        // SAFETY: allocated by `alloc_object` and unregistered exactly once.
        drop(unsafe { Box::from_raw(ptr) });
    }
}
