//! The native "last error" slot.
//!
//! `libnextimage` records a message in a single slot right before an entry point returns a
//! failure status. Any later native call, including a free, may overwrite it. Every call made
//! by this crate therefore follows the same sequence, wrapped by [`ErrorScope`]:
//!
//! 1. [`ErrorChannel::begin`] clears the slot (and takes the process-wide lock if needed).
//! 2. The native entry point runs.
//! 3. On failure the message is read through the scope before anything else touches native code.
//!
//! With a [`SlotScope::ProcessWide`] slot, calls that do not report through the slot (frees,
//! destroys, defaults, version queries) still run under [`ErrorChannel::exclusive`], so they
//! cannot overwrite the slot between another thread's call and its read.

use crate::error::{NextImageError, Operation};
use crate::status::NativeStatus;
use core::ffi::{CStr, c_char};
use nextimage_sys::RuntimeFns;
use parking_lot::{Mutex, MutexGuard, const_mutex};

/// Serializes every native call when the native slot is process-wide.
static PROCESS_WIDE_SLOT: Mutex<()> = const_mutex(());

/// How the native library stores its error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotScope {
    /// One slot per thread (`__thread` / `thread_local`). Calls need no coordination.
    #[default]
    ThreadLocal,
    /// One slot for the whole process. Every native call holds a global lock, from clear to
    /// read for calls that report failures.
    ProcessWide,
}

/// Access to the native error slot.
#[derive(Clone, Copy)]
pub struct ErrorChannel {
    clear: unsafe extern "C" fn(),
    last_message: unsafe extern "C" fn() -> *const c_char,
    scope: SlotScope,
}

impl ErrorChannel {
    /// Create a channel over the shared runtime functions of a native library.
    pub fn new(runtime: &RuntimeFns, scope: SlotScope) -> Self {
        Self {
            clear: runtime.clear_error,
            last_message: runtime.last_error_message,
            scope,
        }
    }

    /// How the slot is shared.
    pub fn scope(&self) -> SlotScope {
        self.scope
    }

    /// Takes the process-wide lock, if any, without touching the slot.
    ///
    /// Wraps native calls whose failures are not read from the slot. The lock is not
    /// reentrant: no other guard or [`ErrorScope`] may be taken while the result is alive.
    pub fn exclusive(&self) -> SlotGuard {
        SlotGuard(match self.scope {
            SlotScope::ThreadLocal => None,
            SlotScope::ProcessWide => Some(PROCESS_WIDE_SLOT.lock()),
        })
    }

    /// Prepares for one native entry-point call.
    pub fn begin(&self) -> ErrorScope {
        let guard = self.exclusive();
        // SAFETY: clearing the slot has no preconditions.
        unsafe { (self.clear)() };
        ErrorScope {
            channel: *self,
            _guard: guard,
        }
    }
}

impl core::fmt::Debug for ErrorChannel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ErrorChannel")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Exclusive access to the native library while the slot is process-wide.
///
/// Empty for [`SlotScope::ThreadLocal`]. Releases the lock when dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct SlotGuard(Option<MutexGuard<'static, ()>>);

impl SlotGuard {
    /// Whether this guard holds the process-wide lock.
    pub fn is_locked(&self) -> bool {
        self.0.is_some()
    }
}

/// One clear/call/read sequence.
///
/// Holds the process-wide lock (if any) until dropped.
pub struct ErrorScope {
    channel: ErrorChannel,
    _guard: SlotGuard,
}

impl ErrorScope {
    /// Reads the slot. `None` if it is null or empty.
    ///
    /// Must be called before any other native call after the failing one.
    pub fn message(&self) -> Option<String> {
        // SAFETY: the slot accessor has no preconditions.
        let ptr = unsafe { (self.channel.last_message)() };
        if ptr.is_null() {
            return None;
        }

        // SAFETY: a non-null slot is a NUL-terminated string owned by the library.
        let message = unsafe { CStr::from_ptr(ptr) }.to_string_lossy();
        if message.is_empty() {
            None
        } else {
            Some(message.into_owned())
        }
    }

    /// Builds the error for a failed entry point.
    pub fn native_error(&self, operation: Operation, status: NativeStatus) -> NextImageError {
        let message = self
            .message()
            .unwrap_or_else(|| status.fallback_message().to_owned());
        NextImageError::Native {
            operation,
            status,
            message,
        }
    }

    /// Builds the error for a constructor that returned null.
    pub fn allocation_error(&self, operation: Operation) -> NextImageError {
        let message = self
            .message()
            .unwrap_or_else(|| NativeStatus::OutOfMemory.fallback_message().to_owned());
        NextImageError::Allocation { operation, message }
    }
}
