//! Translation between semantic option records and native option structs.
//!
//! Records are plain Rust structs declared with [`native_options!`](crate::native_options).
//! Every field maps to exactly one native field through [`NativeField`]; fields the native
//! library treats as "unset" when holding a sentinel (`-1`, `0xFFFFFFFF`) are declared as
//! `Option<T>` and only become the sentinel at the boundary.
//!
//! Defaults always come from the native library. [`ConfigRecord::fallback`] exists solely for
//! the case where the library cannot allocate its default struct.

mod field;
mod macros;

pub use field::*;

use crate::channel::ErrorChannel;
use crate::error::{NextImageError, Operation, Result};
use core::marker::PhantomData;
use core::ptr::NonNull;
use nextimage_sys::{CreateDefaultOptionsFn, FillDefaultOptionsFn, FreeOptionsFn, Zeroable};

/// Field-by-field mapping between a record and its native struct.
///
/// Implemented by [`native_options!`](crate::native_options).
pub trait NativeMapping: Sized {
    /// The `#[repr(C)]` struct the record maps to.
    type Native: Zeroable;

    /// Reads every mapped field of a native struct.
    ///
    /// # Safety
    ///
    /// Metadata pointers in `native` must be null or valid for reads of their stated length.
    unsafe fn from_native(native: &Self::Native) -> Self;

    /// Overwrites every mapped field of `native`. Unmapped fields are left untouched.
    ///
    /// Metadata pointers written into `native` borrow from `self`.
    fn write_native(&self, native: &mut Self::Native);
}

/// A complete option set for one codec operation.
pub trait ConfigRecord: NativeMapping {
    /// Values used when the native library cannot provide its defaults.
    ///
    /// Mirrors the documented native defaults. Only used by
    /// [`build_default`]; never substituted for a failed translation.
    fn fallback() -> Self;
}

/// Native struct of a record.
pub type NativeOf<R> = <R as NativeMapping>::Native;

/// How a family obtains its default native options.
pub enum DefaultsSource<N: 'static> {
    /// The library allocates a struct that must be released with `free`.
    Allocated {
        /// `<family>_create_default_options`
        create: CreateDefaultOptionsFn<N>,
        /// `<family>_free_options`
        free: FreeOptionsFn<N>,
    },
    /// The library fills storage owned by the caller. Cannot fail.
    FillIn(FillDefaultOptionsFn<N>),
}

impl<N: 'static> Clone for DefaultsSource<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: 'static> Copy for DefaultsSource<N> {}

/// Native options ready to be passed to a constructor.
///
/// Borrows the record it was translated from, so metadata pointers cannot outlive it. Options
/// allocated by the library are released exactly once on drop.
pub struct NativeOptions<'a, N: Zeroable + 'static> {
    storage: Storage<N>,
    errors: ErrorChannel,
    _record: PhantomData<&'a ()>,
}

enum Storage<N: 'static> {
    Allocated {
        ptr: NonNull<N>,
        free: FreeOptionsFn<N>,
    },
    Inline(N),
}

impl<N: Zeroable> NativeOptions<'_, N> {
    fn fresh(source: DefaultsSource<N>, errors: &ErrorChannel, operation: Operation) -> Result<Self> {
        let exclusive = errors.exclusive();
        let storage = match source {
            DefaultsSource::Allocated { create, free } => {
                // SAFETY: no preconditions.
                let ptr = unsafe { create() };
                let ptr = NonNull::new(ptr).ok_or_else(|| NextImageError::Allocation {
                    operation,
                    message: "default options could not be allocated".into(),
                })?;
                Storage::Allocated { ptr, free }
            }
            DefaultsSource::FillIn(fill) => {
                let mut native = N::zeroed();
                // SAFETY: `native` is valid, writable storage of the expected type.
                unsafe { fill(&mut native) };
                Storage::Inline(native)
            }
        };
        drop(exclusive);

        Ok(Self {
            storage,
            errors: *errors,
            _record: PhantomData,
        })
    }

    /// The native struct.
    pub fn get(&self) -> &N {
        match &self.storage {
            // SAFETY: exclusively owned until drop.
            Storage::Allocated { ptr, .. } => unsafe { ptr.as_ref() },
            Storage::Inline(native) => native,
        }
    }

    fn get_mut(&mut self) -> &mut N {
        match &mut self.storage {
            // SAFETY: exclusively owned until drop.
            Storage::Allocated { ptr, .. } => unsafe { ptr.as_mut() },
            Storage::Inline(native) => native,
        }
    }

    /// Pointer to pass to the native constructor.
    pub fn as_ptr(&self) -> *const N {
        self.get()
    }
}

impl<N: Zeroable> Drop for NativeOptions<'_, N> {
    fn drop(&mut self) {
        if let Storage::Allocated { ptr, free } = self.storage {
            let _exclusive = self.errors.exclusive();
            // SAFETY: allocated by the paired create function and released only here.
            unsafe { free(ptr.as_ptr()) };
        }
    }
}

/// Obtains a record holding the native library's own defaults.
///
/// Falls back to [`ConfigRecord::fallback`], with a warning, only when the library returns a
/// null default struct.
pub fn build_default<R: ConfigRecord>(
    source: DefaultsSource<NativeOf<R>>,
    errors: &ErrorChannel,
    family: &'static str,
) -> R {
    let operation = Operation::new(family, "create default options");
    match NativeOptions::fresh(source, errors, operation) {
        // SAFETY: defaults produced by the library carry valid (usually null) metadata.
        Ok(native) => unsafe { R::from_native(native.get()) },
        Err(error) => {
            tracing::warn!(%error, family, "native defaults unavailable; using built-in fallback options");
            R::fallback()
        }
    }
}

/// Translates a record into native options.
///
/// Starts from a fresh native default struct and copies every mapped field over it. Values are
/// not range-checked; the native library owns validation. A null default struct is reported as
/// [`NextImageError::Allocation`].
pub fn to_native<'a, R: NativeMapping>(
    record: &'a R,
    source: DefaultsSource<NativeOf<R>>,
    errors: &ErrorChannel,
    operation: Operation,
) -> Result<NativeOptions<'a, NativeOf<R>>> {
    let mut native = NativeOptions::fresh(source, errors, operation)?;
    record.write_native(native.get_mut());
    Ok(native)
}
