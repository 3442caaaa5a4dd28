//! Exclusive ownership of native objects.

use crate::channel::ErrorChannel;
use crate::error::{NextImageError, Operation, Result};
use core::ptr::NonNull;
use nextimage_sys::DestroyFn;

/// Owns one native object and releases it exactly once.
///
/// [`release`](Self::release) clears the pointer before calling into the library, so repeated
/// releases (and the [`Drop`] backstop after an explicit release) are no-ops.
pub struct NativeHandle<T: 'static> {
    ptr: Option<NonNull<T>>,
    destroy: DestroyFn<T>,
    errors: ErrorChannel,
    family: &'static str,
}

// SAFETY: the handle is the only owner of the native object, and libnextimage objects are not
// bound to the thread that created them. `&NativeHandle` exposes no native calls, and every
// native call requires `&mut`, so the type is deliberately not `Sync`.
unsafe impl<T> Send for NativeHandle<T> {}

impl<T> NativeHandle<T> {
    /// Takes ownership of a native object.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live object that `destroy` releases and that nothing else owns.
    /// `errors` must belong to the library that created it.
    pub unsafe fn from_raw(
        ptr: NonNull<T>,
        destroy: DestroyFn<T>,
        errors: ErrorChannel,
        family: &'static str,
    ) -> Self {
        Self {
            ptr: Some(ptr),
            destroy,
            errors,
            family,
        }
    }

    /// The live pointer, or [`NextImageError::Closed`] once released.
    pub fn as_ptr(&self, operation: Operation) -> Result<*mut T> {
        self.ptr
            .map(NonNull::as_ptr)
            .ok_or(NextImageError::Closed { operation })
    }

    /// Whether the object has been released.
    pub fn is_released(&self) -> bool {
        self.ptr.is_none()
    }

    /// Releases the object. Returns `false` if it was already released.
    pub fn release(&mut self) -> bool {
        let Some(ptr) = self.ptr.take() else {
            return false;
        };

        let exclusive = self.errors.exclusive();
        // SAFETY: owned by this handle and removed from it above, so released only once.
        unsafe { (self.destroy)(ptr.as_ptr()) };
        drop(exclusive);
        tracing::debug!(family = self.family, "released native object");
        true
    }
}

impl<T> Drop for NativeHandle<T> {
    fn drop(&mut self) {
        if self.ptr.is_some() {
            tracing::warn!(
                family = self.family,
                "native object dropped without close(); releasing it now"
            );
            self.release();
        }
    }
}

impl<T> core::fmt::Debug for NativeHandle<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeHandle")
            .field("family", &self.family)
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use nextimage_sys::CWebPCommand;
    use tracing_test::traced_test;

    const RUN: Operation = Operation::new("cwebp", "run");

    fn new_handle() -> NativeHandle<CWebPCommand> {
        let fns = &fake::LIBRARY.cwebp;
        let ptr = NonNull::new(unsafe { (fns.new_command)(core::ptr::null()) }).unwrap();
        unsafe { NativeHandle::from_raw(ptr, fns.free_command, *runtime().errors(), "cwebp") }
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut handle = new_handle();

        assert!(handle.release());
        assert!(!handle.release());
        assert!(!handle.release());

        assert!(handle.is_released());
        assert_eq!(fake::calls("cwebp_free_command"), 1);
        assert_eq!(fake::double_frees(), 0);
    }

    #[test]
    fn test_released_handle_reports_closed() {
        let mut handle = new_handle();
        assert!(handle.as_ptr(RUN).is_ok());

        handle.release();

        assert_eq!(handle.as_ptr(RUN), Err(NextImageError::Closed { operation: RUN }));
    }

    #[test]
    fn test_drop_after_release_is_noop() {
        let mut handle = new_handle();
        handle.release();
        drop(handle);

        assert_eq!(fake::calls("cwebp_free_command"), 1);
        assert_eq!(fake::live_allocations(), 0);
    }

    #[traced_test]
    #[test]
    fn test_drop_releases_forgotten_handle() {
        let handle = new_handle();
        drop(handle);

        assert_eq!(fake::calls("cwebp_free_command"), 1);
        assert_eq!(fake::live_allocations(), 0);
        assert!(logs_contain("dropped without close()"));
    }
}
