//! The loaded native library and how its error slot is shared.

use crate::channel::{ErrorChannel, SlotScope};
use core::ffi::CStr;
use nextimage_sys::NativeLibrary;

/// A native library together with its error channel.
///
/// Every command and instance keeps a copy of the runtime it was created from and routes all of
/// its native calls through it.
#[derive(Clone, Copy)]
pub struct NativeRuntime {
    library: &'static NativeLibrary,
    errors: ErrorChannel,
}

impl NativeRuntime {
    /// Wraps a function table.
    ///
    /// `scope` must describe how the library stores its error slot; `libnextimage` builds that
    /// support thread-local storage use [`SlotScope::ThreadLocal`].
    pub fn new(library: &'static NativeLibrary, scope: SlotScope) -> Self {
        Self {
            library,
            errors: ErrorChannel::new(&library.runtime, scope),
        }
    }

    /// The `libnextimage` this crate was linked against.
    #[cfg(feature = "link")]
    pub fn linked() -> Self {
        Self::new(&nextimage_sys::LINKED, SlotScope::ThreadLocal)
    }

    /// Function table of the library.
    pub fn library(&self) -> &'static NativeLibrary {
        self.library
    }

    /// Error channel of the library.
    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    /// Version string reported by the native library, e.g. `1.0.0`.
    pub fn version(&self) -> String {
        let _exclusive = self.errors.exclusive();
        // SAFETY: no preconditions.
        let ptr = unsafe { (self.library.runtime.version)() };
        if ptr.is_null() {
            return String::new();
        }

        // SAFETY: the library returns a NUL-terminated static string.
        unsafe { CStr::from_ptr(ptr) }
            .to_string_lossy()
            .into_owned()
    }

    /// Number of live native allocations, for debug builds of the library.
    ///
    /// `None` when the library does not export the counter.
    pub fn allocation_counter(&self) -> Option<i64> {
        let counter = self.library.runtime.allocation_counter?;
        let _exclusive = self.errors.exclusive();
        // SAFETY: no preconditions.
        Some(unsafe { counter() })
    }
}

impl core::fmt::Debug for NativeRuntime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeRuntime")
            .field("scope", &self.errors.scope())
            .finish_non_exhaustive()
    }
}
