//! One-shot conversion objects.
//!
//! A [`Command`] is created from a translated option snapshot that is baked into the native
//! object; every [`run`](Command::run) is an independent conversion with those options.
//!
//! ```text
//! Created --new--> Ready --run--> Ready
//!                    |
//!                  close (idempotent)
//!                    v
//!                  Closed --run--> Err(Closed)
//! ```

use crate::buffer::{EncodedBytes, transfer};
use crate::error::{NextImageError, Operation, Result};
use crate::handle::NativeHandle;
use crate::options::{ConfigRecord, DefaultsSource, NativeOf, build_default, to_native};
use crate::runtime::NativeRuntime;
use core::ptr::{self, NonNull};
use nextimage_sys::{CommandFns, NativeLibrary};

/// Descriptor of a stateless command family.
pub trait CommandFamily: 'static {
    /// Family name used in errors and logs, e.g. `cwebp`.
    const NAME: &'static str;
    /// Option record of the family.
    type Options: ConfigRecord;
    /// Opaque native command type.
    type Raw: 'static;

    /// The family's entry points in a function table.
    fn fns(library: &NativeLibrary) -> &CommandFns<NativeOf<Self::Options>, Self::Raw>;

    /// Called with the options of every new command before they are translated.
    ///
    /// Families use this to report options the native library accepts but ignores.
    fn inspect_options(_options: &Self::Options) {}
}

/// A native command of family `F`.
pub struct Command<F: CommandFamily> {
    runtime: NativeRuntime,
    handle: NativeHandle<F::Raw>,
}

impl<F: CommandFamily> Command<F> {
    /// Options holding the native library's defaults for this family.
    pub fn default_options(runtime: &NativeRuntime) -> F::Options {
        build_default(Self::defaults_source(runtime), runtime.errors(), F::NAME)
    }

    /// Translates `options` and creates the native command.
    ///
    /// The native options are released after construction; the command keeps its own snapshot.
    pub fn new(runtime: &NativeRuntime, options: &F::Options) -> Result<Self> {
        let operation = Operation::new(F::NAME, "new command");
        F::inspect_options(options);
        let native = to_native(options, Self::defaults_source(runtime), runtime.errors(), operation)?;
        Self::create(runtime, native.as_ptr(), operation)
    }

    /// Creates the native command without options, so the library applies its own defaults.
    pub fn with_native_defaults(runtime: &NativeRuntime) -> Result<Self> {
        Self::create(runtime, ptr::null(), Operation::new(F::NAME, "new command"))
    }

    fn create(
        runtime: &NativeRuntime,
        options: *const NativeOf<F::Options>,
        operation: Operation,
    ) -> Result<Self> {
        let fns = F::fns(runtime.library());
        let errors = runtime.errors().begin();
        // SAFETY: `options` is null or points to a native options struct that outlives the call.
        let raw = unsafe { (fns.new_command)(options) };
        let ptr = NonNull::new(raw).ok_or_else(|| errors.allocation_error(operation))?;
        drop(errors);

        tracing::debug!(family = F::NAME, "created native command");
        Ok(Self {
            runtime: *runtime,
            // SAFETY: freshly created by the paired constructor.
            handle: unsafe {
                NativeHandle::from_raw(ptr, fns.free_command, *runtime.errors(), F::NAME)
            },
        })
    }

    fn defaults_source(runtime: &NativeRuntime) -> DefaultsSource<NativeOf<F::Options>> {
        let fns = F::fns(runtime.library());
        DefaultsSource::Allocated {
            create: fns.create_default_options,
            free: fns.free_options,
        }
    }

    /// Converts one input.
    ///
    /// Fails with [`NextImageError::Closed`] after [`close`](Self::close), and with
    /// [`NextImageError::EmptyInput`] for empty input; neither case reaches native code.
    pub fn run(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let operation = Operation::new(F::NAME, "run");
        let command = self.handle.as_ptr(operation)?;
        if input.is_empty() {
            return Err(NextImageError::EmptyInput { operation });
        }

        let run_command = F::fns(self.runtime.library()).run_command;
        transfer::<EncodedBytes, _>(&self.runtime, operation, |output| {
            // SAFETY: `command` is live, `input` is valid for its length and `output` is a
            // zeroed descriptor.
            unsafe { run_command(command, input.as_ptr(), input.len(), output) }
        })
    }

    /// Releases the native command. Further calls are no-ops.
    pub fn close(&mut self) {
        self.handle.release();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.handle.is_released()
    }

    /// Runtime the command was created from.
    pub fn runtime(&self) -> &NativeRuntime {
        &self.runtime
    }
}

impl<F: CommandFamily> core::fmt::Debug for Command<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Command")
            .field("family", &F::NAME)
            .field("closed", &self.is_closed())
            .finish()
    }
}
