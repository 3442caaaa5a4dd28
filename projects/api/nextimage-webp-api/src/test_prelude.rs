//! Common test imports and utilities for nextimage-webp-api tests.

pub use nextimage_common::{ConfigRecord, ErrorKind, NativeField, NativeMapping, NativeRuntime, NativeStatus, SlotScope};
pub use nextimage_testkit as fake;
pub use rstest::rstest;

use nextimage_common::Operation;
use nextimage_common::options::{DefaultsSource, NativeOf, to_native};
use nextimage_sys::{CommandFns, FillDefaultOptionsFn};

/// Runtime over the stand-in library.
pub fn runtime() -> NativeRuntime {
    NativeRuntime::new(&fake::LIBRARY, SlotScope::ThreadLocal)
}

/// Defaults source of a command family.
pub fn allocated<O: 'static, C>(fns: &CommandFns<O, C>) -> DefaultsSource<O> {
    DefaultsSource::Allocated {
        create: fns.create_default_options,
        free: fns.free_options,
    }
}

/// Defaults source of an instance family.
pub fn fill_in<O: 'static>(fill: FillDefaultOptionsFn<O>) -> DefaultsSource<O> {
    DefaultsSource::FillIn(fill)
}

/// Translates `record` into its native struct and reads it back.
pub fn round_trip<R: ConfigRecord>(record: &R, source: DefaultsSource<NativeOf<R>>) -> R {
    let runtime = runtime();
    let operation = Operation::new("round trip", "translate");
    let native = to_native(record, source, runtime.errors(), operation).unwrap();
    // SAFETY: metadata pointers in `native` borrow from `record`, which is still alive.
    unsafe { R::from_native(native.get()) }
}
