//! Common test imports and utilities for nextimage-common tests.
//!
//! Unit tests run against the in-memory stand-in library from `nextimage-testkit`, whose state
//! is per thread, so tests stay isolated under the parallel test runner.

pub use crate::buffer::{DecodedPixels, EncodedBytes};
pub use crate::channel::SlotScope;
pub use crate::command::{Command, CommandFamily};
pub use crate::error::{ErrorKind, NextImageError, Operation};
pub use crate::instance::{Instance, InstanceFamily};
pub use crate::options::{ConfigRecord, NativeMapping};
pub use crate::pixel::PixelFormat;
pub use crate::runtime::NativeRuntime;
pub use crate::status::NativeStatus;
pub use nextimage_testkit as fake;
pub use rstest::rstest;

use crate::native_options;
use nextimage_sys::*;

/// Runtime over the stand-in library.
pub fn runtime() -> NativeRuntime {
    NativeRuntime::new(&fake::LIBRARY, SlotScope::ThreadLocal)
}

native_options! {
    /// A subset of the `cwebp` options, enough to exercise every field conversion.
    #[derive(Debug, Clone, PartialEq)]
    pub struct TestWebpOptions => CWebPOptions {
        pub quality: f32 => quality,
        pub lossless: bool => lossless,
        pub method: i32 => method,
        pub near_lossless: Option<i32> => near_lossless,
        pub blend_alpha: Option<u32> => blend_alpha,
    }
}

impl ConfigRecord for TestWebpOptions {
    fn fallback() -> Self {
        Self {
            quality: 75.0,
            lossless: false,
            method: 4,
            near_lossless: None,
            blend_alpha: None,
        }
    }
}

native_options! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct TestEncodeOptions => NextImageWebPEncodeOptions {
        pub quality: f32 => quality,
        pub lossless: bool => lossless,
        pub method: i32 => method,
    }
}

impl ConfigRecord for TestEncodeOptions {
    fn fallback() -> Self {
        Self {
            quality: 75.0,
            lossless: false,
            method: 4,
        }
    }
}

native_options! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct TestDecodeOptions => NextImageWebPDecodeOptions {
        pub use_threads: bool => use_threads,
        pub format: PixelFormat => format,
    }
}

impl ConfigRecord for TestDecodeOptions {
    fn fallback() -> Self {
        Self {
            use_threads: false,
            format: PixelFormat::Rgba,
        }
    }
}

/// The `cwebp` command family.
pub struct FakeCwebp;

impl CommandFamily for FakeCwebp {
    const NAME: &'static str = "cwebp";
    type Options = TestWebpOptions;
    type Raw = CWebPCommand;

    fn fns(library: &NativeLibrary) -> &CommandFns<CWebPOptions, CWebPCommand> {
        &library.cwebp
    }
}

/// The WebP encoder instance family.
pub struct FakeWebpEncoder;

impl InstanceFamily for FakeWebpEncoder {
    const NAME: &'static str = "webp encoder";
    const ACTION: &'static str = "encode";
    type Options = TestEncodeOptions;
    type Raw = NextImageWebPEncoder;
    type Output = EncodedBytes;

    fn fns(
        library: &NativeLibrary,
    ) -> &InstanceFns<NextImageWebPEncodeOptions, NextImageWebPEncoder, NextImageBuffer> {
        &library.webp_encoder
    }
}

/// The WebP decoder instance family.
pub struct FakeWebpDecoder;

impl InstanceFamily for FakeWebpDecoder {
    const NAME: &'static str = "webp decoder";
    const ACTION: &'static str = "decode";
    type Options = TestDecodeOptions;
    type Raw = NextImageWebPDecoder;
    type Output = DecodedPixels;

    fn fns(
        library: &NativeLibrary,
    ) -> &InstanceFns<NextImageWebPDecodeOptions, NextImageWebPDecoder, NextImageDecodeBuffer>
    {
        &library.webp_decoder
    }
}
