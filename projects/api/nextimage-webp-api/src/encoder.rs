//! Reusable WebP encoder.
//!
//! The native encoder keeps its configuration between calls, so encoding many images with the
//! same settings skips the per-call setup a [`Cwebp`](crate::Cwebp) command would repeat.

use nextimage_common::{EncodedBytes, Instance, InstanceFamily, ConfigRecord, NativeRuntime, native_options};
use nextimage_sys::*;

native_options! {
    /// Options of the reusable WebP encoder.
    #[derive(Debug, Clone, PartialEq)]
    pub struct WebPEncodeOptions => NextImageWebPEncodeOptions {
        /// 0-100
        pub quality: f32 => quality,
        /// Lossless encoding
        pub lossless: bool => lossless,
        /// 0 (fast) to 6 (slow, better)
        pub method: i32 => method,
        /// Target size in bytes, 0 = disabled
        pub target_size: i32 => target_size,
        /// Target PSNR in dB, 0 = disabled
        pub target_psnr: f32 => target_psnr,
        /// Preserve RGB values under transparent areas
        pub exact: bool => exact,
        /// 0 = none, 1 = compressed
        pub alpha_compression: i32 => alpha_compression,
        /// 0-100
        pub alpha_quality: i32 => alpha_quality,
        /// 1-10
        pub pass: i32 => pass,
        /// 0 = none, 1 = segment-smooth, 2 = pseudo-random dithering
        pub preprocessing: i32 => preprocessing,
        /// 0-3
        pub partitions: i32 => partitions,
        /// 0-100
        pub partition_limit: i32 => partition_limit,
    }
}

impl ConfigRecord for WebPEncodeOptions {
    fn fallback() -> Self {
        Self {
            quality: 75.0,
            lossless: false,
            method: 4,
            target_size: 0,
            target_psnr: 0.0,
            exact: false,
            alpha_compression: 1,
            alpha_quality: 100,
            pass: 1,
            preprocessing: 0,
            partitions: 0,
            partition_limit: 0,
        }
    }
}

impl WebPEncodeOptions {
    /// Options holding the native encoder defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        WebPEncoder::default_options(runtime)
    }
}

/// Descriptor of the WebP encoder family.
pub struct WebPEncoderFamily;

impl InstanceFamily for WebPEncoderFamily {
    const NAME: &'static str = "webp encoder";
    const ACTION: &'static str = "encode";
    type Options = WebPEncodeOptions;
    type Raw = NextImageWebPEncoder;
    type Output = EncodedBytes;

    fn fns(
        library: &NativeLibrary,
    ) -> &InstanceFns<NextImageWebPEncodeOptions, NextImageWebPEncoder, NextImageBuffer> {
        &library.webp_encoder
    }
}

/// A reusable WebP encoder.
pub type WebPEncoder = Instance<WebPEncoderFamily>;
