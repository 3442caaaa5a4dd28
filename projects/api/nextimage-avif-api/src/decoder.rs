//! Reusable AVIF decoder producing raw pixels.

use nextimage_common::{ConfigRecord, DecodedPixels, Instance, InstanceFamily, NativeRuntime, PixelFormat, native_options};
use nextimage_sys::*;

native_options! {
    /// Options of the reusable AVIF decoder.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AvifDecodeOptions => NextImageAVIFDecodeOptions {
        /// Multi-threaded decoding
        pub use_threads: bool => use_threads,
        /// Layout of the decoded pixels
        pub format: PixelFormat => format,
        /// Skip EXIF
        pub ignore_exif: bool => ignore_exif,
        /// Skip XMP
        pub ignore_xmp: bool => ignore_xmp,
    }
}

impl ConfigRecord for AvifDecodeOptions {
    fn fallback() -> Self {
        Self {
            use_threads: false,
            format: PixelFormat::Rgba,
            ignore_exif: false,
            ignore_xmp: false,
        }
    }
}

impl AvifDecodeOptions {
    /// Options holding the native decoder defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        AvifDecoder::default_options(runtime)
    }
}

/// Descriptor of the AVIF decoder family.
pub struct AvifDecoderFamily;

impl InstanceFamily for AvifDecoderFamily {
    const NAME: &'static str = "avif decoder";
    const ACTION: &'static str = "decode";
    type Options = AvifDecodeOptions;
    type Raw = NextImageAVIFDecoder;
    type Output = DecodedPixels;

    fn fns(
        library: &NativeLibrary,
    ) -> &InstanceFns<NextImageAVIFDecodeOptions, NextImageAVIFDecoder, NextImageDecodeBuffer>
    {
        &library.avif_decoder
    }
}

/// A reusable AVIF decoder.
pub type AvifDecoder = Instance<AvifDecoderFamily>;
