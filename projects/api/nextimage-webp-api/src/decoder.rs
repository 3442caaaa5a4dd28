//! Reusable WebP decoder producing raw pixels.

use nextimage_common::{ConfigRecord, DecodedPixels, Instance, InstanceFamily, NativeRuntime, PixelFormat, native_options};
use nextimage_sys::*;

native_options! {
    /// Options of the reusable WebP decoder.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct WebPDecodeOptions => NextImageWebPDecodeOptions {
        /// Multi-threaded decoding
        pub use_threads: bool => use_threads,
        /// Skip the in-loop filter
        pub bypass_filtering: bool => bypass_filtering,
        /// Point-sampled chroma upsampling
        pub no_fancy_upsampling: bool => no_fancy_upsampling,
        /// Layout of the decoded pixels
        pub format: PixelFormat => format,
    }
}

impl ConfigRecord for WebPDecodeOptions {
    fn fallback() -> Self {
        Self {
            use_threads: false,
            bypass_filtering: false,
            no_fancy_upsampling: false,
            format: PixelFormat::Rgba,
        }
    }
}

impl WebPDecodeOptions {
    /// Options holding the native decoder defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        WebPDecoder::default_options(runtime)
    }
}

/// Descriptor of the WebP decoder family.
pub struct WebPDecoderFamily;

impl InstanceFamily for WebPDecoderFamily {
    const NAME: &'static str = "webp decoder";
    const ACTION: &'static str = "decode";
    type Options = WebPDecodeOptions;
    type Raw = NextImageWebPDecoder;
    type Output = DecodedPixels;

    fn fns(
        library: &NativeLibrary,
    ) -> &InstanceFns<NextImageWebPDecodeOptions, NextImageWebPDecoder, NextImageDecodeBuffer>
    {
        &library.webp_decoder
    }
}

/// A reusable WebP decoder.
pub type WebPDecoder = Instance<WebPDecoderFamily>;
