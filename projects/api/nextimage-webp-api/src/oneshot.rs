//! Single-call WebP conversions.
//!
//! Each function takes its options per call and keeps no native object alive. `None` options
//! let the library apply its own defaults. Use [`WebPEncoder`](crate::WebPEncoder) or
//! [`WebPDecoder`](crate::WebPDecoder) when converting many images with one configuration.

use crate::{WebPDecodeOptions, WebPEncodeOptions};
use nextimage_common::buffer::transfer;
use nextimage_common::oneshot::{self, DecodeIntoFamily, DecodedInto, ImageSize, OneShotFamily};
use nextimage_common::options::DefaultsSource;
use nextimage_common::{DecodedImage, DecodedPixels, EncodedBytes, NativeRuntime, NextImageError, Operation, Result};
use nextimage_sys::*;

/// `nextimage_webp_encode_alloc`.
pub struct WebPEncodeOnce;

impl OneShotFamily for WebPEncodeOnce {
    const NAME: &'static str = "webp";
    const ACTION: &'static str = "encode";
    type Options = WebPEncodeOptions;
    type Output = EncodedBytes;

    fn defaults(library: &NativeLibrary) -> DefaultsSource<NextImageWebPEncodeOptions> {
        DefaultsSource::FillIn(library.webp_encoder.default_options)
    }

    fn entry(library: &NativeLibrary) -> OneShotFn<NextImageWebPEncodeOptions, NextImageBuffer> {
        library.webp.encode_alloc
    }
}

/// `nextimage_webp_decode_alloc` and `nextimage_webp_decode_into`.
pub struct WebPDecodeOnce;

impl OneShotFamily for WebPDecodeOnce {
    const NAME: &'static str = "webp";
    const ACTION: &'static str = "decode";
    type Options = WebPDecodeOptions;
    type Output = DecodedPixels;

    fn defaults(library: &NativeLibrary) -> DefaultsSource<NextImageWebPDecodeOptions> {
        DefaultsSource::FillIn(library.webp_decoder.default_options)
    }

    fn entry(library: &NativeLibrary) -> OneShotFn<NextImageWebPDecodeOptions, NextImageDecodeBuffer> {
        library.webp.decode_alloc
    }
}

impl DecodeIntoFamily for WebPDecodeOnce {
    fn entry_into(library: &NativeLibrary) -> OneShotFn<NextImageWebPDecodeOptions, NextImageDecodeBuffer> {
        library.webp.decode_into
    }
}

/// `nextimage_gif2webp_alloc`, which takes the encoder options.
pub struct GifToWebPOnce;

impl OneShotFamily for GifToWebPOnce {
    const NAME: &'static str = "gif2webp";
    const ACTION: &'static str = "convert";
    type Options = WebPEncodeOptions;
    type Output = EncodedBytes;

    fn defaults(library: &NativeLibrary) -> DefaultsSource<NextImageWebPEncodeOptions> {
        DefaultsSource::FillIn(library.webp_encoder.default_options)
    }

    fn entry(library: &NativeLibrary) -> OneShotFn<NextImageWebPEncodeOptions, NextImageBuffer> {
        library.webp.gif2webp_alloc
    }
}

/// Encodes one image file (JPEG, PNG, ...) to WebP.
pub fn encode_bytes(
    runtime: &NativeRuntime,
    input: &[u8],
    options: Option<&WebPEncodeOptions>,
) -> Result<Vec<u8>> {
    oneshot::run_once::<WebPEncodeOnce>(runtime, options, input)
}

/// Decodes a WebP into pixels owned by the caller.
pub fn decode_bytes(
    runtime: &NativeRuntime,
    input: &[u8],
    options: Option<&WebPDecodeOptions>,
) -> Result<DecodedImage> {
    oneshot::run_once::<WebPDecodeOnce>(runtime, options, input)
}

/// Decodes a WebP into `buffer`.
///
/// Only interleaved formats are supported. Size the buffer with [`decode_size`]; 3-byte RGB
/// output needs less than the reported size.
pub fn decode_into(
    runtime: &NativeRuntime,
    input: &[u8],
    options: Option<&WebPDecodeOptions>,
    buffer: &mut [u8],
) -> Result<DecodedInto> {
    oneshot::decode_into::<WebPDecodeOnce>(runtime, options, input, buffer)
}

/// Reads the dimensions of a WebP and the buffer size an RGBA decode needs.
pub fn decode_size(runtime: &NativeRuntime, input: &[u8]) -> Result<ImageSize> {
    let query = runtime.library().webp.decode_size;
    let operation = Operation::new("webp", "decode size");
    oneshot::query_size(runtime, operation, input, |input, width, height, _, required| {
        // SAFETY: `input` is valid for its length and every out-pointer is a live local.
        unsafe { query(input.as_ptr(), input.len(), width, height, required) }
    })
}

/// Converts a GIF (including animations) to WebP with the encoder options.
pub fn gif_to_webp(
    runtime: &NativeRuntime,
    input: &[u8],
    options: Option<&WebPEncodeOptions>,
) -> Result<Vec<u8>> {
    oneshot::run_once::<GifToWebPOnce>(runtime, options, input)
}

/// Converts a WebP (including animations) to GIF.
///
/// Library builds without GIF output fail with
/// [`NativeStatus::Unsupported`](nextimage_common::NativeStatus::Unsupported).
pub fn webp_to_gif(runtime: &NativeRuntime, input: &[u8]) -> Result<Vec<u8>> {
    let operation = Operation::new("webp2gif", "convert");
    if input.is_empty() {
        return Err(NextImageError::EmptyInput { operation });
    }

    let convert = runtime.library().webp.webp2gif_alloc;
    transfer::<EncodedBytes, _>(runtime, operation, |output| {
        // SAFETY: `input` is valid for its length and `output` is a zeroed descriptor.
        unsafe { convert(input.as_ptr(), input.len(), output) }
    })
}
