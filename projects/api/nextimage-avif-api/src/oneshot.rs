//! Single-call AVIF conversions.
//!
//! Each function takes its options per call and keeps no native object alive. `None` options
//! let the library apply its own defaults.

use crate::{AvifDecodeOptions, AvifEncodeOptions};
use nextimage_common::oneshot::{self, DecodeIntoFamily, DecodedInto, ImageSize, OneShotFamily};
use nextimage_common::options::DefaultsSource;
use nextimage_common::{DecodedImage, DecodedPixels, EncodedBytes, NativeRuntime, Operation, Result};
use nextimage_sys::*;

/// `nextimage_avif_encode_alloc`.
pub struct AvifEncodeOnce;

impl OneShotFamily for AvifEncodeOnce {
    const NAME: &'static str = "avif";
    const ACTION: &'static str = "encode";
    type Options = AvifEncodeOptions;
    type Output = EncodedBytes;

    fn defaults(library: &NativeLibrary) -> DefaultsSource<NextImageAVIFEncodeOptions> {
        DefaultsSource::FillIn(library.avif_encoder.default_options)
    }

    fn entry(library: &NativeLibrary) -> OneShotFn<NextImageAVIFEncodeOptions, NextImageBuffer> {
        library.avif.encode_alloc
    }
}

/// `nextimage_avif_decode_alloc` and `nextimage_avif_decode_into`.
pub struct AvifDecodeOnce;

impl OneShotFamily for AvifDecodeOnce {
    const NAME: &'static str = "avif";
    const ACTION: &'static str = "decode";
    type Options = AvifDecodeOptions;
    type Output = DecodedPixels;

    fn defaults(library: &NativeLibrary) -> DefaultsSource<NextImageAVIFDecodeOptions> {
        DefaultsSource::FillIn(library.avif_decoder.default_options)
    }

    fn entry(library: &NativeLibrary) -> OneShotFn<NextImageAVIFDecodeOptions, NextImageDecodeBuffer> {
        library.avif.decode_alloc
    }
}

impl DecodeIntoFamily for AvifDecodeOnce {
    fn entry_into(library: &NativeLibrary) -> OneShotFn<NextImageAVIFDecodeOptions, NextImageDecodeBuffer> {
        library.avif.decode_into
    }
}

/// Encodes one image file (JPEG, PNG, ...) to AVIF.
pub fn encode_bytes(
    runtime: &NativeRuntime,
    input: &[u8],
    options: Option<&AvifEncodeOptions>,
) -> Result<Vec<u8>> {
    oneshot::run_once::<AvifEncodeOnce>(runtime, options, input)
}

/// Decodes an AVIF into pixels owned by the caller.
pub fn decode_bytes(
    runtime: &NativeRuntime,
    input: &[u8],
    options: Option<&AvifDecodeOptions>,
) -> Result<DecodedImage> {
    oneshot::run_once::<AvifDecodeOnce>(runtime, options, input)
}

/// Decodes an AVIF into `buffer`.
///
/// Images deeper than 8 bits take two bytes per sample, twice what [`decode_size`] reports.
/// A short buffer fails with [`NextImageError::BufferTooSmall`](nextimage_common::NextImageError::BufferTooSmall)
/// and is left untouched.
pub fn decode_into(
    runtime: &NativeRuntime,
    input: &[u8],
    options: Option<&AvifDecodeOptions>,
    buffer: &mut [u8],
) -> Result<DecodedInto> {
    oneshot::decode_into::<AvifDecodeOnce>(runtime, options, input, buffer)
}

/// Reads the dimensions and bit depth of an AVIF and the size of an 8-bit RGBA decode.
pub fn decode_size(runtime: &NativeRuntime, input: &[u8]) -> Result<ImageSize> {
    let query = runtime.library().avif.decode_size;
    let operation = Operation::new("avif", "decode size");
    oneshot::query_size(runtime, operation, input, |input, width, height, depth, required| {
        // SAFETY: `input` is valid for its length and every out-pointer is a live local.
        unsafe { query(input.as_ptr(), input.len(), width, height, depth, required) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use nextimage_common::{NextImageError, PixelFormat};

    #[test]
    fn test_encode_bytes_honours_options() {
        let runtime = runtime();
        let mut options = AvifEncodeOptions::build_default(&runtime);
        options.quality = 80;
        options.speed = 9;

        let avif = encode_bytes(&runtime, &fake::png_image(20, 12), Some(&options)).unwrap();

        let info = fake::inspect_avif(&avif).unwrap();
        assert_eq!((info.width, info.height), (20, 12));
        assert_eq!((info.quality, info.speed), (80, 9));
        assert_eq!(fake::calls("nextimage_avif_encode_alloc"), 1);
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_encode_bytes_reports_native_rejection() {
        let runtime = runtime();
        let mut options = AvifEncodeOptions::build_default(&runtime);
        options.bit_depth = 9;

        let error = encode_bytes(&runtime, &fake::png_image(8, 8), Some(&options)).unwrap_err();

        assert_eq!(error.status(), Some(NativeStatus::InvalidParam));
        assert!(error.to_string().contains("unsupported bit depth"));
    }

    #[test]
    fn test_decode_bytes() {
        let runtime = runtime();

        let image = decode_bytes(&runtime, &fake::avif_image(6, 4), None).unwrap();

        assert_eq!((image.width, image.height, image.bit_depth), (6, 4, 8));
        assert_eq!(image.format, PixelFormat::Rgba);
        assert_eq!(image.data.len(), 96);
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_decode_size_then_decode_into() {
        let runtime = runtime();
        let avif = fake::avif_image(9, 5);

        let size = decode_size(&runtime, &avif).unwrap();
        let mut buffer = vec![0u8; size.required_size];
        let frame = decode_into(&runtime, &avif, None, &mut buffer).unwrap();

        assert_eq!(
            size,
            ImageSize {
                width: 9,
                height: 5,
                bit_depth: 8,
                required_size: 180,
            }
        );
        assert_eq!((frame.stride, frame.len, frame.format), (36, 180, PixelFormat::Rgba));
    }

    #[test]
    fn test_high_bit_depth_needs_twice_the_reported_size() {
        let runtime = runtime();
        let mut options = AvifEncodeOptions::build_default(&runtime);
        options.bit_depth = 10;
        let avif = encode_bytes(&runtime, &fake::png_image(4, 4), Some(&options)).unwrap();

        let size = decode_size(&runtime, &avif).unwrap();
        let mut buffer = vec![0u8; size.required_size];
        let error = decode_into(&runtime, &avif, None, &mut buffer).unwrap_err();

        assert_eq!(size.bit_depth, 10);
        match error {
            NextImageError::BufferTooSmall { capacity, message, .. } => {
                assert_eq!(capacity, 64);
                assert!(message.contains("need 128 bytes"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        buffer.resize(size.required_size * 2, 0);
        let frame = decode_into(&runtime, &avif, None, &mut buffer).unwrap();
        assert_eq!((frame.bit_depth, frame.stride, frame.len), (10, 32, 128));
    }

    #[test]
    fn test_decode_size_rejects_other_formats() {
        let error = decode_size(&runtime(), &fake::webp_image(4, 4, false)).unwrap_err();

        assert_eq!(error.status(), Some(NativeStatus::DecodeFailed));
        assert!(error.to_string().contains("not an AVIF file"));
    }
}
