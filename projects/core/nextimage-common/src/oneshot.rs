//! Stateless single-call conversions.
//!
//! The one-shot entry points take their options per call and leave no native object behind,
//! so there is nothing to close. Library-allocated output goes through [`transfer`] like every
//! other call; [`decode_into`] instead writes into memory the caller already owns.
//!
//! `None` options pass a null pointer, which makes the library apply its own defaults.

use crate::buffer::{DecodedPixels, OutputSlot, image_header, transfer};
use crate::error::{NextImageError, Operation, Result};
use crate::options::{ConfigRecord, DefaultsSource, NativeOf, NativeOptions, to_native};
use crate::pixel::PixelFormat;
use crate::runtime::NativeRuntime;
use crate::status::NativeStatus;
use core::ffi::c_int;
use core::ptr;
use nextimage_sys::{NativeLibrary, NextImageDecodeBuffer, NextImageStatus, OneShotFn, Zeroable};

/// Descriptor of a one-shot entry point that allocates its output.
pub trait OneShotFamily: 'static {
    /// Codec name used in errors and logs, e.g. `webp`.
    const NAME: &'static str;
    /// What the call does (`encode`, `decode`, ...).
    const ACTION: &'static str;
    /// Option record passed per call.
    type Options: ConfigRecord;
    /// Output descriptor the call fills.
    type Output: OutputSlot;

    /// Where translated options get their defaults from.
    fn defaults(library: &NativeLibrary) -> DefaultsSource<NativeOf<Self::Options>>;

    /// The allocating entry point.
    fn entry(
        library: &NativeLibrary,
    ) -> OneShotFn<NativeOf<Self::Options>, <Self::Output as OutputSlot>::Raw>;
}

/// A decoding family that can also write into a caller-supplied buffer.
pub trait DecodeIntoFamily: OneShotFamily<Output = DecodedPixels> {
    /// The `*_decode_into` entry point.
    fn entry_into(
        library: &NativeLibrary,
    ) -> OneShotFn<NativeOf<Self::Options>, NextImageDecodeBuffer>;
}

/// Geometry of an image decoded into a caller-supplied buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInto {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per row
    pub stride: usize,
    /// Bits per channel
    pub bit_depth: u8,
    /// Pixel layout
    pub format: PixelFormat,
    /// Bytes written at the start of the buffer
    pub len: usize,
}

/// Result of a size query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bits per channel; 8 for codecs that do not report it
    pub bit_depth: u8,
    /// Bytes of an 8-bit RGBA rendition, as reported by the library
    pub required_size: usize,
}

fn translate<'a, F: OneShotFamily>(
    runtime: &NativeRuntime,
    options: Option<&'a F::Options>,
    operation: Operation,
) -> Result<Option<NativeOptions<'a, NativeOf<F::Options>>>> {
    options
        .map(|options| {
            to_native(options, F::defaults(runtime.library()), runtime.errors(), operation)
        })
        .transpose()
}

/// Runs one allocating entry point and copies its output into caller-owned memory.
///
/// Fails with [`NextImageError::EmptyInput`] for empty input without reaching native code.
pub fn run_once<F: OneShotFamily>(
    runtime: &NativeRuntime,
    options: Option<&F::Options>,
    input: &[u8],
) -> Result<<F::Output as OutputSlot>::Output> {
    let operation = Operation::new(F::NAME, F::ACTION);
    if input.is_empty() {
        return Err(NextImageError::EmptyInput { operation });
    }

    let native = translate::<F>(runtime, options, operation)?;
    let options = native.as_ref().map_or(ptr::null(), NativeOptions::as_ptr);
    let entry = F::entry(runtime.library());
    transfer::<F::Output, _>(runtime, operation, |output| {
        // SAFETY: `input` is valid for its length, `options` is null or outlives the call and
        // `output` is a zeroed descriptor.
        unsafe { entry(input.as_ptr(), input.len(), options, output) }
    })
}

/// Decodes into `buffer`, which must hold the whole interleaved image.
///
/// A buffer the library reports as too small yields [`NextImageError::BufferTooSmall`]; an empty
/// buffer is rejected the same way before any native call. Some builds report a short buffer
/// with [`NativeStatus::InvalidParam`] instead, which surfaces as [`NextImageError::Native`].
/// Planar formats are not supported by the native entry point.
pub fn decode_into<F: DecodeIntoFamily>(
    runtime: &NativeRuntime,
    options: Option<&F::Options>,
    input: &[u8],
    buffer: &mut [u8],
) -> Result<DecodedInto> {
    let operation = Operation::new(F::NAME, "decode into");
    if input.is_empty() {
        return Err(NextImageError::EmptyInput { operation });
    }
    if buffer.is_empty() {
        return Err(NextImageError::BufferTooSmall {
            operation,
            capacity: 0,
            message: "output buffer is empty".into(),
        });
    }

    let native = translate::<F>(runtime, options, operation)?;
    let options = native.as_ref().map_or(ptr::null(), NativeOptions::as_ptr);
    let entry = F::entry_into(runtime.library());

    let mut raw = NextImageDecodeBuffer::zeroed();
    raw.data = buffer.as_mut_ptr();
    raw.data_capacity = buffer.len();

    let errors = runtime.errors().begin();
    // SAFETY: `input` is valid for its length, `options` is null or outlives the call and `raw`
    // describes `buffer`, which stays borrowed for the whole call.
    let status = NativeStatus::from_raw(unsafe { entry(input.as_ptr(), input.len(), options, &mut raw) });
    tracing::trace!(%operation, %status, "native call returned");
    match status {
        NativeStatus::Ok => {}
        NativeStatus::BufferTooSmall => {
            let message = errors
                .message()
                .unwrap_or_else(|| status.fallback_message().to_owned());
            return Err(NextImageError::BufferTooSmall {
                operation,
                capacity: buffer.len(),
                message,
            });
        }
        _ => return Err(errors.native_error(operation, status)),
    }
    drop(errors);

    let malformed = |reason| NextImageError::MalformedOutput { operation, reason };
    if raw.data != buffer.as_mut_ptr() {
        return Err(malformed("decoder replaced the caller buffer"));
    }
    let (width, height, bit_depth, format) = image_header(&raw, operation)?;
    let len = match raw.data_size {
        0 => raw.stride.saturating_mul(height as usize),
        size => size,
    };
    if len > buffer.len() {
        return Err(malformed("reported size exceeds the caller buffer"));
    }

    Ok(DecodedInto {
        width,
        height,
        stride: raw.stride,
        bit_depth,
        format,
        len,
    })
}

/// Runs a size query.
///
/// `call` receives the width, height, bit depth and required-size outputs. Queries without a
/// bit-depth output leave it at 8.
pub fn query_size<F>(runtime: &NativeRuntime, operation: Operation, input: &[u8], call: F) -> Result<ImageSize>
where
    F: FnOnce(&[u8], &mut c_int, &mut c_int, &mut c_int, &mut usize) -> NextImageStatus,
{
    if input.is_empty() {
        return Err(NextImageError::EmptyInput { operation });
    }

    let (mut width, mut height, mut bit_depth, mut required_size) = (0, 0, 8, 0);
    let errors = runtime.errors().begin();
    let status = NativeStatus::from_raw(call(input, &mut width, &mut height, &mut bit_depth, &mut required_size));
    tracing::trace!(%operation, %status, "native call returned");
    if !status.is_ok() {
        return Err(errors.native_error(operation, status));
    }
    drop(errors);

    let malformed = |reason| NextImageError::MalformedOutput { operation, reason };
    Ok(ImageSize {
        width: u32::try_from(width).map_err(|_| malformed("negative width"))?,
        height: u32::try_from(height).map_err(|_| malformed("negative height"))?,
        bit_depth: u8::try_from(bit_depth).map_err(|_| malformed("invalid bit depth"))?,
        required_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use nextimage_sys::{NextImageWebPDecodeOptions, NextImageWebPEncodeOptions};

    struct WebpEncode;

    impl OneShotFamily for WebpEncode {
        const NAME: &'static str = "webp";
        const ACTION: &'static str = "encode";
        type Options = TestEncodeOptions;
        type Output = EncodedBytes;

        fn defaults(library: &NativeLibrary) -> DefaultsSource<NextImageWebPEncodeOptions> {
            DefaultsSource::FillIn(library.webp_encoder.default_options)
        }

        fn entry(
            library: &NativeLibrary,
        ) -> OneShotFn<NextImageWebPEncodeOptions, nextimage_sys::NextImageBuffer> {
            library.webp.encode_alloc
        }
    }

    struct WebpDecode;

    impl OneShotFamily for WebpDecode {
        const NAME: &'static str = "webp";
        const ACTION: &'static str = "decode";
        type Options = TestDecodeOptions;
        type Output = DecodedPixels;

        fn defaults(library: &NativeLibrary) -> DefaultsSource<NextImageWebPDecodeOptions> {
            DefaultsSource::FillIn(library.webp_decoder.default_options)
        }

        fn entry(library: &NativeLibrary) -> OneShotFn<NextImageWebPDecodeOptions, NextImageDecodeBuffer> {
            library.webp.decode_alloc
        }
    }

    impl DecodeIntoFamily for WebpDecode {
        fn entry_into(
            library: &NativeLibrary,
        ) -> OneShotFn<NextImageWebPDecodeOptions, NextImageDecodeBuffer> {
            library.webp.decode_into
        }
    }

    fn webp_size(runtime: &NativeRuntime, input: &[u8]) -> Result<ImageSize> {
        let call = runtime.library().webp.decode_size;
        query_size(runtime, Operation::new("webp", "decode size"), input, |input, w, h, _, size| {
            // SAFETY: every out-pointer is a live local.
            unsafe { call(input.as_ptr(), input.len(), w, h, size) }
        })
    }

    #[test]
    fn test_encode_with_null_options_uses_library_defaults() {
        let runtime = runtime();

        let webp = run_once::<WebpEncode>(&runtime, None, &fake::png_header(12, 6)).unwrap();

        let info = fake::inspect_webp(&webp).unwrap();
        assert_eq!((info.width, info.height, info.quality), (12, 6, 75));
        assert_eq!(fake::calls("nextimage_webp_default_encode_options"), 0);
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_encode_options_reach_the_call() {
        let runtime = runtime();
        let options = TestEncodeOptions {
            quality: 30.0,
            lossless: true,
            method: 2,
        };

        let webp = run_once::<WebpEncode>(&runtime, Some(&options), &fake::png_header(4, 4)).unwrap();

        let info = fake::inspect_webp(&webp).unwrap();
        assert!(info.lossless);
        assert_eq!((info.quality, info.method), (30, 2));
        let native: NextImageWebPEncodeOptions = fake::last_options("nextimage_webp_encode_alloc").unwrap();
        assert_eq!(native.quality, 30.0);
    }

    #[test]
    fn test_empty_input_makes_no_native_call() {
        let runtime = runtime();
        let mut buffer = [0u8; 16];

        let encode = run_once::<WebpEncode>(&runtime, None, &[]).unwrap_err();
        let into = decode_into::<WebpDecode>(&runtime, None, &[], &mut buffer).unwrap_err();
        let size = webp_size(&runtime, &[]).unwrap_err();

        for error in [encode, into, size] {
            assert_eq!(error.kind(), ErrorKind::Validation);
        }
        assert_eq!(fake::total_calls(), 0);
    }

    #[test]
    fn test_failure_frees_partial_output() {
        let runtime = runtime();
        fake::fail_next(-2, Some("encoder gave up"), true);

        let error = run_once::<WebpEncode>(&runtime, None, &fake::png_header(8, 8)).unwrap_err();

        assert_eq!(error.status(), Some(NativeStatus::EncodeFailed));
        assert!(error.to_string().ends_with("encoder gave up"));
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_decode_alloc_copies_pixels() {
        let runtime = runtime();

        let image = run_once::<WebpDecode>(&runtime, None, &fake::webp_image(5, 3, false)).unwrap();

        assert_eq!((image.width, image.height), (5, 3));
        assert_eq!(image.data.len(), 60);
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_decode_into_fills_caller_buffer() {
        let runtime = runtime();
        let mut buffer = vec![0u8; 128];

        let frame =
            decode_into::<WebpDecode>(&runtime, None, &fake::webp_image(4, 4, false), &mut buffer).unwrap();

        assert_eq!(
            frame,
            DecodedInto {
                width: 4,
                height: 4,
                stride: 16,
                bit_depth: 8,
                format: PixelFormat::Rgba,
                len: 64,
            }
        );
        assert!(buffer[..64].iter().all(|&byte| byte != 0));
        assert!(buffer[64..].iter().all(|&byte| byte == 0));
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_decode_into_small_buffer_is_buffer_too_small() {
        let runtime = runtime();
        let mut buffer = vec![0u8; 63];

        let error =
            decode_into::<WebpDecode>(&runtime, None, &fake::webp_image(4, 4, false), &mut buffer).unwrap_err();

        match &error {
            NextImageError::BufferTooSmall { capacity, message, .. } => {
                assert_eq!(*capacity, 63);
                assert!(message.contains("need 64 bytes"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(error.status(), Some(NativeStatus::BufferTooSmall));
    }

    #[test]
    fn test_decode_into_empty_buffer_is_rejected_up_front() {
        let runtime = runtime();

        let error = decode_into::<WebpDecode>(&runtime, None, &fake::webp_image(4, 4, false), &mut []).unwrap_err();

        assert!(matches!(error, NextImageError::BufferTooSmall { capacity: 0, .. }));
        assert_eq!(fake::total_calls(), 0);
    }

    #[test]
    fn test_decode_into_planar_is_unsupported() {
        let runtime = runtime();
        let options = TestDecodeOptions {
            use_threads: false,
            format: PixelFormat::Yuv420,
        };
        let mut buffer = vec![0u8; 1024];

        let error = decode_into::<WebpDecode>(
            &runtime,
            Some(&options),
            &fake::webp_image(4, 4, false),
            &mut buffer,
        )
        .unwrap_err();

        assert_eq!(error.status(), Some(NativeStatus::Unsupported));
    }

    #[test]
    fn test_query_size() {
        let runtime = runtime();

        let size = webp_size(&runtime, &fake::webp_image(7, 3, true)).unwrap();

        assert_eq!(
            size,
            ImageSize {
                width: 7,
                height: 3,
                bit_depth: 8,
                required_size: 84,
            }
        );
    }

    #[test]
    fn test_query_size_failure_carries_message() {
        let runtime = runtime();

        let error = webp_size(&runtime, b"not a webp").unwrap_err();

        assert_eq!(error.status(), Some(NativeStatus::DecodeFailed));
        assert!(error.to_string().contains("not a WebP bitstream"));
    }
}
