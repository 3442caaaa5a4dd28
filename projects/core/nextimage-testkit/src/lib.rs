//! In-process stand-in for `libnextimage`.
//!
//! [`LIBRARY`] has the same shape and calling conventions as the real library's function
//! table: defaults come from `*_create_default_options`, outputs are allocated by the library
//! and released through `nextimage_free_buffer`/`nextimage_free_decode_buffer`, and failures
//! set a thread-local last-error message. On top of that it records every call, tracks every
//! allocation and can be told to fail.
//!
//! The codecs behind it only understand image headers: they never touch pixel data, but they
//! honor the options that change an output's dimensions, container or metadata, so option
//! translation can be verified end to end with [`inspect_webp`] and [`inspect_avif`].
//!
//! # Examples
//!
//! ```ignore
//! use nextimage_common::{NativeRuntime, SlotScope};
//! use nextimage_testkit as fake;
//!
//! let runtime = NativeRuntime::new(&fake::LIBRARY, SlotScope::ThreadLocal);
//! // ... exercise the bindings ...
//! assert_eq!(fake::live_allocations(), 0);
//! ```

mod codecs;
mod images;
mod library;
mod output;
mod state;

pub use images::{
    AvifInfo, PNG_SIGNATURE, RasterInfo, WebpInfo, avif_image, gif_image, inspect_avif,
    inspect_webp, jpeg_header, parse_gif, parse_jpeg, parse_png, png_header, png_image,
    webp_image,
};
pub use library::{LIBRARY, VERSION};
pub use output::{
    OutputShape, fail_with_partial_output, write_decoded, write_encoded, write_encoded_shape,
};
pub use state::{
    calls, double_frees, fail_next, fail_next_create, last_options, live_allocations,
    set_error, set_null_defaults, total_calls,
};

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;
    use nextimage_sys::*;

    #[test]
    fn test_command_lifecycle_is_recorded() {
        let fns = &LIBRARY.cwebp;
        unsafe {
            let options = (fns.create_default_options)();
            assert_eq!((*options).quality, 75.0);
            let command = (fns.new_command)(options);
            (fns.free_options)(options);

            let input = png_header(10, 10);
            let mut output = NextImageBuffer::zeroed();
            let status = (fns.run_command)(command, input.as_ptr(), input.len(), &mut output);
            assert_eq!(status, NEXTIMAGE_OK);
            assert!(inspect_webp(core::slice::from_raw_parts(output.data, output.size)).is_some());

            (LIBRARY.runtime.free_buffer)(&mut output);
            (fns.free_command)(command);
        }

        assert_eq!(calls("cwebp_run_command"), 1);
        assert_eq!(live_allocations(), 0);
        assert_eq!(double_frees(), 0);
    }

    #[test]
    fn test_failure_sets_error_and_free_clears_it() {
        let fns = &LIBRARY.cwebp;
        unsafe {
            let command = (fns.new_command)(ptr::null());
            let mut output = NextImageBuffer::zeroed();
            let status = (fns.run_command)(command, b"xyz".as_ptr(), 3, &mut output);
            assert_eq!(status, NEXTIMAGE_ERROR_UNSUPPORTED);
            assert!(!(LIBRARY.runtime.last_error_message)().is_null());

            (LIBRARY.runtime.free_buffer)(&mut output);
            assert!((LIBRARY.runtime.last_error_message)().is_null());
            (fns.free_command)(command);
        }
    }

    #[test]
    fn test_null_options_apply_defaults() {
        let fns = &LIBRARY.avifenc;
        unsafe {
            let command = (fns.new_command)(ptr::null());
            (fns.free_command)(command);
        }

        let options: AVIFEncOptions = last_options("avifenc").unwrap();
        assert_eq!(options.quality, 60);
        assert_eq!(options.quality_alpha, -1);
    }

    #[test]
    fn test_instance_defaults_fill_in() {
        let mut options = NextImageAVIFEncodeOptions::zeroed();
        unsafe { (LIBRARY.avif_encoder.default_options)(&mut options) };

        assert_eq!(options.quality, 50);
        assert_eq!(options.yuv_format, 2);
        assert_eq!(calls("nextimage_avif_default_encode_options"), 1);
    }

    #[test]
    fn test_one_shot_encode_uses_defaults_for_null_options() {
        let input = png_header(12, 8);
        let mut output = NextImageBuffer::zeroed();
        unsafe {
            let status = (LIBRARY.webp.encode_alloc)(
                input.as_ptr(),
                input.len(),
                ptr::null(),
                &mut output,
            );
            assert_eq!(status, NEXTIMAGE_OK);
            let info = inspect_webp(core::slice::from_raw_parts(output.data, output.size)).unwrap();
            assert_eq!((info.width, info.height, info.quality), (12, 8, 75));
            (LIBRARY.runtime.free_buffer)(&mut output);
        }

        assert_eq!(calls("nextimage_webp_encode_alloc"), 1);
        assert_eq!(live_allocations(), 0);
    }

    #[test]
    fn test_decode_into_rejects_small_buffer() {
        let input = webp_image(4, 4, false);
        let mut storage = vec![0u8; 32];
        let mut buffer = NextImageDecodeBuffer::zeroed();
        buffer.data = storage.as_mut_ptr();
        buffer.data_capacity = storage.len();

        let status = unsafe {
            (LIBRARY.webp.decode_into)(input.as_ptr(), input.len(), ptr::null(), &mut buffer)
        };
        assert_eq!(status, NEXTIMAGE_ERROR_BUFFER_TOO_SMALL);

        storage.resize(64, 0);
        buffer.data = storage.as_mut_ptr();
        buffer.data_capacity = storage.len();
        let status = unsafe {
            (LIBRARY.webp.decode_into)(input.as_ptr(), input.len(), ptr::null(), &mut buffer)
        };
        assert_eq!(status, NEXTIMAGE_OK);
        assert_eq!((buffer.width, buffer.stride, buffer.data_size), (4, 16, 64));
        assert_eq!(live_allocations(), 0);
    }

    #[test]
    fn test_avif_decode_size_reports_bit_depth() {
        let input = crate::images::avif_output(&AvifInfo {
            width: 5,
            height: 3,
            quality: 50,
            alpha_quality: 50,
            speed: 6,
            bit_depth: 10,
            yuv_format: 0,
            has_alpha: false,
            exif: Vec::new(),
            xmp: Vec::new(),
            icc: Vec::new(),
        });
        let (mut width, mut height, mut depth, mut required) = (0, 0, 0, 0);
        let status = unsafe {
            (LIBRARY.avif.decode_size)(
                input.as_ptr(),
                input.len(),
                &mut width,
                &mut height,
                &mut depth,
                &mut required,
            )
        };

        assert_eq!(status, NEXTIMAGE_OK);
        assert_eq!((width, height, depth, required), (5, 3, 10, 60));
    }

    #[test]
    fn test_version() {
        let version = unsafe { core::ffi::CStr::from_ptr((LIBRARY.runtime.version)()) };
        assert_eq!(version.to_str().unwrap(), VERSION);
    }
}
