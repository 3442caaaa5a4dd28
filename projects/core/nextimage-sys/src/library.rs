//! Function tables describing a loaded `libnextimage`.

use crate::avif::*;
use crate::types::{NextImageBuffer, NextImageDecodeBuffer, NextImageStatus};
use crate::webp::*;
use core::ffi::{c_char, c_int};

/// Allocates a native option struct filled with the library's defaults. Null on failure.
pub type CreateDefaultOptionsFn<O> = unsafe extern "C" fn() -> *mut O;

/// Releases a struct returned by [`CreateDefaultOptionsFn`].
pub type FreeOptionsFn<O> = unsafe extern "C" fn(options: *mut O);

/// Creates a native object from options (null selects the library defaults). Null on failure.
pub type CreateFn<O, H> = unsafe extern "C" fn(options: *const O) -> *mut H;

/// Runs one conversion on a native object, writing a library-allocated result into `output`.
///
/// # Parameters
/// - `handle`: Object returned by the paired [`CreateFn`]
/// - `input`: Pointer to the input bytes
/// - `input_size`: Length of the input in bytes
/// - `output`: Zero-initialized descriptor that receives the result
///
/// # Returns
/// `NEXTIMAGE_OK` on success, a negative status otherwise
pub type ProcessFn<H, B> = unsafe extern "C" fn(
    handle: *mut H,
    input: *const u8,
    input_size: usize,
    output: *mut B,
) -> NextImageStatus;

/// Destroys an object returned by the paired [`CreateFn`].
pub type DestroyFn<H> = unsafe extern "C" fn(handle: *mut H);

/// Fills caller-provided storage with the library's defaults.
pub type FillDefaultOptionsFn<O> = unsafe extern "C" fn(options: *mut O);

/// Converts one input with the given options (null selects the library defaults).
///
/// For `*_alloc` functions `output` is zero-initialized and receives a library allocation. For
/// `*_decode_into` the caller sets `data` and `data_capacity` before the call and keeps
/// ownership of that memory.
pub type OneShotFn<O, B> = unsafe extern "C" fn(
    input: *const u8,
    input_size: usize,
    options: *const O,
    output: *mut B,
) -> NextImageStatus;

/// `nextimage_webp_decode_size`: dimensions and the RGBA buffer size of a WebP image.
pub type WebPDecodeSizeFn = unsafe extern "C" fn(
    input: *const u8,
    input_size: usize,
    width: *mut c_int,
    height: *mut c_int,
    required_size: *mut usize,
) -> NextImageStatus;

/// `nextimage_avif_decode_size`: dimensions, bit depth and the RGBA buffer size of an AVIF image.
pub type AvifDecodeSizeFn = unsafe extern "C" fn(
    input: *const u8,
    input_size: usize,
    width: *mut c_int,
    height: *mut c_int,
    bit_depth: *mut c_int,
    required_size: *mut usize,
) -> NextImageStatus;

/// `nextimage_webp2gif_alloc`, which takes no options.
pub type WebP2GifAllocFn = unsafe extern "C" fn(
    input: *const u8,
    input_size: usize,
    output: *mut NextImageBuffer,
) -> NextImageStatus;

/// One-shot WebP entry points.
pub struct WebPFns {
    /// `nextimage_webp_encode_alloc`
    pub encode_alloc: OneShotFn<NextImageWebPEncodeOptions, NextImageBuffer>,
    /// `nextimage_webp_decode_alloc`
    pub decode_alloc: OneShotFn<NextImageWebPDecodeOptions, NextImageDecodeBuffer>,
    /// `nextimage_webp_decode_into`
    pub decode_into: OneShotFn<NextImageWebPDecodeOptions, NextImageDecodeBuffer>,
    /// `nextimage_webp_decode_size`
    pub decode_size: WebPDecodeSizeFn,
    /// `nextimage_gif2webp_alloc`
    pub gif2webp_alloc: OneShotFn<NextImageWebPEncodeOptions, NextImageBuffer>,
    /// `nextimage_webp2gif_alloc`
    pub webp2gif_alloc: WebP2GifAllocFn,
}

/// One-shot AVIF entry points.
pub struct AvifFns {
    /// `nextimage_avif_encode_alloc`
    pub encode_alloc: OneShotFn<NextImageAVIFEncodeOptions, NextImageBuffer>,
    /// `nextimage_avif_decode_alloc`
    pub decode_alloc: OneShotFn<NextImageAVIFDecodeOptions, NextImageDecodeBuffer>,
    /// `nextimage_avif_decode_into`
    pub decode_into: OneShotFn<NextImageAVIFDecodeOptions, NextImageDecodeBuffer>,
    /// `nextimage_avif_decode_size`
    pub decode_size: AvifDecodeSizeFn,
}

/// Entry points of one stateless command family (`cwebp`, `avifdec`, ...).
pub struct CommandFns<O, C> {
    /// `<family>_create_default_options`
    pub create_default_options: CreateDefaultOptionsFn<O>,
    /// `<family>_free_options`
    pub free_options: FreeOptionsFn<O>,
    /// `<family>_new_command`
    pub new_command: CreateFn<O, C>,
    /// `<family>_run_command`
    pub run_command: ProcessFn<C, NextImageBuffer>,
    /// `<family>_free_command`
    pub free_command: DestroyFn<C>,
}

/// Entry points of one reusable encoder or decoder instance family.
pub struct InstanceFns<O, H, B> {
    /// `nextimage_<codec>_default_<direction>_options`
    pub default_options: FillDefaultOptionsFn<O>,
    /// `nextimage_<codec>_<direction>r_create`
    pub create: CreateFn<O, H>,
    /// `nextimage_<codec>_<direction>r_<direction>`
    pub process: ProcessFn<H, B>,
    /// `nextimage_<codec>_<direction>r_destroy`
    pub destroy: DestroyFn<H>,
}

/// Entry points shared by every family.
pub struct RuntimeFns {
    /// `nextimage_free_buffer`
    pub free_buffer: unsafe extern "C" fn(buffer: *mut NextImageBuffer),
    /// `nextimage_free_decode_buffer`
    pub free_decode_buffer: unsafe extern "C" fn(buffer: *mut NextImageDecodeBuffer),
    /// `nextimage_last_error_message`, null when no error is recorded
    pub last_error_message: unsafe extern "C" fn() -> *const c_char,
    /// `nextimage_clear_error`
    pub clear_error: unsafe extern "C" fn(),
    /// `nextimage_version`
    pub version: unsafe extern "C" fn() -> *const c_char,
    /// `nextimage_allocation_counter`, only present in NEXTIMAGE_DEBUG builds
    pub allocation_counter: Option<unsafe extern "C" fn() -> i64>,
}

/// Every entry point of `libnextimage`.
pub struct NativeLibrary {
    /// Shared buffer, error and version functions
    pub runtime: RuntimeFns,
    /// JPEG/PNG/... to WebP
    pub cwebp: CommandFns<CWebPOptions, CWebPCommand>,
    /// WebP to PNG
    pub dwebp: CommandFns<DWebPOptions, DWebPCommand>,
    /// GIF to animated WebP
    pub gif2webp: CommandFns<Gif2WebPOptions, Gif2WebPCommand>,
    /// WebP to GIF
    pub webp2gif: CommandFns<WebP2GifOptions, WebP2GifCommand>,
    /// JPEG/PNG to AVIF
    pub avifenc: CommandFns<AVIFEncOptions, AVIFEncCommand>,
    /// AVIF to PNG/JPEG
    pub avifdec: CommandFns<AVIFDecOptions, AVIFDecCommand>,
    /// Reusable WebP encoder
    pub webp_encoder: InstanceFns<NextImageWebPEncodeOptions, NextImageWebPEncoder, NextImageBuffer>,
    /// Reusable WebP decoder
    pub webp_decoder:
        InstanceFns<NextImageWebPDecodeOptions, NextImageWebPDecoder, NextImageDecodeBuffer>,
    /// Reusable AVIF encoder
    pub avif_encoder: InstanceFns<NextImageAVIFEncodeOptions, NextImageAVIFEncoder, NextImageBuffer>,
    /// Reusable AVIF decoder
    pub avif_decoder:
        InstanceFns<NextImageAVIFDecodeOptions, NextImageAVIFDecoder, NextImageDecodeBuffer>,
    /// One-shot WebP functions
    pub webp: WebPFns,
    /// One-shot AVIF functions
    pub avif: AvifFns,
}
