//! AVIF families: `avifenc`, `avifdec` and the AVIF encoder/decoder instances.

use crate::types::{NextImagePixelFormat, Zeroable};
use core::ffi::c_int;

/// `AVIFDecOutputFormat`.
pub type AVIFDecOutputFormat = c_int;
/// PNG output
pub const AVIFDEC_OUTPUT_PNG: AVIFDecOutputFormat = 0;
/// JPEG output
pub const AVIFDEC_OUTPUT_JPEG: AVIFDecOutputFormat = 1;

/// Options of the `avifenc` command.
///
/// The metadata pointers are borrowed for the duration of `avifenc_new_command`; the library
/// copies what it needs.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AVIFEncOptions {
    /// 0-100, color quality
    pub quality: c_int,
    /// 0-100, `-1` = use `quality`
    pub quality_alpha: c_int,
    /// 0 (slowest) to 10 (fastest)
    pub speed: c_int,
    /// 0-63, `-1` = derived from quality
    pub min_quantizer: c_int,
    /// 0-63, `-1` = derived from quality
    pub max_quantizer: c_int,
    /// 0-63, `-1` = derived from alpha quality
    pub min_quantizer_alpha: c_int,
    /// 0-63, `-1` = derived from alpha quality
    pub max_quantizer_alpha: c_int,
    /// 8, 10 or 12
    pub bit_depth: c_int,
    /// 0 = 444, 1 = 422, 2 = 420, 3 = 400
    pub yuv_format: c_int,
    /// 0 = limited, 1 = full
    pub yuv_range: c_int,
    /// 0 or 1
    pub enable_alpha: c_int,
    /// 0 or 1
    pub premultiply_alpha: c_int,
    /// 0-6
    pub tile_rows_log2: c_int,
    /// 0-6
    pub tile_cols_log2: c_int,
    /// CICP color primaries, `-1` = auto
    pub color_primaries: c_int,
    /// CICP transfer characteristics, `-1` = auto
    pub transfer_characteristics: c_int,
    /// CICP matrix coefficients, `-1` = auto
    pub matrix_coefficients: c_int,
    /// 0 or 1
    pub sharp_yuv: c_int,
    /// Target size in bytes, 0 = disabled
    pub target_size: c_int,
    /// EXIF bytes, null = none
    pub exif_data: *const u8,
    /// Length of `exif_data`
    pub exif_size: usize,
    /// XMP bytes, null = none
    pub xmp_data: *const u8,
    /// Length of `xmp_data`
    pub xmp_size: usize,
    /// ICC profile bytes, null = none
    pub icc_data: *const u8,
    /// Length of `icc_data`
    pub icc_size: usize,
    /// 0-3 quarter turns anti-clockwise, `-1` = disabled
    pub irot_angle: c_int,
    /// 0 = vertical, 1 = horizontal, `-1` = disabled
    pub imir_axis: c_int,
    /// `[h_spacing, v_spacing]`, `-1` = disabled
    pub pasp: [c_int; 2],
    /// `[x, y, width, height]`, `-1` = disabled
    pub crop: [c_int; 4],
    /// Clean aperture fractions, `-1` = disabled
    pub clap: [c_int; 8],
    /// 0-65535, `-1` = disabled
    pub clli_max_cll: c_int,
    /// 0-65535, `-1` = disabled
    pub clli_max_pall: c_int,
    /// Animation timescale
    pub timescale: c_int,
    /// 0 = disabled
    pub keyframe_interval: c_int,
}

/// Options of the `avifdec` command.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AVIFDecOptions {
    /// PNG or JPEG
    pub output_format: AVIFDecOutputFormat,
    /// 0-100, JPEG output only
    pub jpeg_quality: c_int,
    /// 0 or 1
    pub use_threads: c_int,
    /// Desired pixel format
    pub format: NextImagePixelFormat,
    /// 0 or 1
    pub ignore_exif: c_int,
    /// 0 or 1
    pub ignore_xmp: c_int,
    /// 0 or 1. The decoder never returns an ICC profile, so this has no effect.
    pub ignore_icc: c_int,
    /// Maximum total pixel count
    pub image_size_limit: u32,
    /// Maximum width or height, 0 = unlimited
    pub image_dimension_limit: u32,
    /// 0 = disabled, 1 = enabled
    pub strict_flags: c_int,
    /// 0 = automatic, 1 = fastest, 2 = best quality, 3 = nearest, 4 = bilinear
    pub chroma_upsampling: c_int,
}

/// Options of the AVIF encoder instance.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NextImageAVIFEncodeOptions {
    /// 0-100
    pub quality: c_int,
    /// 0-10
    pub speed: c_int,
    /// 0-63
    pub min_quantizer: c_int,
    /// 0-63
    pub max_quantizer: c_int,
    /// 0-63
    pub min_quantizer_alpha: c_int,
    /// 0-63
    pub max_quantizer_alpha: c_int,
    /// 0 or 1
    pub enable_alpha: c_int,
    /// 8, 10 or 12
    pub bit_depth: c_int,
    /// 0 = 444, 1 = 422, 2 = 420, 3 = 400
    pub yuv_format: c_int,
    /// 0-6
    pub tile_rows_log2: c_int,
    /// 0-6
    pub tile_cols_log2: c_int,
}

/// Options of the AVIF decoder instance.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NextImageAVIFDecodeOptions {
    /// 0 or 1
    pub use_threads: c_int,
    /// Desired pixel format
    pub format: NextImagePixelFormat,
    /// 0 or 1
    pub ignore_exif: c_int,
    /// 0 or 1
    pub ignore_xmp: c_int,
}

unsafe impl Zeroable for AVIFEncOptions {}
unsafe impl Zeroable for AVIFDecOptions {}
unsafe impl Zeroable for NextImageAVIFEncodeOptions {}
unsafe impl Zeroable for NextImageAVIFDecodeOptions {}

/// Opaque `avifenc` command.
#[repr(C)]
pub struct AVIFEncCommand {
    _private: [u8; 0],
}

/// Opaque `avifdec` command.
#[repr(C)]
pub struct AVIFDecCommand {
    _private: [u8; 0],
}

/// Opaque AVIF encoder instance.
#[repr(C)]
pub struct NextImageAVIFEncoder {
    _private: [u8; 0],
}

/// Opaque AVIF decoder instance.
#[repr(C)]
pub struct NextImageAVIFDecoder {
    _private: [u8; 0],
}
