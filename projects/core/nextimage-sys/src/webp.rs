//! WebP families: `cwebp`, `dwebp`, `gif2webp`, `webp2gif` and the WebP encoder/decoder instances.

use crate::types::{NextImagePixelFormat, Zeroable};
use core::ffi::{c_float, c_int};

/// `CWebPPreset`, or `-1` for no preset.
pub type CWebPPreset = c_int;
/// Default preset
pub const CWEBP_PRESET_DEFAULT: CWebPPreset = 0;
/// Digital picture, like portrait
pub const CWEBP_PRESET_PICTURE: CWebPPreset = 1;
/// Outdoor photograph
pub const CWEBP_PRESET_PHOTO: CWebPPreset = 2;
/// Hand or line drawing
pub const CWEBP_PRESET_DRAWING: CWebPPreset = 3;
/// Small-sized colorful images
pub const CWEBP_PRESET_ICON: CWebPPreset = 4;
/// Text-like
pub const CWEBP_PRESET_TEXT: CWebPPreset = 5;

/// `CWebPImageHint`.
pub type CWebPImageHint = c_int;
/// Default hint
pub const CWEBP_HINT_DEFAULT: CWebPImageHint = 0;
/// Digital picture, like portrait
pub const CWEBP_HINT_PICTURE: CWebPImageHint = 1;
/// Outdoor photograph
pub const CWEBP_HINT_PHOTO: CWebPImageHint = 2;
/// Discrete tone image (graph, map-tile)
pub const CWEBP_HINT_GRAPH: CWebPImageHint = 3;

/// Keep no metadata
pub const CWEBP_METADATA_NONE: c_int = 0;
/// Keep EXIF metadata
pub const CWEBP_METADATA_EXIF: c_int = 1;
/// Keep the ICC profile
pub const CWEBP_METADATA_ICC: c_int = 2;
/// Keep XMP metadata
pub const CWEBP_METADATA_XMP: c_int = 4;
/// Keep all metadata
pub const CWEBP_METADATA_ALL: c_int = 7;

/// Options of the `cwebp` command (every `WebPConfig` field plus cwebp's own switches).
///
/// Fields documented with a sentinel are left to the native library when they hold it.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CWebPOptions {
    /// 0-100
    pub quality: c_float,
    /// 0 or 1
    pub lossless: c_int,
    /// 0-6, quality/speed trade-off
    pub method: c_int,
    /// `-1` = none
    pub preset: CWebPPreset,
    /// Image type hint
    pub image_hint: CWebPImageHint,
    /// `-1` = unused, otherwise 0 (fast) to 9 (best)
    pub lossless_preset: c_int,
    /// Target size in bytes, 0 = disabled
    pub target_size: c_int,
    /// Target PSNR, 0 = disabled
    pub target_psnr: c_float,
    /// 1-4
    pub segments: c_int,
    /// 0-100, spatial noise shaping
    pub sns_strength: c_int,
    /// 0-100
    pub filter_strength: c_int,
    /// 0-7
    pub filter_sharpness: c_int,
    /// 0 = simple, 1 = strong
    pub filter_type: c_int,
    /// 0 or 1
    pub autofilter: c_int,
    /// 0 = none, 1 = compressed
    pub alpha_compression: c_int,
    /// 0 = none, 1 = fast, 2 = best
    pub alpha_filtering: c_int,
    /// 0-100
    pub alpha_quality: c_int,
    /// 1-10 entropy-analysis passes
    pub pass: c_int,
    /// 0 or 1
    pub show_compressed: c_int,
    /// 0 = none, 1 = segment-smooth, 2 = pseudo-random dithering
    pub preprocessing: c_int,
    /// 0-3, log2 of the token partition count
    pub partitions: c_int,
    /// 0-100
    pub partition_limit: c_int,
    /// 0 or 1
    pub emulate_jpeg_size: c_int,
    /// 0 or 1
    pub thread_level: c_int,
    /// 0 or 1
    pub low_memory: c_int,
    /// `-1` = unset, otherwise 0-100 (enables lossless)
    pub near_lossless: c_int,
    /// 0 or 1
    pub exact: c_int,
    /// Reserved
    pub use_delta_palette: c_int,
    /// 0 or 1
    pub use_sharp_yuv: c_int,
    /// 0-100
    pub qmin: c_int,
    /// 0-100
    pub qmax: c_int,
    /// `-1` = default, otherwise a `CWEBP_METADATA_*` mask
    pub keep_metadata: c_int,
    /// `-1` = no crop
    pub crop_x: c_int,
    /// Crop rectangle y
    pub crop_y: c_int,
    /// Crop rectangle width
    pub crop_width: c_int,
    /// Crop rectangle height
    pub crop_height: c_int,
    /// `-1` = no resize
    pub resize_width: c_int,
    /// Resize height
    pub resize_height: c_int,
    /// 0 = always, 1 = up only, 2 = down only
    pub resize_mode: c_int,
    /// Background `0xRRGGBB`, `0xFFFFFFFF` = disabled
    pub blend_alpha: u32,
    /// 0 or 1
    pub noalpha: c_int,
    /// 0 or 1, animations only
    pub allow_mixed: c_int,
    /// 0 or 1, animations only
    pub minimize_size: c_int,
    /// `-1` = auto
    pub kmin: c_int,
    /// `-1` = auto
    pub kmax: c_int,
    /// 0 = infinite
    pub anim_loop_count: c_int,
    /// 0 or 1
    pub loop_compatibility: c_int,
}

/// `gif2webp` reuses the `cwebp` option layout.
pub type Gif2WebPOptions = CWebPOptions;

/// Options of the `dwebp` command.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DWebPOptions {
    /// 0 or 1
    pub use_threads: c_int,
    /// 0 or 1
    pub bypass_filtering: c_int,
    /// 0 or 1
    pub no_fancy_upsampling: c_int,
    /// Desired pixel format
    pub format: NextImagePixelFormat,
    /// 0 or 1
    pub no_dither: c_int,
    /// 0-100
    pub dither_strength: c_int,
    /// 0 or 1
    pub alpha_dither: c_int,
    /// Crop rectangle x
    pub crop_x: c_int,
    /// Crop rectangle y
    pub crop_y: c_int,
    /// Crop rectangle width
    pub crop_width: c_int,
    /// Crop rectangle height
    pub crop_height: c_int,
    /// 0 or 1
    pub use_crop: c_int,
    /// Resize width
    pub resize_width: c_int,
    /// Resize height
    pub resize_height: c_int,
    /// 0 or 1
    pub use_resize: c_int,
    /// 0 or 1
    pub flip: c_int,
    /// 0 or 1
    pub alpha_only: c_int,
    /// 0 or 1
    pub incremental: c_int,
}

/// Options of the `webp2gif` command.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WebP2GifOptions {
    /// Reserved for future use
    pub reserved: c_int,
}

/// Options of the WebP encoder instance.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NextImageWebPEncodeOptions {
    /// 0-100
    pub quality: c_float,
    /// 0 or 1
    pub lossless: c_int,
    /// 0-6
    pub method: c_int,
    /// 0 = disabled
    pub target_size: c_int,
    /// 0 = disabled
    pub target_psnr: c_float,
    /// Preserve RGB values under transparent pixels
    pub exact: c_int,
    /// 0 = none, 1 = compressed
    pub alpha_compression: c_int,
    /// 0-100
    pub alpha_quality: c_int,
    /// 1-10
    pub pass: c_int,
    /// 0 = none, 1 = segment-smooth, 2 = pseudo-random dithering
    pub preprocessing: c_int,
    /// 0-3
    pub partitions: c_int,
    /// 0-100
    pub partition_limit: c_int,
}

/// Options of the WebP decoder instance.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NextImageWebPDecodeOptions {
    /// 0 or 1
    pub use_threads: c_int,
    /// 0 or 1
    pub bypass_filtering: c_int,
    /// 0 or 1
    pub no_fancy_upsampling: c_int,
    /// Desired pixel format
    pub format: NextImagePixelFormat,
}

unsafe impl Zeroable for CWebPOptions {}
unsafe impl Zeroable for DWebPOptions {}
unsafe impl Zeroable for WebP2GifOptions {}
unsafe impl Zeroable for NextImageWebPEncodeOptions {}
unsafe impl Zeroable for NextImageWebPDecodeOptions {}

/// Opaque `cwebp` command.
#[repr(C)]
pub struct CWebPCommand {
    _private: [u8; 0],
}

/// Opaque `dwebp` command.
#[repr(C)]
pub struct DWebPCommand {
    _private: [u8; 0],
}

/// Opaque `gif2webp` command.
#[repr(C)]
pub struct Gif2WebPCommand {
    _private: [u8; 0],
}

/// Opaque `webp2gif` command.
#[repr(C)]
pub struct WebP2GifCommand {
    _private: [u8; 0],
}

/// Opaque WebP encoder instance.
#[repr(C)]
pub struct NextImageWebPEncoder {
    _private: [u8; 0],
}

/// Opaque WebP decoder instance.
#[repr(C)]
pub struct NextImageWebPDecoder {
    _private: [u8; 0],
}
