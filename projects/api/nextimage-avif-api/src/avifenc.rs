//! The `avifenc` command: JPEG and PNG to AVIF.

use core::ffi::c_int;
use nextimage_common::{Command, CommandFamily, ConfigRecord, NativeField, NativeRuntime, native_options};
use nextimage_sys::*;

/// Chroma subsampling of the encoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YuvFormat {
    /// 4:4:4, no subsampling
    #[default]
    Yuv444,
    /// 4:2:2
    Yuv422,
    /// 4:2:0
    Yuv420,
    /// 4:0:0, monochrome
    Yuv400,
}

impl NativeField for YuvFormat {
    type Raw = c_int;

    fn lower(&self) -> c_int {
        match self {
            Self::Yuv444 => 0,
            Self::Yuv422 => 1,
            Self::Yuv420 => 2,
            Self::Yuv400 => 3,
        }
    }

    fn lift(raw: c_int) -> Self {
        match raw {
            0 => Self::Yuv444,
            1 => Self::Yuv422,
            2 => Self::Yuv420,
            3 => Self::Yuv400,
            _ => {
                tracing::warn!(raw, "unknown YUV format in native options; using 4:4:4");
                Self::Yuv444
            }
        }
    }
}

/// Range of the YUV samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YuvRange {
    /// Studio range
    Limited,
    /// Full range
    #[default]
    Full,
}

impl NativeField for YuvRange {
    type Raw = c_int;

    fn lower(&self) -> c_int {
        match self {
            Self::Limited => 0,
            Self::Full => 1,
        }
    }

    fn lift(raw: c_int) -> Self {
        match raw {
            0 => Self::Limited,
            1 => Self::Full,
            _ => {
                tracing::warn!(raw, "unknown YUV range in native options; using full range");
                Self::Full
            }
        }
    }
}

/// Axis of the `imir` mirror property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorAxis {
    /// Top and bottom are swapped
    Vertical,
    /// Left and right are swapped
    Horizontal,
}

impl NativeField for MirrorAxis {
    type Raw = c_int;

    fn lower(&self) -> c_int {
        match self {
            Self::Vertical => 0,
            Self::Horizontal => 1,
        }
    }

    fn lift(raw: c_int) -> Self {
        match raw {
            0 => Self::Vertical,
            1 => Self::Horizontal,
            _ => {
                tracing::warn!(raw, "unknown mirror axis in native options; using horizontal");
                Self::Horizontal
            }
        }
    }
}

native_options! {
    /// Options of the `avifenc` command.
    ///
    /// Values are forwarded as given; the native library validates them. The metadata blobs
    /// are borrowed only while the command is created.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AvifencOptions => AVIFEncOptions {
        /// 0-100, color quality
        pub quality: i32 => quality,
        /// 0-100, `None` uses `quality`
        pub quality_alpha: Option<i32> => quality_alpha,
        /// 0 (slowest) to 10 (fastest)
        pub speed: i32 => speed,
        /// 0-63, `None` derives it from the quality
        pub min_quantizer: Option<i32> => min_quantizer,
        /// 0-63, `None` derives it from the quality
        pub max_quantizer: Option<i32> => max_quantizer,
        /// 0-63, `None` derives it from the alpha quality
        pub min_quantizer_alpha: Option<i32> => min_quantizer_alpha,
        /// 0-63, `None` derives it from the alpha quality
        pub max_quantizer_alpha: Option<i32> => max_quantizer_alpha,
        /// 8, 10 or 12
        pub bit_depth: i32 => bit_depth,
        /// Chroma subsampling
        pub yuv_format: YuvFormat => yuv_format,
        /// Sample range
        pub yuv_range: YuvRange => yuv_range,
        /// Encode the alpha channel
        pub enable_alpha: bool => enable_alpha,
        /// Premultiply color by alpha
        pub premultiply_alpha: bool => premultiply_alpha,
        /// 0-6
        pub tile_rows_log2: i32 => tile_rows_log2,
        /// 0-6
        pub tile_cols_log2: i32 => tile_cols_log2,
        /// CICP color primaries, `None` = auto
        pub color_primaries: Option<i32> => color_primaries,
        /// CICP transfer characteristics, `None` = auto
        pub transfer_characteristics: Option<i32> => transfer_characteristics,
        /// CICP matrix coefficients, `None` = auto
        pub matrix_coefficients: Option<i32> => matrix_coefficients,
        /// Sharper RGB to YUV conversion
        pub sharp_yuv: bool => sharp_yuv,
        /// Target size in bytes, 0 = disabled
        pub target_size: i32 => target_size,
        /// 0-3 quarter turns anti-clockwise
        pub irot_angle: Option<i32> => irot_angle,
        /// Mirror axis
        pub imir_axis: Option<MirrorAxis> => imir_axis,
        /// Pixel aspect ratio `[h_spacing, v_spacing]`
        pub pasp: Option<[i32; 2]> => pasp,
        /// Crop rectangle `[x, y, width, height]`, applied before encoding
        pub crop: Option<[i32; 4]> => crop,
        /// Clean aperture as four fractions
        pub clap: Option<[i32; 8]> => clap,
        /// 0-65535, maximum content light level
        pub clli_max_cll: Option<i32> => clli_max_cll,
        /// 0-65535, maximum picture-average light level
        pub clli_max_pall: Option<i32> => clli_max_pall,
        /// Animation timescale
        pub timescale: i32 => timescale,
        /// 0 = disabled
        pub keyframe_interval: i32 => keyframe_interval,
    }
    blobs {
        /// EXIF payload stored in the output
        pub exif => (exif_data, exif_size),
        /// XMP payload stored in the output
        pub xmp => (xmp_data, xmp_size),
        /// ICC profile stored in the output
        pub icc => (icc_data, icc_size),
    }
}

impl ConfigRecord for AvifencOptions {
    /// The documented `avifenc` defaults.
    fn fallback() -> Self {
        Self {
            quality: 60,
            quality_alpha: None,
            speed: 6,
            min_quantizer: None,
            max_quantizer: None,
            min_quantizer_alpha: None,
            max_quantizer_alpha: None,
            bit_depth: 8,
            yuv_format: YuvFormat::Yuv444,
            yuv_range: YuvRange::Full,
            enable_alpha: true,
            premultiply_alpha: false,
            tile_rows_log2: 0,
            tile_cols_log2: 0,
            color_primaries: Some(1),
            transfer_characteristics: Some(13),
            matrix_coefficients: Some(6),
            sharp_yuv: false,
            target_size: 0,
            irot_angle: None,
            imir_axis: None,
            pasp: None,
            crop: None,
            clap: None,
            clli_max_cll: None,
            clli_max_pall: None,
            timescale: 30,
            keyframe_interval: 0,
            exif: None,
            xmp: None,
            icc: None,
        }
    }
}

impl AvifencOptions {
    /// Options holding the native library's `avifenc` defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        Avifenc::default_options(runtime)
    }
}

/// Descriptor of the `avifenc` family.
pub struct AvifencFamily;

impl CommandFamily for AvifencFamily {
    const NAME: &'static str = "avifenc";
    type Options = AvifencOptions;
    type Raw = AVIFEncCommand;

    fn fns(library: &NativeLibrary) -> &CommandFns<AVIFEncOptions, AVIFEncCommand> {
        &library.avifenc
    }
}

/// An `avifenc` command.
pub type Avifenc = Command<AvifencFamily>;
