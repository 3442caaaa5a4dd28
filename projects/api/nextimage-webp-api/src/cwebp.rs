//! The `cwebp` command: JPEG, PNG and other raster formats to WebP.

use core::ffi::c_int;
use core::ops::BitOr;
use nextimage_common::{Command, CommandFamily, ConfigRecord, NativeField, NativeRuntime, native_options};
use nextimage_sys::*;

/// Encoder tuning presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    /// Default preset
    #[default]
    Default,
    /// Digital picture, like a portrait or an indoor shot
    Picture,
    /// Outdoor photograph with natural lighting
    Photo,
    /// Hand or line drawing with high-contrast details
    Drawing,
    /// Small-sized colorful image
    Icon,
    /// Text-like content
    Text,
}

impl NativeField for Preset {
    type Raw = CWebPPreset;

    fn lower(&self) -> CWebPPreset {
        match self {
            Self::Default => CWEBP_PRESET_DEFAULT,
            Self::Picture => CWEBP_PRESET_PICTURE,
            Self::Photo => CWEBP_PRESET_PHOTO,
            Self::Drawing => CWEBP_PRESET_DRAWING,
            Self::Icon => CWEBP_PRESET_ICON,
            Self::Text => CWEBP_PRESET_TEXT,
        }
    }

    fn lift(raw: CWebPPreset) -> Self {
        match raw {
            CWEBP_PRESET_PICTURE => Self::Picture,
            CWEBP_PRESET_PHOTO => Self::Photo,
            CWEBP_PRESET_DRAWING => Self::Drawing,
            CWEBP_PRESET_ICON => Self::Icon,
            CWEBP_PRESET_TEXT => Self::Text,
            CWEBP_PRESET_DEFAULT => Self::Default,
            _ => {
                tracing::warn!(raw, "unknown cwebp preset in native options; using default");
                Self::Default
            }
        }
    }
}

/// Hint about the kind of image being encoded (lossless mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageHint {
    /// No hint
    #[default]
    Default,
    /// Digital picture, like a portrait or an indoor shot
    Picture,
    /// Outdoor photograph with natural lighting
    Photo,
    /// Discrete tone image (graph, map tile, ...)
    Graph,
}

impl NativeField for ImageHint {
    type Raw = CWebPImageHint;

    fn lower(&self) -> CWebPImageHint {
        match self {
            Self::Default => CWEBP_HINT_DEFAULT,
            Self::Picture => CWEBP_HINT_PICTURE,
            Self::Photo => CWEBP_HINT_PHOTO,
            Self::Graph => CWEBP_HINT_GRAPH,
        }
    }

    fn lift(raw: CWebPImageHint) -> Self {
        match raw {
            CWEBP_HINT_PICTURE => Self::Picture,
            CWEBP_HINT_PHOTO => Self::Photo,
            CWEBP_HINT_GRAPH => Self::Graph,
            CWEBP_HINT_DEFAULT => Self::Default,
            _ => {
                tracing::warn!(raw, "unknown cwebp image hint in native options; using default");
                Self::Default
            }
        }
    }
}

/// When a resize is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeMode {
    /// Always resize
    #[default]
    Always,
    /// Only enlarge
    UpOnly,
    /// Only shrink
    DownOnly,
}

impl NativeField for ResizeMode {
    type Raw = c_int;

    fn lower(&self) -> c_int {
        match self {
            Self::Always => 0,
            Self::UpOnly => 1,
            Self::DownOnly => 2,
        }
    }

    fn lift(raw: c_int) -> Self {
        match raw {
            0 => Self::Always,
            1 => Self::UpOnly,
            2 => Self::DownOnly,
            _ => {
                tracing::warn!(raw, "unknown cwebp resize mode in native options; resizing always");
                Self::Always
            }
        }
    }
}

/// Set of metadata chunks copied from the input into the WebP output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MetadataFlags(c_int);

impl MetadataFlags {
    /// Keep nothing
    pub const NONE: Self = Self(CWEBP_METADATA_NONE);
    /// EXIF
    pub const EXIF: Self = Self(CWEBP_METADATA_EXIF);
    /// ICC profile
    pub const ICC: Self = Self(CWEBP_METADATA_ICC);
    /// XMP
    pub const XMP: Self = Self(CWEBP_METADATA_XMP);
    /// EXIF, ICC and XMP
    pub const ALL: Self = Self(CWEBP_METADATA_ALL);

    /// Whether every chunk in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The raw `CWEBP_METADATA_*` mask.
    pub const fn bits(self) -> c_int {
        self.0
    }
}

impl BitOr for MetadataFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl NativeField for MetadataFlags {
    type Raw = c_int;

    fn lower(&self) -> c_int {
        self.0
    }

    fn lift(raw: c_int) -> Self {
        Self(raw & CWEBP_METADATA_ALL)
    }
}

native_options! {
    /// Options of the `cwebp` command.
    ///
    /// Values are forwarded as given; the native library rejects out-of-range values when the
    /// command is created or run.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CwebpOptions => CWebPOptions {
        /// 0-100
        pub quality: f32 => quality,
        /// Lossless encoding
        pub lossless: bool => lossless,
        /// 0 (fast) to 6 (slow, better)
        pub method: i32 => method,
        /// `None` applies no preset
        pub preset: Option<Preset> => preset,
        /// Image type hint
        pub image_hint: ImageHint => image_hint,
        /// Lossless preset 0 (fast) to 9 (best), `None` = unused
        pub lossless_preset: Option<i32> => lossless_preset,
        /// Target size in bytes, 0 = disabled
        pub target_size: i32 => target_size,
        /// Target PSNR in dB, 0 = disabled
        pub target_psnr: f32 => target_psnr,
        /// 1-4
        pub segments: i32 => segments,
        /// 0-100, spatial noise shaping
        pub sns_strength: i32 => sns_strength,
        /// 0-100
        pub filter_strength: i32 => filter_strength,
        /// 0-7
        pub filter_sharpness: i32 => filter_sharpness,
        /// 0 = simple, 1 = strong
        pub filter_type: i32 => filter_type,
        /// Automatic filter strength
        pub autofilter: bool => autofilter,
        /// 0 = none, 1 = compressed
        pub alpha_compression: i32 => alpha_compression,
        /// 0 = none, 1 = fast, 2 = best
        pub alpha_filtering: i32 => alpha_filtering,
        /// 0-100
        pub alpha_quality: i32 => alpha_quality,
        /// 1-10 entropy-analysis passes
        pub pass: i32 => pass,
        /// Report compressed statistics
        pub show_compressed: bool => show_compressed,
        /// 0 = none, 1 = segment-smooth, 2 = pseudo-random dithering
        pub preprocessing: i32 => preprocessing,
        /// 0-3, log2 of the token partition count
        pub partitions: i32 => partitions,
        /// 0-100
        pub partition_limit: i32 => partition_limit,
        /// Aim for the size of an equivalent JPEG
        pub emulate_jpeg_size: bool => emulate_jpeg_size,
        /// Multi-threaded encoding
        pub thread_level: bool => thread_level,
        /// Trade speed for lower memory use
        pub low_memory: bool => low_memory,
        /// 0-100, enables near-lossless encoding. `None` = off
        pub near_lossless: Option<i32> => near_lossless,
        /// Preserve RGB values under transparent areas
        pub exact: bool => exact,
        /// Reserved
        pub use_delta_palette: bool => use_delta_palette,
        /// Sharper RGB to YUV conversion
        pub use_sharp_yuv: bool => use_sharp_yuv,
        /// 0-100
        pub qmin: i32 => qmin,
        /// 0-100
        pub qmax: i32 => qmax,
        /// `None` keeps the library's default selection
        pub keep_metadata: Option<MetadataFlags> => keep_metadata,
        /// Crop rectangle, applied only when every part is set
        pub crop_x: Option<i32> => crop_x,
        /// Crop rectangle y
        pub crop_y: Option<i32> => crop_y,
        /// Crop rectangle width
        pub crop_width: Option<i32> => crop_width,
        /// Crop rectangle height
        pub crop_height: Option<i32> => crop_height,
        /// Resize target, a side of 0 keeps the aspect ratio. `None` = no resize
        pub resize_width: Option<i32> => resize_width,
        /// Resize height
        pub resize_height: Option<i32> => resize_height,
        /// When the resize applies
        pub resize_mode: ResizeMode => resize_mode,
        /// Background `0xRRGGBB` to blend transparent pixels against. `None` = no blending
        pub blend_alpha: Option<u32> => blend_alpha,
        /// Drop the alpha channel
        pub noalpha: bool => noalpha,
        /// Animations only: mix lossy and lossless frames
        pub allow_mixed: bool => allow_mixed,
        /// Animations only
        pub minimize_size: bool => minimize_size,
        /// Animations only: minimum keyframe distance, `None` = auto
        pub kmin: Option<i32> => kmin,
        /// Animations only: maximum keyframe distance, `None` = auto
        pub kmax: Option<i32> => kmax,
        /// 0 = infinite
        pub anim_loop_count: i32 => anim_loop_count,
        /// Chrome M62 loop compatibility
        pub loop_compatibility: bool => loop_compatibility,
    }
}

impl ConfigRecord for CwebpOptions {
    /// The documented `cwebp` defaults.
    fn fallback() -> Self {
        Self {
            quality: 75.0,
            lossless: false,
            method: 4,
            preset: None,
            image_hint: ImageHint::Default,
            lossless_preset: None,
            target_size: 0,
            target_psnr: 0.0,
            segments: 4,
            sns_strength: 50,
            filter_strength: 60,
            filter_sharpness: 0,
            filter_type: 1,
            autofilter: false,
            alpha_compression: 1,
            alpha_filtering: 1,
            alpha_quality: 100,
            pass: 1,
            show_compressed: false,
            preprocessing: 0,
            partitions: 0,
            partition_limit: 0,
            emulate_jpeg_size: false,
            thread_level: false,
            low_memory: false,
            near_lossless: None,
            exact: false,
            use_delta_palette: false,
            use_sharp_yuv: false,
            qmin: 0,
            qmax: 100,
            keep_metadata: None,
            crop_x: None,
            crop_y: None,
            crop_width: None,
            crop_height: None,
            resize_width: None,
            resize_height: None,
            resize_mode: ResizeMode::Always,
            blend_alpha: None,
            noalpha: false,
            allow_mixed: false,
            minimize_size: false,
            kmin: None,
            kmax: None,
            anim_loop_count: 0,
            loop_compatibility: false,
        }
    }
}

impl CwebpOptions {
    /// Options holding the native library's `cwebp` defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        Cwebp::default_options(runtime)
    }

    /// Sets the crop rectangle.
    pub fn with_crop(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        (self.crop_x, self.crop_y, self.crop_width, self.crop_height) =
            (Some(x), Some(y), Some(width), Some(height));
        self
    }

    /// Sets the resize target.
    pub fn with_resize(mut self, width: i32, height: i32) -> Self {
        (self.resize_width, self.resize_height) = (Some(width), Some(height));
        self
    }
}

/// Descriptor of the `cwebp` family.
pub struct CwebpFamily;

impl CommandFamily for CwebpFamily {
    const NAME: &'static str = "cwebp";
    type Options = CwebpOptions;
    type Raw = CWebPCommand;

    fn fns(library: &NativeLibrary) -> &CommandFns<CWebPOptions, CWebPCommand> {
        &library.cwebp
    }
}

/// A `cwebp` command.
pub type Cwebp = Command<CwebpFamily>;
