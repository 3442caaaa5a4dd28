//! The `gif2webp` command: GIF (including animations) to WebP.
//!
//! Uses the `cwebp` option layout; the fields that only apply to still images (preset, crop,
//! resize, metadata, ...) are not exposed and keep their native defaults.

use nextimage_common::{Command, CommandFamily, ConfigRecord, NativeRuntime, native_options};
use nextimage_sys::*;

native_options! {
    /// Options of the `gif2webp` command.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Gif2WebpOptions => Gif2WebPOptions {
        /// 0-100
        pub quality: f32 => quality,
        /// Lossless encoding of every frame
        pub lossless: bool => lossless,
        /// 0 (fast) to 6 (slow, better)
        pub method: i32 => method,
        /// Target size in bytes, 0 = disabled
        pub target_size: i32 => target_size,
        /// Target PSNR in dB, 0 = disabled
        pub target_psnr: f32 => target_psnr,
        /// 1-4
        pub segments: i32 => segments,
        /// 0-100
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
        /// 1-10
        pub pass: i32 => pass,
        /// Report compressed statistics
        pub show_compressed: bool => show_compressed,
        /// 0 = none, 1 = segment-smooth, 2 = pseudo-random dithering
        pub preprocessing: i32 => preprocessing,
        /// 0-3
        pub partitions: i32 => partitions,
        /// 0-100
        pub partition_limit: i32 => partition_limit,
        /// Aim for the size of an equivalent JPEG
        pub emulate_jpeg_size: bool => emulate_jpeg_size,
        /// Multi-threaded encoding
        pub thread_level: bool => thread_level,
        /// Trade speed for lower memory use
        pub low_memory: bool => low_memory,
        /// 0-100, `None` = off
        pub near_lossless: Option<i32> => near_lossless,
        /// Preserve RGB values under transparent areas
        pub exact: bool => exact,
        /// Reserved
        pub use_delta_palette: bool => use_delta_palette,
        /// Sharper RGB to YUV conversion
        pub use_sharp_yuv: bool => use_sharp_yuv,
        /// Mix lossy and lossless frames
        pub allow_mixed: bool => allow_mixed,
        /// Slower encoding for the smallest output
        pub minimize_size: bool => minimize_size,
        /// Minimum keyframe distance, `None` = auto
        pub kmin: Option<i32> => kmin,
        /// Maximum keyframe distance, `None` = auto
        pub kmax: Option<i32> => kmax,
        /// 0 = infinite
        pub anim_loop_count: i32 => anim_loop_count,
        /// Chrome M62 loop compatibility
        pub loop_compatibility: bool => loop_compatibility,
    }
}

impl ConfigRecord for Gif2WebpOptions {
    /// The documented `gif2webp` defaults.
    fn fallback() -> Self {
        Self {
            quality: 75.0,
            lossless: false,
            method: 4,
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
            allow_mixed: false,
            minimize_size: false,
            kmin: None,
            kmax: None,
            anim_loop_count: 0,
            loop_compatibility: false,
        }
    }
}

impl Gif2WebpOptions {
    /// Options holding the native library's `gif2webp` defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        Gif2Webp::default_options(runtime)
    }
}

/// Descriptor of the `gif2webp` family.
pub struct Gif2WebpFamily;

impl CommandFamily for Gif2WebpFamily {
    const NAME: &'static str = "gif2webp";
    type Options = Gif2WebpOptions;
    type Raw = Gif2WebPCommand;

    fn fns(library: &NativeLibrary) -> &CommandFns<Gif2WebPOptions, Gif2WebPCommand> {
        &library.gif2webp
    }
}

/// A `gif2webp` command.
pub type Gif2Webp = Command<Gif2WebpFamily>;
