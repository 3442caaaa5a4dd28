//! The `avifdec` command: AVIF to PNG or JPEG.

use core::ffi::c_int;
use nextimage_common::{Command, CommandFamily, ConfigRecord, NativeField, NativeRuntime, PixelFormat, native_options};
use nextimage_sys::*;

/// Container written by `avifdec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// PNG
    #[default]
    Png,
    /// JPEG, see [`AvifdecOptions::jpeg_quality`]
    Jpeg,
}

impl NativeField for OutputFormat {
    type Raw = AVIFDecOutputFormat;

    fn lower(&self) -> AVIFDecOutputFormat {
        match self {
            Self::Png => AVIFDEC_OUTPUT_PNG,
            Self::Jpeg => AVIFDEC_OUTPUT_JPEG,
        }
    }

    fn lift(raw: AVIFDecOutputFormat) -> Self {
        match raw {
            AVIFDEC_OUTPUT_PNG => Self::Png,
            AVIFDEC_OUTPUT_JPEG => Self::Jpeg,
            _ => {
                tracing::warn!(raw, "unknown avifdec output format in native options; using PNG");
                Self::Png
            }
        }
    }
}

/// How subsampled chroma is upsampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChromaUpsampling {
    /// Library choice
    #[default]
    Automatic,
    /// Fastest available filter
    Fastest,
    /// Best available filter
    BestQuality,
    /// Nearest neighbour
    Nearest,
    /// Bilinear
    Bilinear,
}

impl NativeField for ChromaUpsampling {
    type Raw = c_int;

    fn lower(&self) -> c_int {
        match self {
            Self::Automatic => 0,
            Self::Fastest => 1,
            Self::BestQuality => 2,
            Self::Nearest => 3,
            Self::Bilinear => 4,
        }
    }

    fn lift(raw: c_int) -> Self {
        match raw {
            0 => Self::Automatic,
            1 => Self::Fastest,
            2 => Self::BestQuality,
            3 => Self::Nearest,
            4 => Self::Bilinear,
            _ => {
                tracing::warn!(raw, "unknown chroma upsampling in native options; using automatic");
                Self::Automatic
            }
        }
    }
}

native_options! {
    /// Options of the `avifdec` command.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AvifdecOptions => AVIFDecOptions {
        /// Container of the output
        pub output_format: OutputFormat => output_format,
        /// 0-100, JPEG output only
        pub jpeg_quality: i32 => jpeg_quality,
        /// Multi-threaded decoding
        pub use_threads: bool => use_threads,
        /// Pixel layout written to the output
        pub format: PixelFormat => format,
        /// Do not copy EXIF into the output
        pub ignore_exif: bool => ignore_exif,
        /// Do not copy XMP into the output
        pub ignore_xmp: bool => ignore_xmp,
        /// Forwarded, but the native decoder never writes an ICC profile, so this has no effect
        pub ignore_icc: bool => ignore_icc,
        /// Maximum total pixel count
        pub image_size_limit: u32 => image_size_limit,
        /// Maximum width or height, 0 = unlimited
        pub image_dimension_limit: u32 => image_dimension_limit,
        /// Strict conformance checks
        pub strict_flags: bool => strict_flags,
        /// Chroma upsampling filter
        pub chroma_upsampling: ChromaUpsampling => chroma_upsampling,
    }
}

impl ConfigRecord for AvifdecOptions {
    /// The documented `avifdec` defaults.
    fn fallback() -> Self {
        Self {
            output_format: OutputFormat::Png,
            jpeg_quality: 90,
            use_threads: false,
            format: PixelFormat::Rgba,
            ignore_exif: false,
            ignore_xmp: false,
            ignore_icc: false,
            image_size_limit: 16_384 * 16_384,
            image_dimension_limit: 32_768,
            strict_flags: true,
            chroma_upsampling: ChromaUpsampling::Automatic,
        }
    }
}

impl AvifdecOptions {
    /// Options holding the native library's `avifdec` defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        Avifdec::default_options(runtime)
    }
}

/// Descriptor of the `avifdec` family.
pub struct AvifdecFamily;

impl CommandFamily for AvifdecFamily {
    const NAME: &'static str = "avifdec";
    type Options = AvifdecOptions;
    type Raw = AVIFDecCommand;

    fn fns(library: &NativeLibrary) -> &CommandFns<AVIFDecOptions, AVIFDecCommand> {
        &library.avifdec
    }

    fn inspect_options(options: &AvifdecOptions) {
        if options.ignore_icc {
            tracing::debug!(
                family = Self::NAME,
                "ignore_icc has no effect: the decoder never writes an ICC profile"
            );
        }
    }
}

/// An `avifdec` command.
pub type Avifdec = Command<AvifdecFamily>;
