#![warn(missing_docs)]

//! # nextimage AVIF API
//!
//! Safe bindings for the AVIF side of `libnextimage`:
//!
//! - Commands (one-shot conversions with a fixed option snapshot): [`Avifenc`] and [`Avifdec`].
//! - Instances (reusable native codec objects): [`AvifEncoder`] and [`AvifDecoder`].
//! - Single calls with per-call options: [`encode_bytes`], [`decode_bytes`], [`decode_into`]
//!   and [`decode_size`].
//!
//! Every option record starts from the native library's own defaults via `build_default` and
//! is then edited field by field. Fields the library leaves "unset" are `Option`s; `None` lets
//! the library decide.
//!
//! ## Examples
//!
//! ```ignore
//! use nextimage_avif_api::{Avifenc, AvifencOptions, YuvFormat};
//! use nextimage_common::NativeRuntime;
//!
//! let runtime = NativeRuntime::linked();
//! let mut options = AvifencOptions::build_default(&runtime);
//! options.quality = 70;
//! options.yuv_format = YuvFormat::Yuv420;
//! options.exif = Some(exif_bytes);
//!
//! let mut avifenc = Avifenc::new(&runtime, &options)?;
//! let avif = avifenc.run(&std::fs::read("photo.jpg")?)?;
//! avifenc.close();
//! ```
//!
//! Metadata blobs are only borrowed while the command is created; the record can be dropped
//! right after [`Avifenc::new`](nextimage_common::Command::new).

pub mod avifdec;
pub mod avifenc;
pub mod decoder;
pub mod encoder;
pub mod oneshot;

#[cfg(test)]
pub(crate) mod test_prelude;

// Re-export main functionality at crate root
pub use avifdec::{Avifdec, AvifdecFamily, AvifdecOptions, ChromaUpsampling, OutputFormat};
pub use avifenc::{Avifenc, AvifencFamily, AvifencOptions, MirrorAxis, YuvFormat, YuvRange};
pub use decoder::{AvifDecodeOptions, AvifDecoder, AvifDecoderFamily};
pub use encoder::{AvifEncodeOptions, AvifEncoder, AvifEncoderFamily};
pub use oneshot::{AvifDecodeOnce, AvifEncodeOnce, decode_bytes, decode_into, decode_size, encode_bytes};

pub use nextimage_common::{
    DecodedImage, DecodedInto, ImageSize, NativeRuntime, NativeStatus, NextImageError,
    PixelFormat, Result, SlotScope,
};

/// Version string of the native library behind `runtime`.
pub fn version(runtime: &NativeRuntime) -> String {
    runtime.version()
}
