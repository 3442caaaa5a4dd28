#![warn(missing_docs)]

//! # nextimage WebP API
//!
//! Safe bindings for the WebP side of `libnextimage`:
//!
//! - Commands (one-shot conversions with a fixed option snapshot): [`Cwebp`], [`Dwebp`],
//!   [`Gif2Webp`] and [`WebP2Gif`].
//! - Instances (reusable native codec objects): [`WebPEncoder`] and [`WebPDecoder`].
//! - Single calls with per-call options: [`encode_bytes`], [`decode_bytes`], [`decode_into`],
//!   [`decode_size`], [`gif_to_webp`] and [`webp_to_gif`].
//!
//! Every option record starts from the native library's own defaults via `build_default` and
//! is then edited field by field. Fields the library leaves "unset" are `Option`s; `None` lets
//! the library decide.
//!
//! ## Examples
//!
//! ```ignore
//! use nextimage_common::NativeRuntime;
//! use nextimage_webp_api::{Cwebp, CwebpOptions, Preset};
//!
//! let runtime = NativeRuntime::linked();
//! let mut options = CwebpOptions::build_default(&runtime);
//! options.quality = 85.0;
//! options.preset = Some(Preset::Photo);
//!
//! let mut cwebp = Cwebp::new(&runtime, &options)?;
//! let webp = cwebp.run(&std::fs::read("photo.png")?)?;
//! cwebp.close();
//! ```
//!
//! Reusable encoder:
//!
//! ```ignore
//! use nextimage_webp_api::{WebPEncodeOptions, WebPEncoder};
//!
//! let options = WebPEncodeOptions::build_default(&runtime);
//! let mut encoder = WebPEncoder::new(&runtime, &options)?;
//! for png in inputs {
//!     outputs.push(encoder.encode(&png)?);
//! }
//! encoder.close();
//! ```

pub mod cwebp;
pub mod decoder;
pub mod dwebp;
pub mod encoder;
pub mod gif2webp;
pub mod oneshot;
pub mod webp2gif;

#[cfg(test)]
pub(crate) mod test_prelude;

// Re-export main functionality at crate root
pub use cwebp::{Cwebp, CwebpFamily, CwebpOptions, ImageHint, MetadataFlags, Preset, ResizeMode};
pub use decoder::{WebPDecodeOptions, WebPDecoder, WebPDecoderFamily};
pub use dwebp::{Dwebp, DwebpFamily, DwebpOptions};
pub use encoder::{WebPEncodeOptions, WebPEncoder, WebPEncoderFamily};
pub use gif2webp::{Gif2Webp, Gif2WebpFamily, Gif2WebpOptions};
pub use oneshot::{
    GifToWebPOnce, WebPDecodeOnce, WebPEncodeOnce, decode_bytes, decode_into, decode_size,
    encode_bytes, gif_to_webp, webp_to_gif,
};
pub use webp2gif::{WebP2Gif, WebP2GifFamily, WebP2GifOptions};

pub use nextimage_common::{
    DecodedImage, DecodedInto, ImageSize, NativeRuntime, NativeStatus, NextImageError,
    PixelFormat, Result, SlotScope,
};

/// Version string of the native library behind `runtime`.
pub fn version(runtime: &NativeRuntime) -> String {
    runtime.version()
}
