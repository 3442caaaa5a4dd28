#![warn(missing_docs)]

//! Binding layer shared by every `libnextimage` codec family.
//!
//! The native library hands out opaque handles and library-allocated buffers, and reports
//! failures through a single "last error" slot. This crate turns those conventions into
//! ordinary Rust ownership:
//!
//! - [`options`]: semantic option records and their translation into native structs.
//! - [`buffer`]: moving a native output buffer into a caller-owned [`Vec`] exactly once.
//! - [`command`]: one-shot conversion objects bound to a fixed option snapshot.
//! - [`instance`]: reusable encoder/decoder handles.
//! - [`oneshot`]: stateless single-call conversions, including decoding into caller memory.
//! - [`channel`]: the error slot protocol (clear, call, read).
//!
//! Codec-specific records and family descriptors live in `nextimage-webp-api` and
//! `nextimage-avif-api`.
//!
//! # Examples
//!
//! ```ignore
//! use nextimage_common::NativeRuntime;
//! use nextimage_webp_api::{Cwebp, CwebpOptions};
//!
//! let runtime = NativeRuntime::linked();
//! let mut options = CwebpOptions::build_default(&runtime);
//! options.quality = 90.0;
//!
//! let mut command = Cwebp::new(&runtime, &options)?;
//! let webp = command.run(&std::fs::read("photo.jpg")?)?;
//! command.close();
//! ```

pub mod buffer;
pub mod channel;
pub mod command;
pub mod error;
#[cfg(feature = "file-io")]
pub mod file_io;
pub mod handle;
pub mod instance;
pub mod oneshot;
pub mod options;
pub mod pixel;
pub mod runtime;
pub mod status;

#[cfg(test)]
pub(crate) mod test_prelude;

// Re-export main functionality at crate root
pub use buffer::{DecodedImage, DecodedPixels, EncodedBytes, OutputSlot};
pub use channel::{ErrorChannel, SlotGuard, SlotScope};
pub use command::{Command, CommandFamily};
pub use error::{ErrorKind, NextImageError, Operation, Result};
pub use instance::{Instance, InstanceFamily};
pub use oneshot::{DecodeIntoFamily, DecodedInto, ImageSize, OneShotFamily};
pub use options::{ConfigRecord, NativeField, NativeMapping};
pub use pixel::PixelFormat;
pub use runtime::NativeRuntime;
pub use status::NativeStatus;

#[doc(hidden)]
pub use nextimage_sys as sys;
