#![no_std]
#![warn(missing_docs)]

//! Raw ABI of `libnextimage`.
//!
//! This crate only mirrors the C headers: `#[repr(C)]` structs, status codes, opaque handle
//! types and tables of function pointers. It does not make anything safe; see
//! `nextimage-common` for the binding layer built on top of it.
//!
//! Every entry point is reached through a [`NativeLibrary`] table rather than called directly,
//! so the same binding code can drive the real library (enable the `link` feature and use
//! [`LINKED`]) or an in-process stand-in during tests.

pub mod avif;
pub mod library;
#[cfg(feature = "link")]
mod linked;
pub mod types;
pub mod webp;

pub use avif::*;
pub use library::*;
#[cfg(feature = "link")]
pub use linked::LINKED;
pub use types::*;
pub use webp::*;
