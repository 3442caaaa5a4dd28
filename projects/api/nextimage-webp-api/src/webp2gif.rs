//! The `webp2gif` command: WebP (including animations) to GIF.

use nextimage_common::{Command, CommandFamily, ConfigRecord, NativeRuntime, native_options};
use nextimage_sys::*;

native_options! {
    /// Options of the `webp2gif` command. The native struct has no settings yet.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct WebP2GifOptions => nextimage_sys::WebP2GifOptions {
        /// Reserved for future use
        pub reserved: i32 => reserved,
    }
}

impl ConfigRecord for WebP2GifOptions {
    fn fallback() -> Self {
        Self::default()
    }
}

impl WebP2GifOptions {
    /// Options holding the native library's `webp2gif` defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        WebP2Gif::default_options(runtime)
    }
}

/// Descriptor of the `webp2gif` family.
pub struct WebP2GifFamily;

impl CommandFamily for WebP2GifFamily {
    const NAME: &'static str = "webp2gif";
    type Options = WebP2GifOptions;
    type Raw = WebP2GifCommand;

    fn fns(library: &NativeLibrary) -> &CommandFns<nextimage_sys::WebP2GifOptions, WebP2GifCommand> {
        &library.webp2gif
    }
}

/// A `webp2gif` command.
pub type WebP2Gif = Command<WebP2GifFamily>;
