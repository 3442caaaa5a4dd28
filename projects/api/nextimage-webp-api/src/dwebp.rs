//! The `dwebp` command: WebP to PNG.

use nextimage_common::{Command, CommandFamily, ConfigRecord, NativeRuntime, PixelFormat, native_options};
use nextimage_sys::*;

native_options! {
    /// Options of the `dwebp` command.
    ///
    /// Crop and resize are only applied when their `use_*` switch is set.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DwebpOptions => DWebPOptions {
        /// Multi-threaded decoding
        pub use_threads: bool => use_threads,
        /// Skip the in-loop filter
        pub bypass_filtering: bool => bypass_filtering,
        /// Point-sampled chroma upsampling
        pub no_fancy_upsampling: bool => no_fancy_upsampling,
        /// Pixel layout written to the PNG
        pub format: PixelFormat => format,
        /// Disable dithering
        pub no_dither: bool => no_dither,
        /// 0-100
        pub dither_strength: i32 => dither_strength,
        /// Dither the alpha plane
        pub alpha_dither: bool => alpha_dither,
        /// Crop rectangle x
        pub crop_x: i32 => crop_x,
        /// Crop rectangle y
        pub crop_y: i32 => crop_y,
        /// Crop rectangle width
        pub crop_width: i32 => crop_width,
        /// Crop rectangle height
        pub crop_height: i32 => crop_height,
        /// Apply the crop rectangle
        pub use_crop: bool => use_crop,
        /// Resize width, 0 keeps the aspect ratio
        pub resize_width: i32 => resize_width,
        /// Resize height, 0 keeps the aspect ratio
        pub resize_height: i32 => resize_height,
        /// Apply the resize
        pub use_resize: bool => use_resize,
        /// Flip vertically
        pub flip: bool => flip,
        /// Only decode the alpha plane
        pub alpha_only: bool => alpha_only,
        /// Incremental decoding
        pub incremental: bool => incremental,
    }
}

impl ConfigRecord for DwebpOptions {
    /// The documented `dwebp` defaults.
    fn fallback() -> Self {
        Self {
            use_threads: false,
            bypass_filtering: false,
            no_fancy_upsampling: false,
            format: PixelFormat::Rgba,
            no_dither: false,
            dither_strength: 50,
            alpha_dither: false,
            crop_x: 0,
            crop_y: 0,
            crop_width: 0,
            crop_height: 0,
            use_crop: false,
            resize_width: 0,
            resize_height: 0,
            use_resize: false,
            flip: false,
            alpha_only: false,
            incremental: false,
        }
    }
}

impl DwebpOptions {
    /// Options holding the native library's `dwebp` defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        Dwebp::default_options(runtime)
    }

    /// Sets and enables the crop rectangle.
    pub fn with_crop(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        (self.crop_x, self.crop_y, self.crop_width, self.crop_height) = (x, y, width, height);
        self.use_crop = true;
        self
    }

    /// Sets and enables the resize.
    pub fn with_resize(mut self, width: i32, height: i32) -> Self {
        (self.resize_width, self.resize_height) = (width, height);
        self.use_resize = true;
        self
    }
}

/// Descriptor of the `dwebp` family.
pub struct DwebpFamily;

impl CommandFamily for DwebpFamily {
    const NAME: &'static str = "dwebp";
    type Options = DwebpOptions;
    type Raw = DWebPCommand;

    fn fns(library: &NativeLibrary) -> &CommandFns<DWebPOptions, DWebPCommand> {
        &library.dwebp
    }
}

/// A `dwebp` command.
pub type Dwebp = Command<DwebpFamily>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn dwebp(options: &DwebpOptions) -> Dwebp {
        Dwebp::new(&runtime(), options).unwrap()
    }

    #[test]
    fn test_decodes_to_png() {
        let options = DwebpOptions::build_default(&runtime());
        let mut dwebp = dwebp(&options);

        let png = dwebp.run(&fake::webp_image(24, 12, false)).unwrap();

        assert_eq!(&png[0..8], &fake::PNG_SIGNATURE);
        let info = fake::parse_png(&png).unwrap();
        assert_eq!((info.width, info.height), (24, 12));
        dwebp.close();
    }

    #[test]
    fn test_crop_is_ignored_unless_enabled() {
        let mut options = DwebpOptions::build_default(&runtime());
        options.crop_width = 4;
        options.crop_height = 4;
        let mut ignored = dwebp(&options);
        let mut cropped = dwebp(&options.clone().with_crop(0, 0, 4, 4));
        let input = fake::webp_image(16, 16, true);

        let full = fake::parse_png(&ignored.run(&input).unwrap()).unwrap();
        let crop = fake::parse_png(&cropped.run(&input).unwrap()).unwrap();

        assert_eq!((full.width, full.height), (16, 16));
        assert_eq!((crop.width, crop.height), (4, 4));
        ignored.close();
        cropped.close();
    }

    #[test]
    fn test_resize_keeps_aspect_ratio() {
        let options = DwebpOptions::build_default(&runtime()).with_resize(0, 10);
        let mut dwebp = dwebp(&options);

        let info = fake::parse_png(&dwebp.run(&fake::webp_image(40, 20, false)).unwrap()).unwrap();

        assert_eq!((info.width, info.height), (20, 10));
        dwebp.close();
    }

    #[rstest]
    #[case(PixelFormat::Rgba, true)]
    #[case(PixelFormat::Rgb, false)]
    fn test_format_controls_alpha(#[case] format: PixelFormat, #[case] has_alpha: bool) {
        let mut options = DwebpOptions::build_default(&runtime());
        options.format = format;
        let mut dwebp = dwebp(&options);

        let info = fake::parse_png(&dwebp.run(&fake::webp_image(8, 8, true)).unwrap()).unwrap();

        assert_eq!(info.has_alpha, has_alpha);
        dwebp.close();
    }

    #[test]
    fn test_rejects_non_webp_input() {
        let mut dwebp = Dwebp::with_native_defaults(&runtime()).unwrap();

        let error = dwebp.run(&fake::png_image(8, 8)).unwrap_err();

        assert_eq!(error.status(), Some(NativeStatus::DecodeFailed));
        assert!(error.to_string().contains("not a WebP bitstream"));
        dwebp.close();
        assert_eq!(fake::live_allocations(), 0);
    }

    #[rstest]
    #[case::native_defaults(DwebpOptions::fallback())]
    #[case::crop_resize_and_flags(
        DwebpOptions {
            use_threads: true,
            format: PixelFormat::Bgra,
            dither_strength: 80,
            flip: true,
            ..DwebpOptions::fallback()
        }
        .with_crop(2, 3, 10, 12)
        .with_resize(5, 0)
    )]
    fn test_record_survives_native_round_trip(#[case] options: DwebpOptions) {
        assert_eq!(round_trip(&options, allocated(&fake::LIBRARY.dwebp)), options);
        assert_eq!(fake::live_allocations(), 0);
    }
}
