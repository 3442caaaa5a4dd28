//! Reusable AVIF encoder.

use crate::avifenc::YuvFormat;
use nextimage_common::{ConfigRecord, EncodedBytes, Instance, InstanceFamily, NativeRuntime, native_options};
use nextimage_sys::*;

native_options! {
    /// Options of the reusable AVIF encoder.
    ///
    /// Tiling and threading are fixed when the encoder is created.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AvifEncodeOptions => NextImageAVIFEncodeOptions {
        /// 0-100
        pub quality: i32 => quality,
        /// 0 (slowest) to 10 (fastest)
        pub speed: i32 => speed,
        /// 0-63
        pub min_quantizer: i32 => min_quantizer,
        /// 0-63
        pub max_quantizer: i32 => max_quantizer,
        /// 0-63
        pub min_quantizer_alpha: i32 => min_quantizer_alpha,
        /// 0-63
        pub max_quantizer_alpha: i32 => max_quantizer_alpha,
        /// Encode the alpha channel
        pub enable_alpha: bool => enable_alpha,
        /// 8, 10 or 12
        pub bit_depth: i32 => bit_depth,
        /// Chroma subsampling
        pub yuv_format: YuvFormat => yuv_format,
        /// 0-6
        pub tile_rows_log2: i32 => tile_rows_log2,
        /// 0-6
        pub tile_cols_log2: i32 => tile_cols_log2,
    }
}

impl ConfigRecord for AvifEncodeOptions {
    fn fallback() -> Self {
        Self {
            quality: 50,
            speed: 6,
            min_quantizer: 0,
            max_quantizer: 63,
            min_quantizer_alpha: 0,
            max_quantizer_alpha: 63,
            enable_alpha: true,
            bit_depth: 8,
            yuv_format: YuvFormat::Yuv420,
            tile_rows_log2: 0,
            tile_cols_log2: 0,
        }
    }
}

impl AvifEncodeOptions {
    /// Options holding the native encoder defaults.
    pub fn build_default(runtime: &NativeRuntime) -> Self {
        AvifEncoder::default_options(runtime)
    }
}

/// Descriptor of the AVIF encoder family.
pub struct AvifEncoderFamily;

impl InstanceFamily for AvifEncoderFamily {
    const NAME: &'static str = "avif encoder";
    const ACTION: &'static str = "encode";
    type Options = AvifEncodeOptions;
    type Raw = NextImageAVIFEncoder;
    type Output = EncodedBytes;

    fn fns(
        library: &NativeLibrary,
    ) -> &InstanceFns<NextImageAVIFEncodeOptions, NextImageAVIFEncoder, NextImageBuffer> {
        &library.avif_encoder
    }
}

/// A reusable AVIF encoder.
pub type AvifEncoder = Instance<AvifEncoderFamily>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn test_build_default_matches_native_defaults() {
        assert_eq!(
            AvifEncodeOptions::build_default(&runtime()),
            AvifEncodeOptions::fallback()
        );
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_encodes_many_inputs() {
        let runtime = runtime();
        let mut options = AvifEncodeOptions::build_default(&runtime);
        options.quality = 70;
        options.bit_depth = 10;
        let mut encoder = AvifEncoder::new(&runtime, &options).unwrap();

        let sizes: Vec<usize> = [(8, 8), (32, 16), (64, 64)]
            .into_iter()
            .map(|(w, h)| {
                let avif = encoder.encode(&fake::png_image(w, h)).unwrap();
                let info = fake::inspect_avif(&avif).unwrap();
                assert_eq!((info.width, info.height, info.quality, info.bit_depth), (w, h, 70, 10));
                avif.len()
            })
            .collect();

        assert!(sizes.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(fake::calls("nextimage_avif_encoder_create"), 1);
        encoder.close();
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_native_rejection_leaves_instance_usable() {
        let runtime = runtime();
        let mut options = AvifEncodeOptions::build_default(&runtime);
        options.speed = 11;
        let mut broken = AvifEncoder::new(&runtime, &options).unwrap();
        let mut encoder = AvifEncoder::with_native_defaults(&runtime).unwrap();

        let error = broken.encode(&fake::png_image(8, 8)).unwrap_err();
        let avif = encoder.encode(&fake::png_image(8, 8)).unwrap();

        assert_eq!(error.status(), Some(NativeStatus::InvalidParam));
        assert!(error.to_string().contains("speed out of range"));
        assert!(fake::inspect_avif(&avif).is_some());
        broken.close();
        encoder.close();
    }

    #[test]
    fn test_drop_without_close_releases_handle() {
        let runtime = runtime();
        let encoder = AvifEncoder::with_native_defaults(&runtime).unwrap();
        assert_eq!(fake::live_allocations(), 1);

        drop(encoder);

        assert_eq!(fake::live_allocations(), 0);
        assert_eq!(fake::calls("nextimage_avif_encoder_destroy"), 1);
    }

    #[rstest]
    #[case::native_defaults(AvifEncodeOptions::fallback())]
    #[case::tiled_high_bit_depth(AvifEncodeOptions {
        quality: 90,
        speed: 2,
        min_quantizer: 4,
        max_quantizer: 30,
        min_quantizer_alpha: 1,
        max_quantizer_alpha: 20,
        enable_alpha: false,
        bit_depth: 12,
        yuv_format: YuvFormat::Yuv400,
        tile_rows_log2: 2,
        tile_cols_log2: 3,
    })]
    fn test_record_survives_native_round_trip(#[case] options: AvifEncodeOptions) {
        let source = fill_in(fake::LIBRARY.avif_encoder.default_options);

        assert_eq!(round_trip(&options, source), options);
    }
}
