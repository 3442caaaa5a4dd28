//! End-to-end scenarios over the stand-in native library.

use nextimage_avif_api::*;
use nextimage_common::{ErrorKind, NativeRuntime, SlotScope};
use nextimage_testkit as fake;

fn runtime() -> NativeRuntime {
    NativeRuntime::new(&fake::LIBRARY, SlotScope::ThreadLocal)
}

/// A real RGB gradient PNG.
fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8]);
        }
    }

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(&pixels).unwrap();
    writer.finish().unwrap();
    out
}

#[test]
fn avifenc_default_options_on_gradient() {
    let runtime = runtime();
    let options = AvifencOptions::build_default(&runtime);
    let mut avifenc = Avifenc::new(&runtime, &options).unwrap();

    let avif = avifenc.run(&gradient_png(64, 64)).unwrap();

    assert!(!avif.is_empty());
    assert_eq!(&avif[4..8], b"ftyp");
    let info = fake::inspect_avif(&avif).unwrap();
    assert!(!info.has_alpha);
    avifenc.close();
    assert_eq!(fake::live_allocations(), 0);
}

#[test]
fn encoder_handles_two_inputs_without_reconstruction() {
    let runtime = runtime();
    let options = AvifEncodeOptions::build_default(&runtime);
    let mut encoder = AvifEncoder::new(&runtime, &options).unwrap();

    let first = encoder.encode(&gradient_png(64, 64)).unwrap();
    let second = encoder.encode(&gradient_png(32, 48)).unwrap();

    assert_ne!(first.len(), second.len());
    encoder.close();
}

#[test]
fn empty_input_is_rejected_before_native_code() {
    let runtime = runtime();
    let mut avifenc = Avifenc::with_native_defaults(&runtime).unwrap();
    let before = fake::total_calls();

    let error = avifenc.run(&[]).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(fake::total_calls(), before);
    avifenc.close();
}

#[test]
fn unset_alpha_quality_uses_native_rule() {
    let runtime = runtime();
    let mut options = AvifencOptions::build_default(&runtime);
    options.quality = 42;
    options.quality_alpha = None;
    let mut avifenc = Avifenc::new(&runtime, &options).unwrap();

    let info = fake::inspect_avif(&avifenc.run(&gradient_png(16, 16)).unwrap()).unwrap();

    assert_eq!(info.alpha_quality, 42);
    avifenc.close();
}

#[test]
fn avif_round_trip_through_commands() {
    let runtime = runtime();
    let mut avifenc = Avifenc::with_native_defaults(&runtime).unwrap();
    let mut avifdec = Avifdec::with_native_defaults(&runtime).unwrap();

    let avif = avifenc.run(&gradient_png(33, 17)).unwrap();
    let png = avifdec.run(&avif).unwrap();

    let info = fake::parse_png(&png).unwrap();
    assert_eq!((info.width, info.height), (33, 17));
    avifenc.close();
    avifdec.close();
}

#[cfg(feature = "file-io")]
#[test]
fn run_file_writes_converted_output() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("gradient.png");
    let output = dir.path().join("gradient.avif");
    std::fs::write(&input, gradient_png(24, 24)).unwrap();
    let mut avifenc = Avifenc::with_native_defaults(&runtime).unwrap();

    let written = avifenc.run_file(&input, &output).unwrap();

    let avif = std::fs::read(&output).unwrap();
    assert_eq!(avif.len(), written);
    assert_eq!(fake::inspect_avif(&avif).map(|info| info.width), Some(24));
    avifenc.close();
}

#[cfg(feature = "file-io")]
#[test]
fn decode_file_reads_pixels() {
    let runtime = runtime();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("image.avif");
    std::fs::write(&path, fake::avif_image(10, 5)).unwrap();
    let mut decoder = AvifDecoder::with_native_defaults(&runtime).unwrap();

    let image = decoder.decode_file(&path).unwrap();

    assert_eq!((image.width, image.height), (10, 5));
    decoder.close();
}
