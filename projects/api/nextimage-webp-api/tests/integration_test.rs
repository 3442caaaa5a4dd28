//! End-to-end scenarios over the stand-in native library.

use nextimage_common::{ErrorKind, NativeRuntime, SlotScope};
use nextimage_testkit as fake;
use nextimage_webp_api::*;
use std::thread;

fn runtime() -> NativeRuntime {
    NativeRuntime::new(&fake::LIBRARY, SlotScope::ThreadLocal)
}

/// A real RGBA gradient PNG.
fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
                255,
            ]);
        }
    }

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(&pixels).unwrap();
    writer.finish().unwrap();
    out
}

#[test]
fn cwebp_default_options_on_gradient() {
    let runtime = runtime();
    let options = CwebpOptions::build_default(&runtime);
    let mut cwebp = Cwebp::new(&runtime, &options).unwrap();

    let webp = cwebp.run(&gradient_png(64, 64)).unwrap();

    assert!(!webp.is_empty());
    assert_eq!(&webp[0..4], b"RIFF");
    cwebp.close();
    assert_eq!(fake::live_allocations(), 0);
    assert_eq!(fake::double_frees(), 0);
}

#[test]
fn encoder_handles_two_inputs_without_reconstruction() {
    let runtime = runtime();
    let options = WebPEncodeOptions::build_default(&runtime);
    let mut encoder = WebPEncoder::new(&runtime, &options).unwrap();

    let first = encoder.encode(&gradient_png(64, 64)).unwrap();
    let second = encoder.encode(&gradient_png(256, 128)).unwrap();

    assert_ne!(first.len(), second.len());
    encoder.close();
}

#[test]
fn empty_input_is_rejected_before_native_code() {
    let runtime = runtime();
    let options = WebPEncodeOptions::build_default(&runtime);
    let mut encoder = WebPEncoder::new(&runtime, &options).unwrap();
    let before = fake::total_calls();

    let error = encoder.encode(&[]).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(fake::total_calls(), before);
    encoder.close();
}

#[test]
fn unset_near_lossless_keeps_native_default() {
    let runtime = runtime();
    let mut options = CwebpOptions::build_default(&runtime);
    options.near_lossless = None;
    let mut cwebp = Cwebp::new(&runtime, &options).unwrap();

    let native: nextimage_sys::CWebPOptions = fake::last_options("cwebp").unwrap();
    let info = fake::inspect_webp(&cwebp.run(&gradient_png(16, 16)).unwrap()).unwrap();

    assert_eq!(native.near_lossless, -1);
    assert!(!info.lossless);
    cwebp.close();
}

#[test]
fn webp_round_trip_through_commands_and_instances() {
    let runtime = runtime();
    let mut cwebp = Cwebp::with_native_defaults(&runtime).unwrap();
    let mut dwebp = Dwebp::with_native_defaults(&runtime).unwrap();
    let mut decoder = WebPDecoder::with_native_defaults(&runtime).unwrap();

    let webp = cwebp.run(&gradient_png(40, 30)).unwrap();
    let png = dwebp.run(&webp).unwrap();
    let image = decoder.decode(&webp).unwrap();

    assert_eq!(fake::parse_png(&png).map(|info| (info.width, info.height)), Some((40, 30)));
    assert_eq!((image.width, image.height), (40, 30));
    cwebp.close();
    dwebp.close();
    decoder.close();
    assert_eq!(fake::live_allocations(), 0);
}

#[test]
fn one_command_per_worker_thread() {
    let handles: Vec<_> = (1..=4u32)
        .map(|worker| {
            thread::spawn(move || {
                let runtime = runtime();
                let mut cwebp = Cwebp::with_native_defaults(&runtime).unwrap();
                let size = 16 * worker;
                let info = fake::inspect_webp(&cwebp.run(&gradient_png(size, size)).unwrap()).unwrap();
                cwebp.close();
                assert_eq!(fake::live_allocations(), 0);
                info.width
            })
        })
        .collect();

    let widths: Vec<u32> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
    assert_eq!(widths, vec![16, 32, 48, 64]);
}

#[test]
fn version_is_reported() {
    assert_eq!(version(&runtime()), fake::VERSION);
}
