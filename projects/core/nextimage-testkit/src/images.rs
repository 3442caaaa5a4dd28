//! Builders and parsers for the containers the stand-in codecs read and write.
//!
//! PNG, JPEG and GIF inputs are recognised by their real headers, so images produced by a real
//! encoder (e.g. the `png` crate) are accepted. The WebP and AVIF outputs are the real
//! containers (`RIFF`/`WEBP`, ISO-BMFF `ftyp avif`) around a small private payload that
//! [`inspect_webp`] and [`inspect_avif`] read back.

/// The 8-byte PNG signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest pixel count that influences output sizes.
const MAX_SIZED_PIXELS: usize = 1 << 22;

/// Dimensions of a raster input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Whether the image carries an alpha channel
    pub has_alpha: bool,
}

/// Payload of a WebP produced by the stand-in encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebpInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// `VP8L` rather than `VP8 `
    pub lossless: bool,
    /// Quality the image was encoded with, 0-100
    pub quality: u8,
    /// Method the image was encoded with, 0-6
    pub method: u8,
    /// Whether alpha was kept
    pub has_alpha: bool,
    /// Number of animation frames
    pub frames: u16,
}

/// Payload of an AVIF produced by the stand-in encoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvifInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color quality, 0-100
    pub quality: u8,
    /// Alpha quality, 0-100
    pub alpha_quality: u8,
    /// Encoder speed, 0-10
    pub speed: u8,
    /// 8, 10 or 12
    pub bit_depth: u8,
    /// 0 = 444, 1 = 422, 2 = 420, 3 = 400
    pub yuv_format: u8,
    /// Whether alpha was kept
    pub has_alpha: bool,
    /// Embedded EXIF metadata
    pub exif: Vec<u8>,
    /// Embedded XMP metadata
    pub xmp: Vec<u8>,
    /// Embedded ICC profile
    pub icc: Vec<u8>,
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in bytes {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

fn png_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let start = out.len();
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let crc = crc32(&out[start..]);
    out.extend_from_slice(&crc.to_be_bytes());
}

fn png_with_body(width: u32, height: u32, has_alpha: bool, body: Option<&[u8]>) -> Vec<u8> {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    // 8 bits per sample, RGBA or RGB, deflate, adaptive filtering, no interlace.
    ihdr.extend_from_slice(&[8, if has_alpha { 6 } else { 2 }, 0, 0, 0]);

    let mut out = PNG_SIGNATURE.to_vec();
    png_chunk(&mut out, b"IHDR", &ihdr);
    if let Some(body) = body {
        png_chunk(&mut out, b"IDAT", body);
    }
    png_chunk(&mut out, b"IEND", &[]);
    out
}

/// A PNG consisting of signature, RGBA `IHDR` and `IEND` only.
pub fn png_header(width: u32, height: u32) -> Vec<u8> {
    png_with_body(width, height, true, None)
}

/// An RGBA PNG with an `IDAT` chunk proportional to its pixel count.
///
/// The image data is not valid deflate; only the stand-in codecs accept it.
pub fn png_image(width: u32, height: u32) -> Vec<u8> {
    let pixels = (width as usize).saturating_mul(height as usize).min(MAX_SIZED_PIXELS);
    let body: Vec<u8> = (0..pixels).map(|i| (i % 251) as u8).collect();
    png_with_body(width, height, true, Some(&body))
}

pub(crate) fn png_output(width: u32, height: u32, has_alpha: bool) -> Vec<u8> {
    let pixels = (width as usize).saturating_mul(height as usize).min(MAX_SIZED_PIXELS);
    let body = vec![0u8; pixels / 8 + 1];
    png_with_body(width, height, has_alpha, Some(&body))
}

/// Reads the `IHDR` of a PNG.
pub fn parse_png(data: &[u8]) -> Option<RasterInfo> {
    if data.len() < 33 || data[0..8] != PNG_SIGNATURE || &data[12..16] != b"IHDR" {
        return None;
    }

    let width = u32::from_be_bytes(data[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(data[20..24].try_into().ok()?);
    let has_alpha = matches!(data[25], 4 | 6);
    (width > 0 && height > 0).then_some(RasterInfo {
        width,
        height,
        has_alpha,
    })
}

/// A baseline JPEG consisting of SOI, SOF0 and EOI only.
pub fn jpeg_header(width: u16, height: u16) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

pub(crate) fn jpeg_output(width: u32, height: u32) -> Vec<u8> {
    let clamp = |value: u32| u16::try_from(value).unwrap_or(u16::MAX);
    jpeg_header(clamp(width), clamp(height))
}

/// Reads the frame header of a JPEG.
pub fn parse_jpeg(data: &[u8]) -> Option<RasterInfo> {
    if data.get(0..2)? != [0xFF, 0xD8] {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        let len = usize::from(u16::from_be_bytes([data[pos + 2], data[pos + 3]]));
        if matches!(marker, 0xC0..=0xC2) {
            let segment = data.get(pos + 4..pos + 9)?;
            let height = u32::from(u16::from_be_bytes([segment[1], segment[2]]));
            let width = u32::from(u16::from_be_bytes([segment[3], segment[4]]));
            return (width > 0 && height > 0).then_some(RasterInfo {
                width,
                height,
                has_alpha: false,
            });
        }
        pos += 2 + len;
    }
    None
}

/// A GIF89a with `frames` single-color frames of the full canvas.
pub fn gif_image(width: u16, height: u16, frames: u16) -> Vec<u8> {
    let mut out = b"GIF89a".to_vec();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    // No global color table.
    out.extend_from_slice(&[0, 0, 0]);
    for _ in 0..frames {
        out.push(0x2C);
        out.extend_from_slice(&[0, 0, 0, 0]);
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.push(0);
        // LZW minimum code size, one data sub-block, terminator.
        out.extend_from_slice(&[2, 2, 0x4C, 0x01, 0]);
    }
    out.push(0x3B);
    out
}

pub(crate) fn gif_output(width: u32, height: u32, frames: u16) -> Vec<u8> {
    let clamp = |value: u32| u16::try_from(value).unwrap_or(u16::MAX);
    gif_image(clamp(width), clamp(height), frames.max(1))
}

fn skip_sub_blocks(data: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let len = usize::from(*data.get(pos)?);
        pos += 1;
        if len == 0 {
            return Some(pos);
        }
        pos += len;
    }
}

/// Reads the logical screen and counts image descriptors of a GIF.
pub fn parse_gif(data: &[u8]) -> Option<(RasterInfo, u16)> {
    let signature = data.get(0..6)?;
    if signature != b"GIF87a" && signature != b"GIF89a" {
        return None;
    }

    let width = u32::from(u16::from_le_bytes([*data.get(6)?, *data.get(7)?]));
    let height = u32::from(u16::from_le_bytes([*data.get(8)?, *data.get(9)?]));
    let flags = *data.get(10)?;
    let mut pos = 13;
    if flags & 0x80 != 0 {
        pos += 3 * (1 << ((flags & 0x07) + 1));
    }

    let mut frames = 0u16;
    loop {
        match *data.get(pos)? {
            0x2C => {
                let local = *data.get(pos + 9)?;
                pos += 10;
                if local & 0x80 != 0 {
                    pos += 3 * (1 << ((local & 0x07) + 1));
                }
                pos = skip_sub_blocks(data, pos + 1)?;
                frames = frames.saturating_add(1);
            }
            0x21 => pos = skip_sub_blocks(data, pos + 2)?,
            0x3B => break,
            _ => return None,
        }
    }

    let info = RasterInfo {
        width,
        height,
        has_alpha: false,
    };
    (width > 0 && height > 0 && frames > 0).then_some((info, frames))
}

fn payload_len(width: u32, height: u32, lossless: bool, quality: u8) -> usize {
    let pixels = (width as usize).saturating_mul(height as usize).min(MAX_SIZED_PIXELS);
    if lossless {
        pixels / 16 + 1
    } else {
        (pixels / 64 + 1) * (1 + usize::from(quality) / 10)
    }
}

/// Encodes a stand-in WebP.
pub(crate) fn webp_output(info: WebpInfo) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&info.width.to_le_bytes());
    payload.extend_from_slice(&info.height.to_le_bytes());
    payload.extend_from_slice(&[info.quality, info.method, u8::from(info.has_alpha)]);
    payload.extend_from_slice(&info.frames.to_le_bytes());
    let filler = payload_len(info.width, info.height, info.lossless, info.quality)
        .saturating_mul(usize::from(info.frames.max(1)));
    payload.extend((0..filler).map(|i| (i % 241) as u8));

    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&((payload.len() + 12) as u32).to_le_bytes());
    out.extend_from_slice(b"WEBP");
    out.extend_from_slice(if info.lossless { b"VP8L" } else { b"VP8 " });
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&payload);
    out
}

/// A stand-in WebP as the encoders produce it with default settings.
pub fn webp_image(width: u32, height: u32, lossless: bool) -> Vec<u8> {
    webp_output(WebpInfo {
        width,
        height,
        lossless,
        quality: 75,
        method: 4,
        has_alpha: true,
        frames: 1,
    })
}

/// Reads back a WebP produced by the stand-in encoders.
pub fn inspect_webp(data: &[u8]) -> Option<WebpInfo> {
    if data.get(0..4)? != b"RIFF" || data.get(8..12)? != b"WEBP" {
        return None;
    }

    let lossless = match data.get(12..16)? {
        b"VP8L" => true,
        b"VP8 " => false,
        _ => return None,
    };
    let payload = data.get(20..31)?;
    let width = u32::from_le_bytes(payload[0..4].try_into().ok()?);
    let height = u32::from_le_bytes(payload[4..8].try_into().ok()?);
    (width > 0 && height > 0).then_some(WebpInfo {
        width,
        height,
        lossless,
        quality: payload[8],
        method: payload[9],
        has_alpha: payload[10] != 0,
        frames: u16::from_le_bytes([*data.get(31)?, *data.get(32)?]),
    })
}

fn avif_ftyp() -> Vec<u8> {
    let mut out = 28u32.to_be_bytes().to_vec();
    out.extend_from_slice(b"ftypavif");
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(b"avifmif1miaf");
    out
}

fn push_blob(out: &mut Vec<u8>, blob: &[u8]) {
    out.extend_from_slice(&(blob.len() as u32).to_be_bytes());
    out.extend_from_slice(blob);
}

/// Encodes a stand-in AVIF.
pub(crate) fn avif_output(info: &AvifInfo) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&info.width.to_be_bytes());
    body.extend_from_slice(&info.height.to_be_bytes());
    body.extend_from_slice(&[
        info.quality,
        info.alpha_quality,
        info.speed,
        info.bit_depth,
        info.yuv_format,
        u8::from(info.has_alpha),
    ]);
    push_blob(&mut body, &info.exif);
    push_blob(&mut body, &info.xmp);
    push_blob(&mut body, &info.icc);
    let filler = payload_len(info.width, info.height, false, info.quality);
    body.extend((0..filler).map(|i| (i % 239) as u8));

    let mut out = avif_ftyp();
    out.extend_from_slice(&((body.len() + 8) as u32).to_be_bytes());
    out.extend_from_slice(b"nxim");
    out.extend_from_slice(&body);
    out
}

/// A stand-in 8-bit AVIF as the encoders produce it with default settings.
pub fn avif_image(width: u32, height: u32) -> Vec<u8> {
    avif_output(&AvifInfo {
        width,
        height,
        quality: 60,
        alpha_quality: 60,
        speed: 6,
        bit_depth: 8,
        yuv_format: 0,
        has_alpha: true,
        exif: Vec::new(),
        xmp: Vec::new(),
        icc: Vec::new(),
    })
}

fn read_blob(data: &[u8], pos: &mut usize) -> Option<Vec<u8>> {
    let len = u32::from_be_bytes(data.get(*pos..*pos + 4)?.try_into().ok()?) as usize;
    let blob = data.get(*pos + 4..*pos + 4 + len)?.to_vec();
    *pos += 4 + len;
    Some(blob)
}

/// Reads back an AVIF produced by the stand-in encoders.
pub fn inspect_avif(data: &[u8]) -> Option<AvifInfo> {
    if data.get(4..12)? != b"ftypavif" {
        return None;
    }

    let ftyp_len = u32::from_be_bytes(data.get(0..4)?.try_into().ok()?) as usize;
    let body = data.get(ftyp_len..)?;
    if body.get(4..8)? != b"nxim" {
        return None;
    }

    let fields = body.get(8..22)?;
    let width = u32::from_be_bytes(fields[0..4].try_into().ok()?);
    let height = u32::from_be_bytes(fields[4..8].try_into().ok()?);
    let mut pos = 22;
    let exif = read_blob(body, &mut pos)?;
    let xmp = read_blob(body, &mut pos)?;
    let icc = read_blob(body, &mut pos)?;
    (width > 0 && height > 0).then_some(AvifInfo {
        width,
        height,
        quality: fields[8],
        alpha_quality: fields[9],
        speed: fields[10],
        bit_depth: fields[11],
        yuv_format: fields[12],
        has_alpha: fields[13] != 0,
        exif,
        xmp,
        icc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_header_round_trip() {
        let info = parse_png(&png_header(64, 32)).unwrap();
        assert_eq!((info.width, info.height, info.has_alpha), (64, 32, true));
    }

    #[test]
    fn test_png_crc_of_iend() {
        // Well-known CRC of an empty IEND chunk.
        assert_eq!(crc32(b"IEND"), 0xAE42_6082);
    }

    #[test]
    fn test_jpeg_round_trip() {
        let info = parse_jpeg(&jpeg_header(640, 480)).unwrap();
        assert_eq!((info.width, info.height), (640, 480));
    }

    #[test]
    fn test_gif_frame_count() {
        let (info, frames) = parse_gif(&gif_image(10, 20, 3)).unwrap();
        assert_eq!((info.width, info.height, frames), (10, 20, 3));
    }

    #[test]
    fn test_webp_round_trip() {
        let info = inspect_webp(&webp_image(7, 9, true)).unwrap();
        assert_eq!((info.width, info.height, info.lossless, info.frames), (7, 9, true, 1));
    }

    #[test]
    fn test_avif_round_trip() {
        let info = inspect_avif(&avif_image(5, 6)).unwrap();
        assert_eq!((info.width, info.height, info.bit_depth), (5, 6, 8));
        assert!(info.exif.is_empty());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let garbage = b"definitely not an image";
        assert!(parse_png(garbage).is_none());
        assert!(parse_jpeg(garbage).is_none());
        assert!(parse_gif(garbage).is_none());
        assert!(inspect_webp(garbage).is_none());
        assert!(inspect_avif(garbage).is_none());
    }
}
