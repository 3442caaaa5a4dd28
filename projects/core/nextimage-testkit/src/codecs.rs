//! Stand-in codecs behind each family.
//!
//! They validate the options the way the native library does (out-of-range values are
//! rejected, not clamped), honor the options that change the output's shape, and produce
//! deterministic results.

use crate::images::*;
use nextimage_sys::*;

/// What a stand-in conversion produced.
pub(crate) type Outcome<T> = Result<T, (NextImageStatus, &'static str)>;

/// Shape of a decoded image the stand-in decoders produce.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DecodedShape {
    pub width: i32,
    pub height: i32,
    pub format: NextImagePixelFormat,
    pub bit_depth: i32,
}

const UNSUPPORTED_INPUT: (NextImageStatus, &str) =
    (NEXTIMAGE_ERROR_UNSUPPORTED, "unsupported input format");

fn read_raster(input: &[u8]) -> Outcome<RasterInfo> {
    parse_png(input)
        .or_else(|| parse_jpeg(input))
        .ok_or(UNSUPPORTED_INPUT)
}

fn read_webp(input: &[u8]) -> Outcome<WebpInfo> {
    inspect_webp(input).ok_or((NEXTIMAGE_ERROR_DECODE_FAILED, "not a WebP bitstream"))
}

fn read_avif(input: &[u8]) -> Outcome<AvifInfo> {
    inspect_avif(input).ok_or((NEXTIMAGE_ERROR_DECODE_FAILED, "not an AVIF file"))
}

fn check_range(value: i32, min: i32, max: i32, message: &'static str) -> Outcome<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err((NEXTIMAGE_ERROR_INVALID_PARAM, message))
    }
}

fn check_webp_quality(quality: f32, method: i32) -> Outcome<u8> {
    if !(0.0..=100.0).contains(&quality) {
        return Err((NEXTIMAGE_ERROR_INVALID_PARAM, "quality out of range"));
    }
    check_range(method, 0, 6, "method out of range")?;
    Ok(quality.round() as u8)
}

fn positive(value: i32) -> Option<u32> {
    u32::try_from(value).ok().filter(|value| *value > 0)
}

/// Applies an optional crop and an optional resize (a zero side keeps the aspect ratio).
fn geometry(
    (width, height): (u32, u32),
    crop: Option<(u32, u32)>,
    resize: (i32, i32),
) -> (u32, u32) {
    let (mut width, mut height) = crop.map_or((width, height), |(crop_width, crop_height)| {
        (crop_width.min(width), crop_height.min(height))
    });

    match (positive(resize.0), positive(resize.1)) {
        (Some(w), Some(h)) => (width, height) = (w, h),
        (Some(w), None) => {
            height = ((u64::from(height) * u64::from(w)) / u64::from(width.max(1))).max(1) as u32;
            width = w;
        }
        (None, Some(h)) => {
            width = ((u64::from(width) * u64::from(h)) / u64::from(height.max(1))).max(1) as u32;
            height = h;
        }
        (None, None) => {}
    }
    (width, height)
}

fn cwebp_like(options: &CWebPOptions, raster: RasterInfo, frames: u16) -> Outcome<Vec<u8>> {
    let quality = check_webp_quality(options.quality, options.method)?;
    check_range(options.near_lossless, -1, 100, "near_lossless out of range")?;

    let crop = (options.crop_x >= 0 && options.crop_y >= 0)
        .then(|| Some((positive(options.crop_width)?, positive(options.crop_height)?)))
        .flatten();
    let (width, height) = geometry(
        (raster.width, raster.height),
        crop,
        (options.resize_width, options.resize_height),
    );

    Ok(webp_output(WebpInfo {
        width,
        height,
        lossless: options.lossless != 0 || options.near_lossless >= 0,
        quality,
        method: options.method as u8,
        has_alpha: raster.has_alpha && options.noalpha == 0,
        frames,
    }))
}

pub(crate) fn cwebp(options: &CWebPOptions, input: &[u8]) -> Outcome<Vec<u8>> {
    cwebp_like(options, read_raster(input)?, 1)
}

pub(crate) fn gif2webp(options: &Gif2WebPOptions, input: &[u8]) -> Outcome<Vec<u8>> {
    let (raster, frames) =
        parse_gif(input).ok_or((NEXTIMAGE_ERROR_DECODE_FAILED, "input is not a GIF"))?;
    cwebp_like(options, raster, frames)
}

pub(crate) fn dwebp(options: &DWebPOptions, input: &[u8]) -> Outcome<Vec<u8>> {
    let info = read_webp(input)?;
    let crop = (options.use_crop != 0)
        .then(|| Some((positive(options.crop_width)?, positive(options.crop_height)?)))
        .flatten();
    let resize = if options.use_resize != 0 {
        (options.resize_width, options.resize_height)
    } else {
        (0, 0)
    };
    let (width, height) = geometry((info.width, info.height), crop, resize);

    let keeps_alpha = info.has_alpha
        && !matches!(options.format, NEXTIMAGE_FORMAT_RGB)
        && options.alpha_only == 0;
    Ok(png_output(width, height, keeps_alpha))
}

pub(crate) fn webp2gif(_options: &WebP2GifOptions, input: &[u8]) -> Outcome<Vec<u8>> {
    let info = read_webp(input)?;
    Ok(gif_output(info.width, info.height, info.frames))
}

/// Metadata copied out of `AVIFEncOptions` when the command is created.
#[derive(Debug, Clone, Default)]
pub(crate) struct AvifMetadata {
    pub exif: Vec<u8>,
    pub xmp: Vec<u8>,
    pub icc: Vec<u8>,
}

fn copy_blob(ptr: *const u8, len: usize) -> Vec<u8> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }

    // SAFETY: the options contract makes every non-null blob valid for its length during the
    // constructor call, which is where this runs.
    unsafe { core::slice::from_raw_parts(ptr, len) }.to_vec()
}

impl AvifMetadata {
    pub(crate) fn capture(options: &AVIFEncOptions) -> Self {
        Self {
            exif: copy_blob(options.exif_data, options.exif_size),
            xmp: copy_blob(options.xmp_data, options.xmp_size),
            icc: copy_blob(options.icc_data, options.icc_size),
        }
    }
}

struct AvifSettings {
    quality: i32,
    alpha_quality: i32,
    speed: i32,
    bit_depth: i32,
    yuv_format: i32,
    enable_alpha: bool,
}

fn encode_avif(
    settings: AvifSettings,
    (width, height): (u32, u32),
    has_alpha: bool,
    metadata: &AvifMetadata,
) -> Outcome<Vec<u8>> {
    check_range(settings.quality, 0, 100, "quality out of range")?;
    check_range(settings.alpha_quality, 0, 100, "alpha quality out of range")?;
    check_range(settings.speed, 0, 10, "speed out of range")?;
    check_range(settings.yuv_format, 0, 3, "unknown YUV format")?;
    if !matches!(settings.bit_depth, 8 | 10 | 12) {
        return Err((NEXTIMAGE_ERROR_INVALID_PARAM, "unsupported bit depth"));
    }

    Ok(avif_output(&AvifInfo {
        width,
        height,
        quality: settings.quality as u8,
        alpha_quality: settings.alpha_quality as u8,
        speed: settings.speed as u8,
        bit_depth: settings.bit_depth as u8,
        yuv_format: settings.yuv_format as u8,
        has_alpha: has_alpha && settings.enable_alpha,
        exif: metadata.exif.clone(),
        xmp: metadata.xmp.clone(),
        icc: metadata.icc.clone(),
    }))
}

pub(crate) fn avifenc(
    options: &AVIFEncOptions,
    metadata: &AvifMetadata,
    input: &[u8],
) -> Outcome<Vec<u8>> {
    let raster = read_raster(input)?;
    let [x, y, crop_width, crop_height] = options.crop;
    let crop = (x >= 0 && y >= 0)
        .then(|| Some((positive(crop_width)?, positive(crop_height)?)))
        .flatten();
    let size = geometry((raster.width, raster.height), crop, (0, 0));

    let settings = AvifSettings {
        quality: options.quality,
        alpha_quality: if options.quality_alpha < 0 {
            options.quality
        } else {
            options.quality_alpha
        },
        speed: options.speed,
        bit_depth: options.bit_depth,
        yuv_format: options.yuv_format,
        enable_alpha: options.enable_alpha != 0,
    };
    encode_avif(settings, size, raster.has_alpha, metadata)
}

fn check_avif_limits(info: &AvifInfo, size_limit: u32, dimension_limit: u32) -> Outcome<()> {
    if dimension_limit > 0 && (info.width > dimension_limit || info.height > dimension_limit) {
        return Err((NEXTIMAGE_ERROR_DECODE_FAILED, "image dimensions exceed limit"));
    }
    if u64::from(info.width) * u64::from(info.height) > u64::from(size_limit) {
        return Err((NEXTIMAGE_ERROR_DECODE_FAILED, "image size exceeds limit"));
    }
    Ok(())
}

pub(crate) fn avifdec(options: &AVIFDecOptions, input: &[u8]) -> Outcome<Vec<u8>> {
    let info = read_avif(input)?;
    check_avif_limits(&info, options.image_size_limit, options.image_dimension_limit)?;

    match options.output_format {
        AVIFDEC_OUTPUT_PNG => Ok(png_output(info.width, info.height, info.has_alpha)),
        AVIFDEC_OUTPUT_JPEG => {
            check_range(options.jpeg_quality, 0, 100, "JPEG quality out of range")?;
            Ok(jpeg_output(info.width, info.height))
        }
        _ => Err((NEXTIMAGE_ERROR_UNSUPPORTED, "unknown output format")),
    }
}

pub(crate) fn webp_encode(options: &NextImageWebPEncodeOptions, input: &[u8]) -> Outcome<Vec<u8>> {
    let raster = read_raster(input)?;
    let quality = check_webp_quality(options.quality, options.method)?;

    Ok(webp_output(WebpInfo {
        width: raster.width,
        height: raster.height,
        lossless: options.lossless != 0,
        quality,
        method: options.method as u8,
        has_alpha: raster.has_alpha,
        frames: 1,
    }))
}

/// Animated GIF to WebP with the encoder options of the one-shot API.
pub(crate) fn gif_encode(options: &NextImageWebPEncodeOptions, input: &[u8]) -> Outcome<Vec<u8>> {
    let (raster, frames) =
        parse_gif(input).ok_or((NEXTIMAGE_ERROR_DECODE_FAILED, "input is not a GIF"))?;
    let quality = check_webp_quality(options.quality, options.method)?;

    Ok(webp_output(WebpInfo {
        width: raster.width,
        height: raster.height,
        lossless: options.lossless != 0,
        quality,
        method: options.method as u8,
        has_alpha: raster.has_alpha,
        frames,
    }))
}

/// Dimensions and bit depth of a WebP, as the size queries report them.
pub(crate) fn webp_size(input: &[u8]) -> Outcome<(u32, u32, u8)> {
    read_webp(input).map(|info| (info.width, info.height, 8))
}

/// Dimensions and bit depth of an AVIF, as the size queries report them.
pub(crate) fn avif_size(input: &[u8]) -> Outcome<(u32, u32, u8)> {
    read_avif(input).map(|info| (info.width, info.height, info.bit_depth))
}

fn decoded_shape(width: u32, height: u32, format: NextImagePixelFormat, bit_depth: u8) -> Outcome<DecodedShape> {
    if !(NEXTIMAGE_FORMAT_RGBA..=NEXTIMAGE_FORMAT_YUV444).contains(&format) {
        return Err((NEXTIMAGE_ERROR_INVALID_PARAM, "unknown pixel format"));
    }

    Ok(DecodedShape {
        width: i32::try_from(width).unwrap_or(i32::MAX),
        height: i32::try_from(height).unwrap_or(i32::MAX),
        format,
        bit_depth: i32::from(bit_depth),
    })
}

pub(crate) fn webp_decode(options: &NextImageWebPDecodeOptions, input: &[u8]) -> Outcome<DecodedShape> {
    let info = read_webp(input)?;
    decoded_shape(info.width, info.height, options.format, 8)
}

pub(crate) fn avif_encode(options: &NextImageAVIFEncodeOptions, input: &[u8]) -> Outcome<Vec<u8>> {
    let raster = read_raster(input)?;
    let settings = AvifSettings {
        quality: options.quality,
        alpha_quality: options.quality,
        speed: options.speed,
        bit_depth: options.bit_depth,
        yuv_format: options.yuv_format,
        enable_alpha: options.enable_alpha != 0,
    };
    encode_avif(
        settings,
        (raster.width, raster.height),
        raster.has_alpha,
        &AvifMetadata::default(),
    )
}

pub(crate) fn avif_decode(options: &NextImageAVIFDecodeOptions, input: &[u8]) -> Outcome<DecodedShape> {
    let info = read_avif(input)?;
    decoded_shape(info.width, info.height, options.format, info.bit_depth)
}
