//! Writing library-allocated results into output descriptors.
//!
//! These are also exported so binding-layer tests can drive the transfer protocol with
//! hand-picked descriptor contents.

use crate::state::{alloc_bytes, set_error};
use nextimage_sys::*;

/// Degenerate descriptor contents reported with a success status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// Null data with a non-zero size
    NullData,
    /// Allocated data with a zero size
    ZeroSize,
    /// Null data and zero size
    Empty,
}

/// Fills `out` with a library-allocated copy of `payload` and returns `NEXTIMAGE_OK`.
///
/// # Safety
///
/// `out` must be valid for writes.
pub unsafe fn write_encoded(out: *mut NextImageBuffer, payload: &[u8]) -> NextImageStatus {
    let (data, size) = if payload.is_empty() {
        (core::ptr::null_mut(), 0)
    } else {
        (alloc_bytes(payload.to_vec()), payload.len())
    };
    // SAFETY: guaranteed by the caller.
    unsafe { *out = NextImageBuffer { data, size } };
    NEXTIMAGE_OK
}

/// Fills `out` with degenerate contents and returns `NEXTIMAGE_OK`.
///
/// # Safety
///
/// `out` must be valid for writes.
pub unsafe fn write_encoded_shape(out: *mut NextImageBuffer, shape: OutputShape) -> NextImageStatus {
    let buffer = match shape {
        OutputShape::NullData => NextImageBuffer {
            data: core::ptr::null_mut(),
            size: 16,
        },
        OutputShape::ZeroSize => NextImageBuffer {
            data: alloc_bytes(vec![0; 8]),
            size: 0,
        },
        OutputShape::Empty => NextImageBuffer {
            data: core::ptr::null_mut(),
            size: 0,
        },
    };
    // SAFETY: guaranteed by the caller.
    unsafe { *out = buffer };
    NEXTIMAGE_OK
}

/// Leaves a partial allocation in `out`, records `message` and returns `status`.
///
/// # Safety
///
/// `out` must be valid for writes.
pub unsafe fn fail_with_partial_output(
    out: *mut NextImageBuffer,
    status: NextImageStatus,
    message: &str,
) -> NextImageStatus {
    // SAFETY: guaranteed by the caller.
    unsafe {
        *out = NextImageBuffer {
            data: alloc_bytes(vec![0xAB; 32]),
            size: 32,
        }
    };
    set_error(message);
    status
}

/// Bytes per row of the first plane, the only plane for interleaved formats.
pub(crate) fn row_bytes(width: usize, format: NextImagePixelFormat, bit_depth: i32) -> usize {
    let channels = match format {
        NEXTIMAGE_FORMAT_RGB => 3,
        NEXTIMAGE_FORMAT_YUV420 | NEXTIMAGE_FORMAT_YUV422 | NEXTIMAGE_FORMAT_YUV444 => 1,
        _ => 4,
    };
    let sample = if bit_depth > 8 { 2 } else { 1 };
    width * channels * sample
}

/// Whether `format` stores chroma in separate planes.
pub(crate) fn is_planar(format: NextImagePixelFormat) -> bool {
    matches!(
        format,
        NEXTIMAGE_FORMAT_YUV420 | NEXTIMAGE_FORMAT_YUV422 | NEXTIMAGE_FORMAT_YUV444
    )
}

fn plane(len: usize, seed: usize) -> *mut u8 {
    alloc_bytes((0..len.max(1)).map(|i| ((i + seed) % 253) as u8).collect())
}

/// Fills `out` with library-allocated planes for an image of the given shape.
///
/// Negative dimensions are written to the descriptor as given; the planes are sized as if
/// they were 1. Samples wider than 8 bits take two bytes.
///
/// # Safety
///
/// `out` must be valid for writes.
pub unsafe fn write_decoded(
    out: *mut NextImageDecodeBuffer,
    width: i32,
    height: i32,
    format: NextImagePixelFormat,
    bit_depth: i32,
) -> NextImageStatus {
    let w = usize::try_from(width).unwrap_or(0).max(1);
    let h = usize::try_from(height).unwrap_or(0).max(1);
    let sample = if bit_depth > 8 { 2 } else { 1 };

    let mut buffer = NextImageDecodeBuffer::zeroed();
    let chroma = match format {
        NEXTIMAGE_FORMAT_YUV420 => Some((w.div_ceil(2), h.div_ceil(2))),
        NEXTIMAGE_FORMAT_YUV422 => Some((w.div_ceil(2), h)),
        NEXTIMAGE_FORMAT_YUV444 => Some((w, h)),
        _ => None,
    };

    buffer.stride = row_bytes(w, format, bit_depth);
    buffer.data_size = buffer.stride * h;
    buffer.data_capacity = buffer.data_size;
    buffer.data = plane(buffer.data_size, 0);

    if let Some((chroma_width, chroma_height)) = chroma {
        let stride = chroma_width * sample;
        let size = stride * chroma_height;
        buffer.u_plane = plane(size, 1);
        buffer.u_stride = stride;
        buffer.u_size = size;
        buffer.u_capacity = size;
        buffer.v_plane = plane(size, 2);
        buffer.v_stride = stride;
        buffer.v_size = size;
        buffer.v_capacity = size;
    }

    buffer.width = width;
    buffer.height = height;
    buffer.bit_depth = bit_depth;
    buffer.format = format;
    buffer.owns_data = 1;
    // SAFETY: guaranteed by the caller.
    unsafe { *out = buffer };
    NEXTIMAGE_OK
}

/// Leaves a partially filled decode buffer in `out`.
///
/// # Safety
///
/// `out` must be valid for writes.
pub(crate) unsafe fn write_partial_decoded(out: *mut NextImageDecodeBuffer) {
    let mut buffer = NextImageDecodeBuffer::zeroed();
    buffer.data = plane(16, 0);
    buffer.data_capacity = 16;
    buffer.owns_data = 1;
    // SAFETY: guaranteed by the caller.
    unsafe { *out = buffer };
}
