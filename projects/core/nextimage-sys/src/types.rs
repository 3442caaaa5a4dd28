//! Types shared by every codec family.

use core::ffi::c_int;

/// Status code returned by every fallible native entry point.
pub type NextImageStatus = c_int;

/// Operation succeeded
pub const NEXTIMAGE_OK: NextImageStatus = 0;
/// A parameter was rejected by the native library
pub const NEXTIMAGE_ERROR_INVALID_PARAM: NextImageStatus = -1;
/// The encoder failed
pub const NEXTIMAGE_ERROR_ENCODE_FAILED: NextImageStatus = -2;
/// The decoder failed
pub const NEXTIMAGE_ERROR_DECODE_FAILED: NextImageStatus = -3;
/// A native allocation failed
pub const NEXTIMAGE_ERROR_OUT_OF_MEMORY: NextImageStatus = -4;
/// The requested operation or input format is not supported
pub const NEXTIMAGE_ERROR_UNSUPPORTED: NextImageStatus = -5;
/// A caller supplied buffer was too small
pub const NEXTIMAGE_ERROR_BUFFER_TOO_SMALL: NextImageStatus = -6;

/// Pixel layout of decoded image data. Stored as the C enum's underlying `int`.
pub type NextImagePixelFormat = c_int;

/// RGBA, 8 bits per channel
pub const NEXTIMAGE_FORMAT_RGBA: NextImagePixelFormat = 0;
/// RGB, 8 bits per channel
pub const NEXTIMAGE_FORMAT_RGB: NextImagePixelFormat = 1;
/// BGRA, 8 bits per channel
pub const NEXTIMAGE_FORMAT_BGRA: NextImagePixelFormat = 2;
/// YUV 4:2:0 planar
pub const NEXTIMAGE_FORMAT_YUV420: NextImagePixelFormat = 3;
/// YUV 4:2:2 planar
pub const NEXTIMAGE_FORMAT_YUV422: NextImagePixelFormat = 4;
/// YUV 4:4:4 planar
pub const NEXTIMAGE_FORMAT_YUV444: NextImagePixelFormat = 5;

/// Types for which the all-zero bit pattern is a valid value.
///
/// # Safety
///
/// Implementors must only contain integers, floats, raw pointers and arrays of those.
pub unsafe trait Zeroable: Copy {
    /// Returns the all-zero value.
    fn zeroed() -> Self {
        // SAFETY: guaranteed by the implementor.
        unsafe { core::mem::zeroed() }
    }
}

/// Encoded output allocated by the native library.
///
/// Released with `nextimage_free_buffer`, which frees `data` and resets the descriptor.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NextImageBuffer {
    /// Start of the encoded bytes
    pub data: *mut u8,
    /// Number of valid bytes at `data`
    pub size: usize,
}

/// Decoded pixel planes allocated by the native library.
///
/// Released with `nextimage_free_decode_buffer`, which only frees when `owns_data` is set.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NextImageDecodeBuffer {
    /// Primary (or Y) plane
    pub data: *mut u8,
    /// Capacity of `data` in bytes
    pub data_capacity: usize,
    /// Bytes written to `data`
    pub data_size: usize,
    /// Bytes per row of the primary plane
    pub stride: usize,
    /// U plane for planar YUV, otherwise null
    pub u_plane: *mut u8,
    /// Capacity of `u_plane` in bytes
    pub u_capacity: usize,
    /// Bytes written to `u_plane`
    pub u_size: usize,
    /// Bytes per row of the U plane
    pub u_stride: usize,
    /// V plane for planar YUV, otherwise null
    pub v_plane: *mut u8,
    /// Capacity of `v_plane` in bytes
    pub v_capacity: usize,
    /// Bytes written to `v_plane`
    pub v_size: usize,
    /// Bytes per row of the V plane
    pub v_stride: usize,
    /// Width in pixels
    pub width: c_int,
    /// Height in pixels
    pub height: c_int,
    /// Bits per channel (8, 10 or 12)
    pub bit_depth: c_int,
    /// Layout of the planes
    pub format: NextImagePixelFormat,
    /// Non-zero when the library owns (and must free) the planes
    pub owns_data: c_int,
}

unsafe impl Zeroable for NextImageBuffer {}
unsafe impl Zeroable for NextImageDecodeBuffer {}
