//! Moving native output into caller-owned memory.
//!
//! Every output descriptor goes through [`transfer`]:
//!
//! 1. The descriptor is zero-initialized before the call.
//! 2. The status is checked; on failure the error slot is read immediately.
//! 3. On success exactly the reported number of bytes is copied into a fresh [`Vec`].
//! 4. The paired native free function runs on every path, including failures that may have
//!    left a partial allocation behind.
//!
//! No native pointer is reachable after [`transfer`] returns.

use crate::error::{NextImageError, Operation, Result};
use crate::pixel::PixelFormat;
use crate::runtime::NativeRuntime;
use crate::status::NativeStatus;
use nextimage_sys::{NextImageBuffer, NextImageDecodeBuffer, NextImageStatus, RuntimeFns, Zeroable};

/// A kind of native output descriptor.
pub trait OutputSlot {
    /// The native descriptor.
    type Raw: Zeroable;
    /// What the descriptor is copied into.
    type Output;

    /// Calls the native free function for the descriptor.
    ///
    /// # Safety
    ///
    /// `raw` must be zero-initialized or filled by the native library, and not yet released.
    unsafe fn release(runtime: &RuntimeFns, raw: &mut Self::Raw);

    /// Copies the descriptor's contents into caller-owned memory.
    ///
    /// # Safety
    ///
    /// `raw` must have been filled by a native call that reported success.
    unsafe fn take(raw: &Self::Raw, operation: Operation) -> Result<Self::Output>;
}

/// Encoded bytes (`NextImageBuffer`).
#[derive(Debug, Clone, Copy)]
pub enum EncodedBytes {}

/// Decoded pixel planes (`NextImageDecodeBuffer`).
#[derive(Debug, Clone, Copy)]
pub enum DecodedPixels {}

/// A decoded image owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Primary plane (interleaved pixels, or Y for planar formats)
    pub data: Vec<u8>,
    /// Bytes per row of `data`
    pub stride: usize,
    /// U plane of planar formats
    pub u_plane: Option<Vec<u8>>,
    /// Bytes per row of `u_plane`
    pub u_stride: usize,
    /// V plane of planar formats
    pub v_plane: Option<Vec<u8>>,
    /// Bytes per row of `v_plane`
    pub v_stride: usize,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bits per channel
    pub bit_depth: u8,
    /// Pixel layout
    pub format: PixelFormat,
}

impl DecodedImage {
    /// Whether the image carries separate U and V planes.
    pub fn is_planar(&self) -> bool {
        self.format.is_planar() && self.u_plane.is_some() && self.v_plane.is_some()
    }

    /// Whether samples are wider than 8 bits (stored as 16-bit values).
    pub fn is_high_bit_depth(&self) -> bool {
        self.bit_depth > 8
    }
}

impl OutputSlot for EncodedBytes {
    type Raw = NextImageBuffer;
    type Output = Vec<u8>;

    unsafe fn release(runtime: &RuntimeFns, raw: &mut NextImageBuffer) {
        // SAFETY: forwarded to the caller; the native free tolerates null data.
        unsafe { (runtime.free_buffer)(raw) };
    }

    unsafe fn take(raw: &NextImageBuffer, operation: Operation) -> Result<Vec<u8>> {
        if raw.data.is_null() || raw.size == 0 {
            return Err(NextImageError::EmptyOutput { operation });
        }

        // SAFETY: the library reported success for `size` bytes at `data`.
        Ok(unsafe { core::slice::from_raw_parts(raw.data, raw.size) }.to_vec())
    }
}

impl OutputSlot for DecodedPixels {
    type Raw = NextImageDecodeBuffer;
    type Output = DecodedImage;

    unsafe fn release(runtime: &RuntimeFns, raw: &mut NextImageDecodeBuffer) {
        // SAFETY: forwarded to the caller; the native free ignores descriptors it does not own.
        unsafe { (runtime.free_decode_buffer)(raw) };
    }

    unsafe fn take(raw: &NextImageDecodeBuffer, operation: Operation) -> Result<DecodedImage> {
        if raw.data.is_null() || raw.data_size == 0 {
            return Err(NextImageError::EmptyOutput { operation });
        }

        let (width, height, bit_depth, format) = image_header(raw, operation)?;

        // SAFETY: the library reported success; each plane is valid for its stated size.
        unsafe {
            Ok(DecodedImage {
                data: core::slice::from_raw_parts(raw.data, raw.data_size).to_vec(),
                stride: raw.stride,
                u_plane: copy_plane(raw.u_plane, raw.u_size),
                u_stride: raw.u_stride,
                v_plane: copy_plane(raw.v_plane, raw.v_size),
                v_stride: raw.v_stride,
                width,
                height,
                bit_depth,
                format,
            })
        }
    }
}

/// Reads the dimensions, bit depth and format of a filled decode descriptor.
pub(crate) fn image_header(
    raw: &NextImageDecodeBuffer,
    operation: Operation,
) -> Result<(u32, u32, u8, PixelFormat)> {
    let malformed = |reason| NextImageError::MalformedOutput { operation, reason };
    let width = u32::try_from(raw.width).map_err(|_| malformed("negative width"))?;
    let height = u32::try_from(raw.height).map_err(|_| malformed("negative height"))?;
    let bit_depth = u8::try_from(raw.bit_depth).map_err(|_| malformed("invalid bit depth"))?;
    let format = PixelFormat::from_raw(raw.format).ok_or_else(|| malformed("unknown pixel format"))?;
    Ok((width, height, bit_depth, format))
}

unsafe fn copy_plane(ptr: *const u8, size: usize) -> Option<Vec<u8>> {
    if ptr.is_null() || size == 0 {
        return None;
    }

    // SAFETY: guaranteed by the caller.
    Some(unsafe { core::slice::from_raw_parts(ptr, size) }.to_vec())
}

/// Zeroed descriptor that is released when dropped.
struct Slot<'a, S: OutputSlot> {
    raw: S::Raw,
    runtime: &'a RuntimeFns,
}

impl<S: OutputSlot> Drop for Slot<'_, S> {
    fn drop(&mut self) {
        // SAFETY: zero-initialized or filled by the library, released only here.
        unsafe { S::release(self.runtime, &mut self.raw) };
    }
}

/// Runs one native call that produces an output descriptor and takes ownership of the result.
///
/// `call` receives a pointer to a zeroed descriptor and must return the native status.
pub fn transfer<S, F>(runtime: &NativeRuntime, operation: Operation, call: F) -> Result<S::Output>
where
    S: OutputSlot,
    F: FnOnce(*mut S::Raw) -> NextImageStatus,
{
    let errors = runtime.errors().begin();
    // Declared after `errors`: released before the process-wide lock is dropped.
    let mut slot = Slot::<S> {
        raw: S::Raw::zeroed(),
        runtime: &runtime.library().runtime,
    };

    let status = NativeStatus::from_raw(call(&mut slot.raw));
    tracing::trace!(%operation, %status, "native call returned");
    if !status.is_ok() {
        return Err(errors.native_error(operation, status));
    }

    // SAFETY: filled by a successful native call.
    unsafe { S::take(&slot.raw, operation) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    const RUN: Operation = Operation::new("cwebp", "run");

    fn encode_bytes(runtime: &NativeRuntime, payload: &'static [u8]) -> Result<Vec<u8>> {
        transfer::<EncodedBytes, _>(runtime, RUN, |output| unsafe {
            fake::write_encoded(output, payload)
        })
    }

    #[test]
    fn test_copies_exactly_reported_size_and_frees() {
        let runtime = runtime();

        let output = encode_bytes(&runtime, b"RIFF\x04\x00\x00\x00WEBP").unwrap();

        assert_eq!(output, b"RIFF\x04\x00\x00\x00WEBP");
        assert_eq!(fake::live_allocations(), 0);
        assert_eq!(fake::calls("nextimage_free_buffer"), 1);
    }

    #[test]
    fn test_failure_reads_message_before_free() {
        let runtime = runtime();

        // The stand-in clears its error slot inside free, like any later native call may.
        let error = transfer::<EncodedBytes, _>(&runtime, RUN, |output| unsafe {
            fake::fail_with_partial_output(output, -2, "quality out of range")
        })
        .unwrap_err();

        assert_eq!(
            error,
            NextImageError::Native {
                operation: RUN,
                status: NativeStatus::EncodeFailed,
                message: "quality out of range".into(),
            }
        );
        assert_eq!(fake::live_allocations(), 0);
        assert_eq!(fake::calls("nextimage_free_buffer"), 1);
    }

    #[rstest]
    #[case::null_data_with_size(fake::OutputShape::NullData)]
    #[case::data_with_zero_size(fake::OutputShape::ZeroSize)]
    #[case::null_and_zero(fake::OutputShape::Empty)]
    fn test_degenerate_success_is_empty_output(#[case] shape: fake::OutputShape) {
        let runtime = runtime();

        let error = transfer::<EncodedBytes, _>(&runtime, RUN, |output| unsafe {
            fake::write_encoded_shape(output, shape)
        })
        .unwrap_err();

        assert_eq!(error, NextImageError::EmptyOutput { operation: RUN });
        assert_eq!(fake::live_allocations(), 0);
        assert_eq!(fake::double_frees(), 0);
    }

    #[test]
    fn test_decoded_planes_are_copied() {
        let runtime = runtime();
        let operation = Operation::new("webp decoder", "decode");

        let image = transfer::<DecodedPixels, _>(&runtime, operation, |output| unsafe {
            fake::write_decoded(output, 4, 2, PixelFormat::Yuv420.to_raw(), 8)
        })
        .unwrap();

        assert_eq!(image.width, 4);
        assert_eq!(image.height, 2);
        assert_eq!(image.stride, 4);
        assert_eq!(image.data.len(), 8);
        assert_eq!(image.u_plane.as_ref().map(Vec::len), Some(2));
        assert_eq!(image.v_plane.as_ref().map(Vec::len), Some(2));
        assert!(image.is_planar());
        assert!(!image.is_high_bit_depth());
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_decoded_interleaved_has_no_chroma_planes() {
        let runtime = runtime();
        let operation = Operation::new("webp decoder", "decode");

        let image = transfer::<DecodedPixels, _>(&runtime, operation, |output| unsafe {
            fake::write_decoded(output, 3, 3, PixelFormat::Rgba.to_raw(), 8)
        })
        .unwrap();

        assert_eq!(image.data.len(), 3 * 3 * 4);
        assert_eq!(image.stride, 12);
        assert_eq!(image.u_plane, None);
        assert!(!image.is_planar());
    }

    #[rstest]
    #[case(-1, 2, 8, "negative width")]
    #[case(2, -5, 8, "negative height")]
    #[case(2, 2, 300, "invalid bit depth")]
    fn test_malformed_decode_descriptor(
        #[case] width: i32,
        #[case] height: i32,
        #[case] bit_depth: i32,
        #[case] reason: &'static str,
    ) {
        let runtime = runtime();
        let operation = Operation::new("avif decoder", "decode");

        let error = transfer::<DecodedPixels, _>(&runtime, operation, |output| unsafe {
            fake::write_decoded(output, width, height, PixelFormat::Rgba.to_raw(), bit_depth)
        })
        .unwrap_err();

        assert_eq!(error, NextImageError::MalformedOutput { operation, reason });
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_high_bit_depth() {
        let image = DecodedImage {
            data: vec![0; 8],
            stride: 8,
            u_plane: None,
            u_stride: 0,
            v_plane: None,
            v_stride: 0,
            width: 1,
            height: 1,
            bit_depth: 10,
            format: PixelFormat::Rgba,
        };
        assert!(image.is_high_bit_depth());
    }
}
