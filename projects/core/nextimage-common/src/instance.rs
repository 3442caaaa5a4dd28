//! Reusable encoder and decoder handles.
//!
//! An [`Instance`] keeps native codec state (thread pools, tiling setup) alive across many
//! calls with one fixed configuration. Changing options means creating a new instance.

use crate::buffer::{DecodedImage, DecodedPixels, EncodedBytes, OutputSlot, transfer};
use crate::error::{NextImageError, Operation, Result};
use crate::handle::NativeHandle;
use crate::options::{ConfigRecord, DefaultsSource, NativeOf, build_default, to_native};
use crate::runtime::NativeRuntime;
use core::ptr::{self, NonNull};
use nextimage_sys::{InstanceFns, NativeLibrary};

/// Descriptor of a reusable encoder or decoder family.
pub trait InstanceFamily: 'static {
    /// Family name used in errors and logs, e.g. `webp encoder`.
    const NAME: &'static str;
    /// Name of the per-input operation (`encode` or `decode`).
    const ACTION: &'static str;
    /// Option record of the family.
    type Options: ConfigRecord;
    /// Opaque native instance type.
    type Raw: 'static;
    /// Output descriptor produced per call.
    type Output: OutputSlot;

    /// The family's entry points in a function table.
    fn fns(
        library: &NativeLibrary,
    ) -> &InstanceFns<NativeOf<Self::Options>, Self::Raw, <Self::Output as OutputSlot>::Raw>;
}

/// A native encoder or decoder of family `F`.
///
/// Use [`encode`](Instance::encode) for encoder families and [`decode`](Instance::decode) for
/// decoder families.
pub struct Instance<F: InstanceFamily> {
    runtime: NativeRuntime,
    handle: NativeHandle<F::Raw>,
}

impl<F: InstanceFamily> Instance<F> {
    /// Options holding the native library's defaults for this family.
    pub fn default_options(runtime: &NativeRuntime) -> F::Options {
        build_default(Self::defaults_source(runtime), runtime.errors(), F::NAME)
    }

    /// Translates `options` and creates the native instance.
    pub fn new(runtime: &NativeRuntime, options: &F::Options) -> Result<Self> {
        let operation = Operation::new(F::NAME, "create");
        let native = to_native(options, Self::defaults_source(runtime), runtime.errors(), operation)?;
        Self::create(runtime, native.as_ptr(), operation)
    }

    /// Creates the native instance without options, so the library applies its own defaults.
    pub fn with_native_defaults(runtime: &NativeRuntime) -> Result<Self> {
        Self::create(runtime, ptr::null(), Operation::new(F::NAME, "create"))
    }

    fn create(
        runtime: &NativeRuntime,
        options: *const NativeOf<F::Options>,
        operation: Operation,
    ) -> Result<Self> {
        let fns = F::fns(runtime.library());
        let errors = runtime.errors().begin();
        // SAFETY: `options` is null or points to a native options struct that outlives the call.
        let raw = unsafe { (fns.create)(options) };
        let ptr = NonNull::new(raw).ok_or_else(|| errors.allocation_error(operation))?;
        drop(errors);

        tracing::debug!(family = F::NAME, "created native instance");
        Ok(Self {
            runtime: *runtime,
            // SAFETY: freshly created by the paired constructor.
            handle: unsafe { NativeHandle::from_raw(ptr, fns.destroy, *runtime.errors(), F::NAME) },
        })
    }

    fn defaults_source(runtime: &NativeRuntime) -> DefaultsSource<NativeOf<F::Options>> {
        DefaultsSource::FillIn(F::fns(runtime.library()).default_options)
    }

    fn process(&mut self, input: &[u8]) -> Result<<F::Output as OutputSlot>::Output> {
        let operation = Operation::new(F::NAME, F::ACTION);
        let instance = self.handle.as_ptr(operation)?;
        if input.is_empty() {
            return Err(NextImageError::EmptyInput { operation });
        }

        let process = F::fns(self.runtime.library()).process;
        transfer::<F::Output, _>(&self.runtime, operation, |output| {
            // SAFETY: `instance` is live, `input` is valid for its length and `output` is a
            // zeroed descriptor.
            unsafe { process(instance, input.as_ptr(), input.len(), output) }
        })
    }

    /// Releases the native instance. Further calls are no-ops.
    pub fn close(&mut self) {
        self.handle.release();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.handle.is_released()
    }

    /// Runtime the instance was created from.
    pub fn runtime(&self) -> &NativeRuntime {
        &self.runtime
    }
}

impl<F: InstanceFamily<Output = EncodedBytes>> Instance<F> {
    /// Encodes one image file (JPEG, PNG, ...).
    ///
    /// Fails with [`NextImageError::Closed`] after [`close`](Self::close), and with
    /// [`NextImageError::EmptyInput`] for empty input; neither case reaches native code.
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.process(input)
    }
}

impl<F: InstanceFamily<Output = DecodedPixels>> Instance<F> {
    /// Decodes one encoded image into pixel planes.
    ///
    /// Fails with [`NextImageError::Closed`] after [`close`](Self::close), and with
    /// [`NextImageError::EmptyInput`] for empty input; neither case reaches native code.
    pub fn decode(&mut self, input: &[u8]) -> Result<DecodedImage> {
        self.process(input)
    }
}

impl<F: InstanceFamily> core::fmt::Debug for Instance<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Instance")
            .field("family", &F::NAME)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn encoder() -> Instance<FakeWebpEncoder> {
        let runtime = runtime();
        let options = Instance::<FakeWebpEncoder>::default_options(&runtime);
        Instance::new(&runtime, &options).unwrap()
    }

    #[test]
    fn test_two_encodes_with_different_sizes() {
        let mut encoder = encoder();

        let small = encoder.encode(&fake::png_header(16, 16)).unwrap();
        let large = encoder.encode(&fake::png_image(64, 64)).unwrap();

        assert_ne!(small.len(), large.len());
        assert_eq!(&small[0..4], b"RIFF");
        assert_eq!(&large[0..4], b"RIFF");
        assert_eq!(fake::calls("nextimage_webp_encoder_create"), 1);
        assert_eq!(fake::calls("nextimage_webp_encoder_encode"), 2);
    }

    #[test]
    fn test_default_options_do_not_allocate() {
        let runtime = runtime();

        let options = Instance::<FakeWebpEncoder>::default_options(&runtime);

        assert_eq!(options.quality, 75.0);
        assert_eq!(fake::calls("nextimage_webp_default_encode_options"), 1);
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_empty_input_makes_no_native_call() {
        let mut encoder = encoder();
        let before = fake::total_calls();

        let error = encoder.encode(&[]).unwrap_err();

        assert_eq!(
            error,
            NextImageError::EmptyInput {
                operation: Operation::new("webp encoder", "encode")
            }
        );
        assert_eq!(fake::total_calls(), before);
    }

    #[test]
    fn test_decode_round_trip_dimensions() {
        let runtime = runtime();
        let mut encoder = encoder();
        let webp = encoder.encode(&fake::png_header(20, 10)).unwrap();

        let options = Instance::<FakeWebpDecoder>::default_options(&runtime);
        let mut decoder = Instance::<FakeWebpDecoder>::new(&runtime, &options).unwrap();
        let image = decoder.decode(&webp).unwrap();

        assert_eq!((image.width, image.height), (20, 10));
        assert_eq!(image.format, PixelFormat::Rgba);
        assert_eq!(image.data.len(), 20 * 10 * 4);
        encoder.close();
        decoder.close();
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_decoder_honours_pixel_format() {
        let runtime = runtime();
        let mut options = Instance::<FakeWebpDecoder>::default_options(&runtime);
        options.format = PixelFormat::Yuv420;
        let mut decoder = Instance::<FakeWebpDecoder>::new(&runtime, &options).unwrap();

        let image = decoder.decode(&fake::webp_image(8, 8, false)).unwrap();

        assert!(image.is_planar());
        assert_eq!(image.u_plane.as_ref().map(Vec::len), Some(16));
    }

    #[test]
    fn test_use_after_close() {
        let mut encoder = encoder();
        encoder.close();
        encoder.close();

        for _ in 0..50 {
            assert!(encoder.encode(&fake::png_header(4, 4)).unwrap_err().is_closed());
        }
        assert_eq!(fake::calls("nextimage_webp_encoder_destroy"), 1);
        assert_eq!(fake::calls("nextimage_webp_encoder_encode"), 0);
    }

    #[test]
    fn test_drop_without_close_releases() {
        {
            let _encoder = encoder();
        }
        assert_eq!(fake::calls("nextimage_webp_encoder_destroy"), 1);
        assert_eq!(fake::live_allocations(), 0);
    }

    #[test]
    fn test_null_instance_is_allocation_error() {
        let runtime = runtime();
        fake::fail_next_create(None);

        let error = Instance::<FakeWebpEncoder>::with_native_defaults(&runtime).unwrap_err();

        assert_eq!(
            error,
            NextImageError::Allocation {
                operation: Operation::new("webp encoder", "create"),
                message: "out of memory".into(),
            }
        );
    }

    #[test]
    fn test_native_failure_frees_partial_output() {
        let mut encoder = encoder();
        fake::fail_next(-2, Some("encoder ran out of patience"), true);

        let error = encoder.encode(&fake::png_header(8, 8)).unwrap_err();

        assert_eq!(error.status(), Some(NativeStatus::EncodeFailed));
        assert!(error.to_string().ends_with("encoder ran out of patience"));
        // Only the encoder itself is alive.
        assert_eq!(fake::live_allocations(), 1);
    }
}
