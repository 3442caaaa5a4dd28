//! The stand-in entry points and the [`LIBRARY`] table that exposes them.
//!
//! Every command family shares one set of generic entry points parameterised by a
//! [`CommandCodec`]; every instance family shares one set parameterised by an
//! [`InstanceCodec`]. Each call is recorded under the real symbol name.

use crate::codecs::{self, AvifMetadata, DecodedShape, Outcome};
use crate::output::{is_planar, row_bytes, write_decoded, write_encoded, write_partial_decoded};
use crate::state::*;
use core::ffi::{CStr, c_char, c_int};
use nextimage_sys::*;

/// Version reported by `nextimage_version`.
pub const VERSION: &str = "1.0.0";
const VERSION_C: &CStr = c"1.0.0";

struct CommandSymbols {
    family: &'static str,
    create_default_options: &'static str,
    free_options: &'static str,
    new_command: &'static str,
    run_command: &'static str,
    free_command: &'static str,
}

macro_rules! command_symbols {
    ($family:literal) => {
        CommandSymbols {
            family: $family,
            create_default_options: concat!($family, "_create_default_options"),
            free_options: concat!($family, "_free_options"),
            new_command: concat!($family, "_new_command"),
            run_command: concat!($family, "_run_command"),
            free_command: concat!($family, "_free_command"),
        }
    };
}

struct InstanceSymbols {
    family: &'static str,
    default_options: &'static str,
    create: &'static str,
    process: &'static str,
    destroy: &'static str,
    alloc: &'static str,
    into: &'static str,
}

macro_rules! instance_symbols {
    ($codec:literal, $role:literal, $direction:literal) => {
        InstanceSymbols {
            family: concat!($codec, "_", $role),
            default_options: concat!("nextimage_", $codec, "_default_", $direction, "_options"),
            create: concat!("nextimage_", $codec, "_", $role, "_create"),
            process: concat!("nextimage_", $codec, "_", $role, "_", $direction),
            destroy: concat!("nextimage_", $codec, "_", $role, "_destroy"),
            alloc: concat!("nextimage_", $codec, "_", $direction, "_alloc"),
            into: concat!("nextimage_", $codec, "_", $direction, "_into"),
        }
    };
}

/// A stand-in command family.
trait CommandCodec: 'static {
    const SYMBOLS: CommandSymbols;
    type Options: Copy + 'static;
    /// What the command keeps from its options.
    type State;

    fn defaults() -> Self::Options;
    fn capture(options: &Self::Options) -> Self::State;
    fn run(state: &Self::State, input: &[u8]) -> Outcome<Vec<u8>>;
}

/// A stand-in instance family.
trait InstanceCodec: 'static {
    const SYMBOLS: InstanceSymbols;
    type Options: Copy + 'static;
    type Output;

    fn defaults() -> Self::Options;
    fn process(options: &Self::Options, input: &[u8]) -> Outcome<Self::Output>;
}

struct FakeObject<S> {
    state: S,
}

fn fail(status: NextImageStatus, message: &str) -> NextImageStatus {
    set_error(message);
    status
}

// Shared runtime functions

unsafe extern "C" fn free_buffer(buffer: *mut NextImageBuffer) {
    record("nextimage_free_buffer");
    clear_error();
    if buffer.is_null() {
        return;
    }

    // SAFETY: the caller passes a descriptor that is zeroed or filled by this library.
    unsafe {
        free_bytes((*buffer).data);
        *buffer = NextImageBuffer::zeroed();
    }
}

unsafe extern "C" fn free_decode_buffer(buffer: *mut NextImageDecodeBuffer) {
    record("nextimage_free_decode_buffer");
    clear_error();
    if buffer.is_null() {
        return;
    }

    // SAFETY: the caller passes a descriptor that is zeroed or filled by this library.
    unsafe {
        if (*buffer).owns_data != 0 {
            free_bytes((*buffer).data);
            free_bytes((*buffer).u_plane);
            free_bytes((*buffer).v_plane);
        }
        *buffer = NextImageDecodeBuffer::zeroed();
    }
}

unsafe extern "C" fn last_error_message() -> *const c_char {
    record("nextimage_last_error_message");
    error_ptr()
}

unsafe extern "C" fn clear_error_slot() {
    record("nextimage_clear_error");
    clear_error();
}

unsafe extern "C" fn version() -> *const c_char {
    record("nextimage_version");
    VERSION_C.as_ptr()
}

unsafe extern "C" fn allocation_counter() -> i64 {
    record("nextimage_allocation_counter");
    live_allocations() as i64
}

// Command families

unsafe extern "C" fn create_default_options<C: CommandCodec>() -> *mut C::Options {
    record(C::SYMBOLS.create_default_options);
    if null_defaults() {
        return core::ptr::null_mut();
    }
    alloc_object(C::defaults())
}

unsafe extern "C" fn free_options<C: CommandCodec>(options: *mut C::Options) {
    record(C::SYMBOLS.free_options);
    clear_error();
    // SAFETY: allocated by `create_default_options::<C>`.
    unsafe { free_object(options) };
}

unsafe extern "C" fn new_command<C: CommandCodec, H>(options: *const C::Options) -> *mut H {
    record(C::SYMBOLS.new_command);
    if let Some(message) = take_create_failure() {
        if let Some(message) = message {
            set_error(&message);
        }
        return core::ptr::null_mut();
    }

    // SAFETY: null or a valid options struct, per the constructor contract.
    let options = unsafe { options.as_ref() }.copied().unwrap_or_else(C::defaults);
    store_options(C::SYMBOLS.family, options);
    let state = C::capture(&options);
    alloc_object(FakeObject { state }).cast::<H>()
}

unsafe extern "C" fn run_command<C: CommandCodec, H>(
    command: *mut H,
    input: *const u8,
    input_size: usize,
    output: *mut NextImageBuffer,
) -> NextImageStatus {
    record(C::SYMBOLS.run_command);
    if command.is_null() || output.is_null() {
        return fail(NEXTIMAGE_ERROR_INVALID_PARAM, "invalid command or output");
    }
    if input.is_null() || input_size == 0 {
        return fail(NEXTIMAGE_ERROR_INVALID_PARAM, "empty input");
    }

    if let Some(failure) = take_failure() {
        if failure.partial {
            // SAFETY: checked non-null above and provided writable by the caller.
            unsafe { write_partial_encoded(output) };
        }
        return failure_status(&failure);
    }

    // SAFETY: created by `new_command::<C, H>` and still alive per the caller contract.
    let object = unsafe { &*command.cast::<FakeObject<C::State>>() };
    // SAFETY: the caller passes `input_size` readable bytes.
    let input = unsafe { core::slice::from_raw_parts(input, input_size) };
    match C::run(&object.state, input) {
        // SAFETY: checked non-null above.
        Ok(bytes) => unsafe { write_encoded(output, &bytes) },
        Err((status, message)) => fail(status, message),
    }
}

unsafe extern "C" fn free_command<C: CommandCodec, H>(command: *mut H) {
    record(C::SYMBOLS.free_command);
    clear_error();
    // SAFETY: created by `new_command::<C, H>`.
    unsafe { free_object(command.cast::<FakeObject<C::State>>()) };
}

unsafe fn write_partial_encoded(output: *mut NextImageBuffer) {
    // SAFETY: forwarded to the caller.
    unsafe {
        *output = NextImageBuffer {
            data: alloc_bytes(vec![0xCD; 24]),
            size: 24,
        }
    };
}

fn failure_status(failure: &Failure) -> NextImageStatus {
    if let Some(message) = &failure.message {
        set_error(message);
    }
    failure.status
}

const fn command_fns<C: CommandCodec, H>() -> CommandFns<C::Options, H> {
    CommandFns {
        create_default_options: create_default_options::<C>,
        free_options: free_options::<C>,
        new_command: new_command::<C, H>,
        run_command: run_command::<C, H>,
        free_command: free_command::<C, H>,
    }
}

// Instance families

unsafe extern "C" fn default_instance_options<I: InstanceCodec>(options: *mut I::Options) {
    record(I::SYMBOLS.default_options);
    if !options.is_null() {
        // SAFETY: writable storage provided by the caller.
        unsafe { options.write(I::defaults()) };
    }
}

unsafe extern "C" fn create_instance<I: InstanceCodec, H>(options: *const I::Options) -> *mut H {
    record(I::SYMBOLS.create);
    if let Some(message) = take_create_failure() {
        if let Some(message) = message {
            set_error(&message);
        }
        return core::ptr::null_mut();
    }

    // SAFETY: null or a valid options struct, per the constructor contract.
    let options = unsafe { options.as_ref() }.copied().unwrap_or_else(I::defaults);
    store_options(I::SYMBOLS.family, options);
    alloc_object(FakeObject { state: options }).cast::<H>()
}

unsafe extern "C" fn destroy_instance<I: InstanceCodec, H>(instance: *mut H) {
    record(I::SYMBOLS.destroy);
    clear_error();
    // SAFETY: created by `create_instance::<I, H>`.
    unsafe { free_object(instance.cast::<FakeObject<I::Options>>()) };
}

/// Shared prologue of `encode`/`decode`: argument checks, failure injection and input access.
///
/// # Safety
///
/// Same contract as the native process function.
unsafe fn process_input<'a, I: InstanceCodec, H>(
    instance: *mut H,
    input: *const u8,
    input_size: usize,
    output_is_null: bool,
) -> Result<(&'a I::Options, &'a [u8]), (NextImageStatus, Option<Failure>)> {
    record(I::SYMBOLS.process);
    if instance.is_null() || output_is_null {
        return Err((
            fail(NEXTIMAGE_ERROR_INVALID_PARAM, "invalid instance or output"),
            None,
        ));
    }
    if input.is_null() || input_size == 0 {
        return Err((fail(NEXTIMAGE_ERROR_INVALID_PARAM, "empty input"), None));
    }
    if let Some(failure) = take_failure() {
        return Err((failure_status(&failure), Some(failure)));
    }

    // SAFETY: created by `create_instance::<I, H>` and alive per the caller contract.
    let object = unsafe { &*instance.cast::<FakeObject<I::Options>>() };
    // SAFETY: the caller passes `input_size` readable bytes.
    let input = unsafe { core::slice::from_raw_parts(input, input_size) };
    Ok((&object.state, input))
}

unsafe extern "C" fn encode<I: InstanceCodec<Output = Vec<u8>>, H>(
    instance: *mut H,
    input: *const u8,
    input_size: usize,
    output: *mut NextImageBuffer,
) -> NextImageStatus {
    // SAFETY: forwarded to the caller.
    match unsafe { process_input::<I, H>(instance, input, input_size, output.is_null()) } {
        Ok((options, input)) => match I::process(options, input) {
            // SAFETY: checked non-null in `process_input`.
            Ok(bytes) => unsafe { write_encoded(output, &bytes) },
            Err((status, message)) => fail(status, message),
        },
        Err((status, failure)) => {
            if failure.is_some_and(|failure| failure.partial) {
                // SAFETY: checked non-null in `process_input`.
                unsafe { write_partial_encoded(output) };
            }
            status
        }
    }
}

unsafe extern "C" fn decode<I: InstanceCodec<Output = DecodedShape>, H>(
    instance: *mut H,
    input: *const u8,
    input_size: usize,
    output: *mut NextImageDecodeBuffer,
) -> NextImageStatus {
    // SAFETY: forwarded to the caller.
    match unsafe { process_input::<I, H>(instance, input, input_size, output.is_null()) } {
        Ok((options, input)) => match I::process(options, input) {
            // SAFETY: checked non-null in `process_input`.
            Ok(shape) => unsafe {
                write_decoded(output, shape.width, shape.height, shape.format, shape.bit_depth)
            },
            Err((status, message)) => fail(status, message),
        },
        Err((status, failure)) => {
            if failure.is_some_and(|failure| failure.partial) {
                // SAFETY: checked non-null in `process_input`.
                unsafe { write_partial_decoded(output) };
            }
            status
        }
    }
}

const fn encoder_fns<I: InstanceCodec<Output = Vec<u8>>, H>() -> InstanceFns<I::Options, H, NextImageBuffer> {
    InstanceFns {
        default_options: default_instance_options::<I>,
        create: create_instance::<I, H>,
        process: encode::<I, H>,
        destroy: destroy_instance::<I, H>,
    }
}

const fn decoder_fns<I: InstanceCodec<Output = DecodedShape>, H>(
) -> InstanceFns<I::Options, H, NextImageDecodeBuffer> {
    InstanceFns {
        default_options: default_instance_options::<I>,
        create: create_instance::<I, H>,
        process: decode::<I, H>,
        destroy: destroy_instance::<I, H>,
    }
}

// One-shot functions

/// Shared prologue of the one-shot functions: argument checks, failure injection and input
/// access.
///
/// # Safety
///
/// Same contract as the native one-shot functions.
unsafe fn one_shot_input<'a>(
    symbol: &'static str,
    input: *const u8,
    input_size: usize,
    output_is_null: bool,
) -> Result<&'a [u8], (NextImageStatus, Option<Failure>)> {
    record(symbol);
    if output_is_null {
        return Err((fail(NEXTIMAGE_ERROR_INVALID_PARAM, "invalid output"), None));
    }
    if input.is_null() || input_size == 0 {
        return Err((fail(NEXTIMAGE_ERROR_INVALID_PARAM, "empty input"), None));
    }
    if let Some(failure) = take_failure() {
        return Err((failure_status(&failure), Some(failure)));
    }

    // SAFETY: the caller passes `input_size` readable bytes.
    Ok(unsafe { core::slice::from_raw_parts(input, input_size) })
}

/// Resolves the options of a one-shot call and keeps them for inspection under `symbol`.
///
/// # Safety
///
/// `options` is null or points to a valid options struct.
unsafe fn one_shot_options<O: Copy + 'static>(
    symbol: &'static str,
    options: *const O,
    defaults: fn() -> O,
) -> O {
    // SAFETY: guaranteed by the caller.
    let options = unsafe { options.as_ref() }.copied().unwrap_or_else(defaults);
    store_options(symbol, options);
    options
}

/// Encodes into a library-allocated buffer.
///
/// # Safety
///
/// Same contract as the native one-shot functions.
unsafe fn encode_with<O: Copy + 'static>(
    symbol: &'static str,
    (input, input_size): (*const u8, usize),
    options: *const O,
    defaults: fn() -> O,
    codec: fn(&O, &[u8]) -> Outcome<Vec<u8>>,
    output: *mut NextImageBuffer,
) -> NextImageStatus {
    // SAFETY: forwarded to the caller.
    match unsafe { one_shot_input(symbol, input, input_size, output.is_null()) } {
        Ok(input) => {
            // SAFETY: forwarded to the caller.
            let options = unsafe { one_shot_options(symbol, options, defaults) };
            match codec(&options, input) {
                // SAFETY: checked non-null in `one_shot_input`.
                Ok(bytes) => unsafe { write_encoded(output, &bytes) },
                Err((status, message)) => fail(status, message),
            }
        }
        Err((status, failure)) => {
            if failure.is_some_and(|failure| failure.partial) {
                // SAFETY: checked non-null in `one_shot_input`.
                unsafe { write_partial_encoded(output) };
            }
            status
        }
    }
}

unsafe extern "C" fn encode_alloc<I: InstanceCodec<Output = Vec<u8>>>(
    input: *const u8,
    input_size: usize,
    options: *const I::Options,
    output: *mut NextImageBuffer,
) -> NextImageStatus {
    // SAFETY: forwarded to the caller.
    unsafe {
        encode_with(
            I::SYMBOLS.alloc,
            (input, input_size),
            options,
            I::defaults,
            I::process,
            output,
        )
    }
}

unsafe extern "C" fn gif2webp_alloc(
    input: *const u8,
    input_size: usize,
    options: *const NextImageWebPEncodeOptions,
    output: *mut NextImageBuffer,
) -> NextImageStatus {
    // SAFETY: forwarded to the caller.
    unsafe {
        encode_with(
            "nextimage_gif2webp_alloc",
            (input, input_size),
            options,
            WebpEncoder::defaults,
            codecs::gif_encode,
            output,
        )
    }
}

unsafe extern "C" fn webp2gif_alloc(
    input: *const u8,
    input_size: usize,
    output: *mut NextImageBuffer,
) -> NextImageStatus {
    // SAFETY: forwarded to the caller.
    unsafe {
        encode_with(
            "nextimage_webp2gif_alloc",
            (input, input_size),
            core::ptr::null::<WebP2GifOptions>(),
            WebP2Gif::defaults,
            codecs::webp2gif,
            output,
        )
    }
}

unsafe extern "C" fn decode_alloc<I: InstanceCodec<Output = DecodedShape>>(
    input: *const u8,
    input_size: usize,
    options: *const I::Options,
    output: *mut NextImageDecodeBuffer,
) -> NextImageStatus {
    // SAFETY: forwarded to the caller.
    match unsafe { one_shot_input(I::SYMBOLS.alloc, input, input_size, output.is_null()) } {
        Ok(input) => {
            // SAFETY: forwarded to the caller.
            let options = unsafe { one_shot_options(I::SYMBOLS.alloc, options, I::defaults) };
            match I::process(&options, input) {
                // SAFETY: checked non-null in `one_shot_input`.
                Ok(shape) => unsafe {
                    write_decoded(output, shape.width, shape.height, shape.format, shape.bit_depth)
                },
                Err((status, message)) => fail(status, message),
            }
        }
        Err((status, failure)) => {
            if failure.is_some_and(|failure| failure.partial) {
                // SAFETY: checked non-null in `one_shot_input`.
                unsafe { write_partial_decoded(output) };
            }
            status
        }
    }
}

/// Decodes into the caller's `data`/`data_capacity`, which must fit `stride * height` bytes.
unsafe extern "C" fn decode_into<I: InstanceCodec<Output = DecodedShape>>(
    input: *const u8,
    input_size: usize,
    options: *const I::Options,
    buffer: *mut NextImageDecodeBuffer,
) -> NextImageStatus {
    // SAFETY: forwarded to the caller.
    let input = match unsafe { one_shot_input(I::SYMBOLS.into, input, input_size, buffer.is_null()) } {
        Ok(input) => input,
        Err((status, _)) => return status,
    };
    // SAFETY: checked non-null in `one_shot_input`; the caller owns the descriptor.
    let buffer = unsafe { &mut *buffer };
    if buffer.data.is_null() || buffer.data_capacity == 0 {
        return fail(NEXTIMAGE_ERROR_INVALID_PARAM, "invalid buffer");
    }

    // SAFETY: forwarded to the caller.
    let options = unsafe { one_shot_options(I::SYMBOLS.into, options, I::defaults) };
    let shape = match I::process(&options, input) {
        Ok(shape) => shape,
        Err((status, message)) => return fail(status, message),
    };
    if is_planar(shape.format) {
        return fail(
            NEXTIMAGE_ERROR_UNSUPPORTED,
            "planar formats cannot be decoded into a caller buffer",
        );
    }

    let width = usize::try_from(shape.width).unwrap_or(0);
    let height = usize::try_from(shape.height).unwrap_or(0);
    let stride = row_bytes(width, shape.format, shape.bit_depth);
    let required = stride * height;
    if buffer.data_capacity < required {
        set_error(&format!(
            "buffer too small: need {required} bytes, have {} bytes",
            buffer.data_capacity
        ));
        return NEXTIMAGE_ERROR_BUFFER_TOO_SMALL;
    }

    // SAFETY: the caller's buffer holds `data_capacity >= required` writable bytes.
    unsafe { core::ptr::write_bytes(buffer.data, 0x5A, required) };
    buffer.data_size = required;
    buffer.stride = stride;
    buffer.width = shape.width;
    buffer.height = shape.height;
    buffer.bit_depth = shape.bit_depth;
    buffer.format = shape.format;
    NEXTIMAGE_OK
}

/// Shared body of the size queries; the required size assumes 8-bit RGBA.
///
/// # Safety
///
/// Every non-null out-pointer must be valid for writes.
unsafe fn decode_size_with(
    symbol: &'static str,
    (input, input_size): (*const u8, usize),
    (width, height, bit_depth): (*mut c_int, *mut c_int, *mut c_int),
    required_size: *mut usize,
    codec: fn(&[u8]) -> Outcome<(u32, u32, u8)>,
) -> NextImageStatus {
    let outputs_missing = width.is_null() || height.is_null() || required_size.is_null();
    // SAFETY: forwarded to the caller.
    let input = match unsafe { one_shot_input(symbol, input, input_size, outputs_missing) } {
        Ok(input) => input,
        Err((status, _)) => return status,
    };

    let (w, h, depth) = match codec(input) {
        Ok(size) => size,
        Err((status, message)) => return fail(status, message),
    };
    // SAFETY: checked non-null above, or skipped when null.
    unsafe {
        *width = i32::try_from(w).unwrap_or(i32::MAX);
        *height = i32::try_from(h).unwrap_or(i32::MAX);
        *required_size = w as usize * h as usize * 4;
        if !bit_depth.is_null() {
            *bit_depth = c_int::from(depth);
        }
    }
    NEXTIMAGE_OK
}

unsafe extern "C" fn webp_decode_size(
    input: *const u8,
    input_size: usize,
    width: *mut c_int,
    height: *mut c_int,
    required_size: *mut usize,
) -> NextImageStatus {
    // SAFETY: forwarded to the caller.
    unsafe {
        decode_size_with(
            "nextimage_webp_decode_size",
            (input, input_size),
            (width, height, core::ptr::null_mut()),
            required_size,
            codecs::webp_size,
        )
    }
}

unsafe extern "C" fn avif_decode_size(
    input: *const u8,
    input_size: usize,
    width: *mut c_int,
    height: *mut c_int,
    bit_depth: *mut c_int,
    required_size: *mut usize,
) -> NextImageStatus {
    if bit_depth.is_null() {
        record("nextimage_avif_decode_size");
        return fail(NEXTIMAGE_ERROR_INVALID_PARAM, "invalid output");
    }
    // SAFETY: forwarded to the caller.
    unsafe {
        decode_size_with(
            "nextimage_avif_decode_size",
            (input, input_size),
            (width, height, bit_depth),
            required_size,
            codecs::avif_size,
        )
    }
}

// Families

fn cwebp_defaults() -> CWebPOptions {
    CWebPOptions {
        quality: 75.0,
        lossless: 0,
        method: 4,
        preset: -1,
        image_hint: CWEBP_HINT_DEFAULT,
        lossless_preset: -1,
        target_size: 0,
        target_psnr: 0.0,
        segments: 4,
        sns_strength: 50,
        filter_strength: 60,
        filter_sharpness: 0,
        filter_type: 1,
        autofilter: 0,
        alpha_compression: 1,
        alpha_filtering: 1,
        alpha_quality: 100,
        pass: 1,
        show_compressed: 0,
        preprocessing: 0,
        partitions: 0,
        partition_limit: 0,
        emulate_jpeg_size: 0,
        thread_level: 0,
        low_memory: 0,
        near_lossless: -1,
        exact: 0,
        use_delta_palette: 0,
        use_sharp_yuv: 0,
        qmin: 0,
        qmax: 100,
        keep_metadata: -1,
        crop_x: -1,
        crop_y: -1,
        crop_width: -1,
        crop_height: -1,
        resize_width: -1,
        resize_height: -1,
        resize_mode: 0,
        blend_alpha: 0xFFFF_FFFF,
        noalpha: 0,
        allow_mixed: 0,
        minimize_size: 0,
        kmin: -1,
        kmax: -1,
        anim_loop_count: 0,
        loop_compatibility: 0,
    }
}

struct Cwebp;

impl CommandCodec for Cwebp {
    const SYMBOLS: CommandSymbols = command_symbols!("cwebp");
    type Options = CWebPOptions;
    type State = CWebPOptions;

    fn defaults() -> CWebPOptions {
        cwebp_defaults()
    }

    fn capture(options: &CWebPOptions) -> CWebPOptions {
        *options
    }

    fn run(state: &CWebPOptions, input: &[u8]) -> Outcome<Vec<u8>> {
        codecs::cwebp(state, input)
    }
}

struct Dwebp;

impl CommandCodec for Dwebp {
    const SYMBOLS: CommandSymbols = command_symbols!("dwebp");
    type Options = DWebPOptions;
    type State = DWebPOptions;

    fn defaults() -> DWebPOptions {
        DWebPOptions {
            use_threads: 0,
            bypass_filtering: 0,
            no_fancy_upsampling: 0,
            format: NEXTIMAGE_FORMAT_RGBA,
            no_dither: 0,
            dither_strength: 50,
            alpha_dither: 0,
            crop_x: 0,
            crop_y: 0,
            crop_width: 0,
            crop_height: 0,
            use_crop: 0,
            resize_width: 0,
            resize_height: 0,
            use_resize: 0,
            flip: 0,
            alpha_only: 0,
            incremental: 0,
        }
    }

    fn capture(options: &DWebPOptions) -> DWebPOptions {
        *options
    }

    fn run(state: &DWebPOptions, input: &[u8]) -> Outcome<Vec<u8>> {
        codecs::dwebp(state, input)
    }
}

struct Gif2Webp;

impl CommandCodec for Gif2Webp {
    const SYMBOLS: CommandSymbols = command_symbols!("gif2webp");
    type Options = Gif2WebPOptions;
    type State = Gif2WebPOptions;

    fn defaults() -> Gif2WebPOptions {
        cwebp_defaults()
    }

    fn capture(options: &Gif2WebPOptions) -> Gif2WebPOptions {
        *options
    }

    fn run(state: &Gif2WebPOptions, input: &[u8]) -> Outcome<Vec<u8>> {
        codecs::gif2webp(state, input)
    }
}

struct WebP2Gif;

impl CommandCodec for WebP2Gif {
    const SYMBOLS: CommandSymbols = command_symbols!("webp2gif");
    type Options = WebP2GifOptions;
    type State = WebP2GifOptions;

    fn defaults() -> WebP2GifOptions {
        WebP2GifOptions { reserved: 0 }
    }

    fn capture(options: &WebP2GifOptions) -> WebP2GifOptions {
        *options
    }

    fn run(state: &WebP2GifOptions, input: &[u8]) -> Outcome<Vec<u8>> {
        codecs::webp2gif(state, input)
    }
}

struct Avifenc;

impl CommandCodec for Avifenc {
    const SYMBOLS: CommandSymbols = command_symbols!("avifenc");
    type Options = AVIFEncOptions;
    type State = (AVIFEncOptions, AvifMetadata);

    fn defaults() -> AVIFEncOptions {
        AVIFEncOptions {
            quality: 60,
            quality_alpha: -1,
            speed: 6,
            min_quantizer: -1,
            max_quantizer: -1,
            min_quantizer_alpha: -1,
            max_quantizer_alpha: -1,
            bit_depth: 8,
            yuv_format: 0,
            yuv_range: 1,
            enable_alpha: 1,
            premultiply_alpha: 0,
            tile_rows_log2: 0,
            tile_cols_log2: 0,
            color_primaries: 1,
            transfer_characteristics: 13,
            matrix_coefficients: 6,
            sharp_yuv: 0,
            target_size: 0,
            exif_data: core::ptr::null(),
            exif_size: 0,
            xmp_data: core::ptr::null(),
            xmp_size: 0,
            icc_data: core::ptr::null(),
            icc_size: 0,
            irot_angle: -1,
            imir_axis: -1,
            pasp: [-1; 2],
            crop: [-1; 4],
            clap: [-1; 8],
            clli_max_cll: -1,
            clli_max_pall: -1,
            timescale: 30,
            keyframe_interval: 0,
        }
    }

    fn capture(options: &AVIFEncOptions) -> (AVIFEncOptions, AvifMetadata) {
        let metadata = AvifMetadata::capture(options);
        let mut options = *options;
        (options.exif_data, options.xmp_data, options.icc_data) =
            (core::ptr::null(), core::ptr::null(), core::ptr::null());
        (options, metadata)
    }

    fn run((options, metadata): &(AVIFEncOptions, AvifMetadata), input: &[u8]) -> Outcome<Vec<u8>> {
        codecs::avifenc(options, metadata, input)
    }
}

struct Avifdec;

impl CommandCodec for Avifdec {
    const SYMBOLS: CommandSymbols = command_symbols!("avifdec");
    type Options = AVIFDecOptions;
    type State = AVIFDecOptions;

    fn defaults() -> AVIFDecOptions {
        AVIFDecOptions {
            output_format: AVIFDEC_OUTPUT_PNG,
            jpeg_quality: 90,
            use_threads: 0,
            format: NEXTIMAGE_FORMAT_RGBA,
            ignore_exif: 0,
            ignore_xmp: 0,
            ignore_icc: 0,
            image_size_limit: 268_435_456,
            image_dimension_limit: 32_768,
            strict_flags: 1,
            chroma_upsampling: 0,
        }
    }

    fn capture(options: &AVIFDecOptions) -> AVIFDecOptions {
        *options
    }

    fn run(state: &AVIFDecOptions, input: &[u8]) -> Outcome<Vec<u8>> {
        codecs::avifdec(state, input)
    }
}

struct WebpEncoder;

impl InstanceCodec for WebpEncoder {
    const SYMBOLS: InstanceSymbols = instance_symbols!("webp", "encoder", "encode");
    type Options = NextImageWebPEncodeOptions;
    type Output = Vec<u8>;

    fn defaults() -> NextImageWebPEncodeOptions {
        NextImageWebPEncodeOptions {
            quality: 75.0,
            lossless: 0,
            method: 4,
            target_size: 0,
            target_psnr: 0.0,
            exact: 0,
            alpha_compression: 1,
            alpha_quality: 100,
            pass: 1,
            preprocessing: 0,
            partitions: 0,
            partition_limit: 0,
        }
    }

    fn process(options: &NextImageWebPEncodeOptions, input: &[u8]) -> Outcome<Vec<u8>> {
        codecs::webp_encode(options, input)
    }
}

struct WebpDecoder;

impl InstanceCodec for WebpDecoder {
    const SYMBOLS: InstanceSymbols = instance_symbols!("webp", "decoder", "decode");
    type Options = NextImageWebPDecodeOptions;
    type Output = DecodedShape;

    fn defaults() -> NextImageWebPDecodeOptions {
        NextImageWebPDecodeOptions {
            use_threads: 0,
            bypass_filtering: 0,
            no_fancy_upsampling: 0,
            format: NEXTIMAGE_FORMAT_RGBA,
        }
    }

    fn process(options: &NextImageWebPDecodeOptions, input: &[u8]) -> Outcome<DecodedShape> {
        codecs::webp_decode(options, input)
    }
}

struct AvifEncoder;

impl InstanceCodec for AvifEncoder {
    const SYMBOLS: InstanceSymbols = instance_symbols!("avif", "encoder", "encode");
    type Options = NextImageAVIFEncodeOptions;
    type Output = Vec<u8>;

    fn defaults() -> NextImageAVIFEncodeOptions {
        NextImageAVIFEncodeOptions {
            quality: 50,
            speed: 6,
            min_quantizer: 0,
            max_quantizer: 63,
            min_quantizer_alpha: 0,
            max_quantizer_alpha: 63,
            enable_alpha: 1,
            bit_depth: 8,
            yuv_format: 2,
            tile_rows_log2: 0,
            tile_cols_log2: 0,
        }
    }

    fn process(options: &NextImageAVIFEncodeOptions, input: &[u8]) -> Outcome<Vec<u8>> {
        codecs::avif_encode(options, input)
    }
}

struct AvifDecoder;

impl InstanceCodec for AvifDecoder {
    const SYMBOLS: InstanceSymbols = instance_symbols!("avif", "decoder", "decode");
    type Options = NextImageAVIFDecodeOptions;
    type Output = DecodedShape;

    fn defaults() -> NextImageAVIFDecodeOptions {
        NextImageAVIFDecodeOptions {
            use_threads: 0,
            format: NEXTIMAGE_FORMAT_RGBA,
            ignore_exif: 0,
            ignore_xmp: 0,
        }
    }

    fn process(options: &NextImageAVIFDecodeOptions, input: &[u8]) -> Outcome<DecodedShape> {
        codecs::avif_decode(options, input)
    }
}

/// The stand-in library, shaped like the real `libnextimage`.
pub static LIBRARY: NativeLibrary = NativeLibrary {
    runtime: RuntimeFns {
        free_buffer,
        free_decode_buffer,
        last_error_message,
        clear_error: clear_error_slot,
        version,
        allocation_counter: Some(allocation_counter),
    },
    cwebp: command_fns::<Cwebp, CWebPCommand>(),
    dwebp: command_fns::<Dwebp, DWebPCommand>(),
    gif2webp: command_fns::<Gif2Webp, Gif2WebPCommand>(),
    webp2gif: command_fns::<WebP2Gif, WebP2GifCommand>(),
    avifenc: command_fns::<Avifenc, AVIFEncCommand>(),
    avifdec: command_fns::<Avifdec, AVIFDecCommand>(),
    webp_encoder: encoder_fns::<WebpEncoder, NextImageWebPEncoder>(),
    webp_decoder: decoder_fns::<WebpDecoder, NextImageWebPDecoder>(),
    avif_encoder: encoder_fns::<AvifEncoder, NextImageAVIFEncoder>(),
    avif_decoder: decoder_fns::<AvifDecoder, NextImageAVIFDecoder>(),
    webp: WebPFns {
        encode_alloc: encode_alloc::<WebpEncoder>,
        decode_alloc: decode_alloc::<WebpDecoder>,
        decode_into: decode_into::<WebpDecoder>,
        decode_size: webp_decode_size,
        gif2webp_alloc,
        webp2gif_alloc,
    },
    avif: AvifFns {
        encode_alloc: encode_alloc::<AvifEncoder>,
        decode_alloc: decode_alloc::<AvifDecoder>,
        decode_into: decode_into::<AvifDecoder>,
        decode_size: avif_decode_size,
    },
};
