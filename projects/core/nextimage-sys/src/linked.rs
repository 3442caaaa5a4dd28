//! Symbols of the real `libnextimage`.

use crate::avif::*;
use crate::library::{AvifFns, CommandFns, InstanceFns, NativeLibrary, RuntimeFns, WebPFns};
use crate::types::{NextImageBuffer, NextImageDecodeBuffer, NextImageStatus};
use crate::webp::*;
use core::ffi::{c_char, c_int};

#[link(name = "nextimage")]
unsafe extern "C" {
    fn nextimage_free_buffer(buffer: *mut NextImageBuffer);
    fn nextimage_free_decode_buffer(buffer: *mut NextImageDecodeBuffer);
    fn nextimage_last_error_message() -> *const c_char;
    fn nextimage_clear_error();
    fn nextimage_version() -> *const c_char;
    #[cfg(feature = "debug-counters")]
    fn nextimage_allocation_counter() -> i64;

    fn cwebp_create_default_options() -> *mut CWebPOptions;
    fn cwebp_free_options(options: *mut CWebPOptions);
    fn cwebp_new_command(options: *const CWebPOptions) -> *mut CWebPCommand;
    fn cwebp_run_command(
        cmd: *mut CWebPCommand,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn cwebp_free_command(cmd: *mut CWebPCommand);

    fn dwebp_create_default_options() -> *mut DWebPOptions;
    fn dwebp_free_options(options: *mut DWebPOptions);
    fn dwebp_new_command(options: *const DWebPOptions) -> *mut DWebPCommand;
    fn dwebp_run_command(
        cmd: *mut DWebPCommand,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn dwebp_free_command(cmd: *mut DWebPCommand);

    fn gif2webp_create_default_options() -> *mut Gif2WebPOptions;
    fn gif2webp_free_options(options: *mut Gif2WebPOptions);
    fn gif2webp_new_command(options: *const Gif2WebPOptions) -> *mut Gif2WebPCommand;
    fn gif2webp_run_command(
        cmd: *mut Gif2WebPCommand,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn gif2webp_free_command(cmd: *mut Gif2WebPCommand);

    fn webp2gif_create_default_options() -> *mut WebP2GifOptions;
    fn webp2gif_free_options(options: *mut WebP2GifOptions);
    fn webp2gif_new_command(options: *const WebP2GifOptions) -> *mut WebP2GifCommand;
    fn webp2gif_run_command(
        cmd: *mut WebP2GifCommand,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn webp2gif_free_command(cmd: *mut WebP2GifCommand);

    fn avifenc_create_default_options() -> *mut AVIFEncOptions;
    fn avifenc_free_options(options: *mut AVIFEncOptions);
    fn avifenc_new_command(options: *const AVIFEncOptions) -> *mut AVIFEncCommand;
    fn avifenc_run_command(
        cmd: *mut AVIFEncCommand,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn avifenc_free_command(cmd: *mut AVIFEncCommand);

    fn avifdec_create_default_options() -> *mut AVIFDecOptions;
    fn avifdec_free_options(options: *mut AVIFDecOptions);
    fn avifdec_new_command(options: *const AVIFDecOptions) -> *mut AVIFDecCommand;
    fn avifdec_run_command(
        cmd: *mut AVIFDecCommand,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn avifdec_free_command(cmd: *mut AVIFDecCommand);

    fn nextimage_webp_default_encode_options(options: *mut NextImageWebPEncodeOptions);
    fn nextimage_webp_default_decode_options(options: *mut NextImageWebPDecodeOptions);
    fn nextimage_webp_encoder_create(
        options: *const NextImageWebPEncodeOptions,
    ) -> *mut NextImageWebPEncoder;
    fn nextimage_webp_encoder_encode(
        encoder: *mut NextImageWebPEncoder,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn nextimage_webp_encoder_destroy(encoder: *mut NextImageWebPEncoder);
    fn nextimage_webp_decoder_create(
        options: *const NextImageWebPDecodeOptions,
    ) -> *mut NextImageWebPDecoder;
    fn nextimage_webp_decoder_decode(
        decoder: *mut NextImageWebPDecoder,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageDecodeBuffer,
    ) -> NextImageStatus;
    fn nextimage_webp_decoder_destroy(decoder: *mut NextImageWebPDecoder);

    fn nextimage_avif_default_encode_options(options: *mut NextImageAVIFEncodeOptions);
    fn nextimage_avif_default_decode_options(options: *mut NextImageAVIFDecodeOptions);
    fn nextimage_avif_encoder_create(
        options: *const NextImageAVIFEncodeOptions,
    ) -> *mut NextImageAVIFEncoder;
    fn nextimage_avif_encoder_encode(
        encoder: *mut NextImageAVIFEncoder,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn nextimage_avif_encoder_destroy(encoder: *mut NextImageAVIFEncoder);
    fn nextimage_avif_decoder_create(
        options: *const NextImageAVIFDecodeOptions,
    ) -> *mut NextImageAVIFDecoder;
    fn nextimage_avif_decoder_decode(
        decoder: *mut NextImageAVIFDecoder,
        input: *const u8,
        input_size: usize,
        output: *mut NextImageDecodeBuffer,
    ) -> NextImageStatus;
    fn nextimage_avif_decoder_destroy(decoder: *mut NextImageAVIFDecoder);

    fn nextimage_webp_encode_alloc(
        input: *const u8,
        input_size: usize,
        options: *const NextImageWebPEncodeOptions,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn nextimage_webp_decode_alloc(
        input: *const u8,
        input_size: usize,
        options: *const NextImageWebPDecodeOptions,
        output: *mut NextImageDecodeBuffer,
    ) -> NextImageStatus;
    fn nextimage_webp_decode_into(
        input: *const u8,
        input_size: usize,
        options: *const NextImageWebPDecodeOptions,
        buffer: *mut NextImageDecodeBuffer,
    ) -> NextImageStatus;
    fn nextimage_webp_decode_size(
        input: *const u8,
        input_size: usize,
        width: *mut c_int,
        height: *mut c_int,
        required_size: *mut usize,
    ) -> NextImageStatus;
    fn nextimage_gif2webp_alloc(
        input: *const u8,
        input_size: usize,
        options: *const NextImageWebPEncodeOptions,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn nextimage_webp2gif_alloc(
        input: *const u8,
        input_size: usize,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;

    fn nextimage_avif_encode_alloc(
        input: *const u8,
        input_size: usize,
        options: *const NextImageAVIFEncodeOptions,
        output: *mut NextImageBuffer,
    ) -> NextImageStatus;
    fn nextimage_avif_decode_alloc(
        input: *const u8,
        input_size: usize,
        options: *const NextImageAVIFDecodeOptions,
        output: *mut NextImageDecodeBuffer,
    ) -> NextImageStatus;
    fn nextimage_avif_decode_into(
        input: *const u8,
        input_size: usize,
        options: *const NextImageAVIFDecodeOptions,
        buffer: *mut NextImageDecodeBuffer,
    ) -> NextImageStatus;
    fn nextimage_avif_decode_size(
        input: *const u8,
        input_size: usize,
        width: *mut c_int,
        height: *mut c_int,
        bit_depth: *mut c_int,
        required_size: *mut usize,
    ) -> NextImageStatus;
}

/// Function table of the `libnextimage` this crate was linked against.
pub static LINKED: NativeLibrary = NativeLibrary {
    runtime: RuntimeFns {
        free_buffer: nextimage_free_buffer,
        free_decode_buffer: nextimage_free_decode_buffer,
        last_error_message: nextimage_last_error_message,
        clear_error: nextimage_clear_error,
        version: nextimage_version,
        #[cfg(feature = "debug-counters")]
        allocation_counter: Some(nextimage_allocation_counter),
        #[cfg(not(feature = "debug-counters"))]
        allocation_counter: None,
    },
    cwebp: CommandFns {
        create_default_options: cwebp_create_default_options,
        free_options: cwebp_free_options,
        new_command: cwebp_new_command,
        run_command: cwebp_run_command,
        free_command: cwebp_free_command,
    },
    dwebp: CommandFns {
        create_default_options: dwebp_create_default_options,
        free_options: dwebp_free_options,
        new_command: dwebp_new_command,
        run_command: dwebp_run_command,
        free_command: dwebp_free_command,
    },
    gif2webp: CommandFns {
        create_default_options: gif2webp_create_default_options,
        free_options: gif2webp_free_options,
        new_command: gif2webp_new_command,
        run_command: gif2webp_run_command,
        free_command: gif2webp_free_command,
    },
    webp2gif: CommandFns {
        create_default_options: webp2gif_create_default_options,
        free_options: webp2gif_free_options,
        new_command: webp2gif_new_command,
        run_command: webp2gif_run_command,
        free_command: webp2gif_free_command,
    },
    avifenc: CommandFns {
        create_default_options: avifenc_create_default_options,
        free_options: avifenc_free_options,
        new_command: avifenc_new_command,
        run_command: avifenc_run_command,
        free_command: avifenc_free_command,
    },
    avifdec: CommandFns {
        create_default_options: avifdec_create_default_options,
        free_options: avifdec_free_options,
        new_command: avifdec_new_command,
        run_command: avifdec_run_command,
        free_command: avifdec_free_command,
    },
    webp_encoder: InstanceFns {
        default_options: nextimage_webp_default_encode_options,
        create: nextimage_webp_encoder_create,
        process: nextimage_webp_encoder_encode,
        destroy: nextimage_webp_encoder_destroy,
    },
    webp_decoder: InstanceFns {
        default_options: nextimage_webp_default_decode_options,
        create: nextimage_webp_decoder_create,
        process: nextimage_webp_decoder_decode,
        destroy: nextimage_webp_decoder_destroy,
    },
    avif_encoder: InstanceFns {
        default_options: nextimage_avif_default_encode_options,
        create: nextimage_avif_encoder_create,
        process: nextimage_avif_encoder_encode,
        destroy: nextimage_avif_encoder_destroy,
    },
    avif_decoder: InstanceFns {
        default_options: nextimage_avif_default_decode_options,
        create: nextimage_avif_decoder_create,
        process: nextimage_avif_decoder_decode,
        destroy: nextimage_avif_decoder_destroy,
    },
    webp: WebPFns {
        encode_alloc: nextimage_webp_encode_alloc,
        decode_alloc: nextimage_webp_decode_alloc,
        decode_into: nextimage_webp_decode_into,
        decode_size: nextimage_webp_decode_size,
        gif2webp_alloc: nextimage_gif2webp_alloc,
        webp2gif_alloc: nextimage_webp2gif_alloc,
    },
    avif: AvifFns {
        encode_alloc: nextimage_avif_encode_alloc,
        decode_alloc: nextimage_avif_decode_alloc,
        decode_into: nextimage_avif_decode_into,
        decode_size: nextimage_avif_decode_size,
    },
};
