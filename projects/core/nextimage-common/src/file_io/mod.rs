//! File-based conversions for commands and instances.
//!
//! Inputs are memory-mapped with `lightweight-mmap` and handed to the native library without an
//! intermediate copy. Outputs are written through a preallocated memory-mapped file of exactly
//! the converted size. Output directories must exist.

mod error;
pub use error::*;

use crate::buffer::{DecodedImage, DecodedPixels, EncodedBytes};
use crate::command::{Command, CommandFamily};
use crate::error::{NextImageError, Operation};
use crate::instance::{Instance, InstanceFamily};
use lightweight_mmap::handles::*;
use lightweight_mmap::mmap::*;
use std::io::{Read, Write};
use std::path::Path;

/// Memory-maps `path` and passes its contents to `convert`.
///
/// Empty files are rejected as [`NextImageError::EmptyInput`] before mapping.
fn with_mapped_input<T>(
    path: &Path,
    operation: Operation,
    convert: impl FnOnce(&[u8]) -> crate::Result<T>,
) -> FileOperationResult<T> {
    let input_handle = ReadOnlyFileHandle::open(path).map_err(FileOperationError::open_input(path))?;
    let input_size = input_handle.size().map_err(FileOperationError::open_input(path))? as usize;
    if input_size == 0 {
        return Err(NextImageError::EmptyInput { operation }.into());
    }

    let input_mapping = ReadOnlyMmap::new(&input_handle, 0, input_size).map_err(FileOperationError::map(path))?;
    Ok(convert(input_mapping.as_slice())?)
}

/// Output file that is deleted on drop unless [`PendingOutput::finish`] was called.
///
/// A file that already existed at the path is never deleted.
struct PendingOutput<'a> {
    path: &'a Path,
    remove_on_drop: bool,
}

impl<'a> PendingOutput<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            remove_on_drop: !path.exists(),
        }
    }

    fn finish(mut self) {
        self.remove_on_drop = false;
    }
}

impl Drop for PendingOutput<'_> {
    fn drop(&mut self) {
        if self.remove_on_drop && std::fs::remove_file(self.path).is_ok() {
            tracing::debug!(path = %self.path.display(), "removed partial output file");
        }
    }
}

/// Writes `data` to a new file at `path` through a preallocated mapping.
///
/// A file created here is removed again if the write fails.
fn write_mapped_output(path: &Path, data: &[u8]) -> FileOperationResult<()> {
    let pending = PendingOutput::new(path);
    {
        let output_handle = ReadWriteFileHandle::create_preallocated(path, data.len() as i64)
            .map_err(FileOperationError::create_output(path))?;
        let mut output_mapping =
            ReadWriteMmap::new(&output_handle, 0, data.len()).map_err(FileOperationError::map(path))?;
        output_mapping.as_mut_slice().copy_from_slice(data);
    }
    pending.finish();
    Ok(())
}

impl<F: CommandFamily> Command<F> {
    /// Converts the file at `input_path` and writes the result to `output_path`.
    ///
    /// Returns the number of bytes written. Nothing is created at `output_path` when the
    /// conversion or the write fails.
    pub fn run_file(&mut self, input_path: &Path, output_path: &Path) -> FileOperationResult<usize> {
        let operation = Operation::new(F::NAME, "run");
        if self.is_closed() {
            return Err(NextImageError::Closed { operation }.into());
        }

        let output = with_mapped_input(input_path, operation, |input| self.run(input))?;
        write_mapped_output(output_path, &output)?;
        tracing::debug!(family = F::NAME, bytes = output.len(), "wrote converted file");
        Ok(output.len())
    }

    /// Reads `reader` to the end, converts it and writes the result to `writer`.
    ///
    /// Returns the number of bytes written.
    pub fn run_io<R: Read, W: Write>(&mut self, mut reader: R, mut writer: W) -> FileOperationResult<usize> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        let output = self.run(&input)?;
        writer.write_all(&output)?;
        Ok(output.len())
    }
}

impl<F: InstanceFamily<Output = EncodedBytes>> Instance<F> {
    /// Encodes the image file at `path`.
    pub fn encode_file(&mut self, path: &Path) -> FileOperationResult<Vec<u8>> {
        let operation = Operation::new(F::NAME, F::ACTION);
        if self.is_closed() {
            return Err(NextImageError::Closed { operation }.into());
        }

        with_mapped_input(path, operation, |input| self.encode(input))
    }
}

impl<F: InstanceFamily<Output = DecodedPixels>> Instance<F> {
    /// Decodes the image file at `path`.
    pub fn decode_file(&mut self, path: &Path) -> FileOperationResult<DecodedImage> {
        let operation = Operation::new(F::NAME, F::ACTION);
        if self.is_closed() {
            return Err(NextImageError::Closed { operation }.into());
        }

        with_mapped_input(path, operation, |input| self.decode(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use tempfile::{Builder, NamedTempFile, TempDir};

    fn input_file(data: &[u8]) -> NamedTempFile {
        let file = Builder::new()
            .prefix("nextimage_input_")
            .tempfile()
            .expect("Failed to create temp file");
        std::fs::write(file.path(), data).expect("Failed to write input data");
        file
    }

    fn command() -> Command<FakeCwebp> {
        let runtime = runtime();
        let options = Command::<FakeCwebp>::default_options(&runtime);
        Command::new(&runtime, &options).unwrap()
    }

    #[test]
    fn test_run_file_matches_in_memory_run() {
        let png = fake::png_header(32, 16);
        let input = input_file(&png);
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("out.webp");
        let mut command = command();

        let written = command.run_file(input.path(), &output_path).unwrap();

        let expected = command.run(&png).unwrap();
        assert_eq!(written, expected.len());
        assert_eq!(std::fs::read(&output_path).unwrap(), expected);
    }

    #[test]
    fn test_run_file_rejects_empty_file_without_native_call() {
        let input = input_file(&[]);
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("out.webp");
        let mut command = command();
        let before = fake::total_calls();

        let error = command.run_file(input.path(), &output_path).unwrap_err();

        assert_eq!(error.codec_error().map(NextImageError::kind), Some(ErrorKind::Validation));
        assert_eq!(fake::total_calls(), before);
        assert!(!output_path.exists());
    }

    #[test]
    fn test_run_file_native_failure_writes_nothing() {
        let input = input_file(b"not an image at all");
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("out.webp");
        let mut command = command();

        let error = command.run_file(input.path(), &output_path).unwrap_err();

        assert_eq!(
            error.codec_error().and_then(NextImageError::status),
            Some(NativeStatus::Unsupported)
        );
        assert!(!output_path.exists());
    }

    #[test]
    fn test_run_file_missing_input_names_the_path() {
        let dir = TempDir::new().unwrap();
        let mut command = command();

        let error = command
            .run_file(&dir.path().join("missing.png"), &dir.path().join("out.webp"))
            .unwrap_err();

        assert!(matches!(error, FileOperationError::OpenInput { .. }));
        assert_eq!(error.path(), Some(dir.path().join("missing.png").as_path()));
        assert!(error.codec_error().is_none());
        assert!(error.to_string().starts_with("cannot open input"));
    }

    #[test]
    fn test_run_file_unwritable_output_leaves_nothing() {
        let input = input_file(&fake::png_header(8, 8));
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("missing_dir").join("out.webp");
        let mut command = command();

        let error = command.run_file(input.path(), &output_path).unwrap_err();

        assert!(matches!(error, FileOperationError::CreateOutput { .. }));
        assert_eq!(error.path(), Some(output_path.as_path()));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_unfinished_output_is_removed() {
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("out.webp");

        let pending = PendingOutput::new(&output_path);
        std::fs::write(&output_path, b"RIFF").unwrap();
        drop(pending);

        assert!(!output_path.exists());
    }

    #[test]
    fn test_finished_output_is_kept() {
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("out.webp");

        let pending = PendingOutput::new(&output_path);
        std::fs::write(&output_path, b"RIFF").unwrap();
        pending.finish();

        assert_eq!(std::fs::read(&output_path).unwrap(), b"RIFF");
    }

    #[test]
    fn test_existing_output_is_not_removed() {
        let existing = input_file(b"previous");

        drop(PendingOutput::new(existing.path()));

        assert_eq!(std::fs::read(existing.path()).unwrap(), b"previous");
    }

    #[test]
    fn test_run_io_read_failure_is_stream_error() {
        struct FailingReader;

        impl Read for FailingReader {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disconnected"))
            }
        }

        let mut command = command();
        let before = fake::total_calls();

        let error = command.run_io(FailingReader, Vec::new()).unwrap_err();

        assert!(matches!(error, FileOperationError::Stream(_)));
        assert_eq!(error.path(), None);
        assert_eq!(fake::total_calls(), before);
    }

    #[test]
    fn test_run_file_after_close() {
        let input = input_file(&fake::png_header(4, 4));
        let dir = TempDir::new().unwrap();
        let mut command = command();
        command.close();

        let error = command
            .run_file(input.path(), &dir.path().join("out.webp"))
            .unwrap_err();

        assert!(error.codec_error().is_some_and(NextImageError::is_closed));
    }

    #[test]
    fn test_run_io() {
        let png = fake::png_header(8, 8);
        let mut output = Vec::new();
        let mut command = command();

        let written = command.run_io(png.as_slice(), &mut output).unwrap();

        assert_eq!(written, output.len());
        assert_eq!(&output[0..4], b"RIFF");
    }

    #[test]
    fn test_encode_and_decode_file() {
        let runtime = runtime();
        let encode_options = Instance::<FakeWebpEncoder>::default_options(&runtime);
        let mut encoder = Instance::<FakeWebpEncoder>::new(&runtime, &encode_options).unwrap();
        let decode_options = Instance::<FakeWebpDecoder>::default_options(&runtime);
        let mut decoder = Instance::<FakeWebpDecoder>::new(&runtime, &decode_options).unwrap();

        let png = input_file(&fake::png_header(12, 6));
        let webp = encoder.encode_file(png.path()).unwrap();
        let webp_file = input_file(&webp);
        let image = decoder.decode_file(webp_file.path()).unwrap();

        assert_eq!((image.width, image.height), (12, 6));
        encoder.close();
        decoder.close();
        assert_eq!(fake::live_allocations(), 0);
    }
}
