//! Errors of the file-based conversions.

use crate::error::NextImageError;
use lightweight_mmap::handles::HandleOpenError;
use lightweight_mmap::mmap::MmapError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result of a file-based conversion.
pub type FileOperationResult<T> = Result<T, FileOperationError>;

/// A file-based conversion failed either around the files or inside the codec.
#[derive(Debug, Error)]
pub enum FileOperationError {
    /// The input file could not be opened or sized.
    #[error("cannot open input {}: {source}", path.display())]
    OpenInput {
        /// Input file
        path: PathBuf,
        /// Error of the file handle
        #[source]
        source: HandleOpenError,
    },

    /// A file was opened but could not be memory-mapped.
    #[error("cannot map {}: {source}", path.display())]
    Map {
        /// File that could not be mapped
        path: PathBuf,
        /// Error of the mapping
        #[source]
        source: MmapError,
    },

    /// The output file could not be created at the converted size.
    /// No partial file is left behind.
    #[error("cannot create output {}: {source}", path.display())]
    CreateOutput {
        /// Output file
        path: PathBuf,
        /// Error of the file handle
        #[source]
        source: HandleOpenError,
    },

    /// Reading from or writing to a caller's stream failed.
    #[error("stream I/O failed: {0}")]
    Stream(#[from] std::io::Error),

    /// The conversion itself failed.
    #[error(transparent)]
    Codec(#[from] NextImageError),
}

impl FileOperationError {
    /// The codec error, if the files were fine and the conversion failed.
    pub fn codec_error(&self) -> Option<&NextImageError> {
        match self {
            Self::Codec(error) => Some(error),
            _ => None,
        }
    }

    /// The file the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::OpenInput { path, .. } | Self::Map { path, .. } | Self::CreateOutput { path, .. } => Some(path),
            Self::Stream(_) | Self::Codec(_) => None,
        }
    }

    pub(super) fn open_input(path: &Path) -> impl FnOnce(HandleOpenError) -> Self + '_ {
        move |source| Self::OpenInput {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(super) fn create_output(path: &Path) -> impl FnOnce(HandleOpenError) -> Self + '_ {
        move |source| Self::CreateOutput {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(super) fn map(path: &Path) -> impl FnOnce(MmapError) -> Self + '_ {
        move |source| Self::Map {
            path: path.to_path_buf(),
            source,
        }
    }
}
