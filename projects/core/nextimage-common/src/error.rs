//! Error types shared by every codec family.

use crate::status::NativeStatus;
use core::fmt;
use thiserror::Error;

/// Result type of the binding layer.
pub type Result<T> = core::result::Result<T, NextImageError>;

/// The codec family and action an error originated from, e.g. `cwebp run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    /// Codec family (`cwebp`, `avif encoder`, ...)
    pub family: &'static str,
    /// What was being done (`run`, `encode`, `new command`, ...)
    pub action: &'static str,
}

impl Operation {
    /// Create an operation label
    pub const fn new(family: &'static str, action: &'static str) -> Self {
        Self { family, action }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.action)
    }
}

/// Coarse classification of a [`NextImageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input was rejected before any native call was made.
    Validation,
    /// The native library reported a failure status.
    Native,
    /// The object was used after it was closed.
    ResourceState,
    /// A native constructor returned null.
    Allocation,
    /// The native library reported success but returned an unusable result.
    Output,
}

/// Errors that can occur when calling into the native library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NextImageError {
    /// The input data is empty. No native call was made.
    #[error("{operation}: input data is empty")]
    EmptyInput {
        /// Where the input was rejected
        operation: Operation,
    },

    /// The native library returned a failure status.
    #[error("{operation} failed with {status}: {message}")]
    Native {
        /// Failing operation
        operation: Operation,
        /// Status returned by the native call
        status: NativeStatus,
        /// Last error message of the native library, or the status fallback text
        message: String,
    },

    /// The object was already closed.
    #[error("{operation}: object is closed")]
    Closed {
        /// Operation attempted on the closed object
        operation: Operation,
    },

    /// A native constructor returned null.
    #[error("{operation}: native allocation failed: {message}")]
    Allocation {
        /// Failing constructor
        operation: Operation,
        /// Last error message of the native library, or a fixed description
        message: String,
    },

    /// A caller-supplied output buffer cannot hold the decoded image.
    #[error("{operation}: output buffer of {capacity} bytes is too small: {message}")]
    BufferTooSmall {
        /// Operation that needed the buffer
        operation: Operation,
        /// Size of the buffer that was passed
        capacity: usize,
        /// Last error message of the native library, or a fixed description
        message: String,
    },

    /// The call succeeded but the output descriptor was empty.
    #[error("{operation}: native library returned an empty output")]
    EmptyOutput {
        /// Operation that produced the output
        operation: Operation,
    },

    /// The call succeeded but the output descriptor held impossible values.
    #[error("{operation}: malformed output: {reason}")]
    MalformedOutput {
        /// Operation that produced the output
        operation: Operation,
        /// What was wrong
        reason: &'static str,
    },
}

impl NextImageError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput { .. } | Self::BufferTooSmall { .. } => ErrorKind::Validation,
            Self::Native { .. } => ErrorKind::Native,
            Self::Closed { .. } => ErrorKind::ResourceState,
            Self::Allocation { .. } => ErrorKind::Allocation,
            Self::EmptyOutput { .. } | Self::MalformedOutput { .. } => ErrorKind::Output,
        }
    }

    /// Operation the error originated from.
    pub fn operation(&self) -> Operation {
        match self {
            Self::EmptyInput { operation }
            | Self::Native { operation, .. }
            | Self::Closed { operation }
            | Self::Allocation { operation, .. }
            | Self::BufferTooSmall { operation, .. }
            | Self::EmptyOutput { operation }
            | Self::MalformedOutput { operation, .. } => *operation,
        }
    }

    /// Native status, for errors reported by the native library.
    ///
    /// [`NextImageError::BufferTooSmall`] reports [`NativeStatus::BufferTooSmall`] even when it
    /// was raised before any native call.
    pub fn status(&self) -> Option<NativeStatus> {
        match self {
            Self::Native { status, .. } => Some(*status),
            Self::BufferTooSmall { .. } => Some(NativeStatus::BufferTooSmall),
            _ => None,
        }
    }

    /// Returns `true` if this is the "object is closed" error.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}
