//! Native status codes.

use core::fmt;
use nextimage_sys::*;

/// Status reported by a native entry point.
///
/// Codes outside the documented set are preserved in [`NativeStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeStatus {
    /// Operation succeeded
    Ok,
    /// A parameter was rejected by the native library
    InvalidParam,
    /// The encoder failed
    EncodeFailed,
    /// The decoder failed
    DecodeFailed,
    /// A native allocation failed
    OutOfMemory,
    /// The operation or input format is not supported
    Unsupported,
    /// A caller supplied buffer was too small
    BufferTooSmall,
    /// A code the binding does not know about
    Unknown(i32),
}

impl NativeStatus {
    /// Interprets a raw status code.
    pub const fn from_raw(raw: NextImageStatus) -> Self {
        match raw {
            NEXTIMAGE_OK => Self::Ok,
            NEXTIMAGE_ERROR_INVALID_PARAM => Self::InvalidParam,
            NEXTIMAGE_ERROR_ENCODE_FAILED => Self::EncodeFailed,
            NEXTIMAGE_ERROR_DECODE_FAILED => Self::DecodeFailed,
            NEXTIMAGE_ERROR_OUT_OF_MEMORY => Self::OutOfMemory,
            NEXTIMAGE_ERROR_UNSUPPORTED => Self::Unsupported,
            NEXTIMAGE_ERROR_BUFFER_TOO_SMALL => Self::BufferTooSmall,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw status code.
    pub const fn to_raw(self) -> NextImageStatus {
        match self {
            Self::Ok => NEXTIMAGE_OK,
            Self::InvalidParam => NEXTIMAGE_ERROR_INVALID_PARAM,
            Self::EncodeFailed => NEXTIMAGE_ERROR_ENCODE_FAILED,
            Self::DecodeFailed => NEXTIMAGE_ERROR_DECODE_FAILED,
            Self::OutOfMemory => NEXTIMAGE_ERROR_OUT_OF_MEMORY,
            Self::Unsupported => NEXTIMAGE_ERROR_UNSUPPORTED,
            Self::BufferTooSmall => NEXTIMAGE_ERROR_BUFFER_TOO_SMALL,
            Self::Unknown(raw) => raw,
        }
    }

    /// Check if the status is successful
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Message used when the native error slot is empty.
    ///
    /// The returned string is a static string literal.
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::InvalidParam => "invalid parameter",
            Self::EncodeFailed => "encoding failed",
            Self::DecodeFailed => "decoding failed",
            Self::OutOfMemory => "out of memory",
            Self::Unsupported => "unsupported operation",
            Self::BufferTooSmall => "buffer too small",
            Self::Unknown(_) => "unknown error",
        }
    }
}

impl fmt::Display for NativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("NEXTIMAGE_OK"),
            Self::InvalidParam => f.write_str("NEXTIMAGE_ERROR_INVALID_PARAM"),
            Self::EncodeFailed => f.write_str("NEXTIMAGE_ERROR_ENCODE_FAILED"),
            Self::DecodeFailed => f.write_str("NEXTIMAGE_ERROR_DECODE_FAILED"),
            Self::OutOfMemory => f.write_str("NEXTIMAGE_ERROR_OUT_OF_MEMORY"),
            Self::Unsupported => f.write_str("NEXTIMAGE_ERROR_UNSUPPORTED"),
            Self::BufferTooSmall => f.write_str("NEXTIMAGE_ERROR_BUFFER_TOO_SMALL"),
            Self::Unknown(raw) => write!(f, "status {raw}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, NativeStatus::Ok, "success")]
    #[case(-1, NativeStatus::InvalidParam, "invalid parameter")]
    #[case(-2, NativeStatus::EncodeFailed, "encoding failed")]
    #[case(-3, NativeStatus::DecodeFailed, "decoding failed")]
    #[case(-4, NativeStatus::OutOfMemory, "out of memory")]
    #[case(-5, NativeStatus::Unsupported, "unsupported operation")]
    #[case(-6, NativeStatus::BufferTooSmall, "buffer too small")]
    fn test_known_codes(
        #[case] raw: i32,
        #[case] expected: NativeStatus,
        #[case] message: &str,
    ) {
        let status = NativeStatus::from_raw(raw);
        assert_eq!(status, expected);
        assert_eq!(status.to_raw(), raw);
        assert_eq!(status.fallback_message(), message);
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let status = NativeStatus::from_raw(-42);
        assert_eq!(status, NativeStatus::Unknown(-42));
        assert_eq!(status.to_raw(), -42);
        assert!(!status.is_ok());
        assert_eq!(status.fallback_message(), "unknown error");
        assert_eq!(status.to_string(), "status -42");
    }

    #[test]
    fn test_only_ok_is_ok() {
        assert!(NativeStatus::Ok.is_ok());
        assert!(!NativeStatus::EncodeFailed.is_ok());
    }
}
