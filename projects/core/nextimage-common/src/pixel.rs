//! Pixel formats of decoded images.

use crate::options::NativeField;
use nextimage_sys::*;

/// Layout of decoded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// RGBA, 8 bits per channel
    #[default]
    Rgba,
    /// RGB, 8 bits per channel
    Rgb,
    /// BGRA, 8 bits per channel
    Bgra,
    /// YUV 4:2:0 planar
    Yuv420,
    /// YUV 4:2:2 planar
    Yuv422,
    /// YUV 4:4:4 planar
    Yuv444,
}

impl PixelFormat {
    /// Interprets a raw `NextImagePixelFormat`.
    pub const fn from_raw(raw: NextImagePixelFormat) -> Option<Self> {
        match raw {
            NEXTIMAGE_FORMAT_RGBA => Some(Self::Rgba),
            NEXTIMAGE_FORMAT_RGB => Some(Self::Rgb),
            NEXTIMAGE_FORMAT_BGRA => Some(Self::Bgra),
            NEXTIMAGE_FORMAT_YUV420 => Some(Self::Yuv420),
            NEXTIMAGE_FORMAT_YUV422 => Some(Self::Yuv422),
            NEXTIMAGE_FORMAT_YUV444 => Some(Self::Yuv444),
            _ => None,
        }
    }

    /// Returns the raw `NextImagePixelFormat`.
    pub const fn to_raw(self) -> NextImagePixelFormat {
        match self {
            Self::Rgba => NEXTIMAGE_FORMAT_RGBA,
            Self::Rgb => NEXTIMAGE_FORMAT_RGB,
            Self::Bgra => NEXTIMAGE_FORMAT_BGRA,
            Self::Yuv420 => NEXTIMAGE_FORMAT_YUV420,
            Self::Yuv422 => NEXTIMAGE_FORMAT_YUV422,
            Self::Yuv444 => NEXTIMAGE_FORMAT_YUV444,
        }
    }

    /// Whether the format stores Y, U and V in separate planes.
    pub const fn is_planar(self) -> bool {
        matches!(self, Self::Yuv420 | Self::Yuv422 | Self::Yuv444)
    }
}

impl NativeField for PixelFormat {
    type Raw = NextImagePixelFormat;

    fn lower(&self) -> Self::Raw {
        self.to_raw()
    }

    fn lift(raw: Self::Raw) -> Self {
        Self::from_raw(raw).unwrap_or_else(|| {
            tracing::warn!(raw, "unknown pixel format in native options; using RGBA");
            Self::Rgba
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PixelFormat::Rgba, 0, false)]
    #[case(PixelFormat::Rgb, 1, false)]
    #[case(PixelFormat::Bgra, 2, false)]
    #[case(PixelFormat::Yuv420, 3, true)]
    #[case(PixelFormat::Yuv422, 4, true)]
    #[case(PixelFormat::Yuv444, 5, true)]
    fn test_raw_values(#[case] format: PixelFormat, #[case] raw: i32, #[case] planar: bool) {
        assert_eq!(format.to_raw(), raw);
        assert_eq!(PixelFormat::from_raw(raw), Some(format));
        assert_eq!(format.is_planar(), planar);
    }

    #[test]
    fn test_unknown_raw_value() {
        assert_eq!(PixelFormat::from_raw(17), None);
        assert_eq!(PixelFormat::lift(17), PixelFormat::Rgba);
    }
}
