//! Filename-extension dispatch to the registered decoders.

use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::TinyImgError;
use crate::limits::Limits;
use crate::pixel::ColorType;
use crate::source::ByteSource;

/// Image formats this crate can decode.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// BMP (Windows bitmap).
    Bmp,
}

impl ImageFormat {
    /// Look up a format by its filename extension, dot included.
    ///
    /// Matching is exact and case-sensitive: `".bmp"` and nothing else.
    pub fn from_extension(ext: &str) -> Option<ImageFormat> {
        match ext {
            ".bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Determine the format for `path` from the substring starting at
    /// its last dot.
    pub fn from_path(path: &str) -> Result<ImageFormat, TinyImgError> {
        let ext = path.rfind('.').map(|i| &path[i..]).ok_or_else(|| {
            TinyImgError::UnsupportedFormat(alloc::format!("{path}: no file extension"))
        })?;
        Self::from_extension(ext).ok_or_else(|| {
            TinyImgError::UnsupportedFormat(alloc::format!("unknown extension {ext}"))
        })
    }

    /// Dispatch to the decoder registered for this format.
    pub(crate) fn decode_source<S: ByteSource>(
        self,
        src: &mut S,
        limits: Option<&Limits>,
        color: ColorType,
        stop: &dyn Stop,
    ) -> Result<DecodeOutput, TinyImgError> {
        match self {
            ImageFormat::Bmp => crate::decode::decode_source(src, limits, color, stop),
        }
    }
}
