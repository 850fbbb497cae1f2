use crate::bmp;
use crate::error::TinyImgError;
use crate::format::ImageFormat;
use crate::source::SliceSource;

/// Image metadata read from the header alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
    pub format: ImageFormat,
}

impl ImageInfo {
    /// Probe a byte buffer without decoding pixel data.
    pub fn from_bytes(data: &[u8]) -> Result<ImageInfo, TinyImgError> {
        let mut src = SliceSource::new(data);
        let header = bmp::parse_header(&mut src)?;
        Ok(ImageInfo {
            width: header.width,
            height: header.height,
            bits_per_pixel: header.depth,
            format: ImageFormat::Bmp,
        })
    }
}
