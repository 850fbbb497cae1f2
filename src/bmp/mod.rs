//! BMP image format decoder (internal).
//!
//! Use [`crate::decode_bmp`] or [`crate::DecodeRequest`].

mod decode;

pub(crate) use decode::parse_header;

use crate::decode::DecodeOutput;
use crate::error::TinyImgError;
use crate::limits::Limits;
use crate::pixel::ColorType;
use crate::source::ByteSource;
use enough::Stop;

/// Decode a BMP source to RGB bytes.
pub(crate) fn decode<S: ByteSource>(
    src: &mut S,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, TinyImgError> {
    let header = decode::parse_header(src)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    let out_size = decode::output_size(&header)?;
    if let Some(limits) = limits {
        limits.check_memory(out_size)?;
    }
    stop.check()?;
    let pixels = decode::decode_pixels(src, &header, out_size, stop)?;
    Ok(DecodeOutput::new(
        pixels,
        header.width,
        header.height,
        ColorType::Rgb,
    ))
}
