use alloc::vec::Vec;
use enough::Stop;

use crate::error::TinyImgError;

/// Output color type requested by the caller.
///
/// The decoder always produces RGB internally; [`Rgba`](ColorType::Rgba)
/// expands that result with an opaque alpha channel as a post-processing
/// step.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorType {
    /// 3 channels, 8-bit R, G, B.
    Rgb,
    /// 4 channels, 8-bit R, G, B, A.
    Rgba,
}

impl ColorType {
    /// Bytes per pixel for this color type.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.bytes_per_pixel()
    }
}

/// Expand an RGB buffer to RGBA with alpha = 255.
pub(crate) fn expand_rgb_to_rgba(rgb: &[u8], stop: &dyn Stop) -> Result<Vec<u8>, TinyImgError> {
    stop.check()?;
    let mut out = Vec::with_capacity(rgb.len() / 3 * 4);
    for px in rgb.chunks_exact(3) {
        out.extend_from_slice(px);
        out.push(255);
    }
    Ok(out)
}
