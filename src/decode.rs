use alloc::vec::Vec;
use enough::Stop;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::TinyImgError;
use crate::limits::Limits;
use crate::pixel::{self, ColorType};
use crate::source::{ByteSource, SliceSource};

/// Decode an in-memory byte buffer.
///
/// ```no_run
/// use tinyimg::{ColorType, DecodeRequest, Unstoppable};
///
/// let data: &[u8] = &[]; // your BMP bytes
/// let decoded = DecodeRequest::new(data)
///     .color_type(ColorType::Rgba)
///     .decode(Unstoppable)?;
/// # Ok::<(), tinyimg::TinyImgError>(())
/// ```
#[derive(Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    color: ColorType,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            color: ColorType::Rgb,
        }
    }

    /// Apply resource limits to the decode.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Choose the output color type (default [`ColorType::Rgb`]).
    pub fn color_type(mut self, color: ColorType) -> Self {
        self.color = color;
        self
    }

    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, TinyImgError> {
        let mut src = SliceSource::new(self.data);
        decode_source(&mut src, self.limits, self.color, &stop)
    }
}

/// Decode from any [`ByteSource`] (shared by [`DecodeRequest`] and
/// [`crate::load`]).
pub(crate) fn decode_source<S: ByteSource>(
    src: &mut S,
    limits: Option<&Limits>,
    color: ColorType,
    stop: &dyn Stop,
) -> Result<DecodeOutput, TinyImgError> {
    let decoded = crate::bmp::decode(src, limits, stop)?;
    match color {
        ColorType::Rgb => Ok(decoded),
        ColorType::Rgba => decoded.into_rgba(limits, stop),
    }
}

/// Decoded image: owned pixels plus dimensions.
///
/// The pixel buffer is contiguous, top-down row-major, and tightly
/// packed (`width * height * bytes_per_pixel`, no row padding).
/// Dropping the output (or the buffer taken via
/// [`into_pixels`](DecodeOutput::into_pixels)) releases it; Rust's move
/// semantics make release-once and no-use-after-release automatic.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
}

impl DecodeOutput {
    pub(crate) fn new(pixels: Vec<u8>, width: u32, height: u32, color: ColorType) -> Self {
        Self {
            pixels,
            width,
            height,
            color,
        }
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Expand the RGB result to RGBA with alpha = 255.
    pub(crate) fn into_rgba(
        self,
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<DecodeOutput, TinyImgError> {
        if let Some(limits) = limits {
            limits.check_memory(self.pixels.len() / 3 * 4)?;
        }
        let pixels = pixel::expand_rgb_to_rgba(&self.pixels, stop)?;
        Ok(DecodeOutput {
            pixels,
            width: self.width,
            height: self.height,
            color: ColorType::Rgba,
        })
    }

    /// Reinterpret the pixel data as a typed pixel slice.
    ///
    /// Returns [`TinyImgError::InvalidArgument`] if the buffer's color
    /// type doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: DecodePixel>(&self) -> Result<&[P], TinyImgError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.color != P::color_type() {
            return Err(TinyImgError::InvalidArgument(alloc::format!(
                "pixel type mismatch: buffer holds {:?}",
                self.color
            )));
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: DecodePixel>(&self) -> Result<imgref::ImgRef<'_, P>, TinyImgError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: DecodePixel>(&self) -> Result<imgref::ImgVec<P>, TinyImgError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}

/// Typed pixels a [`DecodeOutput`] can expose views of.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy {
    fn color_type() -> ColorType;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGB8 {
    fn color_type() -> ColorType {
        ColorType::Rgb
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGBA8 {
    fn color_type() -> ColorType {
        ColorType::Rgba
    }
}
