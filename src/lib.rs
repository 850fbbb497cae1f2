//! # tinyimg
//!
//! A tiny BMP decoder for graphics APIs: bytes in, width, height, and a
//! flat RGB or RGBA pixel buffer out.
//!
//! ## Supported input
//!
//! Uncompressed Windows BMP with the classic 40-byte info header:
//! 24-bit direct color, and 8-bit or 4-bit palette-indexed color. Row
//! padding is stripped and the BGR byte order is swapped, so the
//! returned buffer is always tightly packed top-down RGB (or RGBA with
//! alpha = 255 on request). Bottom-up and top-down (negative height)
//! row orders are both honored.
//!
//! ## Non-goals
//!
//! - RLE and bitfields compression
//! - 1/2/16/32-bit depths and the larger V4/V5 headers
//! - Encoding ([`save`] exists for interface parity and always errors)
//! - Color management
//!
//! ## Usage
//!
//! ```no_run
//! use tinyimg::{ColorType, DecodeRequest, ImageInfo, Unstoppable};
//!
//! let data: &[u8] = &[]; // your BMP bytes
//!
//! // Probe without decoding
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} {}bpp", info.width, info.height, info.bits_per_pixel);
//!
//! // Decode to RGBA
//! let decoded = DecodeRequest::new(data)
//!     .color_type(ColorType::Rgba)
//!     .decode(Unstoppable)?;
//! let pixels = decoded.into_pixels();
//! # Ok::<(), tinyimg::TinyImgError>(())
//! ```
//!
//! With the `std` feature (default), [`load`] decodes straight from a
//! path, dispatching on the file extension before touching the
//! filesystem.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod format;
mod info;
mod limits;
mod pixel;
mod source;

mod bmp;
mod decode;

#[cfg(feature = "std")]
pub mod legacy;

// Re-exports
#[cfg(feature = "rgb")]
pub use decode::DecodePixel;
pub use decode::{DecodeOutput, DecodeRequest};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::TinyImgError;
pub use format::ImageFormat;
pub use info::ImageInfo;
pub use limits::Limits;
pub use pixel::ColorType;
#[cfg(feature = "std")]
pub use source::FileSource;
pub use source::{ByteSource, SliceSource};

/// Decode an in-memory BMP to RGB.
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, TinyImgError> {
    DecodeRequest::new(data).decode(stop)
}

/// Load an image from `path`.
///
/// The extension is dispatched first; an unregistered extension fails
/// with [`TinyImgError::UnsupportedFormat`] without opening the file.
#[cfg(feature = "std")]
pub fn load(path: &str, color: ColorType, stop: impl Stop) -> Result<DecodeOutput, TinyImgError> {
    let format = ImageFormat::from_path(path)?;
    let mut src = FileSource::open(path)?;
    format.decode_source(&mut src, None, color, &stop)
}

/// Save an image to `path`.
///
/// Declared for interface parity only: arguments are validated, then
/// the call fails with [`TinyImgError::UnsupportedFormat`] — BMP
/// encoding is not implemented.
#[cfg(feature = "std")]
pub fn save(
    path: &str,
    width: u32,
    height: u32,
    color: ColorType,
    pixels: &[u8],
) -> Result<(), TinyImgError> {
    let _format = ImageFormat::from_path(path)?;
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|wh| wh.checked_mul(color.bytes_per_pixel()))
        .ok_or(TinyImgError::DimensionsTooLarge { width, height })?;
    if pixels.len() < expected {
        return Err(TinyImgError::InvalidArgument(format!(
            "pixel buffer holds {} bytes, {width}x{height} {color:?} needs {expected}",
            pixels.len()
        )));
    }
    Err(TinyImgError::UnsupportedFormat(
        "BMP encoding is not implemented".into(),
    ))
}
