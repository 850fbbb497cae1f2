//! BMP header parsing and pixel decoding.
//!
//! Scope is the classic on-disk layout: 14-byte file header, 40-byte
//! `BITMAPINFOHEADER`, optional palette, uncompressed pixel array in
//! 4-byte-aligned rows. Bit depths 4 and 8 (palette-indexed) and 24
//! (direct BGR) are handled; everything else is rejected up front.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::error::TinyImgError;
use crate::source::ByteSource;

/// File offset of the palette for a 40-byte info header.
const PALETTE_OFFSET: u64 = 54;

/// Combined size of the file header and the classic info header.
const HEADER_BYTES: u32 = 54;

/// The subset of on-disk header fields the decoder consumes.
pub(crate) struct BmpHeader {
    pub data_offset: u32,
    pub width: u32,
    pub height: u32,
    /// Negative on-disk height: rows are stored first-row-first.
    pub top_down: bool,
    pub depth: u16,
    /// Palette entry count (0 for 24-bit).
    pub colors: usize,
}

#[derive(Clone, Copy, Default)]
struct PaletteEntry {
    red: u8,
    green: u8,
    blue: u8,
}

/// Read and validate the fixed-offset header fields.
pub(crate) fn parse_header<S: ByteSource>(src: &mut S) -> Result<BmpHeader, TinyImgError> {
    src.seek(0)?;
    if &src.read_array::<2>()? != b"BM" {
        return Err(TinyImgError::UnsupportedFormat(
            "missing BM magic bytes".into(),
        ));
    }
    let _file_size = src.read_u32_le()?;
    src.skip(4)?; // reserved
    let data_offset = src.read_u32_le()?;

    let ihsize = src.read_u32_le()?;
    if ihsize != 40 {
        return Err(TinyImgError::UnsupportedFormat(alloc::format!(
            "info header size {ihsize}, only the 40-byte BITMAPINFOHEADER is supported"
        )));
    }

    let width = src.read_i32_le()?;
    let height = src.read_i32_le()?;
    if width <= 0 {
        return Err(TinyImgError::CorruptHeader(alloc::format!(
            "width {width} is not positive"
        )));
    }
    if height == 0 {
        return Err(TinyImgError::CorruptHeader("height is zero".into()));
    }

    let planes = src.read_u16_le()?;
    if planes != 1 {
        return Err(TinyImgError::CorruptHeader(alloc::format!(
            "planes field is {planes}, expected 1"
        )));
    }

    let depth = src.read_u16_le()?;
    let compression = src.read_u32_le()?;
    if compression != 0 {
        return Err(TinyImgError::UnsupportedFormat(alloc::format!(
            "compression scheme {compression}, only uncompressed BI_RGB is supported"
        )));
    }

    let _image_size = src.read_u32_le()?;
    src.skip(8)?; // x/y resolution
    let colors_used = src.read_u32_le()?;
    let _important_colors = src.read_u32_le()?;

    let colors = match depth {
        24 => 0,
        4 | 8 => {
            let max_colors = 1u32 << depth;
            if colors_used > max_colors {
                return Err(TinyImgError::CorruptHeader(alloc::format!(
                    "palette count {colors_used} exceeds max for {depth}-bit depth ({max_colors})"
                )));
            }
            if colors_used == 0 {
                max_colors as usize
            } else {
                colors_used as usize
            }
        }
        d => {
            return Err(TinyImgError::UnsupportedFormat(alloc::format!(
                "bit depth {d} unsupported"
            )));
        }
    };

    // The pixel data must start past the headers and the palette.
    let min_offset = HEADER_BYTES + 4 * colors as u32;
    if data_offset < min_offset {
        return Err(TinyImgError::CorruptHeader(alloc::format!(
            "pixel data offset {data_offset} overlaps the headers"
        )));
    }

    Ok(BmpHeader {
        data_offset,
        width: width as u32,
        height: height.unsigned_abs(),
        top_down: height < 0,
        depth,
        colors,
    })
}

/// Output buffer size in bytes (RGB), checked.
pub(crate) fn output_size(header: &BmpHeader) -> Result<usize, TinyImgError> {
    (header.width as usize)
        .checked_mul(header.height as usize)
        .and_then(|wh| wh.checked_mul(3))
        .ok_or(TinyImgError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        })
}

/// Encoded row size on disk: pixel bits rounded up to a 4-byte boundary.
fn on_disk_stride(header: &BmpHeader) -> Result<usize, TinyImgError> {
    (header.width as usize)
        .checked_mul(usize::from(header.depth))
        .and_then(|bits| bits.checked_add(31))
        .map(|bits| bits / 32 * 4)
        .ok_or(TinyImgError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        })
}

/// Palette entries are stored as B, G, R, reserved.
fn read_palette<S: ByteSource>(
    src: &mut S,
    colors: usize,
) -> Result<[PaletteEntry; 256], TinyImgError> {
    src.seek(PALETTE_OFFSET)?;
    let mut palette = [PaletteEntry::default(); 256];
    for entry in palette.iter_mut().take(colors) {
        let [b, g, r, _] = src.read_array::<4>()?;
        *entry = PaletteEntry {
            red: r,
            green: g,
            blue: b,
        };
    }
    Ok(palette)
}

/// Decode the pixel plane into a tightly packed RGB buffer.
///
/// File rows are placed bottom-up unless the header said top-down, so
/// the returned buffer is always top-down row-major with no padding.
pub(crate) fn decode_pixels<S: ByteSource>(
    src: &mut S,
    header: &BmpHeader,
    out_size: usize,
    stop: &dyn Stop,
) -> Result<Vec<u8>, TinyImgError> {
    let w = header.width as usize;
    let h = header.height as usize;
    let out_stride = w * 3;

    let palette = if header.depth < 24 {
        read_palette(src, header.colors)?
    } else {
        [PaletteEntry::default(); 256]
    };

    let row_bytes = match header.depth {
        24 => out_stride,
        8 => w,
        4 => w.div_ceil(2),
        d => {
            return Err(TinyImgError::UnsupportedFormat(alloc::format!(
                "bit depth {d} unsupported"
            )));
        }
    };
    let stride = on_disk_stride(header)?;
    let pad = (stride - row_bytes) as u64;

    // The header promises `stride * height` plane bytes starting at
    // `data_offset`; refuse before allocating if the source is shorter.
    let promised_end = (stride as u64)
        .checked_mul(h as u64)
        .and_then(|n| n.checked_add(u64::from(header.data_offset)))
        .ok_or(TinyImgError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        })?;
    if promised_end > src.len() {
        return Err(TinyImgError::Truncated);
    }

    src.seek(u64::from(header.data_offset))?;

    let mut buf = vec![0u8; out_size];
    let mut index_row = vec![0u8; if header.depth < 24 { w } else { 0 }];
    let mut packed_row = vec![0u8; if header.depth == 4 { w.div_ceil(2) } else { 0 }];

    for y in 0..h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let dest = if header.top_down { y } else { h - 1 - y };
        let row = &mut buf[dest * out_stride..(dest + 1) * out_stride];

        match header.depth {
            24 => {
                src.read_exact(row)?;
                // BMP stores BGR; output is RGB.
                for px in row.chunks_exact_mut(3) {
                    px.swap(0, 2);
                }
            }
            8 => {
                src.read_exact(&mut index_row)?;
                expand_palette(&index_row, row, &palette, header.colors)?;
            }
            _ => {
                src.read_exact(&mut packed_row)?;
                expand_nibbles(&packed_row, &mut index_row);
                expand_palette(&index_row, row, &palette, header.colors)?;
            }
        }
        src.skip(pad)?;
    }

    Ok(buf)
}

fn expand_palette(
    indices: &[u8],
    row: &mut [u8],
    palette: &[PaletteEntry; 256],
    colors: usize,
) -> Result<(), TinyImgError> {
    for (&byte, px) in indices.iter().zip(row.chunks_exact_mut(3)) {
        let idx = usize::from(byte);
        if idx >= colors {
            return Err(TinyImgError::CorruptHeader(alloc::format!(
                "palette index {idx} out of range (palette has {colors} entries)"
            )));
        }
        let entry = palette[idx];
        px[0] = entry.red;
        px[1] = entry.green;
        px[2] = entry.blue;
    }
    Ok(())
}

/// Unpack 4-bit palette indices, high nibble first.
fn expand_nibbles(input: &[u8], out: &mut [u8]) {
    let mut in_iter = input.iter();
    let mut out_iter = out.chunks_exact_mut(2);

    (&mut out_iter).zip(&mut in_iter).for_each(|(pair, val)| {
        pair[0] = val >> 4;
        pair[1] = val & 0x0F;
    });

    if let Some(last) = out_iter.into_remainder().first_mut() {
        if let Some(val) = in_iter.next() {
            *last = val >> 4;
        }
    }
}
