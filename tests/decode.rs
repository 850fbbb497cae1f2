//! In-memory decode tests: hand-built BMP fixtures, no filesystem.

use enough::Unstoppable;
use tinyimg::*;

/// Build an uncompressed BMP in memory: 14-byte file header, 40-byte
/// info header, optional palette, then the given pixel plane (rows
/// already padded, in file order).
fn build_bmp(width: i32, height: i32, bpp: u16, palette: &[[u8; 4]], plane: &[u8]) -> Vec<u8> {
    let data_offset = 54 + 4 * palette.len();
    let mut out = Vec::with_capacity(data_offset + plane.len());
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&((data_offset + plane.len()) as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&(data_offset as u32).to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // compression (BI_RGB)
    out.extend_from_slice(&(plane.len() as u32).to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes()); // h resolution
    out.extend_from_slice(&2835u32.to_le_bytes()); // v resolution
    out.extend_from_slice(&(palette.len() as u32).to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
    for entry in palette {
        out.extend_from_slice(entry);
    }
    out.extend_from_slice(plane);
    out
}

/// 24-bit bottom-up BMP from a top-down RGB buffer, rows zero-padded.
fn bmp24_from_rgb(w: usize, h: usize, rgb: &[u8]) -> Vec<u8> {
    let stride = (w * 3 + 3) & !3;
    let mut plane = vec![0u8; stride * h];
    for y in 0..h {
        let file_row = &mut plane[(h - 1 - y) * stride..][..w * 3];
        for x in 0..w {
            let src = &rgb[(y * w + x) * 3..][..3];
            file_row[x * 3] = src[2];
            file_row[x * 3 + 1] = src[1];
            file_row[x * 3 + 2] = src[0];
        }
    }
    build_bmp(w as i32, h as i32, 24, &[], &plane)
}

fn patch_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn patch_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

// ── 24-bit direct color ──────────────────────────────────────────────

#[test]
fn dims_and_pixels_roundtrip_24bit() {
    let w = 4;
    let h = 3;
    let mut rgb = vec![0u8; w * h * 3];
    for (i, px) in rgb.chunks_exact_mut(3).enumerate() {
        px[0] = i as u8;
        px[1] = 100 + i as u8;
        px[2] = 200u8.wrapping_add(i as u8);
    }

    let data = bmp24_from_rgb(w, h, &rgb);
    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(decoded.width, w as u32);
    assert_eq!(decoded.height, h as u32);
    assert_eq!(decoded.color, ColorType::Rgb);
    assert_eq!(decoded.pixels(), &rgb[..]);
}

#[test]
fn single_pixel_channel_swap() {
    // On-disk B,G,R = 0x10,0x20,0x30 must come out R,G,B = 0x30,0x20,0x10.
    let data = build_bmp(1, 1, 24, &[], &[0x10, 0x20, 0x30, 0x00]);
    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[0x30, 0x20, 0x10]);
}

#[test]
fn row_padding_stays_on_disk() {
    // Width 5: 15 pixel bytes per row, stride 16. Poison the pad byte.
    let w = 5;
    let h = 2;
    let mut plane = vec![0x40u8; 16 * h];
    plane[15] = 0xEE;
    plane[31] = 0xEE;
    let data = build_bmp(w as i32, h as i32, 24, &[], &plane);

    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels().len(), w * h * 3);
    assert!(decoded.pixels().iter().all(|&b| b == 0x40));
}

#[test]
fn bottom_up_rows_are_flipped() {
    // File row 0 is the image's bottom row when height is positive.
    let plane = [
        0, 0, 255, 0, // file row 0: red
        255, 0, 0, 0, // file row 1: blue
    ];
    let decoded = decode_bmp(&build_bmp(1, 2, 24, &[], &plane), Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[0, 0, 255, 255, 0, 0]); // blue, then red
}

#[test]
fn negative_height_is_top_down() {
    let plane = [
        0, 0, 255, 0, // file row 0: red
        255, 0, 0, 0, // file row 1: blue
    ];
    let decoded = decode_bmp(&build_bmp(1, -2, 24, &[], &plane), Unstoppable).unwrap();
    assert_eq!(decoded.height, 2);
    assert_eq!(decoded.pixels(), &[255, 0, 0, 0, 0, 255]); // red, then blue
}

#[test]
fn pixel_data_offset_is_honored() {
    // 8 junk bytes between the headers and the plane.
    let mut plane = vec![0xAAu8; 8];
    plane.extend_from_slice(&[0x10, 0x20, 0x30, 0x00]);
    let mut data = build_bmp(1, 1, 24, &[], &plane);
    patch_u32(&mut data, 10, 54 + 8);

    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[0x30, 0x20, 0x10]);
}

// ── Palette-indexed color ────────────────────────────────────────────

#[test]
fn palette_entry_resolves_to_rgb() {
    // Entry 0 is B=1,G=2,R=3; index byte 0 must decode to RGB 3,2,1.
    let palette = [[1, 2, 3, 0], [9, 8, 7, 0]];
    let data = build_bmp(1, 1, 8, &palette, &[0, 0, 0, 0]);
    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[3, 2, 1]);
}

#[test]
fn eight_bit_rows_and_indices() {
    let palette = [[255, 0, 0, 0], [0, 255, 0, 0], [0, 0, 255, 0]];
    let plane = [
        0, 1, 0, 0, // file row 0 (bottom): blue, green
        2, 0, 0, 0, // file row 1 (top): red, blue
    ];
    let decoded = decode_bmp(&build_bmp(2, 2, 8, &palette, &plane), Unstoppable).unwrap();
    assert_eq!(
        decoded.pixels(),
        &[
            255, 0, 0, 0, 0, 255, // top row: red, blue
            0, 0, 255, 0, 255, 0, // bottom row: blue, green
        ]
    );
}

#[test]
fn four_bit_nibbles_high_first() {
    let palette = [
        [10, 10, 10, 0],
        [0, 0, 255, 0],
        [0, 255, 0, 0],
        [255, 0, 0, 0],
    ];
    // Width 3: indices 1,2,3 pack as 0x12, 0x30; stride pads to 4.
    let data = build_bmp(3, 1, 4, &palette, &[0x12, 0x30, 0, 0]);
    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[255, 0, 0, 0, 255, 0, 0, 0, 255]);
}

#[test]
fn palette_index_out_of_range() {
    let palette = [[1, 2, 3, 0], [4, 5, 6, 0]];
    let data = build_bmp(1, 1, 8, &palette, &[2, 0, 0, 0]);
    match decode_bmp(&data, Unstoppable).unwrap_err() {
        TinyImgError::CorruptHeader(_) => {}
        other => panic!("expected CorruptHeader, got {other:?}"),
    }
}

#[test]
fn palette_count_exceeding_depth() {
    // 17 entries declared for a 4-bit image (max 16).
    let palette = [[0u8, 0, 0, 0]; 17];
    let data = build_bmp(2, 1, 4, &palette, &[0, 0, 0, 0]);
    match decode_bmp(&data, Unstoppable).unwrap_err() {
        TinyImgError::CorruptHeader(_) => {}
        other => panic!("expected CorruptHeader, got {other:?}"),
    }
}

#[test]
fn truncated_palette() {
    let palette = [[1, 2, 3, 0], [4, 5, 6, 0]];
    let data = build_bmp(1, 1, 8, &palette, &[0, 0, 0, 0]);
    // Cut inside the second palette entry.
    match decode_bmp(&data[..54 + 6], Unstoppable).unwrap_err() {
        TinyImgError::Truncated => {}
        other => panic!("expected Truncated, got {other:?}"),
    }
}

// ── Truncation and corrupt headers ───────────────────────────────────

#[test]
fn truncated_pixel_plane() {
    let data = bmp24_from_rgb(4, 3, &[7u8; 36]);
    for cut in [data.len() - 1, data.len() - 5, 60] {
        match decode_bmp(&data[..cut], Unstoppable).unwrap_err() {
            TinyImgError::Truncated => {}
            other => panic!("expected Truncated at cut {cut}, got {other:?}"),
        }
    }
}

#[test]
fn truncated_header() {
    let data = bmp24_from_rgb(2, 2, &[7u8; 12]);
    match decode_bmp(&data[..30], Unstoppable).unwrap_err() {
        TinyImgError::Truncated => {}
        other => panic!("expected Truncated, got {other:?}"),
    }
}

#[test]
fn empty_input() {
    match decode_bmp(&[], Unstoppable).unwrap_err() {
        TinyImgError::Truncated => {}
        other => panic!("expected Truncated, got {other:?}"),
    }
}

#[test]
fn data_offset_beyond_file() {
    let mut data = bmp24_from_rgb(2, 2, &[7u8; 12]);
    patch_u32(&mut data, 10, 10_000);
    match decode_bmp(&data, Unstoppable).unwrap_err() {
        TinyImgError::Truncated => {}
        other => panic!("expected Truncated, got {other:?}"),
    }
}

#[test]
fn data_offset_inside_headers() {
    let mut data = bmp24_from_rgb(2, 2, &[7u8; 12]);
    patch_u32(&mut data, 10, 40);
    match decode_bmp(&data, Unstoppable).unwrap_err() {
        TinyImgError::CorruptHeader(_) => {}
        other => panic!("expected CorruptHeader, got {other:?}"),
    }
}

#[test]
fn nonpositive_width() {
    for width in [0i32, -3] {
        let mut data = bmp24_from_rgb(2, 2, &[7u8; 12]);
        patch_u32(&mut data, 18, width as u32);
        match decode_bmp(&data, Unstoppable).unwrap_err() {
            TinyImgError::CorruptHeader(_) => {}
            other => panic!("expected CorruptHeader for width {width}, got {other:?}"),
        }
    }
}

#[test]
fn zero_height() {
    let mut data = bmp24_from_rgb(2, 2, &[7u8; 12]);
    patch_u32(&mut data, 22, 0);
    match decode_bmp(&data, Unstoppable).unwrap_err() {
        TinyImgError::CorruptHeader(_) => {}
        other => panic!("expected CorruptHeader, got {other:?}"),
    }
}

#[test]
fn planes_field_must_be_one() {
    let mut data = bmp24_from_rgb(2, 2, &[7u8; 12]);
    patch_u16(&mut data, 26, 2);
    match decode_bmp(&data, Unstoppable).unwrap_err() {
        TinyImgError::CorruptHeader(_) => {}
        other => panic!("expected CorruptHeader, got {other:?}"),
    }
}

// ── Out-of-scope variants ────────────────────────────────────────────

#[test]
fn bad_magic() {
    let mut data = bmp24_from_rgb(1, 1, &[7u8; 3]);
    data[1] = b'A';
    match decode_bmp(&data, Unstoppable).unwrap_err() {
        TinyImgError::UnsupportedFormat(_) => {}
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn compressed_bmp_rejected() {
    let mut data = bmp24_from_rgb(2, 2, &[7u8; 12]);
    patch_u32(&mut data, 30, 1); // BI_RLE8
    match decode_bmp(&data, Unstoppable).unwrap_err() {
        TinyImgError::UnsupportedFormat(_) => {}
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn unhandled_bit_depths_rejected() {
    for depth in [1u16, 2, 16, 32] {
        let mut data = bmp24_from_rgb(2, 2, &[7u8; 12]);
        patch_u16(&mut data, 28, depth);
        match decode_bmp(&data, Unstoppable).unwrap_err() {
            TinyImgError::UnsupportedFormat(_) => {}
            other => panic!("expected UnsupportedFormat for depth {depth}, got {other:?}"),
        }
    }
}

#[test]
fn larger_info_headers_rejected() {
    let mut data = bmp24_from_rgb(2, 2, &[7u8; 12]);
    patch_u32(&mut data, 14, 124); // BITMAPV5HEADER
    match decode_bmp(&data, Unstoppable).unwrap_err() {
        TinyImgError::UnsupportedFormat(_) => {}
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

// ── RGBA expansion, limits, probing ──────────────────────────────────

#[test]
fn rgba_expansion_is_opaque() {
    let rgb = [1u8, 2, 3, 4, 5, 6];
    let data = bmp24_from_rgb(2, 1, &rgb);
    let decoded = DecodeRequest::new(&data)
        .color_type(ColorType::Rgba)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(decoded.color, ColorType::Rgba);
    assert_eq!(decoded.pixels(), &[1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn limits_reject_pixel_count() {
    let data = bmp24_from_rgb(2, 2, &[7u8; 12]);
    let limits = Limits {
        max_pixels: Some(1),
        ..Default::default()
    };
    let result = DecodeRequest::new(&data).with_limits(&limits).decode(Unstoppable);
    match result.unwrap_err() {
        TinyImgError::LimitExceeded(_) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn limits_apply_to_rgba_expansion() {
    let data = bmp24_from_rgb(2, 2, &[7u8; 12]);
    let limits = Limits {
        max_memory_bytes: Some(12), // enough for RGB, not RGBA
        ..Default::default()
    };

    DecodeRequest::new(&data)
        .with_limits(&limits)
        .decode(Unstoppable)
        .unwrap();

    let result = DecodeRequest::new(&data)
        .with_limits(&limits)
        .color_type(ColorType::Rgba)
        .decode(Unstoppable);
    match result.unwrap_err() {
        TinyImgError::LimitExceeded(_) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn image_info_probe() {
    let data = bmp24_from_rgb(7, 5, &[0u8; 105]);
    let info = ImageInfo::from_bytes(&data).unwrap();
    assert_eq!(info.width, 7);
    assert_eq!(info.height, 5);
    assert_eq!(info.bits_per_pixel, 24);
    assert_eq!(info.format, ImageFormat::Bmp);
}

#[test]
fn into_pixels_transfers_ownership() {
    let data = bmp24_from_rgb(1, 1, &[9, 8, 7]);
    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    let pixels = decoded.into_pixels();
    assert_eq!(pixels, vec![9, 8, 7]);
}
