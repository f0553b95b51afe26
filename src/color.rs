// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! RGB to luma/chroma separation (BT.601 full range).
//!
//! The watermark lives in the luma plane only. Chroma planes are split off
//! here, carried through the pipeline untouched, and reattached during
//! reconstruction, so color fidelity is limited purely by the conversion
//! matrix and the final rounding to integer pixels.

use image::{Rgb, RgbImage};

use crate::plane::Plane;

fn px_to_ycbcr(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.169 * r - 0.331 * g + 0.500 * b + 128.0;
    let cr = 0.500 * r - 0.419 * g - 0.081 * b + 128.0;
    (y, cb, cr)
}

fn px_to_rgb(y: f64, cb: f64, cr: f64) -> (f64, f64, f64) {
    let cb = cb - 128.0;
    let cr = cr - 128.0;
    let r = y + 1.402 * cr;
    let g = y - 0.344 * cb - 0.714 * cr;
    let b = y + 1.772 * cb;
    (r, g, b)
}

/// Split an image into Y, Cb, Cr sample planes at full resolution.
pub fn rgb_to_ycbcr(img: &RgbImage) -> (Plane, Plane, Plane) {
    let (w, h) = img.dimensions();
    let (w, h) = (w as usize, h as usize);

    let mut y_plane = Plane::new(w, h);
    let mut cb_plane = Plane::new(w, h);
    let mut cr_plane = Plane::new(w, h);

    for (x, y, px) in img.enumerate_pixels() {
        let (luma, cb, cr) = px_to_ycbcr(px[0] as f64, px[1] as f64, px[2] as f64);
        y_plane.set(x as usize, y as usize, luma);
        cb_plane.set(x as usize, y as usize, cb);
        cr_plane.set(x as usize, y as usize, cr);
    }

    (y_plane, cb_plane, cr_plane)
}

/// Recombine Y, Cb, Cr planes into an RGB image, rounding each channel and
/// clamping to `0..=255`.
///
/// # Panics
/// Panics when the planes disagree on dimensions.
pub fn ycbcr_to_rgb(y: &Plane, cb: &Plane, cr: &Plane) -> RgbImage {
    assert!(
        y.width() == cb.width()
            && y.width() == cr.width()
            && y.height() == cb.height()
            && y.height() == cr.height(),
        "luma and chroma planes must share dimensions"
    );

    let mut img = RgbImage::new(y.width() as u32, y.height() as u32);
    for row in 0..y.height() {
        for col in 0..y.width() {
            let (r, g, b) = px_to_rgb(y.get(col, row), cb.get(col, row), cr.get(col, row));
            img.put_pixel(
                col as u32,
                row as u32,
                Rgb([
                    r.round().clamp(0.0, 255.0) as u8,
                    g.round().clamp(0.0, 255.0) as u8,
                    b.round().clamp(0.0, 255.0) as u8,
                ]),
            );
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_weights_are_bt601() {
        let (y, _, _) = px_to_ycbcr(255.0, 0.0, 0.0);
        assert!((y - 76.245).abs() < 1e-9, "red luma {y}");
        let (y, _, _) = px_to_ycbcr(0.0, 255.0, 0.0);
        assert!((y - 149.685).abs() < 1e-9, "green luma {y}");
        let (y, _, _) = px_to_ycbcr(0.0, 0.0, 255.0);
        assert!((y - 29.07).abs() < 1e-9, "blue luma {y}");
    }

    #[test]
    fn gray_pixels_have_neutral_chroma() {
        for v in [0.0, 17.0, 128.0, 200.0, 255.0] {
            let (y, cb, cr) = px_to_ycbcr(v, v, v);
            assert!((y - v).abs() < 1e-9, "gray {v} luma {y}");
            assert!((cb - 128.0).abs() < 1e-9, "gray {v} cb {cb}");
            assert!((cr - 128.0).abs() < 1e-9, "gray {v} cr {cr}");
        }
    }

    #[test]
    fn split_merge_roundtrip_within_one_level() {
        // The conversion matrix plus integer rounding may move a channel
        // by at most one level on the way back.
        let mut img = RgbImage::new(16, 16);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgb([
                ((x * 16 + y) % 256) as u8,
                ((x * 7 + y * 13) % 256) as u8,
                ((x * 3 + y * 5 + 40) % 256) as u8,
            ]);
        }

        let (yp, cb, cr) = rgb_to_ycbcr(&img);
        let back = ycbcr_to_rgb(&yp, &cb, &cr);

        for (orig, rt) in img.pixels().zip(back.pixels()) {
            for c in 0..3 {
                let diff = (orig[c] as i16 - rt[c] as i16).abs();
                assert!(diff <= 1, "channel moved by {diff}: {orig:?} -> {rt:?}");
            }
        }
    }

    #[test]
    fn plane_dimensions_match_image() {
        let img = RgbImage::new(13, 7);
        let (y, cb, cr) = rgb_to_ycbcr(&img);
        assert_eq!((y.width(), y.height()), (13, 7));
        assert_eq!((cb.width(), cb.height()), (13, 7));
        assert_eq!((cr.width(), cr.height()), (13, 7));
    }
}
