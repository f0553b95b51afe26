// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Embedding and extraction pipelines.
//!
//! Embedding splits the image into luma and chroma, decomposes the luma
//! plane, rewrites the coarsest approximation band tile by tile with the
//! coded payload, reconstructs, and recombines with the untouched chroma.
//! Extraction mirrors the front half and then resolves each bit position
//! by plurality vote across tiles before handing the bitstream to the
//! error-corrected payload decoder.
//!
//! Both directions are pure functions of their inputs. Running either
//! twice on the same image and configuration produces identical output.

use image::RgbImage;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::color;
use crate::config::WatermarkConfig;
use crate::dwt;
use crate::error::WatermarkError;
use crate::fingerprint::Fingerprint;
use crate::payload;
use crate::qim;
use crate::vote;

/// Write `bits` into every complete tile of `coeffs`. Leftover
/// coefficients past the last complete tile are left untouched.
fn embed_bits(coeffs: &mut [f64], bits: &[u8], q: f64) {
    let tile = |chunk: &mut [f64]| {
        for (c, &bit) in chunk.iter_mut().zip(bits.iter()) {
            *c = qim::force_bit(*c, q, bit);
        }
    };

    #[cfg(feature = "parallel")]
    coeffs.par_chunks_exact_mut(bits.len()).for_each(tile);
    #[cfg(not(feature = "parallel"))]
    coeffs.chunks_exact_mut(bits.len()).for_each(tile);
}

/// Read `bit_len` bits back out of `coeffs`, resolving each position by
/// plurality vote over all complete tiles.
fn extract_bits(coeffs: &[f64], bit_len: usize, q: f64) -> Vec<u8> {
    let num_tiles = coeffs.len() / bit_len;
    let read_position = |i: usize| -> u8 {
        let votes: Vec<u8> = (0..num_tiles)
            .map(|t| qim::read_bit(coeffs[t * bit_len + i], q))
            .collect();
        vote::resolve_position(&votes)
    };

    #[cfg(feature = "parallel")]
    let bits: Vec<u8> = (0..bit_len).into_par_iter().map(read_position).collect();
    #[cfg(not(feature = "parallel"))]
    let bits: Vec<u8> = (0..bit_len).map(read_position).collect();
    bits
}

/// Embed `fingerprint` into `img`, returning the watermarked copy.
///
/// Fails with [`WatermarkError::InsufficientCapacity`] when the coarsest
/// approximation band cannot hold even one complete payload tile.
pub fn embed_fingerprint(
    img: &RgbImage,
    fingerprint: &Fingerprint,
    cfg: &WatermarkConfig,
) -> Result<RgbImage, WatermarkError> {
    let (y, cb, cr) = color::rgb_to_ycbcr(img);
    let mut dec = dwt::forward(y, cfg.levels);

    let capacity = dec.approx().len();
    let required = cfg.payload_bit_length();
    if capacity < required {
        return Err(WatermarkError::InsufficientCapacity { capacity, required });
    }

    let bits = payload::encode(fingerprint, cfg.ecc_bytes);
    debug!(
        capacity,
        tiles = capacity / required,
        "embedding payload into approximation band"
    );
    embed_bits(dec.approx_mut().samples_mut(), &bits, cfg.q);

    let y = dwt::inverse(dec);
    Ok(color::ycbcr_to_rgb(&y, &cb, &cr))
}

/// Extract a fingerprint from `img`, if one is recoverable.
///
/// `Ok(None)` means the image was readable but no watermark survived the
/// error-correction bound. That is the expected answer for unmarked or
/// heavily distorted images, not a failure of the call itself.
pub fn extract_fingerprint(
    img: &RgbImage,
    cfg: &WatermarkConfig,
) -> Result<Option<Fingerprint>, WatermarkError> {
    let (y, _, _) = color::rgb_to_ycbcr(img);
    let dec = dwt::forward(y, cfg.levels);

    let capacity = dec.approx().len();
    let required = cfg.payload_bit_length();
    if capacity < required {
        return Err(WatermarkError::InsufficientCapacity { capacity, required });
    }

    debug!(
        capacity,
        tiles = capacity / required,
        "collecting payload votes"
    );
    let bits = extract_bits(dec.approx().samples(), required, cfg.q);
    Ok(payload::decode(&bits, cfg.ecc_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_Q;
    use crate::fingerprint::FINGERPRINT_LEN;

    fn test_fingerprint() -> Fingerprint {
        let mut bytes = [0u8; FINGERPRINT_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        Fingerprint::new(bytes)
    }

    fn mid_gray_image(width: u32, height: u32) -> RgbImage {
        // Values stay well inside 0..255 so embedding nudges never clip.
        RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 7 + y * 3) % 160 + 48) as u8;
            image::Rgb([v, v, v])
        })
    }

    #[test]
    fn embed_bits_fills_tiles_and_spares_remainder() {
        let mut coeffs = vec![95.0; 10];
        let bits = [1u8, 0, 1];
        embed_bits(&mut coeffs, &bits, DEFAULT_Q);

        for t in 0..3 {
            for (i, &bit) in bits.iter().enumerate() {
                assert_eq!(
                    qim::read_bit(coeffs[t * 3 + i], DEFAULT_Q),
                    bit,
                    "tile {t} position {i}"
                );
            }
        }
        assert_eq!(coeffs[9], 95.0, "remainder coefficient must be untouched");
    }

    #[test]
    fn extract_bits_outvotes_one_bad_tile() {
        let bits = [1u8, 0, 0, 1];
        let mut coeffs = vec![123.0; 12];
        embed_bits(&mut coeffs, &bits, DEFAULT_Q);

        // Flip every bit of the middle tile.
        for i in 0..4 {
            coeffs[4 + i] = qim::force_bit(coeffs[4 + i], DEFAULT_Q, 1 - bits[i]);
        }

        assert_eq!(extract_bits(&coeffs, 4, DEFAULT_Q), bits);
    }

    #[test]
    fn extract_bits_single_tile() {
        let bits = [0u8, 1, 1, 0, 1];
        let mut coeffs = vec![200.0; 5];
        embed_bits(&mut coeffs, &bits, DEFAULT_Q);
        assert_eq!(extract_bits(&coeffs, 5, DEFAULT_Q), bits);
    }

    #[test]
    fn embed_rejects_band_one_coefficient_short() {
        // 28x292 decomposes to a 7x73 approximation band: 511
        // coefficients against a 512-bit payload.
        let img = mid_gray_image(28, 292);
        let cfg = WatermarkConfig::default();
        let err = embed_fingerprint(&img, &test_fingerprint(), &cfg).unwrap_err();
        assert_eq!(
            err,
            WatermarkError::InsufficientCapacity {
                capacity: 511,
                required: 512,
            }
        );
    }

    #[test]
    fn extract_rejects_undersized_image() {
        let img = mid_gray_image(28, 288);
        let cfg = WatermarkConfig::default();
        let err = extract_fingerprint(&img, &cfg).unwrap_err();
        assert!(matches!(
            err,
            WatermarkError::InsufficientCapacity { required: 512, .. }
        ));
    }

    #[test]
    fn single_tile_roundtrip() {
        // 32x256 yields exactly 512 coefficients: one tile, no votes to
        // spare, so recovery rides on quantization margin alone.
        let img = mid_gray_image(32, 256);
        let cfg = WatermarkConfig::default();
        let fp = test_fingerprint();

        let marked = embed_fingerprint(&img, &fp, &cfg).unwrap();
        let recovered = extract_fingerprint(&marked, &cfg).unwrap();
        assert_eq!(recovered, Some(fp));
    }

    #[test]
    fn marked_image_keeps_dimensions() {
        let img = mid_gray_image(33, 259);
        let cfg = WatermarkConfig {
            ecc_bytes: 16,
            ..WatermarkConfig::default()
        };
        let marked = embed_fingerprint(&img, &test_fingerprint(), &cfg).unwrap();
        assert_eq!(marked.dimensions(), img.dimensions());
    }
}
