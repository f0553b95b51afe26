// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! # tidemark
//!
//! Blind digital watermarking for RGB images. Embeds a fixed 256-bit
//! fingerprint into the luma channel and recovers it later without the
//! original image, surviving mild recompression and noise:
//!
//! - **Transform domain**: 2-level orthonormal Haar decomposition; the
//!   payload lives in the coarsest approximation band, where moderate
//!   distortion spreads thin.
//! - **Parity quantization**: each coefficient stores one bit in the
//!   parity of its quantization index (step 40.0 by default).
//! - **Redundancy**: Reed-Solomon parity (32 bytes over GF(2^8)) plus
//!   tile-level repetition with plurality voting across the band.
//!
//! Decoding an unmarked image yields `Ok(None)`, not an error; garbage
//! bits fail the error-correction bound and are rejected. All operations
//! are pure functions: the same input image and configuration always
//! produce byte-identical output.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use tidemark::{embed, decode, WatermarkConfig};
//!
//! let img = image::open("photo.png").unwrap().to_rgb8();
//! let cfg = WatermarkConfig::default();
//!
//! let fp = "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
//! let marked = embed(&img, fp, &cfg).unwrap();
//! let recovered = decode(&marked, &cfg).unwrap();
//! assert_eq!(recovered.unwrap().to_string(), fp);
//! ```

pub mod color;
pub mod config;
pub mod dwt;
pub mod ecc;
pub mod error;
pub mod fingerprint;
pub mod payload;
pub mod pipeline;
pub mod plane;
pub mod qim;
pub mod vote;

pub use config::{WatermarkConfig, DEFAULT_ECC_BYTES, DEFAULT_LEVELS, DEFAULT_Q};
pub use error::WatermarkError;
pub use fingerprint::{Fingerprint, FINGERPRINT_LEN};
pub use pipeline::{embed_fingerprint, extract_fingerprint};

use image::RgbImage;

/// Embed a hex-encoded fingerprint (optional `0x` prefix, 64 hex digits)
/// into `img`, returning the watermarked copy with unchanged dimensions.
pub fn embed(
    img: &RgbImage,
    fingerprint: &str,
    cfg: &WatermarkConfig,
) -> Result<RgbImage, WatermarkError> {
    let fp: Fingerprint = fingerprint.parse()?;
    pipeline::embed_fingerprint(img, &fp, cfg)
}

/// Recover the embedded fingerprint from `img`, or `Ok(None)` when no
/// watermark is recoverable.
pub fn decode(
    img: &RgbImage,
    cfg: &WatermarkConfig,
) -> Result<Option<Fingerprint>, WatermarkError> {
    pipeline::extract_fingerprint(img, cfg)
}

/// Embed `expected` into `img` and immediately decode the watermarked
/// copy, reporting whether the fingerprint reads back intact. The
/// comparison is case-insensitive with respect to the hex input.
pub fn verify(
    img: &RgbImage,
    expected: &str,
    cfg: &WatermarkConfig,
) -> Result<bool, WatermarkError> {
    let fp: Fingerprint = expected.parse()?;
    let marked = pipeline::embed_fingerprint(img, &fp, cfg)?;
    let recovered = pipeline::extract_fingerprint(&marked, cfg)?;
    Ok(recovered == Some(fp))
}

/// Number of approximation-band coefficients `img` offers under `cfg`,
/// for pre-flight capacity checks. Embedding needs at least
/// [`WatermarkConfig::payload_bit_length`] of them.
pub fn capacity(img: &RgbImage, cfg: &WatermarkConfig) -> usize {
    dwt::subband_capacity(img.width() as usize, img.height() as usize, cfg.levels)
}
