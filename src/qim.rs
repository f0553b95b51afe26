// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Parity quantization of single coefficients.
//!
//! A coefficient carries one bit in the parity of its quantization index
//! `round(c / q)`: even index reads as 0, odd as 1. Writing nudges the
//! index by at most one step (down for 0, up for 1), so the coefficient
//! moves by at most `1.5 * q` and lands exactly on a multiple of `q`,
//! centered in its decision cell for maximum distortion margin.

/// Nearest quantization index of `c` under step size `q`.
/// Ties at `.5` round away from zero.
#[inline]
pub fn quantization_index(c: f64, q: f64) -> i64 {
    debug_assert!(q > 0.0);
    (c / q).round() as i64
}

/// The bit currently stored in `c`: the parity of its quantization index.
#[inline]
pub fn read_bit(c: f64, q: f64) -> u8 {
    (quantization_index(c, q) & 1) as u8
}

/// Rewrite `c` so that it reads back as `bit`, moving the index one step
/// when its parity disagrees: down for a 0, up for a 1.
#[inline]
pub fn force_bit(c: f64, q: f64, bit: u8) -> f64 {
    debug_assert!(bit <= 1);
    let mut idx = quantization_index(c, q);
    let odd = idx & 1 != 0;
    if bit == 0 && odd {
        idx -= 1;
    } else if bit == 1 && !odd {
        idx += 1;
    }
    idx as f64 * q
}
