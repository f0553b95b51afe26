// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Watermark format configuration.
//!
//! The constants here define the wire format: an image embedded with one
//! configuration is undecodable under another, silently. Everything is an
//! explicit value passed into [`embed`](crate::embed) and
//! [`decode`](crate::decode), so multiple configurations can coexist in
//! one process (useful for testing different ECC budgets) without any
//! global state.

use crate::fingerprint::FINGERPRINT_LEN;

/// Default quantization step for the coefficient lattice.
pub const DEFAULT_Q: f64 = 40.0;

/// Default number of Haar decomposition levels.
pub const DEFAULT_LEVELS: usize = 2;

/// Default Reed-Solomon parity bytes appended to the fingerprint.
/// 32 parity bytes correct up to 16 corrupted symbols of the 64-byte
/// coded payload.
pub const DEFAULT_ECC_BYTES: usize = 32;

/// Immutable format parameters shared by embedder and extractor.
///
/// Both sides must use identical values; a mismatch does not fail loudly,
/// it just yields an undecodable image.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    /// Quantization step. Larger values survive stronger distortion at
    /// the price of a more visible watermark.
    pub q: f64,
    /// Haar decomposition depth. The embedding surface is the
    /// approximation band at this level, so each extra level quarters
    /// the capacity.
    pub levels: usize,
    /// Reed-Solomon parity bytes. Must be even and at most 223
    /// (the coded payload may not exceed the 255-symbol RS block).
    pub ecc_bytes: usize,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            q: DEFAULT_Q,
            levels: DEFAULT_LEVELS,
            ecc_bytes: DEFAULT_ECC_BYTES,
        }
    }
}

impl WatermarkConfig {
    /// Length in bytes of the coded payload: fingerprint plus parity.
    pub fn coded_payload_len(&self) -> usize {
        FINGERPRINT_LEN + self.ecc_bytes
    }

    /// Length in bits of one payload copy; also the tile size in
    /// coefficients. 512 for the default configuration.
    pub fn payload_bit_length(&self) -> usize {
        self.coded_payload_len() * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_payload_is_512_bits() {
        let cfg = WatermarkConfig::default();
        assert_eq!(cfg.coded_payload_len(), 64);
        assert_eq!(cfg.payload_bit_length(), 512);
    }

    #[test]
    fn smaller_ecc_budget_shrinks_the_tile() {
        let cfg = WatermarkConfig {
            ecc_bytes: 16,
            ..WatermarkConfig::default()
        };
        assert_eq!(cfg.payload_bit_length(), 384);
    }
}
