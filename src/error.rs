// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Error types for the watermarking pipeline.
//!
//! [`WatermarkError`] covers caller mistakes (malformed fingerprints) and
//! capacity shortfalls. A watermark that cannot be recovered from an image
//! is *not* an error: [`decode`](crate::decode) returns `Ok(None)` for
//! that case, because "no recoverable watermark" is a normal, user-facing
//! outcome that callers must be able to tell apart from a fault.

use core::fmt;

/// Errors that can occur during watermark embedding or decoding.
#[derive(Debug, PartialEq, Eq)]
pub enum WatermarkError {
    /// The fingerprint hex string does not contain exactly 64 hex digits
    /// (32 bytes) after the optional `0x` prefix is removed.
    InvalidFingerprintLength {
        /// Number of hex digits actually supplied.
        got: usize,
    },
    /// The fingerprint string contains non-hexadecimal characters.
    InvalidHexEncoding,
    /// The image's embedding sub-band holds fewer coefficients than one
    /// full copy of the coded payload. The remedy differs from other
    /// failures (use a larger image or a smaller ECC budget), so this is
    /// surfaced as its own variant with both numbers attached.
    InsufficientCapacity {
        /// Coefficients available in the embedding sub-band.
        capacity: usize,
        /// Coefficients needed for one payload copy.
        required: usize,
    },
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFingerprintLength { got } => {
                write!(f, "fingerprint must be 64 hex digits, got {got}")
            }
            Self::InvalidHexEncoding => write!(f, "fingerprint is not valid hexadecimal"),
            Self::InsufficientCapacity { capacity, required } => write!(
                f,
                "image too small: sub-band has {capacity} coefficients, {required} required"
            ),
        }
    }
}

impl std::error::Error for WatermarkError {}
