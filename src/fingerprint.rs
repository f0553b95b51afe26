// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! The 32-byte content fingerprint hidden inside an image.
//!
//! Externally a fingerprint travels as a hex string with an optional `0x`
//! prefix; internally it is a fixed 32-byte value. Parsing accepts mixed
//! case, rendering is canonical `0x` + lowercase. The codec never
//! generates fingerprints; callers produce them (typically as a
//! cryptographic hash of the content being marked).

use core::fmt;
use std::str::FromStr;

use crate::error::WatermarkError;

/// Fingerprint size in bytes.
pub const FINGERPRINT_LEN: usize = 32;

/// A parsed, validated 32-byte fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Wrap raw fingerprint bytes.
    pub fn new(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

impl From<[u8; FINGERPRINT_LEN]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Fingerprint {
    type Err = WatermarkError;

    /// Parse a hex fingerprint, tolerating an optional `0x`/`0X` prefix
    /// and mixed-case digits.
    ///
    /// # Errors
    /// [`WatermarkError::InvalidFingerprintLength`] when the string does
    /// not hold exactly 64 hex digits after the prefix;
    /// [`WatermarkError::InvalidHexEncoding`] when it holds anything but
    /// hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != FINGERPRINT_LEN * 2 {
            return Err(WatermarkError::InvalidFingerprintLength { got: digits.len() });
        }

        let mut bytes = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| WatermarkError::InvalidHexEncoding)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    /// Canonical rendering: `0x` followed by 64 lowercase hex digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AA_HEX: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    #[test]
    fn parses_with_and_without_prefix() {
        let plain: Fingerprint = AA_HEX.parse().unwrap();
        let prefixed: Fingerprint = format!("0x{AA_HEX}").parse().unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.as_bytes(), &[0xAA; 32]);
    }

    #[test]
    fn parse_is_case_insensitive() {
        let lower: Fingerprint = "0xdeadbeef00000000000000000000000000000000000000000000000000000000"
            .parse()
            .unwrap();
        let upper: Fingerprint = "0XDEADBEEF00000000000000000000000000000000000000000000000000000000"
            .parse()
            .unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn display_is_prefixed_lowercase() {
        let fp = Fingerprint::new([0xAB; 32]);
        let s = fp.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 2 + 64);
        assert_eq!(s, format!("0x{}", "ab".repeat(32)));
    }

    #[test]
    fn display_parse_roundtrip() {
        let fp = Fingerprint::new(*b"0123456789abcdef0123456789abcdef");
        let back: Fingerprint = fp.to_string().parse().unwrap();
        assert_eq!(fp, back);
    }

    #[test]
    fn wrong_length_rejected() {
        // 63 digits
        let short = &AA_HEX[..63];
        assert_eq!(
            short.parse::<Fingerprint>(),
            Err(WatermarkError::InvalidFingerprintLength { got: 63 })
        );
        // 66 digits
        let long = format!("{AA_HEX}bb");
        assert_eq!(
            long.parse::<Fingerprint>(),
            Err(WatermarkError::InvalidFingerprintLength { got: 66 })
        );
        assert_eq!(
            "".parse::<Fingerprint>(),
            Err(WatermarkError::InvalidFingerprintLength { got: 0 })
        );
    }

    #[test]
    fn non_hex_rejected() {
        let bad = format!("zz{}", &AA_HEX[2..]);
        assert_eq!(bad.parse::<Fingerprint>(), Err(WatermarkError::InvalidHexEncoding));
    }

    #[test]
    fn prefix_only_stripped_once() {
        // A second "0x" inside the digits is not hex and must fail,
        // not be silently removed.
        let nested = format!("0x0x{}", &AA_HEX[..62]);
        assert_eq!(
            nested.parse::<Fingerprint>(),
            Err(WatermarkError::InvalidHexEncoding)
        );
    }
}
