// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Fingerprint to coded-bitstream mapping and back.
//!
//! Encoding appends the Reed-Solomon parity block to the 32 fingerprint
//! bytes and unpacks the result MSB-first into individual bits, one per
//! embedding coefficient. Decoding packs the extracted bits back into
//! bytes and runs error correction; a payload that cannot be corrected is
//! reported as `None`, never as an error, because "nothing recoverable in
//! this image" is an ordinary outcome.

use tracing::debug;

use crate::ecc;
use crate::fingerprint::{Fingerprint, FINGERPRINT_LEN};

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((bits.len() + 7) / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}

/// Encode a fingerprint into the coded bitstream.
///
/// Returns `(FINGERPRINT_LEN + ecc_bytes) * 8` bit values (each 0 or 1):
/// the systematic RS codeword, fingerprint bytes first, unpacked MSB
/// first. With the default 32 parity bytes this is the 512-bit payload
/// that fills one embedding tile.
pub fn encode(fp: &Fingerprint, ecc_bytes: usize) -> Vec<u8> {
    let coded = ecc::rs_encode(fp.as_bytes(), ecc_bytes);
    bytes_to_bits(&coded)
}

/// Decode a coded bitstream back into a fingerprint.
///
/// Bits beyond the expected payload length are ignored. Returns `None`
/// when the bitstream is shorter than one payload, or when error
/// correction cannot converge; both mean "no recoverable watermark".
pub fn decode(bits: &[u8], ecc_bytes: usize) -> Option<Fingerprint> {
    let expected_bits = (FINGERPRINT_LEN + ecc_bytes) * 8;
    if bits.len() < expected_bits {
        return None;
    }

    let coded = bits_to_bytes(&bits[..expected_bits]);
    match ecc::rs_decode(&coded, FINGERPRINT_LEN, ecc_bytes) {
        Ok((data, symbols_fixed)) => {
            debug!(symbols_fixed, "payload decoded");
            let mut raw = [0u8; FINGERPRINT_LEN];
            raw.copy_from_slice(&data);
            Some(Fingerprint::new(raw))
        }
        Err(_) => {
            debug!("payload unrecoverable, error correction did not converge");
            None
        }
    }
}
