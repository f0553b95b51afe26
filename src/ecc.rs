// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Reed-Solomon error correction for the coded watermark payload.
//!
//! Systematic RS over GF(2^8) with the primitive polynomial 0x11D
//! (x^8+x^4+x^3+x^2+1), first consecutive root alpha^0 and generator
//! element alpha = 2. These are the conventional parameters of
//! byte-oriented RS codecs, so payloads produced here interoperate with
//! standard implementations of the same code. The watermark payload is a
//! single shortened block (data + parity well under the 255-symbol limit);
//! decoding corrects up to `parity_len / 2` corrupted symbols and rejects
//! anything beyond that bound with high probability.

/// Primitive polynomial for GF(2^8): x^8 + x^4 + x^3 + x^2 + 1.
const PRIM_POLY: u16 = 0x11D;

/// Symbols per full RS block; shortened blocks are zero-extended to this.
const N_MAX: usize = 255;

// --- GF(2^8) arithmetic ---

/// Precomputed log and exp tables for GF(2^8).
struct GfTables {
    exp: [u8; 512],
    log: [u8; 256],
}

fn build_gf_tables() -> GfTables {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];

    let mut x: u16 = 1;
    for i in 0..255u16 {
        exp[i as usize] = x as u8;
        exp[(i + 255) as usize] = x as u8; // doubled for mod-free products
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIM_POLY;
        }
    }
    // log[0] stays 0 (undefined); top two exp slots are padding
    exp[510] = exp[0];
    exp[511] = exp[1];

    GfTables { exp, log }
}

fn gf_tables() -> &'static GfTables {
    use std::sync::OnceLock;
    static TABLES: OnceLock<GfTables> = OnceLock::new();
    TABLES.get_or_init(build_gf_tables)
}

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = gf_tables();
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

/// Addition in GF(2^8) is XOR.
fn gf_add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiplicative inverse. Panics on zero.
fn gf_inv(a: u8) -> u8 {
    assert_ne!(a, 0, "cannot invert zero in GF(2^8)");
    let t = gf_tables();
    t.exp[255 - t.log[a as usize] as usize]
}

#[cfg(test)]
fn gf_pow(a: u8, n: u32) -> u8 {
    if a == 0 {
        return if n == 0 { 1 } else { 0 };
    }
    let t = gf_tables();
    t.exp[((t.log[a as usize] as u32 * n) % 255) as usize]
}

/// Evaluate a polynomial given highest-degree-first coefficients.
fn poly_eval(poly: &[u8], x: u8) -> u8 {
    let mut acc = 0u8;
    for &coeff in poly {
        acc = gf_add(gf_mul(acc, x), coeff);
    }
    acc
}

/// Evaluate a polynomial given ascending-power coefficients.
fn poly_eval_asc(poly: &[u8], x: u8) -> u8 {
    let mut acc = 0u8;
    let mut x_pow = 1u8;
    for &coeff in poly {
        acc = gf_add(acc, gf_mul(coeff, x_pow));
        x_pow = gf_mul(x_pow, x);
    }
    acc
}

fn poly_mul(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; a.len() + b.len() - 1];
    for (i, &ac) in a.iter().enumerate() {
        for (j, &bc) in b.iter().enumerate() {
            out[i + j] = gf_add(out[i + j], gf_mul(ac, bc));
        }
    }
    out
}

/// g(x) = prod_{i=0}^{parity_len-1} (x - alpha^i), highest degree first.
fn build_gen_poly(parity_len: usize) -> Vec<u8> {
    let t = gf_tables();
    let mut gpoly = vec![1u8];
    for i in 0..parity_len {
        gpoly = poly_mul(&gpoly, &[1, t.exp[i]]);
    }
    gpoly
}

/// Generator polynomial for a parity length, caching the one the default
/// configuration uses so repeated embed/decode calls skip the rebuild.
fn gen_poly(parity_len: usize) -> Vec<u8> {
    use std::sync::OnceLock;
    static DEFAULT_GEN: OnceLock<Vec<u8>> = OnceLock::new();

    if parity_len == crate::config::DEFAULT_ECC_BYTES {
        DEFAULT_GEN.get_or_init(|| build_gen_poly(parity_len)).clone()
    } else {
        build_gen_poly(parity_len)
    }
}

// --- Encoding ---

/// Systematically encode `data`, appending `parity_len` parity symbols.
///
/// # Arguments
/// - `data`: payload bytes; `data.len() + parity_len` must not exceed 255.
/// - `parity_len`: parity symbols to append; must be even and nonzero.
///
/// # Returns
/// `data.len() + parity_len` bytes: the unmodified data followed by the
/// parity block.
///
/// # Panics
/// Panics when the block would exceed 255 symbols or `parity_len` is odd
/// or zero. Both are configuration mistakes, not runtime conditions.
pub fn rs_encode(data: &[u8], parity_len: usize) -> Vec<u8> {
    assert!(parity_len >= 2 && parity_len % 2 == 0, "parity_len must be even and nonzero");
    assert!(
        data.len() + parity_len <= N_MAX,
        "block of {} data + {} parity symbols exceeds {}",
        data.len(),
        parity_len,
        N_MAX
    );

    let gpoly = gen_poly(parity_len);

    // LFSR division: the shift register ends up holding the remainder of
    // data(x) * x^parity_len mod g(x), which is the parity block.
    let mut shift_reg = vec![0u8; parity_len];
    for &byte in data {
        let feedback = gf_add(byte, shift_reg[0]);
        for j in 0..parity_len - 1 {
            shift_reg[j] = gf_add(shift_reg[j + 1], gf_mul(feedback, gpoly[j + 1]));
        }
        shift_reg[parity_len - 1] = gf_mul(feedback, gpoly[parity_len]);
    }

    let mut encoded = Vec::with_capacity(data.len() + parity_len);
    encoded.extend_from_slice(data);
    encoded.extend_from_slice(&shift_reg);
    encoded
}

// --- Decoding ---

/// Decoding failed: the received block holds more corrupted symbols than
/// the parity budget can correct.
#[derive(Debug, PartialEq, Eq)]
pub struct RsDecodeError;

impl core::fmt::Display for RsDecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Reed-Solomon: too many errors to correct")
    }
}

impl std::error::Error for RsDecodeError {}

/// Berlekamp-Massey: smallest LFSR generating the syndrome sequence.
/// Returns the error locator sigma(x) in ascending powers, sigma[0] = 1.
fn berlekamp_massey(syndromes: &[u8]) -> Vec<u8> {
    let n = syndromes.len();

    let mut c = vec![0u8; n + 1];
    c[0] = 1;
    let mut c_len = 1usize;

    let mut b = vec![0u8; n + 1];
    b[0] = 1;
    let mut b_len = 1usize;

    let mut ell = 0usize;
    let mut bval = 1u8;
    let mut m = 1usize;

    for r in 0..n {
        let mut delta = syndromes[r];
        for i in 1..c_len {
            delta = gf_add(delta, gf_mul(c[i], syndromes[r - i]));
        }

        if delta == 0 {
            m += 1;
            continue;
        }

        let factor = gf_mul(delta, gf_inv(bval));

        if 2 * ell <= r {
            let old_c = c.clone();
            let old_c_len = c_len;

            c_len = (b_len + m).max(c_len);
            for j in 0..b_len {
                c[j + m] = gf_add(c[j + m], gf_mul(factor, b[j]));
            }

            b[..old_c_len].copy_from_slice(&old_c[..old_c_len]);
            for slot in b.iter_mut().skip(old_c_len) {
                *slot = 0;
            }
            b_len = old_c_len;
            ell = r + 1 - ell;
            bval = delta;
            m = 1;
        } else {
            c_len = (b_len + m).max(c_len);
            for j in 0..b_len {
                c[j + m] = gf_add(c[j + m], gf_mul(factor, b[j]));
            }
            m += 1;
        }
    }

    c[..c_len].to_vec()
}

/// Chien search over the full block: error positions are the GF positions
/// p where sigma(alpha^{-p}) = 0; array index is n-1-p. Returns None when
/// the root count disagrees with sigma's degree (uncorrectable).
fn chien_search(sigma_asc: &[u8], n: usize) -> Option<Vec<(usize, usize)>> {
    let t = gf_tables();
    let num_errors = sigma_asc.len() - 1;
    let mut found = Vec::with_capacity(num_errors);

    for p in 0..n {
        let x = if p == 0 {
            1u8
        } else {
            t.exp[(255 - (p % 255)) % 255]
        };
        if poly_eval_asc(sigma_asc, x) == 0 {
            found.push((p, n - 1 - p));
        }
    }

    if found.len() == num_errors {
        Some(found)
    } else {
        None
    }
}

/// Forney error magnitudes. With first consecutive root alpha^0 the
/// magnitude at X_l is X_l * Omega(X_l^{-1}) / sigma'(X_l^{-1}), where
/// Omega = S(x) * sigma(x) mod x^{2t}.
fn forney(sigma_asc: &[u8], syndromes: &[u8], found: &[(usize, usize)]) -> Vec<u8> {
    let t = gf_tables();
    let two_t = syndromes.len();

    let mut omega = vec![0u8; two_t];
    for i in 0..sigma_asc.len().min(two_t) {
        for j in 0..two_t {
            if i + j < two_t {
                omega[i + j] = gf_add(omega[i + j], gf_mul(sigma_asc[i], syndromes[j]));
            }
        }
    }

    // Formal derivative in characteristic 2: even-power terms vanish.
    let mut sigma_prime = vec![0u8; sigma_asc.len().saturating_sub(1)];
    for i in (1..sigma_asc.len()).step_by(2) {
        sigma_prime[i - 1] = sigma_asc[i];
    }

    let mut magnitudes = Vec::with_capacity(found.len());
    for &(gf_pos, _) in found {
        let x_val = if gf_pos == 0 { 1u8 } else { t.exp[gf_pos % 255] };
        let x_inv = if gf_pos == 0 {
            1u8
        } else {
            t.exp[(255 - (gf_pos % 255)) % 255]
        };

        let omega_val = poly_eval_asc(&omega, x_inv);
        let sp_val = poly_eval_asc(&sigma_prime, x_inv);

        if sp_val == 0 {
            magnitudes.push(0);
            continue;
        }

        magnitudes.push(gf_mul(x_val, gf_mul(omega_val, gf_inv(sp_val))));
    }

    magnitudes
}

/// Decode one shortened RS block, correcting up to `parity_len / 2`
/// corrupted symbols.
///
/// # Arguments
/// - `received`: the possibly corrupted block, `data_len + parity_len`
///   bytes.
/// - `data_len`: payload length before parity was appended.
/// - `parity_len`: parity symbols used when encoding.
///
/// # Returns
/// The corrected payload together with the number of symbols that were
/// corrected (0 when the block arrived clean).
///
/// # Errors
/// [`RsDecodeError`] when more than `parity_len / 2` symbols are corrupt,
/// when a claimed error falls in the zero-extension of the shortened
/// block, or when the corrected block still fails the syndrome check.
/// Corruption far beyond the bound can in principle slip through as a
/// "successful" decode of the wrong codeword; callers must not treat a
/// returned payload as proof of integrity beyond the stated bound.
pub fn rs_decode(
    received: &[u8],
    data_len: usize,
    parity_len: usize,
) -> Result<(Vec<u8>, usize), RsDecodeError> {
    let block_len = data_len + parity_len;
    assert_eq!(
        received.len(),
        block_len,
        "received length {} != expected {}",
        received.len(),
        block_len
    );

    // Zero-extend the shortened block to the full 255 symbols.
    let padding = N_MAX - block_len;
    let mut full_block = vec![0u8; N_MAX];
    full_block[padding..].copy_from_slice(received);

    let t = gf_tables();
    let mut syndromes = vec![0u8; parity_len];
    for (i, syn) in syndromes.iter_mut().enumerate() {
        *syn = poly_eval(&full_block, t.exp[i]);
    }

    if syndromes.iter().all(|&s| s == 0) {
        return Ok((received[..data_len].to_vec(), 0));
    }

    let sigma_asc = berlekamp_massey(&syndromes);
    let num_errors = sigma_asc.len() - 1;
    if num_errors > parity_len / 2 {
        return Err(RsDecodeError);
    }

    let found = chien_search(&sigma_asc, N_MAX).ok_or(RsDecodeError)?;
    let magnitudes = forney(&sigma_asc, &syndromes, &found);

    let mut corrected = full_block;
    for (i, &(_, array_pos)) in found.iter().enumerate() {
        if array_pos < padding {
            // An error located in the zero-extension means the locator is
            // bogus; the real error pattern is uncorrectable.
            return Err(RsDecodeError);
        }
        corrected[array_pos] = gf_add(corrected[array_pos], magnitudes[i]);
    }

    // The corrected block must be a codeword; anything else is a failed
    // correction, not a partial success.
    for i in 0..parity_len {
        if poly_eval(&corrected, t.exp[i]) != 0 {
            return Err(RsDecodeError);
        }
    }

    Ok((corrected[padding..padding + data_len].to_vec(), num_errors))
}
