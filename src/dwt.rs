// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Multi-level dyadic Haar transform.
//!
//! Orthonormal Haar (2x2 averaging/differencing, 1/sqrt(2) per axis),
//! applied separably rows-then-columns per level. Forward and inverse
//! live side by side as a matched pair so round-trip identity can be
//! tested on arbitrary planes before any watermarking logic runs on top.
//!
//! Odd-length axes are extended by duplicating the final sample, so every
//! level halves to ceil(n/2); the inverse truncates each level back to
//! its recorded pre-split length and therefore always reproduces the
//! original dimensions. The approximation band at the coarsest level is
//! the embedding surface; detail bands pass through untouched.

use std::f64::consts::FRAC_1_SQRT_2;

use crate::plane::Plane;

/// The three detail bands of one decomposition level, named by which axis
/// carries the high-pass filter (rows first, then columns).
#[derive(Debug, Clone)]
pub struct DetailBands {
    /// High-pass rows, low-pass columns.
    pub hl: Plane,
    /// Low-pass rows, high-pass columns.
    pub lh: Plane,
    /// High-pass on both axes.
    pub hh: Plane,
}

/// A full multi-level decomposition of one plane.
///
/// Holds the coarsest approximation band plus the detail bands of every
/// level (coarsest first), along with the pre-split dimensions needed to
/// truncate padded axes on the way back.
#[derive(Debug, Clone)]
pub struct Decomposition {
    approx: Plane,
    details: Vec<DetailBands>,
    sizes: Vec<(usize, usize)>,
}

impl Decomposition {
    /// The coarsest-level approximation band.
    pub fn approx(&self) -> &Plane {
        &self.approx
    }

    /// Mutable access to the approximation band, for embedding.
    pub fn approx_mut(&mut self) -> &mut Plane {
        &mut self.approx
    }
}

/// Number of coefficients in the coarsest approximation band for an image
/// of the given dimensions, computable without running the transform.
/// Each level halves both axes to ceil(n/2).
pub fn subband_capacity(width: usize, height: usize, levels: usize) -> usize {
    let (mut w, mut h) = (width, height);
    for _ in 0..levels {
        w = (w + 1) / 2;
        h = (h + 1) / 2;
    }
    w * h
}

/// One analysis step along a 1D signal: `low[i]` and `high[i]` from the
/// pair at `2i`. An odd tail pairs the final sample with itself.
fn analyze_axis(signal: &[f64], low: &mut [f64], high: &mut [f64]) {
    let n = signal.len();
    for i in 0..low.len() {
        let a = signal[2 * i];
        let b = if 2 * i + 1 < n { signal[2 * i + 1] } else { a };
        low[i] = (a + b) * FRAC_1_SQRT_2;
        high[i] = (a - b) * FRAC_1_SQRT_2;
    }
}

/// One synthesis step along a 1D signal, truncating to `out.len()`.
fn synthesize_axis(low: &[f64], high: &[f64], out: &mut [f64]) {
    let n = out.len();
    for i in 0..low.len() {
        let a = (low[i] + high[i]) * FRAC_1_SQRT_2;
        let b = (low[i] - high[i]) * FRAC_1_SQRT_2;
        out[2 * i] = a;
        if 2 * i + 1 < n {
            out[2 * i + 1] = b;
        }
    }
}

/// One 2D analysis level: rows first, then columns.
fn analyze_level(plane: &Plane) -> (Plane, DetailBands) {
    let (w, h) = (plane.width(), plane.height());
    let half_w = (w + 1) / 2;
    let half_h = (h + 1) / 2;

    // Row pass: full height, half width.
    let mut row_low = Plane::new(half_w, h);
    let mut row_high = Plane::new(half_w, h);
    let mut low_buf = vec![0.0; half_w];
    let mut high_buf = vec![0.0; half_w];
    for y in 0..h {
        let row = &plane.samples()[y * w..(y + 1) * w];
        analyze_axis(row, &mut low_buf, &mut high_buf);
        for x in 0..half_w {
            row_low.set(x, y, low_buf[x]);
            row_high.set(x, y, high_buf[x]);
        }
    }

    // Column pass: half height on both halves.
    let mut ll = Plane::new(half_w, half_h);
    let mut lh = Plane::new(half_w, half_h);
    let mut hl = Plane::new(half_w, half_h);
    let mut hh = Plane::new(half_w, half_h);
    let mut col_buf = vec![0.0; h];
    let mut low_col = vec![0.0; half_h];
    let mut high_col = vec![0.0; half_h];
    for x in 0..half_w {
        for y in 0..h {
            col_buf[y] = row_low.get(x, y);
        }
        analyze_axis(&col_buf, &mut low_col, &mut high_col);
        for y in 0..half_h {
            ll.set(x, y, low_col[y]);
            lh.set(x, y, high_col[y]);
        }

        for y in 0..h {
            col_buf[y] = row_high.get(x, y);
        }
        analyze_axis(&col_buf, &mut low_col, &mut high_col);
        for y in 0..half_h {
            hl.set(x, y, low_col[y]);
            hh.set(x, y, high_col[y]);
        }
    }

    (ll, DetailBands { hl, lh, hh })
}

/// One 2D synthesis level, mirroring [`analyze_level`]: columns first,
/// then rows, truncating to the recorded pre-split dimensions.
fn synthesize_level(ll: &Plane, bands: &DetailBands, out_w: usize, out_h: usize) -> Plane {
    let half_w = ll.width();
    let half_h = ll.height();

    // Column pass back to full height.
    let mut row_low = Plane::new(half_w, out_h);
    let mut row_high = Plane::new(half_w, out_h);
    let mut low_col = vec![0.0; half_h];
    let mut high_col = vec![0.0; half_h];
    let mut col_out = vec![0.0; out_h];
    for x in 0..half_w {
        for y in 0..half_h {
            low_col[y] = ll.get(x, y);
            high_col[y] = bands.lh.get(x, y);
        }
        synthesize_axis(&low_col, &high_col, &mut col_out);
        for y in 0..out_h {
            row_low.set(x, y, col_out[y]);
        }

        for y in 0..half_h {
            low_col[y] = bands.hl.get(x, y);
            high_col[y] = bands.hh.get(x, y);
        }
        synthesize_axis(&low_col, &high_col, &mut col_out);
        for y in 0..out_h {
            row_high.set(x, y, col_out[y]);
        }
    }

    // Row pass back to full width.
    let mut out = Plane::new(out_w, out_h);
    let mut low_buf = vec![0.0; half_w];
    let mut high_buf = vec![0.0; half_w];
    let mut row_out = vec![0.0; out_w];
    for y in 0..out_h {
        for x in 0..half_w {
            low_buf[x] = row_low.get(x, y);
            high_buf[x] = row_high.get(x, y);
        }
        synthesize_axis(&low_buf, &high_buf, &mut row_out);
        for x in 0..out_w {
            out.set(x, y, row_out[x]);
        }
    }

    out
}

/// Decompose a plane over `levels` dyadic levels.
///
/// # Panics
/// Panics when `levels` is zero.
pub fn forward(plane: Plane, levels: usize) -> Decomposition {
    assert!(levels >= 1, "at least one decomposition level required");

    let mut current = plane;
    let mut details = Vec::with_capacity(levels);
    let mut sizes = Vec::with_capacity(levels);

    for _ in 0..levels {
        sizes.push((current.width(), current.height()));
        let (ll, bands) = analyze_level(&current);
        details.push(bands);
        current = ll;
    }

    // Store coarsest first so reconstruction walks the vectors forward.
    details.reverse();
    sizes.reverse();

    Decomposition {
        approx: current,
        details,
        sizes,
    }
}

/// Reconstruct the plane from a (possibly modified) decomposition.
/// Output dimensions always equal the plane originally passed to
/// [`forward`].
pub fn inverse(dec: Decomposition) -> Plane {
    let mut current = dec.approx;
    for (bands, (w, h)) in dec.details.iter().zip(dec.sizes.iter()) {
        current = synthesize_level(&current, bands, *w, *h);
    }
    current
}
