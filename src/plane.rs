// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Row-major f64 sample plane.
//!
//! The transform pipeline works on floating-point planes between the
//! integer pixel domain and the coefficient domain. Layout is row-major,
//! index `y * width + x`.

/// A width x height grid of f64 samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl Plane {
    /// All-zero plane.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0.0; width * height],
            width,
            height,
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Panics
    /// Panics when `data.len() != width * height`.
    pub fn from_vec(data: Vec<f64>, width: usize, height: usize) -> Self {
        assert_eq!(data.len(), width * height, "buffer does not match dimensions");
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total sample count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x] = value;
    }

    /// Flattened row-major view.
    pub fn samples(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flattened row-major view.
    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}
