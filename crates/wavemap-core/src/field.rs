//! Phasor field buffers
//!
//! A field holds one complex amplitude per grid cell, row-major. The real
//! part is the in-phase component and the imaginary part the quadrature
//! component, with the fixed convention that a wave of amplitude `a` and
//! phase `φ` is stored as `a·e^{+jφ}`.
//!
//! Buffers are allocated once and reused: synthesis and accumulation write in
//! place, so dragging an emitter around does not allocate per frame.

use num_complex::Complex64;

/// A single cell's complex amplitude
pub type FieldSample = Complex64;

/// Dense complex field over a grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Field {
    samples: Vec<FieldSample>,
}

/// Field produced by one emitter, owned by that emitter's slot
pub type SourceField = Field;

/// Regulated superposition of all active source fields
pub type CompositeField = Field;

impl Field {
    /// Empty field; storage is allocated on first synthesis.
    pub fn new() -> Self {
        Self { samples: Vec::new() }
    }

    /// All-zero field with `cells` samples.
    pub fn zeros(cells: usize) -> Self {
        Self {
            samples: vec![FieldSample::new(0.0, 0.0); cells],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[FieldSample] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [FieldSample] {
        &mut self.samples
    }

    /// Sample at a cell; cells outside the buffer read as zero.
    pub fn sample(&self, cell: usize) -> FieldSample {
        self.samples
            .get(cell)
            .copied()
            .unwrap_or_else(|| FieldSample::new(0.0, 0.0))
    }

    /// Resize to `cells` samples, reusing the existing allocation when the
    /// size already matches.
    pub fn ensure_len(&mut self, cells: usize) {
        if self.samples.len() != cells {
            self.samples.resize(cells, FieldSample::new(0.0, 0.0));
        }
    }

    pub fn fill_zero(&mut self) {
        self.samples.fill(FieldSample::new(0.0, 0.0));
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.re.is_finite() && s.im.is_finite())
    }

    /// True when every sample is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.samples.iter().all(|s| s.re == 0.0 && s.im == 0.0)
    }

    /// Split into separate in-phase and quadrature buffers.
    pub fn components(&self) -> (Vec<f64>, Vec<f64>) {
        self.samples.iter().map(|s| (s.re, s.im)).unzip()
    }

    /// Largest per-cell distance `|a - b|` between two fields of equal size.
    ///
    /// Returns `f64::INFINITY` when the sizes differ.
    pub fn max_abs_diff(&self, other: &Field) -> f64 {
        if self.len() != other.len() {
            return f64::INFINITY;
        }
        self.samples
            .iter()
            .zip(other.samples.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }

    /// Largest per-cell magnitude.
    pub fn peak_magnitude(&self) -> f64 {
        self.samples.iter().map(|s| s.norm()).fold(0.0, f64::max)
    }
}
