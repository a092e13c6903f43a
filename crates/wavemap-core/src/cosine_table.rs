//! Quantized cosine lookup table
//!
//! Synthesizing a field evaluates a cosine and a sine for every grid cell,
//! which dominates the cost of a recomputation. The table samples one full
//! period `[0, 2π)` at `wrap_len` points and appends a quarter period so a
//! sine can be read from the same samples:
//!
//! ```text
//!   sin θ = −cos(θ + π/2)
//!
//!   index:  0 ........................ wrap_len ...... wrap_len + wrap_len/4
//!           |<──────── one period ──────────>|<─ quarter ─>|
//!   cos:    q                                 (no wrap needed for q + wrap_len/4)
//!   sin:    −table[q + wrap_len/4]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wavemap_core::CosineTable;
//!
//! let table = CosineTable::build(32_768.0, 0.125);
//! assert_eq!(table.wrap_len(), 4096);
//!
//! let (c, s) = table.cos_sin(std::f64::consts::FRAC_PI_2);
//! assert!(c.abs() < table.step());
//! assert!((s - 1.0).abs() < table.step());
//! ```

use std::f64::consts::TAU;

/// Smallest table that still has an exact quarter-period offset.
const MIN_WRAP_LEN: usize = 4;

/// Largest table length; longer requests are clamped.
pub const MAX_WRAP_LEN: usize = 1 << 20;

/// Precomputed cosine samples over one period plus a quarter-period tail.
#[derive(Debug, Clone)]
pub struct CosineTable {
    samples: Vec<f64>,
    wrap_len: usize,
    quarter: usize,
}

impl CosineTable {
    /// Build a table of `floor(scale_factor * wavelength_m)` samples per
    /// period.
    ///
    /// The length is rounded down to a multiple of four and kept within
    /// `4..=MAX_WRAP_LEN` so the sine offset lands exactly on a quarter
    /// period.
    pub fn build(scale_factor: f64, wavelength_m: f64) -> Self {
        Self::with_wrap_len(Self::requested_len(scale_factor, wavelength_m))
    }

    /// Unclamped `floor(scale_factor * wavelength_m)`, saturating; 0 when
    /// not positive.
    pub fn requested_len(scale_factor: f64, wavelength_m: f64) -> usize {
        let raw = (scale_factor * wavelength_m).floor();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            // Saturates at usize::MAX for huge or infinite values
            raw as usize
        }
    }

    /// Build a table with an explicit number of samples per period.
    pub fn with_wrap_len(wrap_len: usize) -> Self {
        let wrap_len = (wrap_len.min(MAX_WRAP_LEN) / 4 * 4).max(MIN_WRAP_LEN);
        let quarter = wrap_len / 4;
        let step = TAU / wrap_len as f64;
        let samples = (0..wrap_len + quarter)
            .map(|k| (k as f64 * step).cos())
            .collect();
        Self {
            samples,
            wrap_len,
            quarter,
        }
    }

    /// Samples per period.
    pub fn wrap_len(&self) -> usize {
        self.wrap_len
    }

    /// Angular quantization step `2π / wrap_len` in radians.
    pub fn step(&self) -> f64 {
        TAU / self.wrap_len as f64
    }

    /// Nearest table index for a phase in radians (any real value).
    #[inline]
    pub fn quantize(&self, phase: f64) -> usize {
        let turns = phase.rem_euclid(TAU) / TAU;
        // NaN casts to 0; rounding up to wrap_len wraps back to 0
        ((turns * self.wrap_len as f64).round() as usize) % self.wrap_len
    }

    #[inline]
    pub fn lookup_cos(&self, quantized: usize) -> f64 {
        self.samples[quantized % self.wrap_len]
    }

    #[inline]
    pub fn lookup_sin(&self, quantized: usize) -> f64 {
        -self.samples[quantized % self.wrap_len + self.quarter]
    }

    /// Quantize `phase` and return `(cos, sin)` from the table.
    #[inline]
    pub fn cos_sin(&self, phase: f64) -> (f64, f64) {
        let q = self.quantize(phase);
        (self.lookup_cos(q), self.lookup_sin(q))
    }
}
