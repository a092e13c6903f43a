//! Source Field Synthesizer
//!
//! Computes one emitter's continuous-wave phasor at every grid cell.
//!
//! ## Model
//!
//! For a cell at physical offset `(dx, dy)` from the emitter:
//!
//! ```text
//!   r = max(sqrt(dx² + dy²), r_min)        r_min = one cell's physical size
//!   φ = phase_offset + r / λ   (mod 2π)
//!   a = reference_gain / r²                free-space inverse square
//!   z = a·cos φ + j·a·sin φ
//! ```
//!
//! The `r_min` clamp keeps cells that coincide with the emitter finite.
//! Trigonometry is either evaluated directly or read from a
//! [`CosineTable`]; both paths use the same `+sin` quadrature convention.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cosine_table::CosineTable;
use crate::field::SourceField;
use crate::grid::{GridSpec, Position};

/// Position, phase and gain of one point emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSource {
    /// Grid-relative position
    pub position: Position,
    /// Phase offset in radians
    pub phase_offset: f64,
    /// Amplitude at 1 meter
    pub reference_gain: f64,
}

impl PointSource {
    pub fn new(position: Position, phase_offset: f64, reference_gain: f64) -> Self {
        Self {
            position,
            phase_offset,
            reference_gain,
        }
    }
}

/// Per-synthesis constants shared by every row.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    x0: f64,
    y0: f64,
    cell_x_m: f64,
    cell_y_m: f64,
    min_radius_m: f64,
    wavelength_m: f64,
    phase_offset: f64,
    gain: f64,
}

impl Geometry {
    fn new(source: &PointSource, grid: &GridSpec) -> Self {
        Self {
            x0: source.position.x * grid.width() as f64,
            y0: source.position.y * grid.height() as f64,
            cell_x_m: grid.cell_size_x_m(),
            cell_y_m: grid.cell_size_y_m(),
            min_radius_m: grid.min_radius_m(),
            wavelength_m: grid.wavelength_m(),
            phase_offset: source.phase_offset,
            gain: source.reference_gain,
        }
    }

    #[inline]
    fn fill_row(&self, y: usize, row: &mut [Complex64], table: Option<&CosineTable>) {
        let dy = (y as f64 - self.y0) * self.cell_y_m;
        let dy2 = dy * dy;
        for (x, sample) in row.iter_mut().enumerate() {
            let dx = (x as f64 - self.x0) * self.cell_x_m;
            let r = (dx * dx + dy2).sqrt().max(self.min_radius_m);
            let amplitude = self.gain / (r * r);
            let phase = (self.phase_offset + r / self.wavelength_m).rem_euclid(TAU);
            let (cos, sin) = match table {
                Some(t) => t.cos_sin(phase),
                None => (phase.cos(), phase.sin()),
            };
            *sample = Complex64::new(amplitude * cos, amplitude * sin);
        }
    }
}

/// Synthesize `source`'s field over `grid` into `out`.
///
/// `out` is resized only if its length differs from the grid's cell count,
/// so a buffer that is passed back in every frame is never reallocated.
pub fn synthesize(
    source: &PointSource,
    grid: &GridSpec,
    table: Option<&CosineTable>,
    out: &mut SourceField,
) {
    out.ensure_len(grid.cell_count());
    let geometry = Geometry::new(source, grid);
    let width = grid.width();

    #[cfg(feature = "parallel")]
    out.samples_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| geometry.fill_row(y, row, table));

    #[cfg(not(feature = "parallel"))]
    out.samples_mut()
        .chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| geometry.fill_row(y, row, table));
}

/// Grid-bound synthesizer that optionally owns a cosine table.
#[derive(Debug, Clone)]
pub struct FieldSynthesizer {
    grid: GridSpec,
    table: Option<CosineTable>,
}

impl FieldSynthesizer {
    pub fn new(grid: GridSpec, table: Option<CosineTable>) -> Self {
        Self { grid, table }
    }

    /// Synthesizer using direct `cos`/`sin` evaluation.
    pub fn direct(grid: GridSpec) -> Self {
        Self::new(grid, None)
    }

    /// Synthesizer using a cosine table built for the grid's wavelength.
    pub fn tabulated(grid: GridSpec, scale_factor: f64) -> Self {
        let table = CosineTable::build(scale_factor, grid.wavelength_m());
        Self::new(grid, Some(table))
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn table(&self) -> Option<&CosineTable> {
        self.table.as_ref()
    }

    pub fn synthesize(&self, source: &PointSource, out: &mut SourceField) {
        synthesize(source, &self.grid, self.table.as_ref(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> GridSpec {
        GridSpec::new(40, 30, 5.0, 0.125).unwrap()
    }

    /// Field computed one cell at a time, independent of the row split.
    fn per_cell_reference(
        source: &PointSource,
        grid: &GridSpec,
        table: Option<&CosineTable>,
    ) -> Vec<Complex64> {
        let x0 = source.position.x * grid.width() as f64;
        let y0 = source.position.y * grid.height() as f64;
        (0..grid.cell_count())
            .map(|cell| {
                let (x, y) = grid.cell_coords(cell);
                let dx = (x as f64 - x0) * grid.cell_size_x_m();
                let dy = (y as f64 - y0) * grid.cell_size_y_m();
                let r = (dx * dx + dy * dy).sqrt().max(grid.min_radius_m());
                let a = source.reference_gain / (r * r);
                let phase = (source.phase_offset + r / grid.wavelength_m()).rem_euclid(TAU);
                let (cos, sin) = match table {
                    Some(t) => t.cos_sin(phase),
                    None => (phase.cos(), phase.sin()),
                };
                Complex64::new(a * cos, a * sin)
            })
            .collect()
    }

    fn assert_matches_reference(grid: GridSpec) {
        let table = CosineTable::build(32_768.0, grid.wavelength_m());
        let source = PointSource::new(Position::new(0.37, 0.61), 1.9, 1.5);
        let mut field = SourceField::new();
        for t in [None, Some(&table)] {
            synthesize(&source, &grid, t, &mut field);
            assert_eq!(field.samples(), per_cell_reference(&source, &grid, t).as_slice());
        }
    }

    #[test]
    fn test_rows_match_per_cell_reference() {
        assert_matches_reference(small_grid());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_rows_match_per_cell_reference() {
        // Enough rows to be split across rayon workers
        assert_matches_reference(GridSpec::new(257, 311, 25.0, 0.125).unwrap());
        assert_matches_reference(GridSpec::new(1, 500, 25.0, 0.125).unwrap());
    }

    #[test]
    fn test_finite_when_emitter_on_cell() {
        let grid = small_grid();
        let mut field = SourceField::new();
        // (0.5, 0.5) lands exactly on cell (20, 15)
        let source = PointSource::new(Position::new(0.5, 0.5), 0.0, 1.0);
        synthesize(&source, &grid, None, &mut field);
        assert_eq!(field.len(), grid.cell_count());
        assert!(field.is_finite());

        let cell = 15 * 40 + 20;
        let r_min = grid.min_radius_m();
        let expected = 1.0 / (r_min * r_min);
        assert!((field.sample(cell).norm() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_finite_at_corners_and_edges() {
        let grid = small_grid();
        let table = CosineTable::build(32_768.0, grid.wavelength_m());
        let mut field = SourceField::new();
        for &(x, y) in &[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.999, 0.001)] {
            let source = PointSource::new(Position::new(x, y), 1.3, 2.0);
            synthesize(&source, &grid, None, &mut field);
            assert!(field.is_finite());
            synthesize(&source, &grid, Some(&table), &mut field);
            assert!(field.is_finite());
        }
    }

    #[test]
    fn test_zero_gain_is_all_zero() {
        let grid = small_grid();
        let mut field = SourceField::new();
        let source = PointSource::new(Position::new(0.25, 0.75), 0.7, 0.0);
        synthesize(&source, &grid, None, &mut field);
        assert!(field.is_zero());
        assert!(field.is_finite());
    }

    #[test]
    fn test_phase_and_amplitude_follow_distance() {
        let grid = small_grid();
        let mut field = SourceField::new();
        let phase_offset = 0.4;
        let source = PointSource::new(Position::new(0.0, 0.0), phase_offset, 1.0);
        synthesize(&source, &grid, None, &mut field);

        // Cell (8, 6): 1.0 m by 1.0 m from the origin
        let (x, y) = (8usize, 6usize);
        let dx = x as f64 * grid.cell_size_x_m();
        let dy = y as f64 * grid.cell_size_y_m();
        let r = (dx * dx + dy * dy).sqrt();
        let expected_phase = (phase_offset + r / grid.wavelength_m()).rem_euclid(TAU);
        let z = field.sample(y * grid.width() + x);

        assert!((z.norm() - 1.0 / (r * r)).abs() < 1e-12);
        let got_phase = z.im.atan2(z.re).rem_euclid(TAU);
        let diff = (got_phase - expected_phase).abs();
        assert!(diff < 1e-9 || (TAU - diff) < 1e-9);
    }

    #[test]
    fn test_amplitude_peaks_at_emitter() {
        let grid = small_grid();
        let mut field = SourceField::new();
        let source = PointSource::new(Position::new(0.25, 0.5), 0.0, 1.0);
        synthesize(&source, &grid, None, &mut field);
        let emitter_cell = grid.cell_index(source.position);
        let peak = field.peak_magnitude();
        assert!((field.sample(emitter_cell).norm() - peak).abs() < 1e-9);
    }

    #[test]
    fn test_table_matches_direct() {
        let grid = small_grid();
        let synth_table = FieldSynthesizer::tabulated(grid, 32_768.0);
        let synth_direct = FieldSynthesizer::direct(grid);
        let step = synth_table.table().unwrap().step();

        let source = PointSource::new(Position::new(0.3, 0.6), 2.1, 1.0);
        let mut a = SourceField::new();
        let mut b = SourceField::new();
        synth_table.synthesize(&source, &mut a);
        synth_direct.synthesize(&source, &mut b);

        for (ta, db) in a.samples().iter().zip(b.samples()) {
            // Quantization error scales with amplitude
            let tolerance = db.norm() * step + 1e-12;
            assert!((ta - db).norm() <= tolerance);
        }
    }

    #[test]
    fn test_buffer_is_reused() {
        let grid = small_grid();
        let synth = FieldSynthesizer::direct(grid);
        let mut field = SourceField::new();
        synth.synthesize(&PointSource::new(Position::new(0.1, 0.1), 0.0, 1.0), &mut field);
        let ptr = field.samples().as_ptr();
        synth.synthesize(&PointSource::new(Position::new(0.9, 0.2), 1.0, 3.0), &mut field);
        assert_eq!(field.samples().as_ptr(), ptr);
    }
}
