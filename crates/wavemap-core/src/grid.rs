//! Grid geometry
//!
//! Maps a square room of `room_size_m` meters onto a `width × height` cell
//! grid. Emitter and receiver positions are stored grid-relative in `[0, 1]`
//! so they survive changes of resolution.
//!
//! ```text
//!  (0,0) ──────────── x ──────────► (1,0)
//!    │  cell 0   cell 1  ...  cell w-1
//!    │  cell w   ...
//!    y
//!    ▼
//!  (0,1)                  one cell = room_size_m / width meters
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{WavemapError, WavemapResult};

/// Largest grid accepted, in cells (2048 × 2048).
pub const MAX_GRID_CELLS: usize = 1 << 22;

/// Grid-relative position, both coordinates nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp both coordinates into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }
}

/// Immutable grid specification.
///
/// Invalid dimensions are rejected at construction, so every `GridSpec` in
/// circulation has at least one cell and strictly positive physical sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    width: usize,
    height: usize,
    room_size_m: f64,
    wavelength_m: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            room_size_m: 25.0,
            wavelength_m: 3e8 / 2.4e9, // 2.4 GHz ISM
        }
    }
}

impl GridSpec {
    /// Create a grid, validating its dimensions.
    pub fn new(width: usize, height: usize, room_size_m: f64, wavelength_m: f64) -> WavemapResult<Self> {
        if width == 0 || height == 0 {
            return Err(WavemapError::InvalidGrid(format!(
                "dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        match width.checked_mul(height) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(WavemapError::InvalidGrid(format!(
                    "{}x{} exceeds {} cells",
                    width, height, MAX_GRID_CELLS
                )))
            }
        }
        if !(room_size_m.is_finite() && room_size_m > 0.0) {
            return Err(WavemapError::InvalidGrid(format!(
                "room size must be positive, got {}",
                room_size_m
            )));
        }
        if !(wavelength_m.is_finite() && wavelength_m > 0.0) {
            return Err(WavemapError::InvalidGrid(format!(
                "wavelength must be positive, got {}",
                wavelength_m
            )));
        }
        Ok(Self {
            width,
            height,
            room_size_m,
            wavelength_m,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn room_size_m(&self) -> f64 {
        self.room_size_m
    }

    pub fn wavelength_m(&self) -> f64 {
        self.wavelength_m
    }

    /// Number of cells (`width * height`), the length of every field buffer.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Physical width of one cell in meters.
    pub fn cell_size_x_m(&self) -> f64 {
        self.room_size_m / self.width as f64
    }

    /// Physical height of one cell in meters.
    pub fn cell_size_y_m(&self) -> f64 {
        self.room_size_m / self.height as f64
    }

    /// Radius substituted when a cell coincides with an emitter.
    ///
    /// One cell's physical size (the smaller side), which keeps the
    /// inverse-square amplitude finite.
    pub fn min_radius_m(&self) -> f64 {
        self.cell_size_x_m().min(self.cell_size_y_m())
    }

    /// Cell index containing a grid-relative position.
    ///
    /// Out-of-range positions land on the nearest edge cell.
    pub fn cell_index(&self, position: Position) -> usize {
        let x = Self::axis_cell(position.x, self.width);
        let y = Self::axis_cell(position.y, self.height);
        y * self.width + x
    }

    /// `(x, y)` coordinates of a cell index.
    pub fn cell_coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    fn axis_cell(frac: f64, cells: usize) -> usize {
        // NaN saturates to 0 in the cast
        let cell = (frac * cells as f64).floor().max(0.0) as usize;
        cell.min(cells - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let grid = GridSpec::default();
        assert_eq!(grid.cell_count(), 40_000);
        assert!((grid.wavelength_m() - 0.125).abs() < 1e-12);
        assert!((grid.cell_size_x_m() - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_degenerate_grids() {
        assert!(GridSpec::new(0, 10, 25.0, 0.125).is_err());
        assert!(GridSpec::new(10, 0, 25.0, 0.125).is_err());
        assert!(GridSpec::new(10, 10, 0.0, 0.125).is_err());
        assert!(GridSpec::new(10, 10, 25.0, -1.0).is_err());
        assert!(GridSpec::new(10, 10, f64::NAN, 0.125).is_err());
        assert!(GridSpec::new(10, 10, 25.0, 0.125).is_ok());
    }

    #[test]
    fn test_rejects_oversized_grids() {
        assert!(GridSpec::new(2048, 2048, 25.0, 0.125).is_ok());
        assert!(GridSpec::new(2048, 2049, 25.0, 0.125).is_err());
        assert!(GridSpec::new(usize::MAX, 2, 25.0, 0.125).is_err());
    }

    #[test]
    fn test_min_radius_uses_smaller_side() {
        let grid = GridSpec::new(100, 50, 10.0, 0.125).unwrap();
        assert!((grid.cell_size_x_m() - 0.1).abs() < 1e-12);
        assert!((grid.cell_size_y_m() - 0.2).abs() < 1e-12);
        assert!((grid.min_radius_m() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_cell_index_clamps() {
        let grid = GridSpec::new(10, 10, 25.0, 0.125).unwrap();
        assert_eq!(grid.cell_index(Position::new(0.0, 0.0)), 0);
        assert_eq!(grid.cell_index(Position::new(1.0, 1.0)), 99);
        assert_eq!(grid.cell_index(Position::new(-3.0, 7.0)), 90);
        assert_eq!(grid.cell_index(Position::new(0.55, 0.25)), 25);
        assert_eq!(grid.cell_coords(25), (5, 2));
    }

    #[test]
    fn test_position_clamped() {
        let p = Position::new(1.5, -0.2).clamped();
        assert_eq!(p, Position::new(1.0, 0.0));
        assert!(p.is_finite());
        assert!(!Position::new(f64::NAN, 0.0).is_finite());
    }
}
