//! Emitter records and slot identifiers
//!
//! A scene has a fixed array of [`MAX_EMITTERS`] slots. A slot is unused
//! until first selected; after that it keeps its emitter record for the life
//! of the scene and only the `active` flag changes.

use serde::{Deserialize, Serialize};
use wavemap_core::{GridSpec, PointSource, Position, WavemapError, WavemapResult, MAX_EMITTERS};

/// Index of an emitter slot, guaranteed to be in `0..MAX_EMITTERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(usize);

impl SlotId {
    /// Slot from a zero-based index.
    pub fn new(index: usize) -> WavemapResult<Self> {
        if index < MAX_EMITTERS {
            Ok(Self(index))
        } else {
            Err(WavemapError::InvalidSlot(index + 1))
        }
    }

    /// Slot from the one-based key an input controller reports (`1..=9`).
    pub fn from_key(key: u8) -> WavemapResult<Self> {
        match key {
            1..=9 => Self::new(key as usize - 1),
            _ => Err(WavemapError::InvalidSlot(key as usize)),
        }
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// One-based key, also used as the on-screen label.
    pub fn key(self) -> u8 {
        self.0 as u8 + 1
    }

    /// All slots in index order.
    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..MAX_EMITTERS).map(SlotId)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One emitter: a point source plus its slot identity and activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    pub id: SlotId,
    pub source: PointSource,
    pub active: bool,
}

impl Emitter {
    /// Fresh active emitter at the slot's default position, phase 0, gain 1.
    pub fn with_defaults(id: SlotId, grid: &GridSpec) -> Self {
        Self {
            id,
            source: PointSource::new(Self::default_position(id, grid), 0.0, 1.0),
            active: true,
        }
    }

    /// Default position for a slot.
    ///
    /// Slots stack along y from `(0.3, 0.3)`, five wavelengths apart, so
    /// freshly created emitters never overlap.
    pub fn default_position(id: SlotId, grid: &GridSpec) -> Position {
        let spacing = 5.0 * grid.wavelength_m() / grid.room_size_m();
        Position::new(0.3, 0.3 + id.index() as f64 * spacing).clamped()
    }

    pub fn position(&self) -> Position {
        self.source.position
    }

    pub fn phase_offset(&self) -> f64 {
        self.source.phase_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_from_key() {
        assert_eq!(SlotId::from_key(1).unwrap().index(), 0);
        assert_eq!(SlotId::from_key(9).unwrap().index(), 8);
        assert!(matches!(SlotId::from_key(0), Err(WavemapError::InvalidSlot(0))));
        assert!(matches!(SlotId::from_key(10), Err(WavemapError::InvalidSlot(10))));
        assert!(SlotId::new(9).is_err());
    }

    #[test]
    fn test_slot_key_roundtrip() {
        for slot in SlotId::all() {
            assert_eq!(SlotId::from_key(slot.key()).unwrap(), slot);
        }
        assert_eq!(SlotId::all().count(), MAX_EMITTERS);
    }

    #[test]
    fn test_default_positions_distinct() {
        let grid = GridSpec::default();
        let positions: Vec<Position> = SlotId::all()
            .map(|id| Emitter::default_position(id, &grid))
            .collect();
        for (i, a) in positions.iter().enumerate() {
            assert!((0.0..=1.0).contains(&a.y));
            for b in &positions[i + 1..] {
                assert_ne!(grid.cell_index(*a), grid.cell_index(*b));
            }
        }
    }

    #[test]
    fn test_defaults() {
        let grid = GridSpec::default();
        let e = Emitter::with_defaults(SlotId::new(2).unwrap(), &grid);
        assert!(e.active);
        assert_eq!(e.phase_offset(), 0.0);
        assert_eq!(e.source.reference_gain, 1.0);
        assert!((e.position().y - 0.35).abs() < 1e-12);
    }
}
