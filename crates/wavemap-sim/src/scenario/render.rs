//! Renderer and status display seams
//!
//! The scene never draws anything itself. It hands a [`RenderFrame`] to a
//! [`Renderer`] and [`ReceiverStats`] to a [`StatusSink`]; color mapping,
//! gamma and text layout belong to the implementations.

use serde::{Deserialize, Serialize};
use wavemap_core::receiver::{signed_magnitude, ReceiverStats};
use wavemap_core::{CompositeField, GridSpec, Position};

use super::emitter::SlotId;

/// What a marker labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Receiver,
    Emitter(SlotId),
}

/// Overlay marker in grid-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Position,
}

impl Marker {
    /// Text drawn at the marker: the slot key for emitters, `R` for the
    /// receiver.
    pub fn label(&self) -> String {
        match self.kind {
            MarkerKind::Receiver => "R".to_string(),
            MarkerKind::Emitter(slot) => slot.to_string(),
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct RenderFrame<'a> {
    pub grid: &'a GridSpec,
    pub composite: &'a CompositeField,
    pub markers: Vec<Marker>,
}

impl RenderFrame<'_> {
    /// Per-cell magnitude with the phase half-plane as sign.
    pub fn signed_magnitudes(&self) -> Vec<f64> {
        self.composite
            .samples()
            .iter()
            .map(|&s| signed_magnitude(s))
            .collect()
    }

    /// In-phase and quadrature buffers.
    pub fn components(&self) -> (Vec<f64>, Vec<f64>) {
        self.composite.components()
    }
}

/// Consumer of composite fields.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>);
}

/// Consumer of receiver statistics.
pub trait StatusSink {
    fn publish(&mut self, stats: &ReceiverStats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavemap_core::FieldSample;

    #[test]
    fn test_marker_labels() {
        let r = Marker {
            kind: MarkerKind::Receiver,
            position: Position::new(0.5, 0.5),
        };
        let e = Marker {
            kind: MarkerKind::Emitter(SlotId::from_key(7).unwrap()),
            position: Position::new(0.1, 0.2),
        };
        assert_eq!(r.label(), "R");
        assert_eq!(e.label(), "7");
    }

    #[test]
    fn test_frame_signed_magnitudes() {
        let grid = GridSpec::new(2, 1, 1.0, 0.125).unwrap();
        let mut composite = CompositeField::zeros(2);
        composite.samples_mut()[0] = FieldSample::new(0.0, 3.0);
        composite.samples_mut()[1] = FieldSample::new(0.0, -3.0);
        let frame = RenderFrame {
            grid: &grid,
            composite: &composite,
            markers: Vec::new(),
        };
        let values = frame.signed_magnitudes();
        assert!((values[0] - 3.0).abs() < 1e-12);
        assert!((values[1] + 3.0).abs() < 1e-12);
        assert_eq!(frame.components().1, vec![3.0, -3.0]);
    }
}
