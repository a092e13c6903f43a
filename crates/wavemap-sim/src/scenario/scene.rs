//! Scene: emitter slots, receiver and the recompute path
//!
//! Every mutation resynthesizes only the emitters it touched and then
//! rebuilds the composite from all active fields before returning, so the
//! composite a renderer sees always matches the current active set.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use wavemap_core::receiver::{self, ReceiverStats};
use wavemap_core::{
    CompositeField, CosineTable, FieldAccumulator, FieldSynthesizer, GridSpec, Position,
    RegulatoryConfig, SourceField, WavemapConfig, WavemapResult, MAX_EMITTERS,
};

use super::emitter::{Emitter, SlotId};
use super::render::{Marker, MarkerKind};

/// What `move_selected` and `adjust_selected_phase` act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Emitter(SlotId),
    Receiver,
}

/// Receiver location; power and phase are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceiverState {
    pub position: Position,
}

impl Default for ReceiverState {
    fn default() -> Self {
        Self {
            position: Position::new(0.7, 0.5),
        }
    }
}

/// Result of `select_or_toggle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    Activated,
    Deactivated,
}

/// One slot: the emitter record (absent until first use) and its field.
#[derive(Debug, Clone, Default)]
struct EmitterSlot {
    emitter: Option<Emitter>,
    field: SourceField,
}

impl EmitterSlot {
    fn is_active(&self) -> bool {
        self.emitter.map_or(false, |e| e.active)
    }
}

/// Mutable scene state and the buffers derived from it.
pub struct Scene {
    grid: GridSpec,
    synthesizer: FieldSynthesizer,
    slots: [EmitterSlot; MAX_EMITTERS],
    selection: Selection,
    receiver: ReceiverState,
    regulatory: RegulatoryConfig,
    accumulator: FieldAccumulator,
}

impl Scene {
    /// Empty scene: no emitters, receiver at its default position.
    pub fn new(grid: GridSpec, table: Option<CosineTable>, regulatory: RegulatoryConfig) -> Self {
        Self {
            grid,
            synthesizer: FieldSynthesizer::new(grid, table),
            slots: std::array::from_fn(|_| EmitterSlot::default()),
            selection: Selection::None,
            receiver: ReceiverState::default(),
            regulatory,
            accumulator: FieldAccumulator::new(grid.cell_count()),
        }
    }

    /// Scene built from configuration, with the configured default emitters.
    ///
    /// Configuration problems surface as [`wavemap_core::WavemapError::Config`].
    pub fn from_config(config: &WavemapConfig) -> WavemapResult<Self> {
        config.validate()?;
        let grid = config.grid_spec()?;
        let scene = Self::new(grid, config.cosine_table(), config.regulatory)
            .with_default_emitters(config.scene.default_emitters);
        Ok(scene)
    }

    /// Activate slots `0..count` with defaults. Leaves nothing selected.
    pub fn with_default_emitters(mut self, count: usize) -> Self {
        for slot in SlotId::all().take(count) {
            self.slots[slot.index()].emitter = Some(Emitter::with_defaults(slot, &self.grid));
            self.resynthesize(slot);
        }
        self.recompose();
        self
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn receiver(&self) -> &ReceiverState {
        &self.receiver
    }

    pub fn regulatory(&self) -> &RegulatoryConfig {
        &self.regulatory
    }

    /// Emitter record of a slot, active or not; `None` if never created.
    pub fn emitter(&self, slot: SlotId) -> Option<&Emitter> {
        self.slots[slot.index()].emitter.as_ref()
    }

    /// Retained field of a slot; empty if the slot was never created.
    pub fn source_field(&self, slot: SlotId) -> &SourceField {
        &self.slots[slot.index()].field
    }

    pub fn active_emitters(&self) -> impl Iterator<Item = &Emitter> + '_ {
        self.slots
            .iter()
            .filter_map(|s| s.emitter.as_ref())
            .filter(|e| e.active)
    }

    /// Active emitters paired with their fields, in slot order.
    pub fn active_fields(&self) -> impl Iterator<Item = (&Emitter, &SourceField)> + '_ {
        self.slots.iter().filter_map(|s| match s.emitter {
            Some(ref e) if e.active => Some((e, &s.field)),
            _ => None,
        })
    }

    pub fn active_count(&self) -> usize {
        self.active_emitters().count()
    }

    pub fn composite(&self) -> &CompositeField {
        self.accumulator.composite()
    }

    /// Regulatory factor applied to the current composite.
    pub fn regulatory_factor(&self) -> f64 {
        self.accumulator.factor()
    }

    pub fn receiver_cell(&self) -> usize {
        self.grid.cell_index(self.receiver.position)
    }

    /// Power, phase and beamforming gain at the receiver.
    pub fn receiver_stats(&self) -> ReceiverStats {
        ReceiverStats::evaluate(
            self.composite(),
            self.active_fields().map(|(_, f)| f),
            self.receiver_cell(),
        )
    }

    /// Magnitude of the composite at the receiver.
    pub fn receiver_magnitude(&self) -> f64 {
        receiver::magnitude_at(self.composite(), self.receiver_cell())
    }

    /// Overlay markers: the receiver first, then active emitters in slot order.
    pub fn markers(&self) -> Vec<Marker> {
        std::iter::once(Marker {
            kind: MarkerKind::Receiver,
            position: self.receiver.position,
        })
        .chain(self.active_emitters().map(|e| Marker {
            kind: MarkerKind::Emitter(e.id),
            position: e.position(),
        }))
        .collect()
    }

    /// Activate an unused or inactive slot (and select it), or deactivate an
    /// active one.
    pub fn select_or_toggle(&mut self, slot: SlotId) -> SlotChange {
        let grid = self.grid;
        let entry = &mut self.slots[slot.index()];
        let change = match entry.emitter {
            Some(ref mut e) if e.active => {
                e.active = false;
                if self.selection == Selection::Emitter(slot) {
                    self.selection = Selection::None;
                }
                SlotChange::Deactivated
            }
            Some(ref mut e) => {
                e.active = true;
                self.selection = Selection::Emitter(slot);
                SlotChange::Activated
            }
            None => {
                entry.emitter = Some(Emitter::with_defaults(slot, &grid));
                self.selection = Selection::Emitter(slot);
                SlotChange::Activated
            }
        };

        if change == SlotChange::Activated {
            self.resynthesize(slot);
        }
        self.recompose();
        debug!(slot = %slot, ?change, active = self.active_count(), "emitter slot toggled");
        change
    }

    /// Select the receiver for subsequent moves.
    pub fn select_receiver(&mut self) {
        self.selection = Selection::Receiver;
    }

    /// Move whatever is selected. Returns `false` when nothing is selected
    /// or the position is not finite.
    pub fn move_selected(&mut self, position: Position) -> bool {
        if !position.is_finite() {
            return false;
        }
        match self.selection {
            Selection::Emitter(slot) => {
                if let Some(e) = self.slots[slot.index()].emitter.as_mut() {
                    e.source.position = position.clamped();
                }
                self.resynthesize(slot);
                self.recompose();
                true
            }
            Selection::Receiver => {
                self.set_receiver_position(position);
                true
            }
            Selection::None => false,
        }
    }

    /// Add `delta` radians to the selected emitter's phase. Returns `false`
    /// unless an emitter is selected and `delta` is finite.
    pub fn adjust_selected_phase(&mut self, delta: f64) -> bool {
        let Selection::Emitter(slot) = self.selection else {
            return false;
        };
        if !delta.is_finite() {
            return false;
        }
        if let Some(e) = self.slots[slot.index()].emitter.as_mut() {
            e.source.phase_offset = wrap_phase(e.source.phase_offset + delta);
        }
        self.resynthesize(slot);
        self.recompose();
        true
    }

    /// Move the receiver. Fields are unaffected; only evaluation changes.
    /// Non-finite positions are ignored.
    pub fn set_receiver_position(&mut self, position: Position) {
        if position.is_finite() {
            self.receiver.position = position.clamped();
        }
    }

    /// Flip the antenna-gain penalty and rebuild the composite.
    pub fn toggle_antenna_penalty(&mut self) -> bool {
        let enabled = self.regulatory.toggle_penalty();
        self.recompose();
        enabled
    }

    /// Overwrite the phases of several emitters, then resynthesize them and
    /// rebuild the composite once.
    ///
    /// Slots that were never created are skipped.
    pub fn set_phases(&mut self, updates: &[(SlotId, f64)]) {
        for &(slot, phase) in updates {
            if let Some(e) = self.slots[slot.index()].emitter.as_mut() {
                e.source.phase_offset = wrap_phase(phase);
            }
        }
        for &(slot, _) in updates {
            self.resynthesize(slot);
        }
        self.recompose();
    }

    fn resynthesize(&mut self, slot: SlotId) {
        let entry = &mut self.slots[slot.index()];
        if let Some(ref emitter) = entry.emitter {
            self.synthesizer.synthesize(&emitter.source, &mut entry.field);
        }
    }

    fn recompose(&mut self) {
        let fields = self
            .slots
            .iter()
            .filter(|s| s.is_active())
            .map(|s| &s.field);
        // Every slot field is sized by the same synthesizer, so a mismatch
        // means a slot was never synthesized
        if let Err(e) = self.accumulator.accumulate(fields, &self.regulatory) {
            error!(error = %e, "composite rebuild failed");
        }
    }
}

/// Phase wrapped into `[0, 2π)`.
fn wrap_phase(phase: f64) -> f64 {
    wavemap_core::receiver::normalize_phase(phase)
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("grid", &self.grid)
            .field("active", &self.active_count())
            .field("selection", &self.selection)
            .field("receiver", &self.receiver)
            .field("regulatory", &self.regulatory)
            .finish()
    }
}
