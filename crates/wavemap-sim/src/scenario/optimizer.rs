//! Beamform Optimizer
//!
//! Steers emitter phases using each emitter's own field at the receiver
//! cell. Because an emitter's contribution at a fixed cell does not depend
//! on the other emitters, every mode is a single pass:
//!
//! - **Constructive**: rotate each emitter so its contribution arrives with
//!   phase 0; the contributions then add in magnitude.
//! - **Destructive**: split the emitters into two groups with magnitude sums
//!   as close to equal as possible, put one group at phase 0 and the other at
//!   phase π. The split is the subset with the largest magnitude sum strictly
//!   below half the total ("best fit below half"), found by enumerating all
//!   `2^n` subsets. Comparing scalar magnitude sums is a bound, not an exact
//!   minimizer of the vector sum.
//! - **Randomize**: independent uniform phases in `[0, 2π)`.
//!
//! ```text
//! Idle ──► EvaluatingSources ──► ApplyingPhaseUpdates ──► Recompute ──► Idle
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use tracing::{info, trace};
use wavemap_core::receiver::{magnitude_at, phase_at};
use wavemap_core::MAX_EMITTERS;

use super::emitter::SlotId;
use super::scene::Scene;

/// Which optimizer pass ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationMode {
    Constructive,
    Destructive,
    Randomize,
}

/// Stage of an optimizer pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizerPhase {
    #[default]
    Idle,
    EvaluatingSources,
    ApplyingPhaseUpdates,
    Recompute,
}

/// Outcome of one optimizer pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub mode: OptimizationMode,
    /// Emitters that took part
    pub active_count: usize,
    /// Composite magnitude at the receiver before the pass
    pub magnitude_before: f64,
    /// Composite magnitude at the receiver after the pass
    pub magnitude_after: f64,
    /// Emitters driven to phase 0 at the receiver (destructive: the chosen
    /// subset; constructive: all of them; randomize: none)
    pub in_phase: Vec<SlotId>,
}

/// Result of the best-fit-below-half subset search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsetFit {
    /// Bit `i` set when element `i` is in the subset
    pub mask: u32,
    /// Magnitude sum of the subset
    pub sum: f64,
    /// Magnitude sum of all elements
    pub total: f64,
}

impl SubsetFit {
    pub fn contains(&self, index: usize) -> bool {
        self.mask & (1 << index) != 0
    }
}

/// Subset of `magnitudes` whose sum is the largest strictly below half the
/// total. Ties keep the lowest mask; the empty subset is the fallback.
///
/// Only the first [`MAX_EMITTERS`] entries are considered.
pub fn best_fit_below_half(magnitudes: &[f64]) -> SubsetFit {
    let magnitudes = &magnitudes[..magnitudes.len().min(MAX_EMITTERS)];
    let total: f64 = magnitudes.iter().sum();
    let half = total / 2.0;

    let mut best = SubsetFit {
        mask: 0,
        sum: 0.0,
        total,
    };
    for mask in 1u32..(1u32 << magnitudes.len()) {
        let sum: f64 = magnitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, m)| m)
            .sum();
        if sum < half && sum > best.sum {
            best.mask = mask;
            best.sum = sum;
        }
    }
    best
}

/// Per-emitter reading at the receiver cell.
#[derive(Debug, Clone, Copy)]
struct SourceReading {
    slot: SlotId,
    phase_offset: f64,
    phase_at_cell: f64,
    magnitude_at_cell: f64,
}

/// Synchronous phase optimizer driving a [`Scene`].
#[derive(Debug, Default)]
pub struct BeamformOptimizer {
    phase: OptimizerPhase,
}

impl BeamformOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage; always `Idle` between calls.
    pub fn phase(&self) -> OptimizerPhase {
        self.phase
    }

    /// Align every active emitter to phase 0 at `cell`.
    pub fn optimize_toward(&mut self, scene: &mut Scene, cell: usize) -> OptimizationReport {
        let magnitude_before = magnitude_at(scene.composite(), cell);
        let readings = self.evaluate(scene, cell);

        self.transition(OptimizerPhase::ApplyingPhaseUpdates);
        let updates: Vec<(SlotId, f64)> = readings
            .iter()
            .map(|r| (r.slot, r.phase_offset - r.phase_at_cell))
            .collect();

        let in_phase = readings.iter().map(|r| r.slot).collect();
        self.finish(scene, cell, &updates, OptimizationMode::Constructive, magnitude_before, in_phase)
    }

    /// Split active emitters into phase 0 and phase π groups at `cell` to
    /// cancel as much of the field as the magnitude split allows.
    pub fn anti_optimize(&mut self, scene: &mut Scene, cell: usize) -> OptimizationReport {
        let magnitude_before = magnitude_at(scene.composite(), cell);
        let readings = self.evaluate(scene, cell);

        let magnitudes: Vec<f64> = readings.iter().map(|r| r.magnitude_at_cell).collect();
        let fit = best_fit_below_half(&magnitudes);
        trace!(mask = fit.mask, sum = fit.sum, total = fit.total, "subset search done");

        self.transition(OptimizerPhase::ApplyingPhaseUpdates);
        let updates: Vec<(SlotId, f64)> = readings
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let aligned = r.phase_offset - r.phase_at_cell;
                if fit.contains(i) {
                    (r.slot, aligned)
                } else {
                    (r.slot, aligned + PI)
                }
            })
            .collect();

        let in_phase = readings
            .iter()
            .enumerate()
            .filter(|(i, _)| fit.contains(*i))
            .map(|(_, r)| r.slot)
            .collect();
        self.finish(scene, cell, &updates, OptimizationMode::Destructive, magnitude_before, in_phase)
    }

    /// Give every active emitter an independent uniform phase.
    pub fn randomize<R: Rng>(
        &mut self,
        scene: &mut Scene,
        cell: usize,
        rng: &mut R,
    ) -> OptimizationReport {
        let magnitude_before = magnitude_at(scene.composite(), cell);
        let readings = self.evaluate(scene, cell);

        self.transition(OptimizerPhase::ApplyingPhaseUpdates);
        let updates: Vec<(SlotId, f64)> = readings
            .iter()
            .map(|r| (r.slot, rng.gen_range(0.0..TAU)))
            .collect();

        self.finish(scene, cell, &updates, OptimizationMode::Randomize, magnitude_before, Vec::new())
    }

    fn evaluate(&mut self, scene: &Scene, cell: usize) -> Vec<SourceReading> {
        self.transition(OptimizerPhase::EvaluatingSources);
        scene
            .active_fields()
            .map(|(emitter, field)| SourceReading {
                slot: emitter.id,
                phase_offset: emitter.phase_offset(),
                phase_at_cell: phase_at(field, cell),
                magnitude_at_cell: magnitude_at(field, cell),
            })
            .collect()
    }

    fn finish(
        &mut self,
        scene: &mut Scene,
        cell: usize,
        updates: &[(SlotId, f64)],
        mode: OptimizationMode,
        magnitude_before: f64,
        in_phase: Vec<SlotId>,
    ) -> OptimizationReport {
        self.transition(OptimizerPhase::Recompute);
        scene.set_phases(updates);

        let report = OptimizationReport {
            mode,
            active_count: updates.len(),
            magnitude_before,
            magnitude_after: magnitude_at(scene.composite(), cell),
            in_phase,
        };
        self.transition(OptimizerPhase::Idle);

        info!(
            ?mode,
            emitters = report.active_count,
            before = report.magnitude_before,
            after = report.magnitude_after,
            "optimizer pass complete"
        );
        report
    }

    fn transition(&mut self, next: OptimizerPhase) {
        trace!(from = ?self.phase, to = ?next, "optimizer transition");
        self.phase = next;
    }
}
