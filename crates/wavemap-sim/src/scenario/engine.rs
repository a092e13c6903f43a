//! Scene engine: command handling and output dispatch
//!
//! Applies [`Command`]s to the scene, runs the optimizer, and coalesces
//! receiver-status refreshes through a [`Debouncer`] so a drag gesture
//! publishes statistics once it pauses instead of on every move.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wavemap_core::receiver::ReceiverStats;
use wavemap_core::{Position, WavemapConfig, WavemapResult};

use super::command::{Command, CommandOutcome, IgnoreReason};
use super::debounce::Debouncer;
use super::emitter::SlotId;
use super::optimizer::{BeamformOptimizer, OptimizationReport};
use super::render::{RenderFrame, Renderer, StatusSink};
use super::scene::Scene;

/// Owns the scene and everything that acts on it.
#[derive(Debug)]
pub struct SceneEngine {
    scene: Scene,
    optimizer: BeamformOptimizer,
    rng: StdRng,
    status: Debouncer<()>,
    last_report: Option<OptimizationReport>,
}

impl SceneEngine {
    pub fn new(scene: Scene, seed: u64, status_refresh: Duration) -> Self {
        Self {
            scene,
            optimizer: BeamformOptimizer::new(),
            rng: StdRng::seed_from_u64(seed),
            status: Debouncer::new(status_refresh),
            last_report: None,
        }
    }

    /// Engine for a configured scene.
    pub fn from_config(config: &WavemapConfig) -> WavemapResult<Self> {
        let scene = Scene::from_config(config)?;
        Ok(Self::new(scene, config.scene.seed, config.status_refresh()))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn optimizer(&self) -> &BeamformOptimizer {
        &self.optimizer
    }

    /// Report of the most recent optimizer pass.
    pub fn last_report(&self) -> Option<&OptimizationReport> {
        self.last_report.as_ref()
    }

    /// Apply a command now.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        self.apply_at(command, Instant::now())
    }

    /// Apply a command at `now`, scheduling a status refresh if it took
    /// effect.
    pub fn apply_at(&mut self, command: Command, now: Instant) -> CommandOutcome {
        let outcome = self.dispatch(command);
        match outcome {
            CommandOutcome::Applied => {
                debug!(?command, "command applied");
                self.status.schedule(now, ());
            }
            CommandOutcome::Ignored(reason) => {
                warn!(?command, %reason, "command ignored");
            }
        }
        outcome
    }

    fn dispatch(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::SelectOrToggleEmitter(key) => match SlotId::from_key(key) {
                Ok(slot) => {
                    self.scene.select_or_toggle(slot);
                    CommandOutcome::Applied
                }
                Err(_) => CommandOutcome::Ignored(IgnoreReason::InvalidSlot(key)),
            },
            Command::SelectReceiver => {
                self.scene.select_receiver();
                CommandOutcome::Applied
            }
            Command::MoveSelected { x, y } if !(x.is_finite() && y.is_finite()) => {
                CommandOutcome::Ignored(IgnoreReason::NonFinite)
            }
            Command::MoveSelected { x, y } => {
                if self.scene.move_selected(Position::new(x, y)) {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Ignored(IgnoreReason::NothingSelected)
                }
            }
            Command::AdjustSelectedPhase(delta) if !delta.is_finite() => {
                CommandOutcome::Ignored(IgnoreReason::NonFinite)
            }
            Command::AdjustSelectedPhase(delta) => {
                if self.scene.adjust_selected_phase(delta) {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Ignored(IgnoreReason::NoEmitterSelected)
                }
            }
            Command::ToggleAntennaPenalty => {
                self.scene.toggle_antenna_penalty();
                CommandOutcome::Applied
            }
            Command::OptimizeConstructive => {
                let cell = self.scene.receiver_cell();
                let report = self.optimizer.optimize_toward(&mut self.scene, cell);
                self.last_report = Some(report);
                CommandOutcome::Applied
            }
            Command::OptimizeDestructive => {
                let cell = self.scene.receiver_cell();
                let report = self.optimizer.anti_optimize(&mut self.scene, cell);
                self.last_report = Some(report);
                CommandOutcome::Applied
            }
            Command::RandomizePhases => {
                let cell = self.scene.receiver_cell();
                let report = self.optimizer.randomize(&mut self.scene, cell, &mut self.rng);
                self.last_report = Some(report);
                CommandOutcome::Applied
            }
        }
    }

    /// Receiver statistics, if a scheduled refresh is due at `now`.
    pub fn poll_status(&mut self, now: Instant) -> Option<ReceiverStats> {
        self.status.poll(now).map(|()| self.scene.receiver_stats())
    }

    /// Publish due statistics to `sink`. Returns `true` if anything was sent.
    pub fn publish_status(&mut self, now: Instant, sink: &mut dyn StatusSink) -> bool {
        match self.poll_status(now) {
            Some(stats) => {
                sink.publish(&stats);
                true
            }
            None => false,
        }
    }

    /// Current frame: composite field plus markers.
    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            grid: self.scene.grid(),
            composite: self.scene.composite(),
            markers: self.scene.markers(),
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.render(&self.frame());
    }
}
