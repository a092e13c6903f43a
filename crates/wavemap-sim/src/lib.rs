//! # Wavemap Beamforming Scene
//!
//! Interactive layer over [`wavemap_core`]: a fixed set of emitter slots, a
//! receiver, and the commands an input controller issues against them.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         SceneEngine                           │
//! │                                                               │
//! │  Command ──► Scene ──► resynthesize slot ──► recompose        │
//! │                ▲                                   │          │
//! │                │                                   ▼          │
//! │      BeamformOptimizer ◄── per-source fields   CompositeField │
//! │                                                    │          │
//! │  Debouncer ─────────────► ReceiverStats ──► StatusSink        │
//! │                                      RenderFrame ──► Renderer │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wavemap_core::{GridSpec, RegulatoryConfig};
//! use wavemap_sim::{Command, CommandOutcome, Scene, SceneEngine};
//! use std::time::Duration;
//!
//! let grid = GridSpec::new(64, 64, 25.0, 0.125).unwrap();
//! let scene = Scene::new(grid, None, RegulatoryConfig::default()).with_default_emitters(3);
//! let mut engine = SceneEngine::new(scene, 42, Duration::from_millis(100));
//!
//! assert_eq!(engine.apply(Command::OptimizeConstructive), CommandOutcome::Applied);
//! assert_eq!(engine.apply(Command::SelectOrToggleEmitter(12)).is_applied(), false);
//! ```

pub mod scenario;

pub use scenario::{
    BeamformOptimizer, Command, CommandOutcome, Debouncer, Emitter, IgnoreReason, Marker,
    MarkerKind, OptimizationMode, OptimizationReport, OptimizerPhase, ReceiverState, RenderFrame,
    Renderer, Scene, SceneEngine, Selection, SlotId, StatusSink,
};
