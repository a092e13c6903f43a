//! Beamforming scene engine
//!
//! Emitter slots, receiver, commands and the phase optimizer. The scene owns
//! every field buffer; the optimizer and the engine only reach them through
//! scene methods, which keep the composite consistent after each call.

pub mod command;
pub mod debounce;
pub mod emitter;
pub mod engine;
pub mod optimizer;
pub mod render;
pub mod scene;

pub use command::{Command, CommandOutcome, IgnoreReason};
pub use debounce::Debouncer;
pub use emitter::{Emitter, SlotId};
pub use engine::SceneEngine;
pub use optimizer::{BeamformOptimizer, OptimizationMode, OptimizationReport, OptimizerPhase};
pub use render::{Marker, MarkerKind, RenderFrame, Renderer, StatusSink};
pub use scene::{ReceiverState, Scene, Selection};
