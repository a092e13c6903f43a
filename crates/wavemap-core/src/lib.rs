//! # Wavemap Core Field Library
//!
//! This crate computes the steady-state interference pattern of coherent
//! point emitters (for example 2.4 GHz transmitters in a room) on a dense 2D
//! grid, and evaluates the combined field at a receiver cell.
//!
//! ## Overview
//!
//! Every emitter contributes a continuous-wave phasor `a·e^{jφ}` to each
//! cell, where the amplitude follows free-space inverse-square attenuation
//! and the phase advances with distance. The library provides:
//!
//! - **Cosine Table**: Quantized cosine samples over one period, serving both
//!   cosine and sine from a single lookup
//! - **Synthesis**: Per-emitter phasor field over every grid cell
//! - **Accumulation**: Regulatory-scaled superposition of the active fields
//! - **Receiver Evaluation**: Power, phase, magnitude and beamforming gain at
//!   a cell
//!
//! ## Field Flow
//!
//! ```text
//! PointSource ─► synthesize ─► SourceField ─┐
//! PointSource ─► synthesize ─► SourceField ─┼─► FieldAccumulator ─► CompositeField ─► Renderer
//! PointSource ─► synthesize ─► SourceField ─┘          ▲                    │
//!                                              RegulatoryConfig      ReceiverStats
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wavemap_core::{FieldAccumulator, FieldSynthesizer, GridSpec, PointSource, Position};
//! use wavemap_core::accumulator::RegulatoryConfig;
//! use wavemap_core::field::SourceField;
//!
//! let grid = GridSpec::new(64, 64, 25.0, 0.125).unwrap();
//! let synth = FieldSynthesizer::direct(grid);
//!
//! let mut a = SourceField::new();
//! let mut b = SourceField::new();
//! synth.synthesize(&PointSource::new(Position::new(0.3, 0.3), 0.0, 1.0), &mut a);
//! synth.synthesize(&PointSource::new(Position::new(0.6, 0.3), 0.0, 1.0), &mut b);
//!
//! let mut acc = FieldAccumulator::new(grid.cell_count());
//! let composite = acc.accumulate([&a, &b], &RegulatoryConfig::default()).unwrap();
//! assert!(composite.is_finite());
//! ```

pub mod accumulator;
pub mod config;
pub mod cosine_table;
pub mod error;
pub mod field;
pub mod grid;
pub mod observe;
pub mod receiver;
pub mod synth;

pub use accumulator::{regulatory_factor, FieldAccumulator, RegulatoryConfig};
pub use config::{ConfigError, WavemapConfig};
pub use cosine_table::CosineTable;
pub use error::{WavemapError, WavemapResult};
pub use field::{CompositeField, Field, FieldSample, SourceField};
pub use grid::{GridSpec, Position};
pub use receiver::ReceiverStats;
pub use synth::{synthesize, FieldSynthesizer, PointSource};

/// Number of emitter slots a scene can hold.
///
/// Bounded by the adversarial subset search, which enumerates `2^n` subsets.
pub const MAX_EMITTERS: usize = 9;
