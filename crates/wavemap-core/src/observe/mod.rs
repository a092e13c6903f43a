//! # Observability
//!
//! Structured logging for wavemap via `tracing`.
//!
//! The field engine emits `debug!` events on every recomputation and `info!`
//! events for optimizer passes; applications install a subscriber once at
//! startup with [`init_logging`].
//!
//! ```rust,ignore
//! use wavemap_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development());
//! tracing::info!(emitters = 3, "scene ready");
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
