//! # Structured Logging
//!
//! `tracing` subscriber setup for wavemap applications.
//!
//! The field engine logs one `debug!` event per composite rebuild, which is
//! dozens per second while an emitter is dragged. [`LogConfig::recompute_events`]
//! controls whether those reach the output independently of the global level,
//! so an application can run at `debug` for the scene and optimizer without
//! drowning in per-frame events.
//!
//! Filter resolution, first match wins:
//!
//! ```text
//!   LogConfig::filter   explicit directives, used verbatim
//!   RUST_LOG            environment override
//!   level (+ accumulator directive when recompute_events is off)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use wavemap_core::observe::{init_logging, LogConfig, LogFormat, LogLevel};
//!
//! let config = LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Json,
//!     ..Default::default()
//! };
//!
//! init_logging(&config);
//!
//! tracing::info!(cells = 40_000, "composite rebuilt");
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Target of the per-rebuild composite events.
const RECOMPUTE_TARGET: &str = "wavemap_core::accumulator";

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive spelling of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Multi-line, colored
    Pretty,
    /// One line per event
    #[default]
    Compact,
}

/// Logging configuration, the `logging` section of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Emit per-rebuild composite events when the level allows them
    pub recompute_events: bool,
    /// Include file:line
    pub source_location: bool,
    /// Include thread IDs; useful with the `parallel` feature
    pub thread_ids: bool,
    /// Log span enter/exit
    pub span_events: bool,
    /// Explicit filter directives, e.g. `"wavemap_sim=trace,wavemap_core=info"`
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            recompute_events: false,
            source_location: false,
            thread_ids: false,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Debug output for working on the scene: pretty, with source locations.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            source_location: true,
            ..Default::default()
        }
    }

    /// Machine-readable output including every composite rebuild, for
    /// timing recomputation offline.
    pub fn profiling() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Json,
            recompute_events: true,
            thread_ids: true,
            span_events: true,
            ..Default::default()
        }
    }

    /// Errors only.
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            ..Default::default()
        }
    }

    /// Filter directives this configuration resolves to, ignoring `RUST_LOG`.
    pub fn directives(&self) -> String {
        if let Some(ref custom) = self.filter {
            return custom.clone();
        }
        if !self.recompute_events && self.level < LogLevel::Info {
            format!("{},{}=info", self.level, RECOMPUTE_TARGET)
        } else {
            self.level.to_string()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.as_str());
        match self.filter {
            Some(_) => EnvFilter::try_new(self.directives()).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(self.directives()))
                .unwrap_or_else(|_| fallback()),
        }
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a> + 'static,
    {
        let spans = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_thread_ids(self.thread_ids)
            .with_span_events(spans);

        match self.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
        }
    }
}

/// Install the global subscriber described by `config`.
///
/// Returns `false` if a subscriber was already installed; the first one
/// stays in place.
pub fn init_logging(config: &LogConfig) -> bool {
    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(config.fmt_layer())
        .try_init()
        .is_ok()
}
