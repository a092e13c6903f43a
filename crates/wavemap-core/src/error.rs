//! Error types shared across the wavemap crates
//!
//! Degenerate geometry and empty emitter sets are recovered locally by the
//! field code and never show up here. These variants cover inputs that cannot
//! be recovered by substitution: malformed grids, buffers of the wrong shape,
//! out-of-range emitter slots and configuration failures.

use crate::config::ConfigError;

/// Result type for wavemap operations
pub type WavemapResult<T> = Result<T, WavemapError>;

/// Errors that can occur while building or evaluating a field
#[derive(Debug, Clone, thiserror::Error)]
pub enum WavemapError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Field size mismatch: expected {expected} cells, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid emitter slot: {0}. Must be between 1 and 9")]
    InvalidSlot(usize),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WavemapError::DimensionMismatch { expected: 4, actual: 3 };
        assert_eq!(err.to_string(), "Field size mismatch: expected 4 cells, got 3");

        let err = WavemapError::InvalidSlot(12);
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: WavemapError = ConfigError::ValidationError("width must be > 0".into()).into();
        assert!(matches!(err, WavemapError::Config(_)));
        assert!(err.to_string().contains("width"));
    }
}
