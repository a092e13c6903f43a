//! Field Accumulator
//!
//! Sums the active source fields into one composite, scaled so the total
//! radiated power of the array stays within the budget of a single antenna.
//!
//! ## Regulatory scaling
//!
//! ```text
//!   f_ant        = 1 / sqrt(n)                         per-antenna share
//!   gain_dB      = G_assumed + 10·log10(n)             array gain
//!   excess_dB    = max(0, gain_dB − G_max)
//!   array_factor = sqrt(10^(−excess_dB / 3 / 10))       1 dB back-off per 3 dB excess
//!   factor       = f_ant · array_factor                 (array_factor = 1 when disabled)
//! ```
//!
//! With `G_assumed = G_max = 6 dBi` the penalised factor reduces to
//! `n^(−2/3)`.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{WavemapError, WavemapResult};
use crate::field::{CompositeField, FieldSample, SourceField};

/// Antenna gain assumed for every emitter, in dBi.
pub const ASSUMED_ANTENNA_GAIN_DBI: f64 = 6.0;

/// Antenna gain allowed before the transmit power back-off applies, in dBi.
pub const MAX_ANTENNA_GAIN_DBI: f64 = 6.0;

/// Regulatory scaling options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatoryConfig {
    /// Apply the array antenna-gain penalty on top of the `1/sqrt(n)` share
    pub antenna_gain_penalty: bool,
}

impl RegulatoryConfig {
    /// Flip the antenna-gain penalty, returning the new state.
    pub fn toggle_penalty(&mut self) -> bool {
        self.antenna_gain_penalty = !self.antenna_gain_penalty;
        self.antenna_gain_penalty
    }
}

/// Amplitude scale applied to every field when `active_count` emitters
/// transmit together. Zero when nothing is active.
pub fn regulatory_factor(active_count: usize, config: &RegulatoryConfig) -> f64 {
    if active_count == 0 {
        return 0.0;
    }
    let n = active_count as f64;
    let f_ant = 1.0 / n.sqrt();
    let array_factor = if config.antenna_gain_penalty {
        let gain_db = ASSUMED_ANTENNA_GAIN_DBI + 10.0 * n.log10();
        let excess_db = (gain_db - MAX_ANTENNA_GAIN_DBI).max(0.0);
        10f64.powf(-excess_db / 3.0 / 10.0).sqrt()
    } else {
        1.0
    };
    f_ant * array_factor
}

/// Owns the composite buffer and rebuilds it from the active fields.
#[derive(Debug, Clone)]
pub struct FieldAccumulator {
    composite: CompositeField,
    factor: f64,
}

impl FieldAccumulator {
    /// Accumulator for fields of `cells` samples.
    pub fn new(cells: usize) -> Self {
        Self {
            composite: CompositeField::zeros(cells),
            factor: 0.0,
        }
    }

    /// Rebuild the composite from `fields`, all of which are treated as
    /// active.
    ///
    /// The iterator is walked twice: once to check sizes and count, once to
    /// sum. A field of the wrong size is rejected before the composite is
    /// touched, so the previous composite stays intact on error. Nothing is
    /// allocated.
    pub fn accumulate<'a, I>(
        &mut self,
        fields: I,
        config: &RegulatoryConfig,
    ) -> WavemapResult<&CompositeField>
    where
        I: IntoIterator<Item = &'a SourceField>,
        I::IntoIter: Clone,
    {
        let fields = fields.into_iter();
        let cells = self.composite.len();
        let mut active = 0;
        for field in fields.clone() {
            if field.len() != cells {
                return Err(WavemapError::DimensionMismatch {
                    expected: cells,
                    actual: field.len(),
                });
            }
            active += 1;
        }

        self.factor = regulatory_factor(active, config);
        self.composite.fill_zero();
        for field in fields {
            add_scaled(self.composite.samples_mut(), field.samples(), self.factor);
        }

        debug!(
            active,
            factor = self.factor,
            penalty = config.antenna_gain_penalty,
            "composite field rebuilt"
        );
        Ok(&self.composite)
    }

    pub fn composite(&self) -> &CompositeField {
        &self.composite
    }

    /// Regulatory factor applied by the last accumulation.
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

#[cfg(feature = "parallel")]
fn add_scaled(acc: &mut [FieldSample], field: &[FieldSample], scale: f64) {
    acc.par_iter_mut()
        .zip(field.par_iter())
        .for_each(|(a, &f)| *a += f * scale);
}

#[cfg(not(feature = "parallel"))]
fn add_scaled(acc: &mut [FieldSample], field: &[FieldSample], scale: f64) {
    for (a, &f) in acc.iter_mut().zip(field.iter()) {
        *a += f * scale;
    }
}
