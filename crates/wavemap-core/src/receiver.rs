//! Receiver Evaluator
//!
//! Read-only measurements at a single grid cell: power, phase and magnitude
//! of a field, the best single-emitter power, and the status numbers shown
//! to the user.
//!
//! Power uses the average-power convention for a sinusoid, `|z|² / 2`, for
//! every quantity here, so dB differences between them are consistent.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::field::{Field, FieldSample};

/// Average power `|z|² / 2` at `cell`.
pub fn power_at(field: &Field, cell: usize) -> f64 {
    field.sample(cell).norm_sqr() / 2.0
}

/// Phase `atan2(im, re)` at `cell`, in `(−π, π]`.
pub fn phase_at(field: &Field, cell: usize) -> f64 {
    let z = field.sample(cell);
    let phase = z.im.atan2(z.re);
    // atan2(-0.0, x<0) yields -π
    if phase <= -PI {
        PI
    } else {
        phase
    }
}

/// Magnitude `|z|` at `cell`.
pub fn magnitude_at(field: &Field, cell: usize) -> f64 {
    field.sample(cell).norm()
}

/// Map a phase in radians into `[0, 2π)`.
pub fn normalize_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid of a tiny negative value can round up to exactly 2π
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// `10·log10(power)`. Zero power gives negative infinity; guard before
/// display.
pub fn to_decibels(power: f64) -> f64 {
    10.0 * power.log10()
}

/// Largest unregulated single-emitter power at `cell`, 0 when there are no
/// fields.
pub fn best_single_power<'a, I>(fields: I, cell: usize) -> f64
where
    I: IntoIterator<Item = &'a Field>,
{
    fields
        .into_iter()
        .map(|f| power_at(f, cell))
        .fold(0.0, f64::max)
}

/// Magnitude carrying the half-plane of the phase as its sign.
///
/// Phases in `(π, 2π)` (negative quadrature) yield a negative value; this is
/// the magnitude/sign pair renderers map onto two color ramps.
pub fn signed_magnitude(sample: FieldSample) -> f64 {
    let magnitude = sample.norm();
    if normalize_phase(sample.im.atan2(sample.re)) > PI {
        -magnitude
    } else {
        magnitude
    }
}

/// Receiver numbers for a status display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceiverStats {
    /// Composite power at the receiver in dB; `None` when the power is zero
    pub power_db: Option<f64>,
    /// Composite phase at the receiver in degrees, `[0, 360)`
    pub phase_deg: f64,
    /// Composite power relative to the best single unregulated emitter, in
    /// dB; `None` when either power is zero
    pub beamforming_gain_db: Option<f64>,
}

impl ReceiverStats {
    /// Evaluate the composite and the individual active fields at `cell`.
    pub fn evaluate<'a, I>(composite: &Field, sources: I, cell: usize) -> Self
    where
        I: IntoIterator<Item = &'a Field>,
    {
        let power = power_at(composite, cell);
        let best = best_single_power(sources, cell);
        let power_db = (power > 0.0).then(|| to_decibels(power));
        let beamforming_gain_db = match power_db {
            Some(db) if best > 0.0 => Some(db - to_decibels(best)),
            _ => None,
        };
        Self {
            power_db,
            phase_deg: normalize_phase(phase_at(composite, cell)).to_degrees(),
            beamforming_gain_db,
        }
    }
}

impl std::fmt::Display for ReceiverStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.power_db {
            Some(db) => write!(f, "power {:.1} dB", db)?,
            None => write!(f, "power -inf dB")?,
        }
        write!(f, ", phase {:.0}°", self.phase_deg)?;
        match self.beamforming_gain_db {
            Some(db) => write!(f, ", beamforming gain {:+.1} dB", db),
            None => write!(f, ", beamforming gain n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(samples: &[FieldSample]) -> Field {
        let mut f = Field::zeros(samples.len());
        f.samples_mut().copy_from_slice(samples);
        f
    }

    #[test]
    fn test_power_and_magnitude() {
        let f = field_of(&[FieldSample::new(3.0, 4.0)]);
        assert!((power_at(&f, 0) - 12.5).abs() < 1e-12);
        assert!((magnitude_at(&f, 0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_phase_range() {
        let f = field_of(&[
            FieldSample::new(-1.0, 0.0),
            FieldSample::new(-1.0, -0.0),
            FieldSample::new(0.0, -1.0),
        ]);
        assert!((phase_at(&f, 0) - PI).abs() < 1e-12);
        assert!((phase_at(&f, 1) - PI).abs() < 1e-12);
        assert!((phase_at(&f, 2) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_phase() {
        assert!((normalize_phase(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert_eq!(normalize_phase(TAU), 0.0);
        assert_eq!(normalize_phase(-1e-300), 0.0);
        let p = normalize_phase(-1e-17);
        assert!((0.0..TAU).contains(&p));
    }

    #[test]
    fn test_decibels() {
        assert!((to_decibels(100.0) - 20.0).abs() < 1e-12);
        assert_eq!(to_decibels(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_best_single_power() {
        let a = field_of(&[FieldSample::new(1.0, 0.0)]);
        let b = field_of(&[FieldSample::new(0.0, 2.0)]);
        assert!((best_single_power([&a, &b], 0) - 2.0).abs() < 1e-12);
        assert_eq!(best_single_power(std::iter::empty(), 0), 0.0);
    }

    #[test]
    fn test_signed_magnitude() {
        assert!((signed_magnitude(FieldSample::new(0.0, 2.0)) - 2.0).abs() < 1e-12);
        assert!((signed_magnitude(FieldSample::new(0.0, -2.0)) + 2.0).abs() < 1e-12);
        assert!((signed_magnitude(FieldSample::new(1.0, 0.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stats_guard_zero_power() {
        let composite = Field::zeros(4);
        let stats = ReceiverStats::evaluate(&composite, std::iter::empty(), 2);
        assert!(stats.power_db.is_none());
        assert!(stats.beamforming_gain_db.is_none());
        assert!(stats.phase_deg.is_finite());
        assert!(stats.to_string().contains("-inf"));
    }

    #[test]
    fn test_stats_beamforming_gain() {
        // Two aligned unit emitters scaled by 1/sqrt(2): composite sqrt(2)
        let single = field_of(&[FieldSample::new(1.0, 0.0)]);
        let composite = field_of(&[FieldSample::new(2f64.sqrt(), 0.0)]);
        let stats = ReceiverStats::evaluate(&composite, [&single, &single], 0);
        let gain = stats.beamforming_gain_db.unwrap();
        assert!((gain - 10.0 * 2f64.log10()).abs() < 1e-9);
        assert!(stats.phase_deg.abs() < 1e-9);
    }
}
