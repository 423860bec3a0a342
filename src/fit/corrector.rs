//! Firing-rate corrections.
//!
//! Each iteration rescales every position's rate by how far the simulated timing is
//! from the observed one. Results below the floor, and any non-finite result (for
//! example from an observed time of zero), are replaced by the floor so the next
//! forward-model pass never divides by a zero or negative reach.

use std::f64::consts::PI;

use crate::domain::CorrectorKind;

/// A corrected profile plus how many positions were clamped.
#[derive(Debug, Clone)]
pub struct Correction {
    pub rates: Vec<f64>,
    pub floor_hits: usize,
}

/// Closed-form starting profile: `π / (4v) · t^-2` at each observed time `t`.
///
/// Positions where the formula is not finite (observed time zero) start at `floor`.
pub fn initial_profile(observed: &[f64], speed: f64, floor: f64) -> Vec<f64> {
    let scale = PI / (4.0 * speed);
    observed
        .iter()
        .map(|&t| clamp_to_floor(scale * t.powi(-2), floor).0)
        .collect()
}

/// Produce the next profile from the current one.
pub fn correct(
    kind: CorrectorKind,
    observed: &[f64],
    predicted: &[f64],
    current: &[f64],
    fit_step: i32,
    floor: f64,
) -> Correction {
    debug_assert_eq!(observed.len(), current.len());
    debug_assert_eq!(predicted.len(), current.len());

    let mut floor_hits = 0usize;
    let rates = current
        .iter()
        .zip(predicted)
        .zip(observed)
        .map(|((&x, &p), &t)| {
            let candidate = match kind {
                CorrectorKind::Power => x * (p / t).powi(fit_step),
                CorrectorKind::LogRatio => x.powf(p.ln() / t.ln()),
            };
            let (value, clamped) = clamp_to_floor(candidate, floor);
            floor_hits += usize::from(clamped);
            value
        })
        .collect();

    Correction { rates, floor_hits }
}

/// Returns the admissible value and whether the floor was applied.
pub fn clamp_to_floor(candidate: f64, floor: f64) -> (f64, bool) {
    if candidate.is_finite() && candidate >= floor {
        (candidate, false)
    } else {
        (floor, true)
    }
}
