//! Fit scoring and error-trajectory recording.

use crate::error::AppError;

/// Mean squared error over `[margin, n - margin)`.
///
/// Positions near the interval ends are excluded because the windowed model wraps
/// reach across the boundary there. Fails if the scored window would be empty.
pub fn truncated_mse(observed: &[f64], predicted: &[f64], margin: usize) -> Result<f64, AppError> {
    let n = observed.len();
    if predicted.len() != n {
        return Err(AppError::invalid_config(format!(
            "Observed and predicted profiles differ in length ({n} vs {}).",
            predicted.len()
        )));
    }
    if n <= margin.saturating_mul(2) {
        return Err(AppError::invalid_config(format!(
            "Cannot score {n} positions with a margin of {margin} per side."
        )));
    }

    let window = margin..n - margin;
    let len = window.len() as f64;
    let sse: f64 = observed[window.clone()]
        .iter()
        .zip(&predicted[window])
        .map(|(o, p)| (o - p) * (o - p))
        .sum();
    Ok(sse / len)
}

/// Destination for per-iteration errors.
///
/// Implementations must make each recorded value durable before returning so that
/// an interrupted run leaves a usable partial trajectory.
pub trait TrajectorySink {
    fn record(&mut self, mse: f64) -> Result<(), AppError>;
}

impl TrajectorySink for Vec<f64> {
    fn record(&mut self, mse: f64) -> Result<(), AppError> {
        self.push(mse);
        Ok(())
    }
}

/// Discards every value (the fitter keeps its own in-memory copy).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TrajectorySink for NullSink {
    fn record(&mut self, _mse: f64) -> Result<(), AppError> {
        Ok(())
    }
}

/// Relative improvement from the first to the last recorded error.
pub fn relative_improvement(trajectory: &[f64]) -> Option<f64> {
    let first = *trajectory.first()?;
    let last = *trajectory.last()?;
    if first > 0.0 && first.is_finite() && last.is_finite() {
        Some((first - last) / first)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn mse_without_margin_covers_everything() {
        let mse = truncated_mse(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0], 0).unwrap();
        assert!((mse - 5.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn margin_excludes_edges() {
        let observed = [100.0, 1.0, 2.0, 100.0];
        let predicted = [0.0, 1.0, 4.0, 0.0];
        let mse = truncated_mse(&observed, &predicted, 1).unwrap();
        assert!((mse - 2.0).abs() < 1e-15);
    }

    #[test]
    fn empty_window_is_config_error() {
        let err = truncated_mse(&[1.0; 4], &[1.0; 4], 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert!(truncated_mse(&[], &[], 0).is_err());
    }

    #[test]
    fn misaligned_profiles_are_rejected() {
        assert!(truncated_mse(&[1.0; 4], &[1.0; 3], 0).is_err());
    }

    #[test]
    fn improvement_is_relative_to_start() {
        assert_eq!(relative_improvement(&[4.0, 2.0, 1.0]), Some(0.75));
        assert_eq!(relative_improvement(&[]), None);
        assert_eq!(relative_improvement(&[0.0, 0.0]), None);
    }
}
