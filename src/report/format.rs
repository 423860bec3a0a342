//! Reporting utilities: residual diagnostics and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{FitArtifacts, FitConfig, Interval};
use crate::error::AppError;
use crate::fit::{FitOutput, relative_improvement};

/// Residual diagnostics over the scored window `[margin, n - margin)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualSummary {
    pub scored: usize,
    pub rmse: f64,
    pub max_abs: f64,
    /// Position (within the interval) of the largest absolute residual.
    pub max_abs_position: usize,
    /// Mean of `observed - simulated` (positive: simulation runs early).
    pub bias: f64,
}

/// Compute residual diagnostics between observed and simulated timing.
pub fn summarize_residuals(
    observed: &[f64],
    simulated: &[f64],
    margin: usize,
) -> Result<ResidualSummary, AppError> {
    let n = observed.len();
    if simulated.len() != n || n <= margin.saturating_mul(2) {
        return Err(AppError::invalid_config(
            "Residual window is empty or profiles are misaligned.",
        ));
    }

    let mut sse = 0.0;
    let mut sum = 0.0;
    let mut max_abs = 0.0;
    let mut max_abs_position = margin;
    for j in margin..n - margin {
        let r = observed[j] - simulated[j];
        sse += r * r;
        sum += r;
        if r.abs() > max_abs {
            max_abs = r.abs();
            max_abs_position = j;
        }
    }
    let scored = n - 2 * margin;
    Ok(ResidualSummary {
        scored,
        rmse: (sse / scored as f64).sqrt(),
        max_abs,
        max_abs_position,
        bias: sum / scored as f64,
    })
}

/// Format the run summary for a single fit.
pub fn format_fit_summary(
    config: &FitConfig,
    output: &FitOutput,
    residuals: &ResidualSummary,
    artifacts: &FitArtifacts,
) -> String {
    let p = &config.params;
    let mut out = String::new();

    out.push_str("=== ffit - firing-rate fit ===\n");
    out.push_str(&format!("Interval: {}\n", config.interval));
    out.push_str(&format!(
        "Positions: n={} | window L={} (scale {}) | margin={}\n",
        output.rates.len(),
        output.window.radius,
        output.window.scale,
        p.margin
    ));
    out.push_str(&format!(
        "Model: v={} | fit_step={} | corrector={} | floor={:e} | iterations={}\n",
        p.speed,
        p.fit_step,
        p.corrector.display_name(),
        p.floor(),
        p.iterations
    ));

    out.push_str("\nConvergence:\n");
    out.push_str(&format!("- initial MSE: {:.6e}\n", output.initial_mse()));
    out.push_str(&format!("- final MSE  : {:.6e}\n", output.final_mse()));
    match relative_improvement(&output.trajectory) {
        Some(rel) => out.push_str(&format!("- improvement: {:.2}%\n", rel * 100.0)),
        None => out.push_str("- improvement: n/a\n"),
    }
    out.push_str(&format!(
        "- floor hits (last step): {}/{}\n",
        output.final_floor_hits,
        output.rates.len()
    ));

    out.push_str("\nResiduals (observed - simulated, scored window):\n");
    out.push_str(&format!(
        "- RMSE={:.6} | bias={:+.6} | max |r|={:.6} at position {}\n",
        residuals.rmse, residuals.bias, residuals.max_abs, residuals.max_abs_position
    ));
    out.push_str(&format!("\nRates: {}\n", fmt_range(&output.rates)));

    out.push_str("\nArtifacts:\n");
    out.push_str(&format!("- error log: {}\n", artifacts.trajectory.display()));
    if let Some(path) = &artifacts.firing_rates {
        out.push_str(&format!("- firing rates: {}\n", path.display()));
    }
    if let Some(path) = &artifacts.simulated_timing {
        out.push_str(&format!("- simulated timing: {}\n", path.display()));
    }

    out
}

/// One row of a batch report.
#[derive(Debug, Clone)]
pub struct BatchRow {
    pub interval: Interval,
    pub outcome: Result<(f64, f64), String>,
}

/// Format the batch table (one line per interval).
pub fn format_batch_table(rows: &[BatchRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<28} {:>14} {:>14} {:<}\n",
            "interval", "initial_mse", "final_mse", "status"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<28} {:-<14} {:-<14} {:-<6}\n", "", "", "", "").trim_end());
    out.push('\n');

    for row in rows {
        let line = match &row.outcome {
            Ok((initial, last)) => format!(
                "{:<28} {:>14.6e} {:>14.6e} ok",
                truncate(&row.interval.label(), 28),
                initial,
                last
            ),
            Err(msg) => format!(
                "{:<28} {:>14} {:>14} failed: {msg}",
                truncate(&row.interval.label(), 28),
                "-",
                "-"
            ),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn fmt_range(values: &[f64]) -> String {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min.is_finite() && max.is_finite() {
        format!("min={min:.6e} max={max:.6e}")
    } else {
        "-".to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
