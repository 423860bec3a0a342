//! Shared domain types.
//!
//! These are plain values derived from CLI flags (plus defaults). The library never
//! reads the environment; `app` builds these and hands them to the pipeline.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default fork speed / decay constant `v`.
pub const DEFAULT_SPEED: f64 = 1.4;
/// Default correction exponent.
pub const DEFAULT_FIT_STEP: i32 = 2;
/// Default iteration budget.
pub const DEFAULT_ITERATIONS: usize = 100;
/// Default floor exponent (floor = `10^-15`).
pub const DEFAULT_ERR_THRESHOLD: i32 = 15;
/// Positions excluded from each end when scoring a fit.
pub const DEFAULT_MARGIN: usize = 1000;
/// Target window radius when no explicit window scale is given.
pub const DEFAULT_WINDOW_WIDTH: usize = 2000;

/// How a new firing-rate profile is derived from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectorKind {
    /// `current · (predicted / observed)^fit_step`
    Power,
    /// `current ^ (ln predicted / ln observed)`
    ///
    /// The exponent has observed in the denominator, so this is the reciprocal of the
    /// `ln observed / ln predicted` form. Where the prediction is late (times below 1,
    /// `predicted > observed`) the exponent is below 1 and a rate under 1 grows.
    LogRatio,
}

impl CorrectorKind {
    pub fn display_name(self) -> &'static str {
        match self {
            CorrectorKind::Power => "power",
            CorrectorKind::LogRatio => "log-ratio",
        }
    }
}

/// Half-open position range `[start, end)` within a chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRange {
    pub start: usize,
    pub end: usize,
}

impl PositionRange {
    pub fn new(start: usize, end: usize) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::invalid_config(format!(
                "Invalid position range {start}-{end} (end must be > start)."
            )));
        }
        Ok(Self { start, end })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl std::fmt::Display for PositionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A named genomic interval: cell line, chromosome, and optionally a sub-range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub cell_line: String,
    pub chr: u8,
    /// `None` means the whole chromosome.
    pub range: Option<PositionRange>,
}

impl Interval {
    pub fn whole(cell_line: impl Into<String>, chr: u8) -> Self {
        Self {
            cell_line: cell_line.into(),
            chr,
            range: None,
        }
    }

    pub fn ranged(cell_line: impl Into<String>, chr: u8, range: PositionRange) -> Self {
        Self {
            cell_line: cell_line.into(),
            chr,
            range: Some(range),
        }
    }

    /// `{cell}_chr[{n}]`
    pub fn chromosome_label(&self) -> String {
        format!("{}_chr[{}]", self.cell_line, self.chr)
    }

    /// `{cell}_chr[{n}]` for whole chromosomes, `{cell}_chr[{n}]_{start}-{end}` otherwise.
    pub fn label(&self) -> String {
        match self.range {
            None => self.chromosome_label(),
            Some(range) => format!("{}_{}", self.chromosome_label(), range),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.range {
            None => write!(f, "{} chr{} (whole)", self.cell_line, self.chr),
            Some(range) => write!(f, "{} chr{}:{}", self.cell_line, self.chr, range),
        }
    }
}

/// Resolved window geometry for one fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub scale: usize,
    pub radius: usize,
}

/// Fixed model and fitting constants for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Fork speed / decay constant `v`.
    pub speed: f64,
    /// Divisor giving the window radius `L = N / scale`. `None` derives it from
    /// [`DEFAULT_WINDOW_WIDTH`].
    pub window_scale: Option<usize>,
    pub fit_step: i32,
    pub iterations: usize,
    pub err_threshold: i32,
    /// Positions dropped from each end in the truncated MSE.
    pub margin: usize,
    pub corrector: CorrectorKind,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            window_scale: None,
            fit_step: DEFAULT_FIT_STEP,
            iterations: DEFAULT_ITERATIONS,
            err_threshold: DEFAULT_ERR_THRESHOLD,
            margin: DEFAULT_MARGIN,
            corrector: CorrectorKind::Power,
        }
    }
}

impl ModelParams {
    /// Smallest firing rate a profile may hold: `10^-err_threshold`.
    pub fn floor(&self) -> f64 {
        10f64.powf(-f64::from(self.err_threshold))
    }

    /// Check the length-independent parameters.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(AppError::invalid_config(format!(
                "Fork speed must be finite and > 0 (got {}).",
                self.speed
            )));
        }
        if self.window_scale == Some(0) {
            return Err(AppError::invalid_config("Window scale must be >= 1."));
        }
        let floor = self.floor();
        if !(floor.is_finite() && floor > 0.0) {
            return Err(AppError::invalid_config(format!(
                "Error threshold {} gives an unusable floor ({floor}).",
                self.err_threshold
            )));
        }
        Ok(())
    }

    /// Resolve the window for a profile of `n` positions.
    pub fn window(&self, n: usize) -> Result<WindowSpec, AppError> {
        self.validate()?;
        let scale = self
            .window_scale
            .unwrap_or_else(|| (n / DEFAULT_WINDOW_WIDTH).max(1));
        Ok(WindowSpec {
            scale,
            radius: n / scale,
        })
    }

    /// Check that the truncated-MSE window `[margin, n - margin)` is non-empty.
    pub fn check_scoring_window(&self, n: usize) -> Result<(), AppError> {
        if n <= self.margin.saturating_mul(2) {
            let needed = self.margin.saturating_mul(2);
            return Err(AppError::invalid_config(format!(
                "Profile has {n} positions; a margin of {} per side needs more than {needed}.",
                self.margin
            )));
        }
        Ok(())
    }
}

/// Everything the `fit` command needs.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub data_dir: PathBuf,
    pub interval: Interval,
    pub params: ModelParams,
    /// Persist final firing rates, simulated timing, and the run manifest.
    pub save: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

/// Which empirical profiles to derive from a simulator log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileOutputs {
    pub replication_time: bool,
    pub fork_directionality: bool,
    pub origin_positions: bool,
}

impl ProfileOutputs {
    pub const ALL: ProfileOutputs = ProfileOutputs {
        replication_time: true,
        fork_directionality: true,
        origin_positions: true,
    };

    pub fn any(&self) -> bool {
        self.replication_time || self.fork_directionality || self.origin_positions
    }
}

/// Everything the `profile` command needs.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub data_dir: PathBuf,
    pub cell_lines: Vec<String>,
    pub chromosomes: Vec<u8>,
    /// Single interval to process; `None` walks every chunk of each chromosome.
    pub range: Option<PositionRange>,
    pub sim_number: usize,
    pub outputs: ProfileOutputs,
}

/// Everything the `synth` command needs.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub data_dir: PathBuf,
    pub cell_line: String,
    pub chr: u8,
    pub positions: usize,
    pub seed: u64,
    /// Median of the log-normal firing-rate draw.
    pub rate_median: f64,
    /// Log-scale spread of the firing-rate draw.
    pub rate_sigma: f64,
    /// Standard deviation of additive Gaussian noise on the timing.
    pub noise_sd: f64,
    pub params: ModelParams,
}

/// Paths written by a fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitArtifacts {
    pub trajectory: PathBuf,
    pub firing_rates: Option<PathBuf>,
    pub simulated_timing: Option<PathBuf>,
}

/// JSON record of a saved fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub tool: String,
    pub created_at: DateTime<Utc>,
    pub interval: Interval,
    pub params: ModelParams,
    pub positions: usize,
    pub window: WindowSpec,
    pub initial_mse: f64,
    pub final_mse: f64,
    pub final_floor_hits: usize,
    pub artifacts: FitArtifacts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn labels_follow_file_naming() {
        let whole = Interval::whole("HeLa-S3", 3);
        assert_eq!(whole.label(), "HeLa-S3_chr[3]");

        let part = Interval::ranged("HCT", 1, PositionRange::new(10000, 20000).unwrap());
        assert_eq!(part.label(), "HCT_chr[1]_10000-20000");
        assert_eq!(part.chromosome_label(), "HCT_chr[1]");
    }

    #[test]
    fn default_window_targets_two_thousand_positions() {
        let params = ModelParams::default();
        let w = params.window(248_000).unwrap();
        assert_eq!(w.scale, 124);
        assert_eq!(w.radius, 2000);

        // Short profiles fall back to scale 1.
        let short = WindowSpec {
            scale: 1,
            radius: 500,
        };
        assert_eq!(params.window(500).unwrap(), short);
    }

    #[test]
    fn explicit_window_scale_divides_length() {
        let params = ModelParams {
            window_scale: Some(6),
            ..ModelParams::default()
        };
        assert_eq!(params.window(10_000).unwrap().radius, 1666);
    }

    #[test]
    fn zero_window_scale_is_rejected() {
        let params = ModelParams {
            window_scale: Some(0),
            ..ModelParams::default()
        };
        let err = params.window(100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        for speed in [0.0, -1.4, f64::NAN] {
            let params = ModelParams {
                speed,
                ..ModelParams::default()
            };
            assert!(params.validate().is_err());
        }
    }

    #[test]
    fn scoring_window_needs_more_than_twice_the_margin() {
        let params = ModelParams::default();
        assert!(params.check_scoring_window(2000).is_err());
        assert!(params.check_scoring_window(2001).is_ok());

        let no_margin = ModelParams {
            margin: 0,
            ..ModelParams::default()
        };
        assert!(no_margin.check_scoring_window(0).is_err());
        assert!(no_margin.check_scoring_window(1).is_ok());
    }

    #[test]
    fn floor_matches_threshold() {
        assert!((ModelParams::default().floor() - 1e-15).abs() < 1e-28);
    }
}
