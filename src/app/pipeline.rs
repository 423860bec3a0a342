//! Shared "fit pipeline" logic used by the `fit` and `batch` subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load observed timing -> fit (streaming the error log) -> residuals -> save artifacts
//!
//! The subcommands can then focus on presentation.

use log::{info, warn};
use rayon::prelude::*;

use crate::data::load_observed;
use crate::domain::{FitArtifacts, FitConfig, Interval, RunManifest};
use crate::error::AppError;
use crate::fit::{FitOutput, fit_profile};
use crate::io::{
    DataLayout, FIT_DECIMALS, TrajectoryWriter, build_manifest, write_manifest, write_profile,
};
use crate::report::{ResidualSummary, summarize_residuals};

/// All computed outputs of a single `ffit fit` run.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub observed: Vec<f64>,
    pub output: FitOutput,
    pub residuals: ResidualSummary,
    pub artifacts: FitArtifacts,
    /// Present when the run was saved.
    pub manifest: Option<RunManifest>,
}

/// Execute the full fitting pipeline for one interval.
pub fn run_fit(config: &FitConfig) -> Result<FitRun, AppError> {
    let layout = DataLayout::new(&config.data_dir);
    let interval = &config.interval;

    // 1) Observed timing (truncated copy written for sub-ranges).
    config.params.validate()?;
    let observed = load_observed(&layout, interval)?;
    // Length-dependent checks, before touching the error log.
    config.params.check_scoring_window(observed.len())?;

    // 2) Fit, appending every error to the chromosome's log as it is computed.
    let mut trajectory = TrajectoryWriter::append(&layout.mse_log(interval))?;
    let output = fit_profile(&observed, &config.params, &mut trajectory)?;

    // 3) Residual diagnostics over the scored window.
    let residuals = summarize_residuals(&observed, &output.timing, config.params.margin)?;

    // 4) Optional artifacts.
    let mut artifacts = FitArtifacts {
        trajectory: trajectory.path().to_path_buf(),
        firing_rates: None,
        simulated_timing: None,
    };
    let manifest = if config.save {
        let rates_path = layout.firing_rates(interval);
        let timing_path = layout.simulated_timing(interval);
        write_profile(&rates_path, &output.rates, FIT_DECIMALS)?;
        write_profile(&timing_path, &output.timing, FIT_DECIMALS)?;
        artifacts.firing_rates = Some(rates_path);
        artifacts.simulated_timing = Some(timing_path);

        let manifest = build_manifest(config, &output, artifacts.clone());
        let manifest_path = layout.manifest(interval);
        write_manifest(&manifest_path, &manifest)?;
        info!(
            "{interval}: saved fitted profile and manifest {}",
            manifest_path.display()
        );
        Some(manifest)
    } else {
        None
    };

    Ok(FitRun {
        observed,
        output,
        residuals,
        artifacts,
        manifest,
    })
}

/// Outcome of one interval in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub interval: Interval,
    pub result: Result<FitRun, AppError>,
}

/// Fit every config in parallel.
///
/// A failing interval does not stop the others; outcomes keep the input order.
/// Each config must target a distinct chromosome, since runs on the same
/// chromosome share an error log.
pub fn run_batch(configs: &[FitConfig]) -> Vec<BatchOutcome> {
    configs
        .par_iter()
        .map(|config| {
            let result = run_fit(config);
            if let Err(err) = &result {
                warn!("{}: fit failed: {err}", config.interval);
            }
            BatchOutcome {
                interval: config.interval.clone(),
                result,
            }
        })
        .collect()
}
