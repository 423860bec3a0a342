//! Synthetic observed-timing generation.
//!
//! Draws a known firing-rate profile, pushes it through the forward model, and
//! optionally perturbs the result. Fitting the output should recover a profile
//! close to the drawn one, which makes this a convenient end-to-end check.

use std::path::PathBuf;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, LogNormal, Normal};

use crate::domain::{SynthConfig, WindowSpec};
use crate::error::AppError;
use crate::io::{DataLayout, FIT_DECIMALS, write_profile};
use crate::math::expected_timing;

#[derive(Debug, Clone)]
pub struct SyntheticData {
    /// The drawn ("true") firing rates.
    pub rates: Vec<f64>,
    /// Forward-model timing for `rates`, plus noise.
    pub timing: Vec<f64>,
    pub window: WindowSpec,
}

/// Paths written by [`write_synthetic`].
#[derive(Debug, Clone)]
pub struct SyntheticFiles {
    pub timing: PathBuf,
    pub rates: PathBuf,
}

pub fn generate(config: &SynthConfig) -> Result<SyntheticData, AppError> {
    if config.positions == 0 {
        return Err(AppError::invalid_config("Synthetic profile needs at least one position."));
    }
    if !(config.rate_median.is_finite() && config.rate_median > 0.0) {
        return Err(AppError::invalid_config("Rate median must be finite and > 0."));
    }
    if !(config.rate_sigma.is_finite() && config.rate_sigma >= 0.0) {
        return Err(AppError::invalid_config("Rate sigma must be finite and >= 0."));
    }
    if !(config.noise_sd.is_finite() && config.noise_sd >= 0.0) {
        return Err(AppError::invalid_config("Noise standard deviation must be finite and >= 0."));
    }

    let window = config.params.window(config.positions)?;
    let floor = config.params.floor();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let rate_dist = LogNormal::new(config.rate_median.ln(), config.rate_sigma)
        .map_err(|e| AppError::invalid_config(format!("Rate distribution error: {e}")))?;
    let rates: Vec<f64> = (0..config.positions)
        .map(|_| rate_dist.sample(&mut rng).max(floor))
        .collect();

    let mut timing = expected_timing(&rates, window.radius, config.params.speed);
    if config.noise_sd > 0.0 {
        let noise = Normal::new(0.0, config.noise_sd)
            .map_err(|e| AppError::invalid_config(format!("Noise distribution error: {e}")))?;
        for t in timing.iter_mut() {
            *t = (*t + noise.sample(&mut rng)).max(0.0);
        }
    }

    Ok(SyntheticData {
        rates,
        timing,
        window,
    })
}

/// Generate and save: timing as the chromosome's observed input, rates for comparison.
pub fn write_synthetic(config: &SynthConfig) -> Result<(SyntheticData, SyntheticFiles), AppError> {
    let data = generate(config)?;
    let layout = DataLayout::new(&config.data_dir);
    let files = SyntheticFiles {
        timing: layout.timing_data(&config.cell_line, config.chr),
        rates: layout.synthetic_rates(&config.cell_line, config.chr),
    };
    write_profile(&files.timing, &data.timing, FIT_DECIMALS)?;
    write_profile(&files.rates, &data.rates, FIT_DECIMALS)?;
    info!(
        "wrote synthetic timing ({} positions, L={}) to {}",
        data.timing.len(),
        data.window.radius,
        files.timing.display()
    );
    Ok((data, files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelParams;

    fn config(seed: u64, noise_sd: f64) -> SynthConfig {
        SynthConfig {
            data_dir: PathBuf::from("unused"),
            cell_line: "SYN".to_string(),
            chr: 1,
            positions: 64,
            seed,
            rate_median: 0.02,
            rate_sigma: 0.5,
            noise_sd,
            params: ModelParams {
                window_scale: Some(8),
                ..ModelParams::default()
            },
        }
    }

    #[test]
    fn same_seed_same_profile() {
        let a = generate(&config(7, 0.1)).unwrap();
        let b = generate(&config(7, 0.1)).unwrap();
        assert_eq!(a.rates, b.rates);
        assert_eq!(a.timing, b.timing);

        let c = generate(&config(8, 0.1)).unwrap();
        assert_ne!(a.rates, c.rates);
    }

    #[test]
    fn noiseless_timing_is_forward_model() {
        let data = generate(&config(3, 0.0)).unwrap();
        assert_eq!(data.window.radius, 8);
        assert_eq!(data.timing, expected_timing(&data.rates, 8, 1.4));
    }

    #[test]
    fn noisy_timing_stays_non_negative() {
        let data = generate(&config(11, 50.0)).unwrap();
        assert!(data.timing.iter().all(|t| *t >= 0.0));
        assert!(data.rates.iter().all(|r| *r > 0.0));
    }

    #[test]
    fn rejects_bad_distribution_parameters() {
        let mut bad = config(1, 0.0);
        bad.rate_median = 0.0;
        assert!(generate(&bad).is_err());

        let mut bad = config(1, 0.0);
        bad.noise_sd = -1.0;
        assert!(generate(&bad).is_err());
    }
}
