//! The iterative fit.
//!
//! Given an observed timing profile:
//! - start from the closed-form firing-rate guess
//! - simulate timing with the forward model and score it
//! - repeatedly correct the rates, re-simulate, and score
//!
//! The loop always spends its whole iteration budget; there is no early exit on a
//! plateau. Every score goes to a [`TrajectorySink`] as soon as it is computed.

use log::{debug, info, warn};

use crate::domain::{ModelParams, WindowSpec};
use crate::error::AppError;
use crate::fit::{TrajectorySink, correct, initial_profile, truncated_mse};
use crate::math::expected_timing;

/// Where the fit is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitState {
    /// Parameters validated, initial guess built, nothing simulated yet.
    Initialized,
    /// Initial guess scored; `completed` correction steps done so far.
    Iterating { completed: usize },
    /// The iteration budget is spent.
    MaxIterReached,
}

/// Outputs of a finished fit.
#[derive(Debug, Clone)]
pub struct FitOutput {
    /// Final firing-rate profile.
    pub rates: Vec<f64>,
    /// Simulated timing for `rates`.
    pub timing: Vec<f64>,
    /// Truncated MSE per iteration, starting with the initial guess.
    pub trajectory: Vec<f64>,
    pub window: WindowSpec,
    /// Positions clamped to the floor in the last correction.
    pub final_floor_hits: usize,
}

impl FitOutput {
    pub fn initial_mse(&self) -> f64 {
        self.trajectory.first().copied().unwrap_or(f64::NAN)
    }

    pub fn final_mse(&self) -> f64 {
        self.trajectory.last().copied().unwrap_or(f64::NAN)
    }
}

/// Drives the forward model and corrector over one observed profile.
pub struct Fitter<'a> {
    observed: &'a [f64],
    params: &'a ModelParams,
    window: WindowSpec,
    floor: f64,
    rates: Vec<f64>,
    timing: Vec<f64>,
    trajectory: Vec<f64>,
    floor_hits: usize,
    saturation_warned: bool,
    state: FitState,
}

impl<'a> Fitter<'a> {
    /// Validate parameters against the profile and build the initial guess.
    pub fn new(observed: &'a [f64], params: &'a ModelParams) -> Result<Self, AppError> {
        let n = observed.len();
        params.check_scoring_window(n)?;
        let window = params.window(n)?;
        let floor = params.floor();

        Ok(Self {
            observed,
            params,
            window,
            floor,
            rates: initial_profile(observed, params.speed, floor),
            timing: Vec::new(),
            trajectory: Vec::with_capacity(params.iterations + 1),
            floor_hits: 0,
            saturation_warned: false,
            state: FitState::Initialized,
        })
    }

    pub fn state(&self) -> FitState {
        self.state
    }

    pub fn window(&self) -> WindowSpec {
        self.window
    }

    /// Current firing-rate profile.
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Advance by one transition: score the initial guess, or run one correction.
    ///
    /// Returns the recorded error, or `None` once the budget is spent.
    pub fn step<S: TrajectorySink>(&mut self, sink: &mut S) -> Result<Option<f64>, AppError> {
        match self.state {
            FitState::Initialized => {
                let timing = self.simulate(&self.rates);
                let mse = self.score(&timing, sink)?;
                self.timing = timing;
                self.state = self.after(0);
                debug!("iteration 0/{}: mse={mse:.6e}", self.params.iterations);
                Ok(Some(mse))
            }
            FitState::Iterating { completed } => {
                let correction = correct(
                    self.params.corrector,
                    self.observed,
                    &self.timing,
                    &self.rates,
                    self.params.fit_step,
                    self.floor,
                );
                let timing = self.simulate(&correction.rates);
                let mse = self.score(&timing, sink)?;

                self.rates = correction.rates;
                self.timing = timing;
                self.note_floor_hits(correction.floor_hits, completed + 1);
                self.state = self.after(completed + 1);
                debug!(
                    "iteration {}/{}: mse={mse:.6e} floor_hits={}",
                    completed + 1,
                    self.params.iterations,
                    self.floor_hits
                );
                Ok(Some(mse))
            }
            FitState::MaxIterReached => Ok(None),
        }
    }

    /// Run until the iteration budget is spent.
    pub fn run<S: TrajectorySink>(&mut self, sink: &mut S) -> Result<(), AppError> {
        while self.step(sink)?.is_some() {}
        Ok(())
    }

    /// Consume the fitter. Call after [`Fitter::run`].
    pub fn finish(self) -> FitOutput {
        FitOutput {
            rates: self.rates,
            timing: self.timing,
            trajectory: self.trajectory,
            window: self.window,
            final_floor_hits: self.floor_hits,
        }
    }

    fn simulate(&self, rates: &[f64]) -> Vec<f64> {
        expected_timing(rates, self.window.radius, self.params.speed)
    }

    fn score<S: TrajectorySink>(&mut self, timing: &[f64], sink: &mut S) -> Result<f64, AppError> {
        let mse = truncated_mse(self.observed, timing, self.params.margin)?;
        sink.record(mse)?;
        self.trajectory.push(mse);
        Ok(mse)
    }

    fn after(&self, completed: usize) -> FitState {
        if completed >= self.params.iterations {
            FitState::MaxIterReached
        } else {
            FitState::Iterating { completed }
        }
    }

    fn note_floor_hits(&mut self, hits: usize, iteration: usize) {
        self.floor_hits = hits;
        let n = self.observed.len();
        if !self.saturation_warned && hits.saturating_mul(2) > n {
            self.saturation_warned = true;
            warn!(
                "iteration {iteration}: {hits}/{n} positions clamped to the rate floor {:e}",
                self.floor
            );
        }
    }
}

/// Fit `observed` with `params`, streaming each error to `sink`.
pub fn fit_profile<S: TrajectorySink>(
    observed: &[f64],
    params: &ModelParams,
    sink: &mut S,
) -> Result<FitOutput, AppError> {
    let mut fitter = Fitter::new(observed, params)?;
    info!(
        "fitting {} positions: L={} (scale {}), v={}, fit_step={}, iterations={}, corrector={}",
        observed.len(),
        fitter.window().radius,
        fitter.window().scale,
        params.speed,
        params.fit_step,
        params.iterations,
        params.corrector.display_name()
    );
    fitter.run(sink)?;
    let out = fitter.finish();
    info!(
        "fit complete: mse {:.6e} -> {:.6e}",
        out.initial_mse(),
        out.final_mse()
    );
    Ok(out)
}
