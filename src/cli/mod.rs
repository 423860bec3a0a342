//! Command-line parsing for the firing-rate fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting/math code. Arguments are converted into plain config structs in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    CorrectorKind, DEFAULT_ERR_THRESHOLD, DEFAULT_FIT_STEP, DEFAULT_ITERATIONS, DEFAULT_MARGIN,
    DEFAULT_SPEED,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ffit",
    version,
    about = "Fit origin firing-rate profiles to observed DNA replication timing"
)]
pub struct Cli {
    /// Only log warnings and errors (RUST_LOG still takes precedence).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one interval: iterate the corrector, log the error, optionally save the profile.
    Fit(FitArgs),
    /// Fit whole chromosomes for several cell lines in parallel.
    Batch(BatchArgs),
    /// Aggregate stochastic-simulator event logs into mean profiles.
    Profile(ProfileArgs),
    /// Compute inter-origin distances from saved origin positions.
    Iod(IodArgs),
    /// Write a synthetic observed-timing profile from a random firing-rate profile.
    Synth(SynthArgs),
    /// Plot a saved error trajectory.
    Plot(PlotArgs),
}

/// Data root shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Root directory holding inputs and artifacts.
    #[arg(long, env = "FIRING_FIT_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

/// Forward-model and fit-loop parameters.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Fork speed v.
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    pub speed: f64,

    /// Window scale; the radius is N / scale. Default keeps the radius near 2000.
    #[arg(long)]
    pub window_scale: Option<usize>,

    /// Exponent of the power corrector.
    #[arg(long, default_value_t = DEFAULT_FIT_STEP)]
    pub fit_step: i32,

    /// Number of corrector iterations (no early stop).
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Rate floor exponent: rates never drop below 10^-err_threshold.
    #[arg(long, default_value_t = DEFAULT_ERR_THRESHOLD)]
    pub err_threshold: i32,

    /// Positions excluded from the error at each end of the interval.
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub margin: usize,

    /// Corrector strategy.
    #[arg(long, value_enum, default_value_t = CorrectorKind::Power)]
    pub corrector: CorrectorKind,
}

/// Options for fitting a single interval.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Cell line label (e.g. GM12878).
    #[arg(short = 'c', long)]
    pub cell_line: String,

    /// Chromosome number (1-22).
    #[arg(long)]
    pub chr: u8,

    /// First position of the interval (inclusive). Requires --end.
    #[arg(long, requires = "end")]
    pub start: Option<usize>,

    /// Last position of the interval (exclusive). Requires --start.
    #[arg(long, requires = "start")]
    pub end: Option<usize>,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Save the fitted rates, simulated timing, and run manifest.
    /// Replaces files left by an earlier fit of the same interval.
    #[arg(long)]
    pub save: bool,

    /// Render the error trajectory as an ASCII plot.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for batch fitting.
#[derive(Debug, Parser, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Cell lines to fit.
    #[arg(short = 'c', long = "cell-line", required = true, num_args = 1..)]
    pub cell_lines: Vec<String>,

    /// Chromosomes to fit (default: 1-22).
    #[arg(long = "chr", num_args = 1..)]
    pub chromosomes: Vec<u8>,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Save each fitted profile and manifest, replacing earlier ones.
    #[arg(long)]
    pub save: bool,
}

/// Options for simulator-log aggregation.
#[derive(Debug, Parser, Clone)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Cell lines to process.
    #[arg(short = 'c', long = "cell-line", required = true, num_args = 1..)]
    pub cell_lines: Vec<String>,

    /// Chromosomes to process (default: 1-22).
    #[arg(long = "chr", num_args = 1..)]
    pub chromosomes: Vec<u8>,

    /// Single interval start; without it every 10000-position chunk is processed.
    #[arg(long, requires = "end")]
    pub start: Option<usize>,

    /// Single interval end (exclusive).
    #[arg(long, requires = "start")]
    pub end: Option<usize>,

    /// Number of simulations to average.
    #[arg(long, default_value_t = 100)]
    pub sims: usize,

    /// Skip the mean replication-time profile.
    #[arg(long)]
    pub no_time: bool,

    /// Skip the fork-directionality profile.
    #[arg(long)]
    pub no_forks: bool,

    /// Skip the origin-position lists.
    #[arg(long)]
    pub no_origins: bool,
}

/// Options for inter-origin distances.
#[derive(Debug, Parser, Clone)]
pub struct IodArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Cell lines to process.
    #[arg(short = 'c', long = "cell-line", required = true, num_args = 1..)]
    pub cell_lines: Vec<String>,

    /// Chromosomes to process (default: 1-22).
    #[arg(long = "chr", num_args = 1..)]
    pub chromosomes: Vec<u8>,

    /// Single interval start; without it every 10000-position chunk is processed.
    #[arg(long, requires = "end")]
    pub start: Option<usize>,

    /// Single interval end (exclusive).
    #[arg(long, requires = "start")]
    pub end: Option<usize>,
}

/// Options for synthetic data generation.
#[derive(Debug, Parser, Clone)]
pub struct SynthArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Cell line label to write the profile under.
    #[arg(short = 'c', long, default_value = "SYNTH")]
    pub cell_line: String,

    /// Chromosome number to write the profile under.
    #[arg(long, default_value_t = 1)]
    pub chr: u8,

    /// Number of positions.
    #[arg(short = 'n', long, default_value_t = 20_000)]
    pub positions: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Median firing rate of the log-normal draw.
    #[arg(long, default_value_t = 1e-4)]
    pub rate_median: f64,

    /// Log-scale spread of the log-normal draw.
    #[arg(long, default_value_t = 1.0)]
    pub rate_sigma: f64,

    /// Standard deviation of Gaussian noise added to the timing.
    #[arg(long, default_value_t = 0.0)]
    pub noise_sd: f64,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Options for plotting a saved trajectory.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Error trajectory file written by `ffit fit`.
    #[arg(long, value_name = "TXT")]
    pub trajectory: PathBuf,

    /// Only plot the last N recorded errors (the file accumulates across runs).
    #[arg(long)]
    pub tail: Option<usize>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(line.split_whitespace())
    }

    #[test]
    fn fit_defaults() {
        let cli = parse("ffit fit -c GM12878 --chr 2").unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.cell_line, "GM12878");
        assert_eq!(args.chr, 2);
        assert_eq!(args.start, None);
        assert_eq!(args.model.speed, DEFAULT_SPEED);
        assert_eq!(args.model.iterations, 100);
        assert_eq!(args.model.margin, 1000);
        assert_eq!(args.model.corrector, CorrectorKind::Power);
        assert!(!args.save && !args.plot);
    }

    #[test]
    fn fit_save_is_opt_in() {
        let cli = parse("ffit fit -c GM12878 --chr 2 --save").unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert!(args.save);
    }

    #[test]
    fn fit_range_needs_both_ends() {
        assert!(parse("ffit fit -c X --chr 1 --start 5").is_err());
        let cli = parse("ffit fit -c X --chr 1 --start 5 --end 50 --corrector log-ratio").unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!((args.start, args.end), (Some(5), Some(50)));
        assert_eq!(args.model.corrector, CorrectorKind::LogRatio);
    }

    #[test]
    fn batch_takes_lists() {
        let cli = parse("ffit -q batch -c GM12878 K562 --chr 1 2 --save").unwrap();
        assert!(cli.quiet);
        let Command::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(args.cell_lines, vec!["GM12878", "K562"]);
        assert_eq!(args.chromosomes, vec![1, 2]);
        assert!(args.save);
    }
}
