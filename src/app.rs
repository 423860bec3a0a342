//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - turns arguments into plain config structs
//! - runs the requested subcommand and prints reports/plots

use clap::Parser;

use crate::cli::{
    BatchArgs, Cli, Command, FitArgs, IodArgs, ModelArgs, PlotArgs, ProfileArgs, SynthArgs,
};
use crate::domain::{
    FitConfig, Interval, ModelParams, PositionRange, ProfileConfig, ProfileOutputs, SynthConfig,
    chromosome_length,
};
use crate::error::AppError;
use crate::io::DataLayout;
use crate::report::BatchRow;

pub mod pipeline;

/// Entry point for the `ffit` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Batch(args) => handle_batch(args),
        Command::Profile(args) => handle_profile(args),
        Command::Iod(args) => handle_iod(args),
        Command::Synth(args) => handle_synth(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    // A second init (tests, embedding) keeps the first logger.
    let env = env_logger::Env::default().default_filter_or(default);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&config, &run.output, &run.residuals, &run.artifacts)
    );

    if config.plot {
        let plot = crate::plot::render_trajectory_plot(
            &run.output.trajectory,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let params = model_params_from_args(&args.model);
    params.validate()?;
    let chromosomes = chromosomes_or_all(&args.chromosomes)?;
    let cell_lines = dedup_preserving_order(&args.cell_lines);

    let mut configs = Vec::with_capacity(cell_lines.len() * chromosomes.len());
    for cell_line in &cell_lines {
        for &chr in &chromosomes {
            configs.push(FitConfig {
                data_dir: args.data.data_dir.clone(),
                interval: Interval::whole(cell_line.clone(), chr),
                params: params.clone(),
                save: args.save,
                plot: false,
                plot_width: 0,
                plot_height: 0,
            });
        }
    }

    let outcomes = pipeline::run_batch(&configs);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let first_error_kind = outcomes
        .iter()
        .find_map(|o| o.result.as_ref().err().map(|e| e.kind()));

    let rows: Vec<BatchRow> = outcomes
        .into_iter()
        .map(|o| BatchRow {
            interval: o.interval,
            outcome: o
                .result
                .map(|run| (run.output.initial_mse(), run.output.final_mse()))
                .map_err(|e| e.message().to_string()),
        })
        .collect();
    println!("{}", crate::report::format_batch_table(&rows));

    match first_error_kind {
        Some(kind) => Err(AppError::new(
            kind,
            format!("{failed} of {} intervals failed.", rows.len()),
        )),
        None => Ok(()),
    }
}

fn handle_profile(args: ProfileArgs) -> Result<(), AppError> {
    let config = ProfileConfig {
        data_dir: args.data.data_dir.clone(),
        cell_lines: dedup_preserving_order(&args.cell_lines),
        chromosomes: chromosomes_or_all(&args.chromosomes)?,
        range: range_from_args(args.start, args.end)?,
        sim_number: args.sims,
        outputs: ProfileOutputs {
            replication_time: !args.no_time,
            fork_directionality: !args.no_forks,
            origin_positions: !args.no_origins,
        },
    };
    let processed = crate::data::bcs::process_profiles(&config)?;
    println!(
        "Aggregated {processed} interval(s) under {}",
        config.data_dir.display()
    );
    Ok(())
}

fn handle_iod(args: IodArgs) -> Result<(), AppError> {
    let layout = DataLayout::new(&args.data.data_dir);
    let processed = crate::data::iod::process_all(
        &layout,
        &dedup_preserving_order(&args.cell_lines),
        &chromosomes_or_all(&args.chromosomes)?,
        range_from_args(args.start, args.end)?,
    )?;
    println!("Wrote inter-origin distances for {processed} interval(s)");
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    chromosome_length(args.chr)?;
    let config = SynthConfig {
        data_dir: args.data.data_dir.clone(),
        cell_line: args.cell_line.clone(),
        chr: args.chr,
        positions: args.positions,
        seed: args.seed,
        rate_median: args.rate_median,
        rate_sigma: args.rate_sigma,
        noise_sd: args.noise_sd,
        params: model_params_from_args(&args.model),
    };
    let (data, files) = crate::data::synth::write_synthetic(&config)?;
    println!(
        "Synthetic profile: {} positions, L={} (scale {})\n- observed timing: {}\n- true rates: {}",
        data.timing.len(),
        data.window.radius,
        data.window.scale,
        files.timing.display(),
        files.rates.display()
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let trajectory = crate::io::read_trajectory(&args.trajectory)?;
    let shown = match args.tail {
        Some(n) => &trajectory[trajectory.len().saturating_sub(n)..],
        None => &trajectory[..],
    };
    let plot = crate::plot::render_trajectory_plot(shown, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    chromosome_length(args.chr)?;
    let interval = match range_from_args(args.start, args.end)? {
        Some(range) => Interval::ranged(args.cell_line.clone(), args.chr, range),
        None => Interval::whole(args.cell_line.clone(), args.chr),
    };
    Ok(FitConfig {
        data_dir: args.data.data_dir.clone(),
        interval,
        params: model_params_from_args(&args.model),
        save: args.save,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
    })
}

pub fn model_params_from_args(args: &ModelArgs) -> ModelParams {
    ModelParams {
        speed: args.speed,
        window_scale: args.window_scale,
        fit_step: args.fit_step,
        iterations: args.iterations,
        err_threshold: args.err_threshold,
        margin: args.margin,
        corrector: args.corrector,
    }
}

fn range_from_args(
    start: Option<usize>,
    end: Option<usize>,
) -> Result<Option<PositionRange>, AppError> {
    match (start, end) {
        (Some(start), Some(end)) => PositionRange::new(start, end).map(Some),
        (None, None) => Ok(None),
        _ => Err(AppError::invalid_config("Both --start and --end are needed for a sub-range.")),
    }
}

/// Requested chromosomes (sorted, deduplicated), or all 22 autosomes.
fn chromosomes_or_all(requested: &[u8]) -> Result<Vec<u8>, AppError> {
    if requested.is_empty() {
        return Ok((1..=22).collect());
    }
    let mut chromosomes = requested.to_vec();
    chromosomes.sort_unstable();
    chromosomes.dedup();
    for &chr in &chromosomes {
        chromosome_length(chr)?;
    }
    Ok(chromosomes)
}

fn dedup_preserving_order(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}
