//! Aggregation of stochastic-simulator event logs into empirical profiles.
//!
//! Log format: a line starting with `>` opens a new simulation. Every other line is a
//! tab-separated event:
//!
//! ```text
//! time <TAB> _ <TAB> kind <TAB> _ <TAB> position
//! ```
//!
//! `kind` is `ORI` (origin fired at `position`), `FL`/`FR` (a left/right-moving fork
//! replicated `position`, 1-based), or anything else (ignored). Only the first fork
//! event at a position within one simulation counts.

use std::collections::HashSet;
use std::io::{BufRead, BufReader};

use log::{info, warn};

use crate::domain::{CHUNK_LEN, PositionRange, ProfileConfig, ProfileOutputs, chromosome_chunks};
use crate::error::AppError;
use crate::io::{AGGREGATE_DECIMALS, DataLayout, open_input, write_integer_rows, write_profile};

/// Empirical profiles for one interval, averaged over the simulations read.
#[derive(Debug, Clone, Default)]
pub struct SimulatorProfiles {
    /// Mean replication time per position.
    pub replication_time: Option<Vec<f64>>,
    /// Mean fork direction per position (`-1` left .. `+1` right).
    pub fork_directionality: Option<Vec<f64>>,
    /// Origin positions, one list per simulation that fired any.
    pub origins: Option<Vec<Vec<i64>>>,
    pub simulations_read: usize,
    /// Fork events whose position fell outside the interval.
    pub skipped_events: usize,
}

/// Aggregate the first `sim_number` simulations of an event log covering `positions`.
pub fn aggregate_events<R: BufRead>(
    reader: R,
    positions: usize,
    sim_number: usize,
    outputs: ProfileOutputs,
) -> Result<SimulatorProfiles, AppError> {
    if sim_number == 0 {
        return Err(AppError::invalid_config("Number of simulations must be > 0."));
    }

    let mut time = outputs.replication_time.then(|| vec![0.0; positions]);
    let mut forks = outputs.fork_directionality.then(|| vec![0.0; positions]);
    let mut origins: Option<Vec<Vec<i64>>> = outputs.origin_positions.then(Vec::new);

    let mut current_origins: Vec<i64> = Vec::new();
    let mut replicated: HashSet<usize> = HashSet::new();
    let mut sim_iteration = 0usize;
    let mut skipped_events = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        if sim_iteration == sim_number + 1 {
            break;
        }
        let line = line.map_err(|e| AppError::io(format!("Failed to read simulator log: {e}")))?;
        let lineno = idx + 1;

        if line.starts_with('>') {
            if let Some(all) = origins.as_mut()
                && !current_origins.is_empty()
            {
                all.push(std::mem::take(&mut current_origins));
            }
            current_origins.clear();
            replicated.clear();
            sim_iteration += 1;
            continue;
        }
        if sim_iteration == 0 || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let kind = field(&fields, 2, lineno)?;
        match kind {
            "ORI" if origins.is_some() => {
                current_origins.push(parse_position(field(&fields, 4, lineno)?, lineno)?);
            }
            "FL" | "FR" => {
                let pos = parse_position(field(&fields, 4, lineno)?, lineno)?;
                let t = parse_time(field(&fields, 0, lineno)?, lineno)?;
                let Some(pos) = event_index(pos, positions) else {
                    skipped_events += 1;
                    continue;
                };
                if replicated.insert(pos) {
                    if let Some(time) = time.as_mut() {
                        time[pos] += t;
                    }
                    if let Some(forks) = forks.as_mut() {
                        forks[pos] += if kind == "FL" { -1.0 } else { 1.0 };
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(all) = origins.as_mut()
        && !current_origins.is_empty()
    {
        all.push(current_origins);
    }

    let denom = sim_number as f64;
    for profile in [time.as_mut(), forks.as_mut()].into_iter().flatten() {
        profile.iter_mut().for_each(|v| *v /= denom);
    }

    Ok(SimulatorProfiles {
        replication_time: time,
        fork_directionality: forks,
        origins,
        simulations_read: sim_iteration.min(sim_number),
        skipped_events,
    })
}

/// Aggregate and save the profiles for one interval.
pub fn process_interval(
    layout: &DataLayout,
    cell_line: &str,
    chr: u8,
    range: PositionRange,
    sim_number: usize,
    outputs: ProfileOutputs,
) -> Result<SimulatorProfiles, AppError> {
    let path = layout.simulator_log(cell_line, chr, range);
    let reader = BufReader::new(open_input(&path)?);
    let profiles = aggregate_events(reader, range.len(), sim_number, outputs)?;

    if profiles.simulations_read < sim_number {
        warn!(
            "{}: only {} of {sim_number} simulations present; averages divide by {sim_number}",
            path.display(),
            profiles.simulations_read
        );
    }
    if profiles.skipped_events > 0 {
        warn!(
            "{}: skipped {} fork events outside the interval",
            path.display(),
            profiles.skipped_events
        );
    }

    if let Some(time) = &profiles.replication_time {
        write_profile(
            &layout.simulated_replication_time(cell_line, chr, range),
            time,
            AGGREGATE_DECIMALS,
        )?;
    }
    if let Some(forks) = &profiles.fork_directionality {
        write_profile(
            &layout.fork_directionality(cell_line, chr, range),
            forks,
            AGGREGATE_DECIMALS,
        )?;
    }
    if let Some(origins) = &profiles.origins {
        write_integer_rows(&layout.origin_positions(cell_line, chr, range), origins)?;
    }

    info!(
        "aggregated {cell_line} chr{chr}:{range} ({} simulations)",
        profiles.simulations_read
    );
    Ok(profiles)
}

/// Run [`process_interval`] for every configured cell line, chromosome, and chunk.
///
/// Returns the number of intervals processed.
pub fn process_profiles(config: &ProfileConfig) -> Result<usize, AppError> {
    if !config.outputs.any() {
        return Err(AppError::invalid_config(
            "Nothing to compute: every profile output is disabled.",
        ));
    }
    let layout = DataLayout::new(&config.data_dir);
    let mut processed = 0usize;
    for cell_line in &config.cell_lines {
        for &chr in &config.chromosomes {
            let ranges = match config.range {
                Some(range) => vec![range],
                None => chromosome_chunks(chr, CHUNK_LEN)?
                    .into_iter()
                    .map(|(start, end)| PositionRange::new(start, end))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            for range in ranges {
                process_interval(
                    &layout,
                    cell_line,
                    chr,
                    range,
                    config.sim_number,
                    config.outputs,
                )?;
                processed += 1;
            }
        }
    }
    Ok(processed)
}

fn field<'a>(fields: &[&'a str], idx: usize, lineno: usize) -> Result<&'a str, AppError> {
    fields
        .get(idx)
        .map(|s| s.trim())
        .ok_or_else(|| AppError::parse(format!("log line {lineno}: missing column {}", idx + 1)))
}

fn parse_position(s: &str, lineno: usize) -> Result<i64, AppError> {
    s.parse::<i64>()
        .map_err(|e| AppError::parse(format!("log line {lineno}: invalid position '{s}': {e}")))
}

fn parse_time(s: &str, lineno: usize) -> Result<f64, AppError> {
    s.parse::<f64>()
        .map_err(|e| AppError::parse(format!("log line {lineno}: invalid time '{s}': {e}")))
}

/// 0-based index of a 1-based log position, if it lies inside the interval.
fn event_index(position: i64, positions: usize) -> Option<usize> {
    let idx = usize::try_from(position.checked_sub(1)?).ok()?;
    (idx < positions).then_some(idx)
}
