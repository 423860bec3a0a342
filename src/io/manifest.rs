//! Read/write run manifests.
//!
//! A manifest is the JSON summary saved next to a fit's artifacts: interval,
//! parameters, resolved window, first/last error, and where the outputs went.
//!
//! The schema is defined by `domain::RunManifest`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{FitArtifacts, FitConfig, RunManifest};
use crate::error::AppError;
use crate::fit::FitOutput;
use crate::io::{ensure_parent, open_input};

/// Assemble the manifest for a finished fit.
pub fn build_manifest(
    config: &FitConfig,
    output: &FitOutput,
    artifacts: FitArtifacts,
) -> RunManifest {
    RunManifest {
        tool: "ffit".to_string(),
        created_at: Utc::now(),
        interval: config.interval.clone(),
        params: config.params.clone(),
        positions: output.rates.len(),
        window: output.window,
        initial_mse: output.initial_mse(),
        final_mse: output.final_mse(),
        final_floor_hits: output.final_floor_hits,
        artifacts,
    }
}

/// Write a manifest JSON file.
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<(), AppError> {
    ensure_parent(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, manifest)
        .map_err(|e| AppError::io(format!("Failed to write manifest JSON: {e}")))?;
    Ok(())
}

/// Read a manifest JSON file.
pub fn read_manifest(path: &Path) -> Result<RunManifest, AppError> {
    let file = open_input(path)?;
    let manifest: RunManifest = serde_json::from_reader(file)
        .map_err(|e| AppError::parse(format!("Invalid manifest JSON '{}': {e}", path.display())))?;
    Ok(manifest)
}
