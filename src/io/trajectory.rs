//! Append-only error-trajectory log.
//!
//! The file is opened once per run in append mode and every value is flushed as soon
//! as it is recorded, so killing a long fit still leaves the errors computed so far.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::fit::TrajectorySink;
use crate::io::{FIT_DECIMALS, ensure_parent, read_profile};

pub struct TrajectoryWriter {
    path: PathBuf,
    file: File,
    written: usize,
}

impl TrajectoryWriter {
    /// Open (or create) `path` for appending.
    pub fn append(path: &Path) -> Result<Self, AppError> {
        ensure_parent(path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::io(format!("Failed to open '{}': {e}", path.display())))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Values recorded through this writer (not counting earlier runs in the file).
    pub fn written(&self) -> usize {
        self.written
    }
}

impl TrajectorySink for TrajectoryWriter {
    fn record(&mut self, mse: f64) -> Result<(), AppError> {
        let line = format!("{mse:.prec$}\n", prec = FIT_DECIMALS);
        self.file
            .write_all(line.as_bytes())
            .and_then(|()| self.file.flush())
            .map_err(|e| AppError::io(format!("Failed to append '{}': {e}", self.path.display())))?;
        self.written += 1;
        Ok(())
    }
}

/// Read every value in an error log (all runs appended so far).
pub fn read_trajectory(path: &Path) -> Result<Vec<f64>, AppError> {
    read_profile(path)
}
