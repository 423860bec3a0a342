//! On-disk data layout.
//!
//! All inputs and artifacts live under one data root, one sub-directory per kind of
//! artifact. File names carry the cell line, chromosome, and (for sub-ranges) the
//! position range so that runs over different intervals never collide.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::domain::{Interval, PositionRange};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whole-chromosome observed timing (fit input).
    pub fn timing_data(&self, cell_line: &str, chr: u8) -> PathBuf {
        self.root
            .join("whole-genome_timing_data")
            .join(format!("time_data_{cell_line}_chr[{chr}].txt"))
    }

    /// Truncated copy of the observed timing for a sub-range.
    pub fn timing_data_range(&self, cell_line: &str, chr: u8, range: PositionRange) -> PathBuf {
        self.root
            .join("whole-genome_timing_data")
            .join(format!("time_data_{cell_line}_chr[{chr}]_{range}.txt"))
    }

    /// Error trajectory (appended to by every fit of this chromosome).
    pub fn mse_log(&self, interval: &Interval) -> PathBuf {
        self.root
            .join("whole-genome_mse")
            .join(format!("mse_{}.txt", interval.chromosome_label()))
    }

    pub fn firing_rates(&self, interval: &Interval) -> PathBuf {
        self.root
            .join("whole-genome_firing_rates")
            .join(format!("fire_rates_{}.txt", interval.label()))
    }

    pub fn simulated_timing(&self, interval: &Interval) -> PathBuf {
        self.root
            .join("whole-genome_timing_simulation")
            .join(format!("time_sim_{}.txt", interval.label()))
    }

    pub fn manifest(&self, interval: &Interval) -> PathBuf {
        self.root
            .join("whole-genome_firing_rates")
            .join(format!("fit_manifest_{}.json", interval.label()))
    }

    /// Raw event log written by the stochastic replication simulator.
    pub fn simulator_log(&self, cell_line: &str, chr: u8, range: PositionRange) -> PathBuf {
        self.root
            .join("bcs_output")
            .join(format!("bcs_output_{cell_line}_chr[{chr}]_{range}.simulation.bcs"))
    }

    pub fn simulated_replication_time(
        &self,
        cell_line: &str,
        chr: u8,
        range: PositionRange,
    ) -> PathBuf {
        self.root
            .join("whole-genome_timing_bcs")
            .join(format!("time_bcs_{cell_line}_chr[{chr}]_{range}.txt"))
    }

    pub fn fork_directionality(&self, cell_line: &str, chr: u8, range: PositionRange) -> PathBuf {
        self.root
            .join("whole-genome_fork_directionality")
            .join(format!("fork_directionality_{cell_line}_chr[{chr}]_{range}.txt"))
    }

    pub fn origin_positions(&self, cell_line: &str, chr: u8, range: PositionRange) -> PathBuf {
        self.root
            .join("whole-genome_origins")
            .join(format!("origin_positions_{cell_line}_chr[{chr}]_{range}.txt"))
    }

    pub fn interorigin_distances(&self, cell_line: &str, chr: u8, range: PositionRange) -> PathBuf {
        self.root
            .join("whole-genome_interorigin_distances")
            .join(format!("iod_{cell_line}_chr[{chr}]_{range}.txt"))
    }

    /// True firing rates behind a synthetic timing profile.
    pub fn synthetic_rates(&self, cell_line: &str, chr: u8) -> PathBuf {
        self.root
            .join("synthetic")
            .join(format!("true_rates_{cell_line}_chr[{chr}].txt"))
    }
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| {
            AppError::io(format!("Failed to create directory '{}': {e}", parent.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_naming_scheme() {
        let layout = DataLayout::new("data");
        let range = PositionRange::new(10000, 20000).unwrap();
        let whole = Interval::whole("HUVEC", 1);
        let part = Interval::ranged("HUVEC", 1, range);

        assert_eq!(
            layout.timing_data("HUVEC", 1),
            Path::new("data/whole-genome_timing_data/time_data_HUVEC_chr[1].txt")
        );
        assert_eq!(
            layout.mse_log(&part),
            Path::new("data/whole-genome_mse/mse_HUVEC_chr[1].txt")
        );
        assert_eq!(
            layout.firing_rates(&whole),
            Path::new("data/whole-genome_firing_rates/fire_rates_HUVEC_chr[1].txt")
        );
        assert_eq!(
            layout.simulated_timing(&part),
            Path::new("data/whole-genome_timing_simulation/time_sim_HUVEC_chr[1]_10000-20000.txt")
        );
        assert_eq!(
            layout.simulator_log("HCT", 2, range),
            Path::new("data/bcs_output/bcs_output_HCT_chr[2]_10000-20000.simulation.bcs")
        );
    }
}
