//! Observed replication-timing input.

use log::info;

use crate::domain::{Interval, PositionRange};
use crate::error::AppError;
use crate::io::{DataLayout, FIT_DECIMALS, read_profile, write_profile};

/// Load the observed timing for `interval`.
///
/// Whole-chromosome intervals return the file as-is. Sub-ranges are cut out of the
/// whole-chromosome file and the cut is saved alongside it so later tools can read
/// exactly what was fitted.
pub fn load_observed(layout: &DataLayout, interval: &Interval) -> Result<Vec<f64>, AppError> {
    let path = layout.timing_data(&interval.cell_line, interval.chr);
    let data = read_profile(&path)?;
    info!(
        "loaded {} observed positions from {}",
        data.len(),
        path.display()
    );

    let Some(range) = interval.range else {
        return Ok(data);
    };

    let slice = truncate(&data, range)?.to_vec();
    let cut_path = layout.timing_data_range(&interval.cell_line, interval.chr, range);
    write_profile(&cut_path, &slice, FIT_DECIMALS)?;
    Ok(slice)
}

/// Borrow `[start, end)` of `data`.
pub fn truncate(data: &[f64], range: PositionRange) -> Result<&[f64], AppError> {
    if range.is_empty() || range.end > data.len() {
        return Err(AppError::invalid_config(format!(
            "Position range {range} is outside the observed profile (0-{}).",
            data.len()
        )));
    }
    Ok(&data[range.start..range.end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn truncate_respects_bounds() {
        let data: Vec<f64> = (0..10).map(f64::from).collect();
        let r = PositionRange::new(2, 5).unwrap();
        assert_eq!(truncate(&data, r).unwrap(), &[2.0, 3.0, 4.0]);

        let past_end = PositionRange::new(8, 11).unwrap();
        assert_eq!(
            truncate(&data, past_end).unwrap_err().kind(),
            ErrorKind::InvalidConfiguration
        );
    }

    #[test]
    fn ranged_load_writes_truncated_copy() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let values: Vec<f64> = (0..20).map(|i| 1.0 + f64::from(i) * 0.5).collect();
        write_profile(&layout.timing_data("HeLa-S3", 4), &values, FIT_DECIMALS).unwrap();

        let range = PositionRange::new(5, 15).unwrap();
        let interval = Interval::ranged("HeLa-S3", 4, range);
        let observed = load_observed(&layout, &interval).unwrap();
        assert_eq!(observed, values[5..15].to_vec());

        let saved = read_profile(&layout.timing_data_range("HeLa-S3", 4, range)).unwrap();
        assert_eq!(saved, observed);
    }

    #[test]
    fn missing_chromosome_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let err = load_observed(&layout, &Interval::whole("BJ1", 9)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputNotFound);
    }
}
