//! Inter-origin distances from per-simulation origin lists.

use log::info;

use crate::domain::{CHUNK_LEN, PositionRange, chromosome_chunks};
use crate::error::AppError;
use crate::io::{DataLayout, read_integer_rows, write_bracketed_rows};

/// Sorted successive differences of one simulation's origin positions.
pub fn interorigin_distances(origins: &[i64]) -> Vec<i64> {
    let mut sorted = origins.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Compute and save distances for one interval's origin file.
///
/// Returns the per-simulation distance lists.
pub fn process_interval(
    layout: &DataLayout,
    cell_line: &str,
    chr: u8,
    range: PositionRange,
) -> Result<Vec<Vec<i64>>, AppError> {
    let origins = read_integer_rows(&layout.origin_positions(cell_line, chr, range))?;
    let distances: Vec<Vec<i64>> = origins.iter().map(|o| interorigin_distances(o)).collect();
    let out = layout.interorigin_distances(cell_line, chr, range);
    write_bracketed_rows(&out, &distances)?;
    info!(
        "inter-origin distances for {cell_line} chr{chr}:{range} ({} simulations)",
        distances.len()
    );
    Ok(distances)
}

/// Process one explicit range, or every chunk of each chromosome.
///
/// Returns the number of intervals processed.
pub fn process_all(
    layout: &DataLayout,
    cell_lines: &[String],
    chromosomes: &[u8],
    range: Option<PositionRange>,
) -> Result<usize, AppError> {
    let mut processed = 0usize;
    for cell_line in cell_lines {
        for &chr in chromosomes {
            let ranges = match range {
                Some(r) => vec![r],
                None => chromosome_chunks(chr, CHUNK_LEN)?
                    .into_iter()
                    .map(|(start, end)| PositionRange::new(start, end))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            for r in ranges {
                process_interval(layout, cell_line, chr, r)?;
                processed += 1;
            }
        }
    }
    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::io::write_integer_rows;

    #[test]
    fn distances_are_sorted_differences() {
        assert_eq!(interorigin_distances(&[50, 10, 30]), vec![20, 20]);
        assert_eq!(interorigin_distances(&[7]), Vec::<i64>::new());
        assert_eq!(interorigin_distances(&[]), Vec::<i64>::new());
    }

    #[test]
    fn writes_bracketed_lists() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let range = PositionRange::new(0, 10000).unwrap();
        let origins = layout.origin_positions("IMR90", 5, range);
        write_integer_rows(&origins, &[vec![400, 100, 250], vec![9]]).unwrap();

        let distances = process_interval(&layout, "IMR90", 5, range).unwrap();
        assert_eq!(distances, vec![vec![150, 150], vec![]]);

        let out = layout.interorigin_distances("IMR90", 5, range);
        let text = std::fs::read_to_string(out).unwrap();
        assert_eq!(text, "[150, 150]\n[]\n");
    }

    #[test]
    fn missing_origin_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let range = PositionRange::new(0, 10).unwrap();
        let err = process_interval(&layout, "X", 1, range).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputNotFound);
    }
}
