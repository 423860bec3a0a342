//! Fixed per-chromosome reference data and interval chunking.

use crate::error::AppError;

/// Autosome lengths (chr1..chr22) in analysis positions (1 kb resolution).
pub const CHR_LENGTHS: [usize; 22] = [
    249251, 243200, 198023, 191155, 180916, 171116, 159139, 146365, 141214, 135535, 135007, 133852,
    115170, 107350, 102532, 90355, 81196, 78078, 59129, 63026, 48130, 51305,
];

/// Positions per chunk when a whole chromosome is processed piecewise.
pub const CHUNK_LEN: usize = 10_000;

/// Length of chromosome `chr` (1-based).
pub fn chromosome_length(chr: u8) -> Result<usize, AppError> {
    let idx = usize::from(chr)
        .checked_sub(1)
        .filter(|&i| i < CHR_LENGTHS.len())
        .ok_or_else(|| {
            AppError::invalid_config(format!(
                "Unknown chromosome {chr} (expected 1..={}).",
                CHR_LENGTHS.len()
            ))
        })?;
    Ok(CHR_LENGTHS[idx])
}

/// Split chromosome `chr` into consecutive `[start, end)` chunks of `chunk_len` positions.
///
/// The last chunk is truncated at the chromosome end.
pub fn chromosome_chunks(chr: u8, chunk_len: usize) -> Result<Vec<(usize, usize)>, AppError> {
    if chunk_len == 0 {
        return Err(AppError::invalid_config("Chunk length must be > 0."));
    }
    let len = chromosome_length(chr)?;
    Ok((0..len)
        .step_by(chunk_len)
        .map(|start| (start, (start + chunk_len).min(len)))
        .collect())
}
