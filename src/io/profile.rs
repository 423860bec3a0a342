//! Position-indexed numeric text files.
//!
//! A profile file holds one decimal number per line, in position order. Fitted
//! profiles are written with 30 fractional digits; aggregated simulator profiles
//! with 6. Origin files hold one whitespace-separated list of integers per line.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind as IoErrorKind, Write};
use std::path::Path;

use crate::error::AppError;
use crate::io::ensure_parent;

/// Fractional digits for fitted profiles and error trajectories.
pub const FIT_DECIMALS: usize = 30;
/// Fractional digits for profiles aggregated from simulator output.
pub const AGGREGATE_DECIMALS: usize = 6;

/// Open `path` for reading, mapping a missing file to `InputNotFound`.
pub fn open_input(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| match e.kind() {
        IoErrorKind::NotFound => AppError::input_not_found(path),
        _ => io_error("open", path, e),
    })
}

/// Read a one-value-per-line profile. Blank lines and `#` comments are skipped.
pub fn read_profile(path: &Path) -> Result<Vec<f64>, AppError> {
    let reader = BufReader::new(open_input(path)?);
    let mut values = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| io_error("read", path, e))?;
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let value = s.parse::<f64>().map_err(|e| {
            AppError::parse(format!("{}:{}: invalid number '{s}': {e}", path.display(), idx + 1))
        })?;
        values.push(value);
    }
    Ok(values)
}

/// Write `values` one per line with `decimals` fractional digits.
pub fn write_profile(path: &Path, values: &[f64], decimals: usize) -> Result<(), AppError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| io_error("create", path, e))?;
    let mut out = BufWriter::new(file);
    for v in values {
        writeln!(out, "{v:.decimals$}").map_err(|e| io_error("write", path, e))?;
    }
    out.flush().map_err(|e| io_error("write", path, e))
}

/// Read one integer list per line. Surrounding `[`/`]` and commas are tolerated.
pub fn read_integer_rows(path: &Path) -> Result<Vec<Vec<i64>>, AppError> {
    let reader = BufReader::new(open_input(path)?);
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| io_error("read", path, e))?;
        let body = line.trim().trim_start_matches('[').trim_end_matches(']');
        let row = body
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i64>().map_err(|e| {
                    AppError::parse(format!(
                        "{}:{}: invalid integer '{s}': {e}",
                        path.display(),
                        idx + 1
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write each row as space-separated integers.
pub fn write_integer_rows<T: Display>(path: &Path, rows: &[Vec<T>]) -> Result<(), AppError> {
    write_rows(path, rows, |row| {
        let parts: Vec<String> = row.iter().map(ToString::to_string).collect();
        parts.join(" ")
    })
}

/// Write each row as a bracketed, comma-separated list: `[a, b, c]`.
pub fn write_bracketed_rows<T: Display>(path: &Path, rows: &[Vec<T>]) -> Result<(), AppError> {
    write_rows(path, rows, |row| {
        let parts: Vec<String> = row.iter().map(ToString::to_string).collect();
        format!("[{}]", parts.join(", "))
    })
}

fn write_rows<T>(
    path: &Path,
    rows: &[Vec<T>],
    fmt_row: impl Fn(&[T]) -> String,
) -> Result<(), AppError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| io_error("create", path, e))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        writeln!(out, "{}", fmt_row(row)).map_err(|e| io_error("write", path, e))?;
    }
    out.flush().map_err(|e| io_error("write", path, e))
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> AppError {
    AppError::io(format!("Failed to {action} '{}': {e}", path.display()))
}
