//! ASCII plotting of fit error trajectories for terminal output.
//!
//! Fixed-size grid, deterministic output (helpful for golden tests).
//!
//! Plot elements:
//! - recorded errors: `o`
//! - connecting line: `-`
//!
//! The y axis is `log10(MSE)`; the error typically drops by orders of magnitude over a run.

/// Render `log10(mse)` against iteration index.
///
/// Non-positive or non-finite errors have no logarithm and are left out.
pub fn render_trajectory_plot(trajectory: &[f64], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points: Vec<(f64, f64)> = trajectory
        .iter()
        .enumerate()
        .filter(|(_, mse)| mse.is_finite() && **mse > 0.0)
        .map(|(i, mse)| (i as f64, mse.log10()))
        .collect();

    let x_max = (trajectory.len().saturating_sub(1)).max(1) as f64;
    let (y_min, y_max) = y_range(&points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first so points overlay it.
    draw_polyline(&mut grid, &points, x_max, y_min, y_max);
    for &(x, y) in &points {
        let col = map_x(x, 0.0, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: iteration=[0, {}] | log10(mse)=[{y_min:.2}, {y_max:.2}]\n",
        trajectory.len().saturating_sub(1)
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn y_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat trajectory: centre it.
        Some((min_y - 0.5, max_y + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let col = map_x(x, 0.0, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_trajectory_plot(&[100.0, 10.0, 1.0], 10, 5);
        let expected = concat!(
            "Plot: iteration=[0, 2] | log10(mse)=[-0.10, 2.10]\n",
            "o-        \n",
            "  --      \n",
            "    -o    \n",
            "      --  \n",
            "        -o\n",
        );
        assert_eq!(txt, expected);
    }

    fn grid_points(txt: &str) -> usize {
        txt.lines().skip(1).map(|l| l.matches('o').count()).sum()
    }

    #[test]
    fn zero_errors_are_left_out() {
        let txt = render_trajectory_plot(&[10.0, 0.0, 1.0], 12, 6);
        assert_eq!(grid_points(&txt), 2);
    }

    #[test]
    fn empty_and_flat_trajectories_render() {
        let empty = render_trajectory_plot(&[], 10, 5);
        assert_eq!(empty.lines().count(), 6);
        assert_eq!(grid_points(&empty), 0);

        let flat = render_trajectory_plot(&[3.0, 3.0, 3.0], 10, 5);
        assert_eq!(grid_points(&flat), 3);
    }
}
