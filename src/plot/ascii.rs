//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - training samples: `o`
//! - selected (ideal) curve: `-` line
//! - tolerance band edges: `.`
//! - classified test point: `X`

use crate::domain::{ClassificationResult, FittedCurve};

/// A polyline drawn with one character.
struct Line<'a> {
    points: &'a [(f64, f64)],
    ch: char,
}

/// Training samples (`o`) over the selected curve (`-`).
pub fn render_fit_plot(fit: &FittedCurve, width: usize, height: usize) -> String {
    let ideal: Vec<(f64, f64)> = fit.selected().iter().map(|p| (p.x, p.y)).collect();
    let training: Vec<(f64, f64)> = fit.training().iter().map(|p| (p.x, p.y)).collect();

    let title = format!(
        "train {} vs ideal {}. Total squared error = {:.2}",
        fit.training().name(),
        fit.name(),
        fit.error()
    );
    render_plot(
        &title,
        &[Line { points: &ideal, ch: '-' }],
        &training,
        'o',
        width,
        height,
    )
}

/// A classified point (`X`) on its curve (`-`) with the tolerance band (`.`).
///
/// Unmatched points have nothing to draw against and yield `None`.
pub fn render_classification_plot(
    result: &ClassificationResult<'_>,
    width: usize,
    height: usize,
) -> Option<String> {
    let fit = result.matched_curve()?;

    let curve: Vec<(f64, f64)> = fit.selected().iter().map(|p| (p.x, p.y)).collect();
    let (lower, upper): (Vec<(f64, f64)>, Vec<(f64, f64)>) =
        fit.band().map(|(x, lo, hi)| ((x, lo), (x, hi))).unzip();

    let title = format!(
        "point ({}, {:.2}) with classification: {} (tolerance {:.4})",
        result.point.x,
        result.point.y,
        fit.name(),
        fit.tolerance()
    );
    Some(render_plot(
        &title,
        &[
            Line { points: &curve, ch: '-' },
            Line { points: &upper, ch: '.' },
            Line { points: &lower, ch: '.' },
        ],
        &[(result.point.x, result.point.y)],
        'X',
        width,
        height,
    ))
}

fn render_plot(
    title: &str,
    lines: &[Line<'_>],
    scatter: &[(f64, f64)],
    marker: char,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all = lines
        .iter()
        .flat_map(|l| l.points.iter())
        .chain(scatter.iter());
    let (x_min, x_max) = range(all.clone().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(all.map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Lines first (so points can overlay); earlier lines win shared cells.
    for line in lines {
        draw_polyline(&mut grid, line.points, line.ch, x_min, x_max, y_min, y_max);
    }

    for &(x, y) in scatter {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = marker;
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!(
        "x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else if min.is_finite() && max.is_finite() {
        // Degenerate (single value): widen so mapping stays well-defined.
        Some((min - 0.5, max + 0.5))
    } else {
        None
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
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    ch: char,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None if grid[row][col] == ' ' => grid[row][col] = ch,
            None => {}
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
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
