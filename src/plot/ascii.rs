//! ASCII plotting of chart descriptions for terminal output.
//!
//! Fixed-size grids with deterministic output (golden tests rely on it).
//!
//! Line charts: one marker per dataset (`*`, `o`, `+`, ...), segments between
//! consecutive present points, `|` columns for index markers.
//! Bar charts: one `#` row per category, largest category at the top, `|` at a
//! value-line annotation.

use crate::render::chart::{Annotation, Axis, ChartKind, ChartSpec};
use crate::render::text::num;

const MARKERS: [char; 8] = ['*', 'o', '+', 'x', '#', '@', '%', '&'];

/// Marker used for dataset `idx`.
pub fn marker(idx: usize) -> char {
    MARKERS[idx % MARKERS.len()]
}

/// Render any chart: line charts as a grid, bar charts as rows.
pub fn render_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    match spec.kind {
        ChartKind::Line => render_line_chart(spec, width, height),
        ChartKind::Bar => render_bar_chart(spec, width),
    }
}

pub fn render_line_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let n = spec.labels.len();

    let (y_min, y_max) = value_bounds(&spec.y, spec.value_range());

    let mut grid = vec![vec![' '; width]; height];

    for (d, ds) in spec.datasets.iter().enumerate() {
        let ch = marker(d);
        let mut prev: Option<(usize, usize, usize)> = None;
        for (i, v) in ds.present() {
            let x = map_x(i, n, width);
            let y = map_y(v, y_min, y_max, height);
            if let Some((pi, px, py)) = prev {
                if spec.span_gaps || i == pi + 1 {
                    draw_line(&mut grid, px, py, x, y, ch);
                }
            }
            prev = Some((i, x, y));
        }
        // Points overlay segments.
        for (i, v) in ds.present() {
            grid[map_y(v, y_min, y_max, height)][map_x(i, n, width)] = ch;
        }
    }

    for a in &spec.annotations {
        if let Annotation::IndexMarker { index, .. } = a {
            if *index < n {
                let x = map_x(*index, n, width);
                for row in grid.iter_mut() {
                    if row[x] == ' ' {
                        row[x] = '|';
                    }
                }
            }
        }
    }

    let unit = if spec.y.percent_ticks { "%" } else { "" };
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | y=[{y_min:.2}, {y_max:.2}]{unit}\n",
        spec.canvas_id
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    if let (Some(first), Some(last)) = (spec.labels.first(), spec.labels.last()) {
        let pad = width.saturating_sub(first.chars().count() + last.chars().count());
        if n > 1 {
            out.push_str(&format!("{first}{}{last}\n", " ".repeat(pad)));
        } else {
            out.push_str(&format!("{first}\n"));
        }
    }
    for (d, ds) in spec.datasets.iter().enumerate() {
        out.push_str(&format!("{} {}\n", marker(d), ds.label));
    }
    for a in &spec.annotations {
        if let Annotation::IndexMarker { index, label, .. } = a {
            if let Some(at) = spec.labels.get(*index) {
                out.push_str(&format!("| {at}: {}\n", label.join(" ")));
            }
        }
    }

    out
}

pub fn render_bar_chart(spec: &ChartSpec, width: usize) -> String {
    let label_w = spec
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    let bar_w = width.saturating_sub(label_w + 10).max(10);

    let axis = spec.value_axis();
    let (lo, hi) = match (axis.min, axis.max) {
        (Some(lo), Some(hi)) if hi > lo => (lo, hi),
        _ => (0.0, spec.value_range().map(|(_, hi)| hi).filter(|hi| *hi > 0.0).unwrap_or(1.0)),
    };
    let column = |v: f64| -> usize {
        let u = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
        (u * bar_w as f64).round() as usize
    };
    let unit = if axis.percent_ticks { "%" } else { "" };

    let mut out = String::new();
    out.push_str(&format!("Bars: {} | x=[{lo:.2}, {hi:.2}]{unit}\n", spec.canvas_id));

    for ds in &spec.datasets {
        if spec.datasets.len() > 1 {
            out.push_str(&format!("{}\n", ds.label));
        }
        // Last category is the largest and is drawn first.
        for (i, label) in spec.labels.iter().enumerate().rev() {
            let Some(v) = ds.values.get(i).copied().flatten() else {
                continue;
            };
            let len = column(v).min(bar_w);
            let mut cells: Vec<char> = (0..bar_w).map(|c| if c < len { '#' } else { ' ' }).collect();
            for a in &spec.annotations {
                if let Annotation::ValueLine { value, .. } = a {
                    let c = column(*value);
                    if c < bar_w && cells[c] == ' ' {
                        cells[c] = '|';
                    }
                }
            }
            let name = truncate(label, label_w);
            let fill = label_w.saturating_sub(name.chars().count());
            out.push_str(&format!(
                "{name}{} |{} {}\n",
                " ".repeat(fill),
                cells.into_iter().collect::<String>(),
                num(v)
            ));
        }
    }

    out
}

/// Axis bounds when set, otherwise the data range padded by 5%.
fn value_bounds(axis: &Axis, range: Option<(f64, f64)>) -> (f64, f64) {
    match (axis.min, axis.max) {
        (Some(lo), Some(hi)) if hi > lo => (lo, hi),
        _ => {
            let (lo, hi) = match range {
                Some((lo, hi)) if hi > lo => (lo, hi),
                Some((v, _)) => (v - 1.0, v + 1.0),
                None => (0.0, 1.0),
            };
            pad_range(lo, hi, 0.05)
        }
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
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

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
