//! Plotters-powered chart widget for Ratatui.
//!
//! Draws any `ChartSpec` into the Ratatui buffer through
//! `plotters-ratatui-backend`: line charts as one `LineSeries` per unbroken
//! run of values, horizontal bars as filled rectangles, and the value-line /
//! index-marker annotations as straight strokes on top.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::render::chart::{Annotation, Axis, ChartKind, ChartSpec, Color as ChartColor};

/// Render-only wrapper around one chart description.
pub struct SpecChart<'a> {
    pub spec: &'a ChartSpec,
}

impl<'a> Widget for SpecChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if self.spec.labels.is_empty() || self.spec.value_range().is_none() {
            buf.set_string(area.x, area.y, "No data.", Style::default().fg(Color::Yellow));
            return;
        }

        match self.spec.kind {
            ChartKind::Line => render_lines(self.spec, area, buf),
            ChartKind::Bar => render_bars(self.spec, area, buf),
        }
    }
}

fn render_lines(spec: &ChartSpec, area: Rect, buf: &mut Buffer) {
    let x1 = (spec.labels.len().max(2) - 1) as f64;
    let [y0, y1] = value_bounds(&spec.y, spec.value_range());
    let labels = &spec.labels;
    let percent = spec.y.percent_ticks;

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 6)
            .set_label_area_size(LabelAreaPosition::Bottom, 3)
            .build_cartesian_2d(0.0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(5)
            .y_labels(5)
            .x_label_formatter(&|v| label_at(labels, *v))
            .y_label_formatter(&|v| tick(*v, percent))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .bold_line_style(&WHITE)
            .draw()?;

        for ds in &spec.datasets {
            let color = rgb(ds.primary_color().unwrap_or(ChartColor::Hex("#ffffff")));
            for run in segments(&ds.values, spec.span_gaps) {
                chart.draw_series(LineSeries::new(run.iter().copied(), &color))?;
            }
            // Pixel markers; `Circle` radii are mapped incorrectly by the backend.
            chart.draw_series(
                ds.present()
                    .map(|(i, v)| Pixel::new((i as f64, v), color)),
            )?;
        }

        for a in &spec.annotations {
            if let Annotation::IndexMarker { index, color, .. } = a {
                let x = *index as f64;
                chart.draw_series(LineSeries::new([(x, y0), (x, y1)], &rgb(*color)))?;
            }
        }

        Ok(())
    });

    widget.render(area, buf);
}

fn render_bars(spec: &ChartSpec, area: Rect, buf: &mut Buffer) {
    let n = spec.labels.len() as f64;
    let axis = spec.value_axis();
    let [v0, v1] = bar_bounds(axis, spec.value_range());
    let labels = &spec.labels;
    let percent = axis.percent_ticks;
    let horizontal = spec.horizontal;

    let widget = widget_fn(move |root| {
        let builder = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, if horizontal { 14 } else { 6 })
            .set_label_area_size(LabelAreaPosition::Bottom, 3)
            .build_cartesian_2d(
                if horizontal { v0..v1 } else { -0.5..n - 0.5 },
                if horizontal { -0.5..n - 0.5 } else { v0..v1 },
            );
        let mut chart = builder?;

        let category = |v: &f64| label_at(labels, *v);
        let value = |v: &f64| tick(*v, percent);
        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh().disable_y_mesh();
        if horizontal {
            mesh.y_labels(labels.len()).y_label_formatter(&category).x_labels(5).x_label_formatter(&value);
        } else {
            mesh.x_labels(labels.len()).x_label_formatter(&category).y_labels(5).y_label_formatter(&value);
        }
        mesh.label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .bold_line_style(&WHITE)
            .draw()?;

        for ds in &spec.datasets {
            let fallback = ds.primary_color().unwrap_or(ChartColor::Hex("#ffffff"));
            chart.draw_series(ds.present().map(|(i, v)| {
                let color = ds.background.as_ref().and_then(|f| f.at(i)).unwrap_or(fallback);
                let c = i as f64;
                let corners = if horizontal {
                    [(v0, c - 0.35), (v, c + 0.35)]
                } else {
                    [(c - 0.35, v0), (c + 0.35, v)]
                };
                Rectangle::new(corners, rgb(color).filled())
            }))?;
        }

        for a in &spec.annotations {
            if let Annotation::ValueLine { value, color, .. } = a {
                let line = if horizontal {
                    [(*value, -0.5), (*value, n - 0.5)]
                } else {
                    [(-0.5, *value), (n - 0.5, *value)]
                };
                chart.draw_series(LineSeries::new(line, &rgb(*color)))?;
            }
        }

        Ok(())
    });

    widget.render(area, buf);
}

fn rgb(color: ChartColor) -> RGBColor {
    let (r, g, b) = color.rgb();
    RGBColor(r, g, b)
}

/// Runs of consecutive present values as `(index, value)` points.
///
/// With `span_gaps` all present values form one run.
pub(crate) fn segments(values: &[Option<f64>], span_gaps: bool) -> Vec<Vec<(f64, f64)>> {
    let mut out: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (i, v) in values.iter().enumerate() {
        match v.filter(|x| x.is_finite()) {
            Some(v) => current.push((i as f64, v)),
            None if span_gaps => {}
            None => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Axis bounds when set, else the data range padded by 5%.
pub(crate) fn value_bounds(axis: &Axis, range: Option<(f64, f64)>) -> [f64; 2] {
    if let (Some(lo), Some(hi)) = (axis.min, axis.max) {
        if hi > lo {
            return [lo, hi];
        }
    }
    let (mut lo, mut hi) = range.unwrap_or((0.0, 1.0));
    if let Some(min) = axis.min {
        lo = min;
    }
    if let Some(max) = axis.max {
        hi = max;
    }
    if hi <= lo {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = ((hi - lo) * 0.05).max(1e-12);
    [lo - pad, hi + pad]
}

/// Bars start at zero unless the axis says otherwise.
fn bar_bounds(axis: &Axis, range: Option<(f64, f64)>) -> [f64; 2] {
    let lo = axis.min.unwrap_or(0.0);
    let hi = axis
        .max
        .or_else(|| range.map(|(_, hi)| hi * 1.05))
        .filter(|hi| *hi > lo)
        .unwrap_or(lo + 1.0);
    [lo, hi]
}

fn label_at(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if idx < 0.0 || (v - idx).abs() > 0.01 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn tick(v: f64, percent: bool) -> String {
    if percent { format!("{v:.0}%") } else { format!("{v:.0}") }
}
