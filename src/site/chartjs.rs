//! `ChartSpec` → Chart.js configuration.
//!
//! Chart.js callbacks are functions and cannot travel as JSON, so each chart is
//! emitted as a payload: the plain config plus the per-point tooltip strings,
//! the axes whose ticks get a `%` suffix and the annotations. The page's
//! bootstrap script wires those into callbacks and an `afterDraw` plugin.

use serde_json::{Map, Value, json};

use crate::render::chart::{Axis, ChartKind, ChartSpec, Dataset, Fill, LegendPosition};
use crate::render::theme::ChartTheme;

/// The payload for one canvas.
pub fn chart_payload(spec: &ChartSpec, theme: &ChartTheme) -> Value {
    let tooltips: Vec<&Vec<String>> = spec.datasets.iter().map(|d| &d.tooltips).collect();
    let mut percent_axes = Vec::new();
    if spec.x.percent_ticks {
        percent_axes.push("x");
    }
    if spec.y.percent_ticks {
        percent_axes.push("y");
    }

    json!({
        "canvas": spec.canvas_id,
        "config": to_config(spec, theme),
        "tooltips": tooltips,
        "percentAxes": percent_axes,
        "annotations": spec.annotations,
    })
}

/// Payloads for several charts, in order.
pub fn charts_payload<'a>(specs: impl IntoIterator<Item = &'a ChartSpec>, theme: &ChartTheme) -> Value {
    Value::Array(specs.into_iter().map(|s| chart_payload(s, theme)).collect())
}

/// The Chart.js `{type, data, options}` object.
pub fn to_config(spec: &ChartSpec, theme: &ChartTheme) -> Value {
    let kind = match spec.kind {
        ChartKind::Bar => "bar",
        ChartKind::Line => "line",
    };
    let datasets: Vec<Value> = spec.datasets.iter().map(dataset).collect();

    let mut legend = Map::new();
    match spec.legend {
        LegendPosition::Hidden => {
            legend.insert("display".into(), json!(false));
        }
        LegendPosition::Top => {
            legend.insert("position".into(), json!("top"));
            legend.insert(
                "labels".into(),
                json!({
                    "usePointStyle": theme.legend_point_style,
                    "pointStyleWidth": theme.legend_point_style_width,
                    "padding": theme.legend_padding,
                    "font": {"size": theme.font_size},
                }),
            );
        }
    }

    let mut options = Map::new();
    if spec.horizontal {
        options.insert("indexAxis".into(), json!("y"));
    }
    options.insert("responsive".into(), json!(true));
    options.insert("maintainAspectRatio".into(), json!(false));
    options.insert("color".into(), json!(theme.text_color));
    options.insert(
        "font".into(),
        json!({"family": theme.font_family, "size": theme.font_size}),
    );
    if spec.index_hover {
        options.insert("interaction".into(), json!({"mode": "index", "intersect": false}));
    }
    if spec.kind == ChartKind::Line {
        options.insert("spanGaps".into(), json!(spec.span_gaps));
    }
    options.insert("plugins".into(), json!({"legend": legend}));
    options.insert(
        "scales".into(),
        json!({"x": axis(&spec.x), "y": axis(&spec.y)}),
    );

    json!({
        "type": kind,
        "data": {"labels": spec.labels, "datasets": datasets},
        "options": options,
    })
}

fn dataset(ds: &Dataset) -> Value {
    let mut out = Map::new();
    if !ds.label.is_empty() {
        out.insert("label".into(), json!(ds.label));
    }
    // `None` serializes as `null`, which Chart.js draws as a gap.
    out.insert("data".into(), json!(ds.values));
    if let Some(color) = ds.border_color {
        out.insert("borderColor".into(), json!(color));
    }
    match &ds.background {
        Some(Fill::Solid(color)) => {
            out.insert("backgroundColor".into(), json!(color));
        }
        Some(Fill::PerPoint(colors)) => {
            out.insert("backgroundColor".into(), json!(colors));
        }
        None => {}
    }
    if let Some(width) = ds.border_width {
        out.insert("borderWidth".into(), json!(width));
    }
    if let Some(dash) = ds.dash {
        out.insert("borderDash".into(), json!(dash));
    }
    if let Some(r) = ds.point_radius {
        out.insert("pointRadius".into(), json!(r));
    }
    if let Some(r) = ds.point_hover_radius {
        out.insert("pointHoverRadius".into(), json!(r));
    }
    if ds.fill {
        out.insert("fill".into(), json!(true));
    }
    if let Some(t) = ds.tension {
        out.insert("tension".into(), json!(t));
    }
    if let Some(bar) = ds.bar {
        out.insert("borderRadius".into(), json!(bar.border_radius));
        out.insert("barThickness".into(), json!(bar.thickness));
    }
    Value::Object(out)
}

fn axis(axis: &Axis) -> Value {
    let mut out = Map::new();
    if let Some(min) = axis.min {
        out.insert("min".into(), json!(min));
    }
    if let Some(max) = axis.max {
        out.insert("max".into(), json!(max));
    }
    let grid = match axis.grid {
        Some(color) => json!({"color": color}),
        None => json!({"display": false}),
    };
    out.insert("grid".into(), grid);

    let mut ticks = Map::new();
    let mut font = Map::new();
    if let Some(size) = axis.tick_font_size {
        font.insert("size".into(), json!(size));
    }
    if let Some(family) = axis.tick_font_family {
        font.insert("family".into(), json!(family));
    }
    if !font.is_empty() {
        ticks.insert("font".into(), Value::Object(font));
    }
    if let Some(n) = axis.max_ticks {
        ticks.insert("maxTicksLimit".into(), json!(n));
    }
    if let Some(r) = axis.max_rotation {
        ticks.insert("maxRotation".into(), json!(r));
    }
    if !ticks.is_empty() {
        out.insert("ticks".into(), Value::Object(ticks));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;
    use crate::render::render_page;

    #[test]
    fn horizontal_bars_use_y_index_axis() {
        let page = render_page(&fixtures::bundle()).unwrap();
        let config = to_config(&page.kimarite.chart, &ChartTheme::default());
        assert_eq!(config["type"], "bar");
        assert_eq!(config["options"]["indexAxis"], "y");
        assert_eq!(config["options"]["plugins"]["legend"]["display"], false);
        assert_eq!(config["options"]["scales"]["y"]["grid"]["display"], false);
        assert_eq!(config["options"]["scales"]["x"]["ticks"]["font"]["family"], "Inter");
        let ds = &config["data"]["datasets"][0];
        assert_eq!(ds["borderRadius"], 4);
        assert_eq!(ds["barThickness"], 22);
        let colors = ds["backgroundColor"].as_array().unwrap();
        assert_eq!(colors.last().unwrap(), "#e6b422");
    }

    #[test]
    fn gaps_become_null() {
        let page = render_page(&fixtures::bundle()).unwrap();
        let config = to_config(&page.yokozuna.chart, &ChartTheme::default());
        assert_eq!(config["data"]["datasets"][1]["data"], json!([null, 66.7]));
        assert_eq!(config["options"]["spanGaps"], false);
        assert_eq!(config["options"]["scales"]["x"]["ticks"]["maxTicksLimit"], 20);
    }

    #[test]
    fn theme_is_applied_per_chart() {
        let page = render_page(&fixtures::bundle()).unwrap();
        let theme = ChartTheme {
            text_color: "#ccc",
            ..ChartTheme::default()
        };
        let config = to_config(&page.trend.chart, &theme);
        assert_eq!(config["options"]["color"], "#ccc");
        assert_eq!(config["options"]["font"]["family"], "'Noto Sans JP', 'Inter', sans-serif");
        assert_eq!(config["options"]["plugins"]["legend"]["labels"]["usePointStyle"], true);
        assert_eq!(config["options"]["interaction"]["mode"], "index");

        let default = to_config(&page.trend.chart, &ChartTheme::default());
        assert_eq!(default["options"]["color"], "#888");
    }

    #[test]
    fn payload_carries_tooltips_and_annotations() {
        let page = render_page(&fixtures::bundle()).unwrap();
        let payload = chart_payload(&page.star_trade.trend, &ChartTheme::default());
        assert_eq!(payload["canvas"], "startrade-trend-chart");
        assert_eq!(payload["percentAxes"], json!(["y"]));
        assert_eq!(payload["tooltips"][1][0], "baseline: 42%");
        assert_eq!(payload["annotations"][0]["type"], "index_marker");
        assert_eq!(payload["annotations"][0]["index"], 2);
        assert_eq!(payload["annotations"][0]["color"], "#e74c3c");
    }
}
