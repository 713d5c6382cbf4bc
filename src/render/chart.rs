//! Chart render descriptions.
//!
//! A `ChartSpec` is a complete, library-neutral description of one chart:
//! labels, series values (with explicit gaps), per-point tooltips, colours,
//! axis bounds, and post-draw annotations. Adapters turn it into a Chart.js
//! config, a Plotters drawing, or an ASCII plot.

use std::fmt;

use serde::{Serialize, Serializer};

/// A CSS colour, kept in the exact textual form the page uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// `#rrggbb`
    Hex(&'static str),
    /// `#rrggbb` followed by a two-digit hex alpha, e.g. `#e6b42220`.
    HexAlpha(&'static str, u8),
    /// `rgba(r, g, b, a)`
    Rgba(u8, u8, u8, f64),
}

impl Color {
    /// The opaque RGB components.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Hex(hex) | Color::HexAlpha(hex, _) => parse_hex(hex).unwrap_or((0x88, 0x88, 0x88)),
            Color::Rgba(r, g, b, _) => (r, g, b),
        }
    }

    /// Opacity in `[0, 1]`.
    pub fn alpha(self) -> f64 {
        match self {
            Color::Hex(_) => 1.0,
            Color::HexAlpha(_, a) => f64::from(a) / 255.0,
            Color::Rgba(_, _, _, a) => a.clamp(0.0, 1.0),
        }
    }

    /// The same base colour with a hex alpha suffix.
    pub fn with_hex_alpha(self, alpha: u8) -> Color {
        match self {
            Color::Hex(hex) | Color::HexAlpha(hex, _) => Color::HexAlpha(hex, alpha),
            Color::Rgba(r, g, b, _) => Color::Rgba(r, g, b, f64::from(alpha) / 255.0),
        }
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() == 3 {
        let nibble = |i: usize| u8::from_str_radix(digits.get(i..i + 1)?, 16).ok().map(|v| v * 17);
        return Some((nibble(0)?, nibble(1)?, nibble(2)?));
    }
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(digits.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(digits.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(digits.get(4..6)?, 16).ok()?;
    Some((r, g, b))
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hex(hex) => write!(f, "{hex}"),
            Color::HexAlpha(hex, a) => write!(f, "{hex}{a:02x}"),
            Color::Rgba(r, g, b, a) => write!(f, "rgba({r}, {g}, {b}, {a})"),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// Background of a dataset: one colour, or one per data point (bar charts).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fill {
    Solid(Color),
    PerPoint(Vec<Color>),
}

impl Fill {
    pub fn at(&self, idx: usize) -> Option<Color> {
        match self {
            Fill::Solid(c) => Some(*c),
            Fill::PerPoint(colors) => colors.get(idx).copied(),
        }
    }
}

/// Bar geometry for bar datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarStyle {
    pub border_radius: u32,
    pub thickness: u32,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            border_radius: 4,
            thickness: 22,
        }
    }
}

/// One series. `values[i]` is `None` where the series has no data (drawn as a gap).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<Option<f64>>,
    /// Tooltip text per point, aligned with `values`.
    pub tooltips: Vec<String>,
    pub border_color: Option<Color>,
    pub background: Option<Fill>,
    pub border_width: Option<f64>,
    pub dash: Option<[u32; 2]>,
    pub point_radius: Option<f64>,
    pub point_hover_radius: Option<f64>,
    pub fill: bool,
    pub tension: Option<f64>,
    pub bar: Option<BarStyle>,
}

impl Dataset {
    /// A bar series with one colour per bar.
    pub fn bars(label: impl Into<String>, values: Vec<f64>, colors: Vec<Color>) -> Self {
        Self {
            label: label.into(),
            values: values.into_iter().map(Some).collect(),
            tooltips: Vec::new(),
            border_color: None,
            background: Some(Fill::PerPoint(colors)),
            border_width: None,
            dash: None,
            point_radius: None,
            point_hover_radius: None,
            fill: false,
            tension: None,
            bar: Some(BarStyle::default()),
        }
    }

    /// A line series; `None` values are gaps.
    pub fn line(label: impl Into<String>, values: Vec<Option<f64>>, color: Color) -> Self {
        Self {
            label: label.into(),
            values,
            tooltips: Vec::new(),
            border_color: Some(color),
            background: None,
            border_width: None,
            dash: None,
            point_radius: None,
            point_hover_radius: None,
            fill: false,
            tension: None,
            bar: None,
        }
    }

    /// A flat line repeating `value` once per label.
    pub fn constant(label: impl Into<String>, value: f64, len: usize, color: Color) -> Self {
        Self::line(label, vec![Some(value); len], color)
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(Fill::Solid(color));
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.border_width = Some(width);
        self
    }

    pub fn dashed(mut self, dash: [u32; 2]) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn points(mut self, radius: f64, hover_radius: f64) -> Self {
        self.point_radius = Some(radius);
        self.point_hover_radius = Some(hover_radius);
        self
    }

    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }

    pub fn smooth(mut self, tension: f64) -> Self {
        self.tension = Some(tension);
        self
    }

    pub fn tooltips(mut self, tooltips: Vec<String>) -> Self {
        self.tooltips = tooltips;
        self
    }

    /// The dataset's main colour (line colour, or the first bar's colour).
    pub fn primary_color(&self) -> Option<Color> {
        self.border_color
            .or_else(|| self.background.as_ref().and_then(|f| f.at(0)))
    }

    /// Finite values with their indices, skipping gaps.
    pub fn present(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.filter(|x| x.is_finite()).map(|x| (i, x)))
    }
}

/// Tick and grid settings for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Axis {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Render tick values with a `%` suffix.
    pub percent_ticks: bool,
    /// Grid line colour; `None` hides the grid.
    pub grid: Option<Color>,
    pub tick_font_size: Option<u32>,
    pub tick_font_family: Option<&'static str>,
    pub max_ticks: Option<u32>,
    pub max_rotation: Option<u32>,
}

impl Axis {
    pub fn grid(color: Color) -> Self {
        Self {
            grid: Some(color),
            ..Self::default()
        }
    }

    pub fn hidden_grid() -> Self {
        Self::default()
    }

    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn percent(mut self) -> Self {
        self.percent_ticks = true;
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.tick_font_size = Some(size);
        self
    }

    pub fn font_family(mut self, family: &'static str) -> Self {
        self.tick_font_family = Some(family);
        self
    }

    /// Dense time axes: at most `max_ticks` labels, rotated up to `rotation` degrees.
    pub fn dense(mut self, max_ticks: u32, rotation: u32) -> Self {
        self.max_ticks = Some(max_ticks);
        self.max_rotation = Some(rotation);
        self
    }
}

/// Drawn on top of the chart after the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    /// A vertical line at a value of the x (value) axis, spanning the plot height.
    ValueLine {
        value: f64,
        color: Color,
        width: f64,
        dash: [u32; 2],
    },
    /// A vertical line at a category index, with a label stacked above the plot.
    IndexMarker {
        index: usize,
        color: Color,
        width: f64,
        dash: [u32; 2],
        label: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Hidden,
    Top,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Id of the canvas element the chart is drawn into.
    pub canvas_id: &'static str,
    pub kind: ChartKind,
    /// Bars run left to right with categories on the y axis.
    pub horizontal: bool,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub x: Axis,
    pub y: Axis,
    pub legend: LegendPosition,
    /// Hovering shows every dataset at the hovered index.
    pub index_hover: bool,
    /// Draw straight across `None` values instead of leaving a gap.
    pub span_gaps: bool,
    pub annotations: Vec<Annotation>,
}

impl ChartSpec {
    pub fn new(canvas_id: &'static str, kind: ChartKind, labels: Vec<String>) -> Self {
        Self {
            canvas_id,
            kind,
            horizontal: false,
            labels,
            datasets: Vec::new(),
            x: Axis::default(),
            y: Axis::default(),
            legend: LegendPosition::Top,
            index_hover: false,
            span_gaps: false,
            annotations: Vec::new(),
        }
    }

    /// A horizontal bar chart without legend.
    pub fn horizontal_bars(canvas_id: &'static str, labels: Vec<String>) -> Self {
        Self {
            horizontal: true,
            legend: LegendPosition::Hidden,
            ..Self::new(canvas_id, ChartKind::Bar, labels)
        }
    }

    /// A line chart that hovers by index.
    pub fn lines(canvas_id: &'static str, labels: Vec<String>) -> Self {
        Self {
            index_hover: true,
            ..Self::new(canvas_id, ChartKind::Line, labels)
        }
    }

    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn axes(mut self, x: Axis, y: Axis) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// The axis carrying values (x for horizontal bars, y otherwise).
    pub fn value_axis(&self) -> &Axis {
        if self.horizontal { &self.x } else { &self.y }
    }

    /// Finite min/max over all datasets, ignoring gaps.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for ds in &self.datasets {
            for (_, v) in ds.present() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_print_in_css_form() {
        assert_eq!(Color::Hex("#e6b422").to_string(), "#e6b422");
        assert_eq!(Color::HexAlpha("#e6b422", 0x20).to_string(), "#e6b42220");
        assert_eq!(Color::Rgba(230, 180, 34, 0.15).to_string(), "rgba(230, 180, 34, 0.15)");
        assert_eq!(Color::Rgba(230, 180, 34, 0.7).to_string(), "rgba(230, 180, 34, 0.7)");
    }

    #[test]
    fn colors_expose_components() {
        assert_eq!(Color::Hex("#7b2d8b").rgb(), (0x7b, 0x2d, 0x8b));
        assert_eq!(Color::Hex("#7b2d8b").alpha(), 1.0);
        assert_eq!(Color::Hex("#888").rgb(), (0x88, 0x88, 0x88));
        assert!((Color::HexAlpha("#7b2d8b", 0x80).alpha() - 0.50196).abs() < 1e-4);
    }

    #[test]
    fn value_range_skips_gaps() {
        let spec = ChartSpec::lines("c", vec!["a".into(), "b".into(), "c".into()])
            .dataset(Dataset::line("s", vec![Some(3.0), None, Some(9.0)], Color::Hex("#000000")))
            .dataset(Dataset::line("t", vec![None, Some(-1.0), None], Color::Hex("#000000")));
        assert_eq!(spec.value_range(), Some((-1.0, 9.0)));
    }

    #[test]
    fn color_serializes_as_string() {
        let json = serde_json::to_string(&Color::HexAlpha("#d4447c", 0x18)).unwrap();
        assert_eq!(json, "\"#d4447c18\"");
    }
}
