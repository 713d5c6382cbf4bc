//! Palette and chart theme.
//!
//! The theme is a plain value handed to every chart conversion; nothing here is
//! global or mutable.

use serde::Serialize;

use super::chart::Color;

pub const GOLD: Color = Color::Hex("#e6b422");
pub const PURPLE: Color = Color::Hex("#7b2d8b");
pub const PINK: Color = Color::Hex("#d4447c");
pub const TEAL: Color = Color::Hex("#4ecdc4");
pub const ORANGE: Color = Color::Hex("#f39c12");
pub const BLUE: Color = Color::Hex("#3498db");
pub const RED: Color = Color::Hex("#e74c3c");
pub const GREEN: Color = Color::Hex("#2ecc71");
pub const GREY: Color = Color::Hex("#888");

/// Series colours, assigned by dataset index.
pub const CHART_COLORS: [Color; 15] = [
    GOLD,
    PURPLE,
    PINK,
    TEAL,
    ORANGE,
    BLUE,
    RED,
    GREEN,
    Color::Hex("#9b59b6"),
    Color::Hex("#1abc9c"),
    Color::Hex("#e67e22"),
    Color::Hex("#2980b9"),
    Color::Hex("#c0392b"),
    Color::Hex("#27ae60"),
    Color::Hex("#8e44ad"),
];

pub fn series_color(idx: usize) -> Color {
    CHART_COLORS[idx % CHART_COLORS.len()]
}

pub const GRID: Color = Color::Rgba(255, 255, 255, 0.04);
pub const GRID_FAINT: Color = Color::Rgba(255, 255, 255, 0.03);

/// Chart-wide defaults applied by presentation adapters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTheme {
    pub text_color: &'static str,
    pub font_family: &'static str,
    pub font_size: u32,
    pub legend_point_style: bool,
    pub legend_point_style_width: u32,
    pub legend_padding: u32,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            text_color: "#888",
            font_family: "'Noto Sans JP', 'Inter', sans-serif",
            font_size: 12,
            legend_point_style: true,
            legend_point_style_width: 12,
            legend_padding: 16,
        }
    }
}
