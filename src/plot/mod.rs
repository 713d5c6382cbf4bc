//! Plain-text chart rendering.

pub mod ascii;

pub use ascii::{render_bar_chart, render_chart, render_line_chart};
