//! Text report of the rendered page.

pub mod format;

pub use format::{ReportOptions, format_header, format_page, format_section};
