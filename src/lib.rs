//! `sumo-lab` library crate.
//!
//! The binary (`sumo`) is a thin wrapper around this library so that:
//!
//! - renderers are testable without spawning processes
//! - the same rendered page feeds the site writer, the report and the TUI

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod plot;
pub mod render;
pub mod report;
pub mod site;
pub mod tui;
