//! Command-line parsing for the sumo data-lab renderer.
//!
//! Argument parsing and command dispatch stay separate from the renderers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Section;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sumo", version, about = "SUMO DATA LAB page renderer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render every section and write the static site.
    Build(BuildArgs),
    /// Print the rendered page as a terminal report.
    Show(ShowArgs),
    /// Launch the interactive TUI (the default).
    Tui(SourceArgs),
}

/// Where the nine documents are read from.
///
/// Without either flag the source is `SUMO_DATA`, then `./data`, then an
/// interactive pick.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Local directory holding the JSON documents.
    #[arg(short = 'd', long, value_name = "DIR", conflicts_with = "url")]
    pub data: Option<PathBuf>,

    /// Base URL serving the JSON documents.
    #[arg(short = 'u', long, value_name = "URL")]
    pub url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory for index.html, charts.json and manifest.json.
    #[arg(short = 'o', long, value_name = "DIR", default_value = "site")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print only this section.
    #[arg(short = 's', long, value_enum)]
    pub section: Option<Section>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Disable the ASCII charts.
    #[arg(long)]
    pub no_plot: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_defaults_to_site_dir() {
        let cli = Cli::parse_from(["sumo", "build", "--data", "docs/data"]);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.out, PathBuf::from("site"));
        assert_eq!(args.source.data, Some(PathBuf::from("docs/data")));
    }

    #[test]
    fn show_parses_section_names() {
        let cli = Cli::parse_from(["sumo", "show", "--section", "star-trade", "--no-plot"]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.section, Some(Section::StarTrade));
        assert!(args.no_plot);
        assert_eq!(args.width, 72);
    }

    #[test]
    fn data_and_url_conflict() {
        let res = Cli::try_parse_from(["sumo", "tui", "--data", "d", "--url", "http://x"]);
        assert!(res.is_err());
    }
}
