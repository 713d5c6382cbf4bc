//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data source
//! - loads and renders the page
//! - hands the page to the site writer, the report or the TUI

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{BuildArgs, Command, ShowArgs, SourceArgs};
use crate::data::{DEFAULT_DATA_DIR, DataSource};
use crate::error::AppError;
use crate::render::ChartTheme;
use crate::report::ReportOptions;

pub mod pipeline;

/// Settings for `sumo build`, resolved from CLI args and the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub source: DataSource,
    pub out_dir: PathBuf,
}

/// Settings for `sumo show`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowConfig {
    pub source: DataSource,
    pub report: ReportOptions,
}

/// Entry point for the `sumo` binary.
pub fn run() -> Result<(), AppError> {
    // We want `sumo` and `sumo --data DIR` to behave like `sumo tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Build(args) => {
            init_logging();
            handle_build(args)
        }
        Command::Show(args) => {
            init_logging();
            handle_show(args)
        }
        // No subscriber: log lines would tear the alternate screen.
        Command::Tui(args) => handle_tui(args),
    }
}

/// `RUST_LOG` filter (default `warn`), written to stderr.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_build(args: BuildArgs) -> Result<(), AppError> {
    let config = site_config_from_build(&args)?;
    let run = pipeline::load_and_render(config.source)?;
    let files = crate::site::write_site(
        &config.out_dir,
        &run.page,
        &ChartTheme::default(),
        &run.source.to_string(),
    )?;
    println!("Wrote {}", files.index.display());
    println!("Wrote {}", files.charts.display());
    println!("Wrote {}", files.manifest.display());
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let config = show_config_from_args(&args)?;
    let run = pipeline::load_and_render(config.source)?;

    println!(
        "{}",
        crate::report::format_header(&run.bundle.summary, &run.source.to_string())
    );
    let text = match args.section {
        Some(section) => crate::report::format_section(&run.page, section, config.report),
        None => crate::report::format_page(&run.page, config.report),
    };
    println!("{text}");
    Ok(())
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    let source = resolve_source(&args)?;
    let run = pipeline::load_and_render(source)?;
    crate::tui::run(&run.page, &run.source.to_string())
}

pub fn site_config_from_build(args: &BuildArgs) -> Result<SiteConfig, AppError> {
    Ok(SiteConfig {
        source: resolve_source(&args.source)?,
        out_dir: args.out.clone(),
    })
}

pub fn show_config_from_args(args: &ShowArgs) -> Result<ShowConfig, AppError> {
    Ok(ShowConfig {
        source: resolve_source(&args.source)?,
        report: ReportOptions {
            plot: !args.no_plot,
            width: args.width,
            height: args.height,
        },
    })
}

/// Flags first, then `SUMO_DATA`, then `./data`, then ask.
fn resolve_source(args: &SourceArgs) -> Result<DataSource, AppError> {
    resolve_source_with(args, DataSource::from_env(), || {
        if std::io::stdin().is_terminal() {
            crate::cli::picker::prompt_for_data_dir().map(DataSource::Dir)
        } else {
            Err(AppError::input(
                "No data source. Pass --data DIR or --url URL, or set SUMO_DATA.",
            ))
        }
    })
}

fn resolve_source_with(
    args: &SourceArgs,
    env: Option<DataSource>,
    pick: impl FnOnce() -> Result<DataSource, AppError>,
) -> Result<DataSource, AppError> {
    if let Some(dir) = &args.data {
        return Ok(DataSource::Dir(dir.clone()));
    }
    if let Some(url) = &args.url {
        return match DataSource::parse(url) {
            DataSource::Url(url) => Ok(DataSource::Url(url)),
            DataSource::Dir(_) => Err(AppError::input(format!(
                "--url expects an http(s) URL (got: {url})."
            ))),
        };
    }
    if let Some(source) = env {
        return Ok(source);
    }
    let default = PathBuf::from(DEFAULT_DATA_DIR);
    if default.is_dir() {
        return Ok(DataSource::Dir(default));
    }
    pick()
}

/// Rewrite argv so `sumo` defaults to `sumo tui`.
///
/// Rules:
/// - `sumo`                       -> `sumo tui`
/// - `sumo --data DIR ...`        -> `sumo tui --data DIR ...`
/// - `sumo --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "build" | "show" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
