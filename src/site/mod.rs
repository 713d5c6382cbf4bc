//! Static site output: `index.html`, `charts.json` and `manifest.json`.

pub mod chartjs;
pub mod html;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::data::Resource;
use crate::error::AppError;
use crate::render::{ChartTheme, Page};

pub const INDEX_FILE: &str = "index.html";
pub const CHARTS_FILE: &str = "charts.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Describes one build of the site.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub generator: String,
    pub version: String,
    /// RFC 3339, UTC.
    pub generated_at: String,
    /// Where the documents were loaded from.
    pub source: String,
    pub resources: Vec<&'static str>,
    pub charts: Vec<&'static str>,
    pub files: Vec<&'static str>,
}

/// Paths written by `write_site`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFiles {
    pub index: PathBuf,
    pub charts: PathBuf,
    pub manifest: PathBuf,
}

pub fn write_site(out_dir: &Path, page: &Page, theme: &ChartTheme, source: &str) -> Result<SiteFiles, AppError> {
    fs::create_dir_all(out_dir).map_err(|e| {
        AppError::output(format!("Failed to create output directory '{}': {e}", out_dir.display()))
    })?;

    let charts = chartjs::charts_payload(page.charts(), theme);

    let index = out_dir.join(INDEX_FILE);
    let file = create(&index)?;
    let mut writer = BufWriter::new(file);
    html::write(&mut writer, page, &charts)
        .and_then(|()| writer.flush())
        .map_err(|e| AppError::output(format!("Failed to write '{}': {e}", index.display())))?;
    debug!(path = %index.display(), "wrote page");

    let charts_path = out_dir.join(CHARTS_FILE);
    write_json(&charts_path, &charts)?;

    let manifest = Manifest {
        generator: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        source: source.to_string(),
        resources: Resource::ALL.iter().map(|r| r.file_name()).collect(),
        charts: page.charts().iter().map(|c| c.canvas_id).collect(),
        files: vec![INDEX_FILE, CHARTS_FILE, MANIFEST_FILE],
    };
    let manifest_path = out_dir.join(MANIFEST_FILE);
    write_json(&manifest_path, &manifest)?;

    info!(out = %out_dir.display(), charts = manifest.charts.len(), "site written");

    Ok(SiteFiles {
        index,
        charts: charts_path,
        manifest: manifest_path,
    })
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", path.display())))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .map_err(|e| AppError::output(format!("Failed to write '{}': {e}", path.display())))?;
    debug!(path = %path.display(), "wrote json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;
    use crate::render::render_page;

    #[test]
    fn writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let page = render_page(&fixtures::bundle()).unwrap();
        let files = write_site(dir.path(), &page, &ChartTheme::default(), "fixtures").unwrap();

        let html = fs::read_to_string(&files.index).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));

        let charts: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&files.charts).unwrap()).unwrap();
        assert_eq!(charts.as_array().unwrap().len(), 8);
        assert_eq!(charts[0]["canvas"], "kimariteChart");

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&files.manifest).unwrap()).unwrap();
        assert_eq!(manifest["source"], "fixtures");
        assert_eq!(manifest["resources"].as_array().unwrap().len(), 9);
        assert!(chrono::DateTime::parse_from_rfc3339(manifest["generated_at"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("site");
        let page = render_page(&fixtures::bundle()).unwrap();
        write_site(&out, &page, &ChartTheme::default(), "fixtures").unwrap();
        assert!(out.join(INDEX_FILE).exists());
    }

    #[test]
    fn unwritable_destination_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let page = render_page(&fixtures::bundle()).unwrap();
        let err = write_site(&blocker, &page, &ChartTheme::default(), "fixtures").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_OUTPUT);
    }
}
