//! Shared "load then render" logic used by every front-end.
//!
//! Keeping this in one place avoids duplicating the workflow
//! (fetch all documents -> render every section); the site writer, the report
//! and the TUI then only deal with presentation.

use tracing::info;

use crate::data::{DataBundle, DataLoader, DataSource};
use crate::error::AppError;
use crate::render::{Page, render_page};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub source: DataSource,
    pub bundle: DataBundle,
    pub page: Page,
}

/// Load every document from `source`, then render the page.
pub fn load_and_render(source: DataSource) -> Result<RunOutput, AppError> {
    let loader = DataLoader::new(source);
    let bundle = loader.load()?;
    let page = render_page(&bundle)?;
    info!(source = %loader.source(), "pipeline complete");

    Ok(RunOutput {
        source: loader.source().clone(),
        bundle,
        page,
    })
}
