//! Where the nine JSON documents come from.

use std::fmt;
use std::path::PathBuf;

/// Environment variable naming the default data source (directory or URL).
pub const DATA_ENV_VAR: &str = "SUMO_DATA";

/// Directory tried when no source is given on the command line or in the environment.
pub const DEFAULT_DATA_DIR: &str = "data";

/// A location holding the documents, resolved relative to their file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A local directory, e.g. the `docs/data` folder of the published site.
    Dir(PathBuf),
    /// An HTTP(S) base URL, e.g. `https://example.github.io/sumo/data`.
    Url(String),
}

impl DataSource {
    /// Interpret a user-supplied location: anything with an http(s) scheme is a URL.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.trim_end_matches('/').to_string())
        } else {
            DataSource::Dir(PathBuf::from(trimmed))
        }
    }

    /// Read the default source from `SUMO_DATA` (a `.env` file is honoured).
    pub fn from_env() -> Option<Self> {
        dotenvy::dotenv().ok();
        std::env::var(DATA_ENV_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| Self::parse(&v))
    }

    /// Location of one document within this source.
    pub fn locate(&self, file_name: &str) -> String {
        match self {
            DataSource::Dir(dir) => dir.join(file_name).display().to_string(),
            DataSource::Url(base) => format!("{base}/{file_name}"),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Dir(dir) => write!(f, "{}", dir.display()),
            DataSource::Url(base) => write!(f, "{base}"),
        }
    }
}
