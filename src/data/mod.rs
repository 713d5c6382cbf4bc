//! Data sources and the batch loader.

pub mod loader;
pub mod source;

pub use loader::{DataBundle, DataLoader, Resource};
pub use source::{DATA_ENV_VAR, DEFAULT_DATA_DIR, DataSource};
