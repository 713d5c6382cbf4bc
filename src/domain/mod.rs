//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the view models decoded from the upstream JSON documents (`types`)
//! - basho period codes and their display format (`basho`)
//! - the page sections (`Section`)

pub mod basho;
pub mod section;
pub mod types;

pub use basho::*;
pub use section::*;
pub use types::*;
