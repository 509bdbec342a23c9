//! Error types that cross stage boundaries.
//!
//! Per-file extraction and markup problems never show up here: they are
//! turned into sentinel content inside the report.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A search location could not be listed.
    #[error("failed to list location {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A tree did not have the shape the merger relies on.
    #[error("merge invariant violated: {0}")]
    MergeInvariant(String),
}
