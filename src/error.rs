// src/error.rs
//! Error taxonomy for the analysis pipeline.
//!
//! Catalog and lexicon failures are fatal at startup; a scoring failure aborts
//! the run. There is no partial-results mode.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("brand catalog not found at {}", path.display())]
    CatalogNotFound { path: PathBuf },

    #[error("brand catalog at {} is malformed: {reason}", path.display())]
    CatalogMalformed { path: PathBuf, reason: String },

    #[error("sentiment lexicon unavailable: {0}")]
    LexiconUnavailable(String),

    #[error("sentiment scoring failed: {0}")]
    ScoringFailed(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("forum fetch failed: {0}")]
    Fetch(String),
}

pub type Result<T, E = AnalyzerError> = std::result::Result<T, E>;
