//! Error types.
//!
//! Nothing here is raised while annotating a token: oracle failures degrade to
//! an empty annotation. These errors only surface while setting up a pipeline
//! (loading assets, spawning the analyzer) or from a direct oracle call.

use std::path::PathBuf;

/// Errors from a single call to the external morphological analyzer
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("failed to start analyzer `{}`: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("analyzer i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("analyzer returned malformed output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("analyzer protocol error: {0}")]
    Protocol(String),
}

/// Errors from building a pipeline or loading its assets
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Analyzer(#[from] AnalyzerError),
    #[error("cannot read {}: {source}", path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
