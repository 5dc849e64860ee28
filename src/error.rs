//! Error types for enumeration, namespace resolution and collection.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The OS connection query failed. No partial results accompany it.
#[derive(Error, Debug)]
pub enum EnumerationError {
    #[error("Failed to read connection table {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Connection enumeration not supported: {0}")]
    Unsupported(String),

    #[error("Failed to parse connection table {path}: {source}")]
    Parse {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A requested metric path could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Namespace length equal to zero")]
    EmptyPath,

    #[error("Key does not exist in map {{key {key}}}")]
    KeyNotFound { key: String },

    #[error("Value at {{key {key}}} is not a map")]
    NotAMapping { key: String },
}

/// Failure of a listing or collection batch.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error("Error collecting metrics: {0}")]
    Resolution(#[from] ResolutionError),
}
