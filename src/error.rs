//! Error types for archive reading, metadata parsing, scanning and catalog output.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to open an archive or read one of its entries.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to read archive {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Failed to read entry {name}: {reason}")]
    Entry { name: String, reason: String },
}

/// Failure to parse one metadata entry.
///
/// Always isolated to the entry it was raised for.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected document shape: {0}")]
    Shape(String),
}

/// Failure that aborts a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Not a valid directory: {}", .0.display())]
    InvalidRootPath(PathBuf),
}

/// Failure to persist the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
