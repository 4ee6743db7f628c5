//! Error types for the overlay checker.
//!
//! Only failures of the surrounding machinery (reading files, XML syntax,
//! manifest loading) are errors. Problems found *inside* a media overlay
//! are reported as messages through [`crate::report::Report`] and never
//! abort processing.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the overlay checker library.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading a specific file failed.
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The resource manifest could not be parsed.
    #[error("Invalid manifest: {0}")]
    Manifest(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Document exceeds the configured size limit.
    #[error("Document {path} is too large ({size} bytes, max {max})")]
    DocumentTooLarge { path: String, size: usize, max: usize },

    /// A path could not be expressed as a package-relative path.
    #[error("Invalid package path: '{0}'")]
    InvalidPath(String),
}

/// Result type alias for overlay checker operations.
pub type Result<T> = std::result::Result<T, OverlayError>;
