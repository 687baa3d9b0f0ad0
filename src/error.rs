//! Error types for oncokb-cache

use thiserror::Error;

/// Result type alias for annotation operations
pub type Result<T> = std::result::Result<T, AnnotatorError>;

/// Error types for annotation and cache operations
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// Invalid run parameters or environment
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A required cache file is absent in apply mode
    #[error(
        "Cache file '{path}' not found. Apply mode reads existing caches only;\n\
         run with cache updates enabled first to populate it."
    )]
    MissingCacheFile { path: String },

    /// A copy-number alteration has no cache entry; CNA lookups never
    /// fall back to defaults
    #[error("No cache entry for gene '{gene}' with alteration '{alteration}'")]
    CacheMiss { gene: String, alteration: String },

    /// External annotation tool failed to launch or exited non-zero
    #[error("{description} failed: {detail}")]
    AnnotationTool { description: String, detail: String },

    /// Input file violates the expected tabular structure
    #[error("Malformed input '{path}': {reason}")]
    MalformedInput { path: String, reason: String },

    /// File could not be opened or read
    #[error("Cannot open file '{path}': {reason}")]
    FileNotFound { path: String, reason: String },

    /// Cache read or write failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
