use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deckscribe operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Unsupported input such as a notes file in the wrong format, or an
    /// invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// External rendering tools are missing or produced no output
    #[error("Rendering unavailable: {0}")]
    RenderingUnavailable(String),

    /// The deck container could not be read, modified or written
    #[error("Package error: {0}")]
    Package(String),

    /// Raster image could not be decoded or encoded
    #[error("Image error: {0}")]
    Image(String),

    /// PDF export ran but failed
    #[error("Export failed for {path}: {reason}")]
    Export { path: PathBuf, reason: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the failure belongs to an optional enrichment step (notes,
    /// screenshots, PDF export) rather than the mandatory read/write path.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_) | Error::RenderingUnavailable(_) | Error::Export { .. }
        )
    }
}

/// Result type for deckscribe operations.
pub type Result<T> = std::result::Result<T, Error>;
