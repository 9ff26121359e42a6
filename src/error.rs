//! Error types for the infographic pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating an infographic
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed invocation options / config file
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The rendered document has no `<svg>` under the container
    #[error("SVG element not found in document at {0}")]
    ElementNotFound(String),

    /// The diagram renderer failed to produce a document
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Headless session launch / navigation / screenshot failure
    #[error("Rasterization failed: {0}")]
    RasterizationError(String),

    /// An asset exists but could not be read
    #[error("Resource error: {0}")]
    ResourceError(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CdpError(err.to_string())
    }
}
