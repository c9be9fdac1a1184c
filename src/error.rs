//! Error types for the poster renderer

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading assets, rendering or exporting
#[derive(Error, Debug)]
pub enum Error {
    /// A background image could not be decoded
    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    /// An asset (background, flag list) could not be found or read
    #[error("Asset unavailable: {0}")]
    AssetUnavailable(String),

    /// A CSS colour string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// The surface dimensions are zero or too large for a pixmap
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// Failed to rasterize a display list
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to downsample or encode the exported image
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The background render worker went away before answering
    #[error("Render worker stopped: {0}")]
    WorkerStopped(String),

    /// Network error
    #[cfg(feature = "remote")]
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}
