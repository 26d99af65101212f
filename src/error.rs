use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the canvas engine and its host-side collaborators
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Canvas dimensions {width}x{height} are not drawable")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("Unknown mode {0:?}")]
    UnknownMode(String),

    #[error("Unknown configuration key {0:?}")]
    UnknownConfigKey(String),

    #[error("Invalid value {value:?} for configuration key {key:?}")]
    InvalidConfigValue { key: String, value: String },

    /// Copy was requested while the active mode has no selection at all
    #[error("No selection tool is active")]
    NoSelection,

    /// Copy was requested before the selection gesture finished
    #[error("Selection is not locked yet")]
    SelectionNotLocked,

    #[error("Selection covers no pixels")]
    EmptySelection,

    #[error("Failed to decode or encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read stamp directory {path}: {source}")]
    StampDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("Background task {0:?} stopped without reporting a result")]
    TaskLost(String),
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;
