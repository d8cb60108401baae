//! Error types for the gridsnap-core library.
//!
//! The geometry engine defines exactly one error of its own,
//! [`AppError::InvalidBounds`]. The remaining variants cover the ambient
//! concerns around it: configuration, the overlay window, and settings I/O.
//!
//! Failures of the window-manager sink are deliberately absent. A sink never
//! reports back into the core; see [`crate::sink::Sink`].

use thiserror::Error;

/// Errors that can occur within the gridsnap-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// The surface to snap against has a zero, negative or NaN extent.
    #[error("Invalid bounds: {w}x{h} (width and height must be positive)")]
    InvalidBounds {
        /// Width of the rejected bounds.
        w: f32,
        /// Height of the rejected bounds.
        h: f32,
    },

    /// Configuration-related errors (unknown sink, empty paths).
    #[error("Configuration error: {0}")]
    Config(String),

    /// UI-related errors (viewport creation, event loop).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }

    /// Returns true for [`AppError::InvalidBounds`].
    pub fn is_invalid_bounds(&self) -> bool {
        matches!(self, Self::InvalidBounds { .. })
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
