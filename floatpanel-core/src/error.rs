//! # Error handling for Floatpanel Core
//!
//! This module defines the error type returned by the fallible parts of the
//! engine: configuration loading and the raw storage backends.
//!
//! Most of the engine is deliberately infallible. Gesture handlers treat
//! invalid transitions as no-ops and the [`GeometryStore`](crate::store::GeometryStore)
//! swallows every backend error, so these errors only reach callers that use
//! [`Config`](crate::Config) or a [`StorageBackend`](crate::store::StorageBackend)
//! directly.

use thiserror::Error;

/// Result type used throughout Floatpanel Core.
///
/// # Example
///
/// ```rust
/// use floatpanel_core::{Error, Result};
///
/// fn parse_level(level: &str) -> Result<&str> {
///     match level {
///         "info" | "debug" => Ok(level),
///         other => Err(Error::validation("logging.level", other)),
///     }
/// }
///
/// assert!(parse_level("info").is_ok());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Floatpanel Core.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Storage backend errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Validation errors
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a new configuration error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use floatpanel_core::Error;
    ///
    /// let error = Error::config("Could not determine config directory");
    /// assert!(error.is_config());
    /// ```
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use floatpanel_core::Error;
    ///
    /// let error = Error::validation("panel.width", "Width must be at least min_width");
    /// assert!(error.is_validation());
    /// ```
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Get the error category as a string.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "Config",
            Self::Storage { .. } => "Storage",
            Self::Validation { .. } => "Validation",
            Self::Io(_) => "IO",
            Self::Json(_) => "JSON",
            Self::Toml(_) => "TOML",
        }
    }
}

/// Convenience macro for creating storage errors.
///
/// # Example
///
/// ```rust
/// use floatpanel_core::storage_error;
///
/// let err = storage_error!("Failed to write {}", "panel-state.json");
/// assert!(err.is_storage());
/// ```
#[macro_export]
macro_rules! storage_error {
    ($($arg:tt)*) => {
        $crate::Error::storage(format!($($arg)*))
    };
}
