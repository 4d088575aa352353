//! Error types for the smrt pipeline.
//!
//! Library crates return [`Error`] for failures that stop an operation
//! outright (unreadable manifest, template registration, bad arguments).
//! Per-file scan problems are not errors at this level: they are recorded
//! as diagnostics inside a [`ScanResult`](crate::ScanResult) so a multi-file
//! run always completes.
//!
//! # Examples
//!
//! ```
//! use smrt_core::{Error, Result};
//!
//! fn require_marker(marker: &str) -> Result<()> {
//!     if marker.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "marker name cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = require_marker("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the smrt pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem access failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path that was being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A manifest file exists but does not contain a valid manifest.
    #[error("invalid manifest at {}: {source}", path.display())]
    ManifestParse {
        /// Path of the manifest file
        path: PathBuf,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Serialization/deserialization error.
    ///
    /// Raised when JSON or other data format conversion fails.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Template registration or rendering failed.
    #[error("Template error: {message}")]
    TemplateError {
        /// Description of the template failure
        message: String,
    },

    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` if this is an I/O error.
    ///
    /// # Examples
    ///
    /// ```
    /// use smrt_core::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::Io {
    ///     path: PathBuf::from("missing.json"),
    ///     source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    /// };
    /// assert!(err.is_io_error());
    /// ```
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` if a manifest file could not be decoded.
    #[must_use]
    pub const fn is_manifest_error(&self) -> bool {
        matches!(self, Self::ManifestParse { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use smrt_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "no base classes".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }
}

/// Result type alias for smrt operations.
///
/// # Examples
///
/// ```
/// use smrt_core::{Error, Result};
///
/// fn parse_limit(value: i64) -> Result<u32> {
///     u32::try_from(value).map_err(|_| Error::InvalidArgument(format!("bad limit {value}")))
/// }
///
/// assert!(parse_limit(5).is_ok());
/// assert!(parse_limit(-1).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_detection() {
        let err = Error::Io {
            path: PathBuf::from("a.ts"),
            source: std::io::Error::other("boom"),
        };
        assert!(err.is_io_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_manifest_error_detection() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::ManifestParse {
            path: PathBuf::from("manifest.json"),
            source,
        };
        assert!(err.is_manifest_error());
        assert!(err.to_string().contains("manifest.json"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::TemplateError {
            message: "missing partial".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("Template error"));
        assert!(display.contains("missing partial"));
        assert!(err.is_template_error());
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = Error::InvalidArgument("bad artifact".to_string());
        assert_eq!(err.to_string(), "Invalid argument: bad artifact");
    }
}
