//! Typed error handling for protocheck.
//!
//! Provides structured errors that library consumers can match on.
//! Unused types are NOT an error of this kind: they are the expected
//! failure outcome of a check and live in [`crate::report::UnusedTypes`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for protocheck operations.
#[derive(Error, Debug)]
pub enum CheckerError {
    /// I/O error when reading descriptor or config files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Protobuf wire decoding failed
    #[error("failed to unmarshal {what}: {message}")]
    Decode { what: String, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid plugin parameter or CLI argument
    #[error("{message}")]
    InvalidArgument { message: String },

    /// A file has no package for the selected language
    #[error("{option} is not found for {file}. Set {option} or use language_package param")]
    MissingPackage { file: String, option: String },
}

impl CheckerError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a decode error for the named protobuf message.
    pub fn decode(what: impl Into<String>, err: prost::DecodeError) -> Self {
        Self::Decode {
            what: what.into(),
            message: err.to_string(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a missing package error.
    pub fn missing_package(file: impl Into<String>, option: impl Into<String>) -> Self {
        Self::MissingPackage {
            file: file.into(),
            option: option.into(),
        }
    }
}

/// Convenience type alias for protocheck results.
pub type CheckerResult<T> = Result<T, CheckerError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> CheckerResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> CheckerResult<T> {
        self.map_err(|e| CheckerError::io(path, e))
    }
}
