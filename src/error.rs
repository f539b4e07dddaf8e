//! Structured error types for layout operations.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Precondition errors
    NoSubContainer,

    // Target property errors
    UnsupportedProperty,
    TypeMismatch,

    // Storage errors
    StorageIo,
    StorageParse,
    StorageSerialize,
}

/// Errors raised by the layout engine and its collaborators.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The target has no sub-container to capture from or apply onto.
    #[error("target has no axes to read or apply a layout")]
    NoSubContainer,

    /// The target does not support the given property path.
    #[error("unsupported property: {path}")]
    UnsupportedProperty { path: String },

    /// The target rejected a value of the wrong shape.
    #[error("property {path} expects {expected}")]
    TypeMismatch { path: String, expected: &'static str },

    /// A file system I/O error occurred.
    #[error("I/O error accessing layouts at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored layout document could not be parsed.
    #[error("failed to parse layouts at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The layout collection could not be serialized.
    #[error("failed to serialize layouts: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl LayoutError {
    pub fn unsupported(path: impl Into<String>) -> Self {
        Self::UnsupportedProperty { path: path.into() }
    }

    pub fn type_mismatch(path: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
        }
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            LayoutError::NoSubContainer => ErrorCode::NoSubContainer,
            LayoutError::UnsupportedProperty { .. } => ErrorCode::UnsupportedProperty,
            LayoutError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            LayoutError::Io { .. } => ErrorCode::StorageIo,
            LayoutError::Parse { .. } => ErrorCode::StorageParse,
            LayoutError::Serialize(_) => ErrorCode::StorageSerialize,
        }
    }
}

/// Result type for layout operations.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
