// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the canvas layer.

use nodeflow_graph::GraphError;
use thiserror::Error;

/// Transform errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Scale would be zero, negative or not finite
    #[error("Invalid scale: {0}")]
    InvalidScale(f64),

    /// Translation would not be finite
    #[error("Invalid translation: ({0}, {1})")]
    InvalidTranslation(f64, f64),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The RON text could not be parsed
    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The configuration could not be serialized
    #[error("Config serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// The file was written by a newer format version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Errors surfaced by [`Canvas`](crate::Canvas) operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
    /// The graph registry rejected the request
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The transform model rejected the request
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;
