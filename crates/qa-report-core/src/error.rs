//! Error types for result encoding and report collection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// Variant names and their serialized `snake_case` strings are part of the
/// public contract and must not change across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// A result record could not be serialized or deserialized.
    EncodingError,
    /// A check node's diagnostic text is not a valid result record.
    MalformedDiagnostic,
    /// A report was written by an incompatible report version.
    VersionMismatch,
    /// Reading or writing a report file failed.
    IoError,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Result encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Malformed diagnostic on node '{node}': {source}")]
    MalformedDiagnostic {
        node: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Report version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: String, expected: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Returns the stable error code for this error variant.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ReportError::Encoding(_) => ErrorCode::EncodingError,
            ReportError::MalformedDiagnostic { .. } => ErrorCode::MalformedDiagnostic,
            ReportError::VersionMismatch { .. } => ErrorCode::VersionMismatch,
            ReportError::Io { .. } => ErrorCode::IoError,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}
