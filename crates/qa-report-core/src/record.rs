//! The result record a check node emits, and its canonical text encoding.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::status::QaStatus;

/// A single QA check outcome.
///
/// Field order is the serialized key order: `status` precedes `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaResult {
    pub status: QaStatus,
    /// Human-readable explanation, carried verbatim.
    pub message: String,
}

impl QaResult {
    /// Build a record from a free-form status keyword, normalizing it.
    pub fn new(status: &str, message: &str) -> Self {
        Self {
            status: QaStatus::normalize(status),
            message: message.to_string(),
        }
    }

    /// Serialize to the canonical wire text: pretty JSON, one field per line,
    /// two-space indentation, no trailing newline.
    ///
    /// ```text
    /// {
    ///   "status": "pass",
    ///   "message": "All checks succeeded"
    /// }
    /// ```
    pub fn encode(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse wire text back into a record. Unknown statuses decode as `error`.
    pub fn decode(text: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(text)?)
    }
}
