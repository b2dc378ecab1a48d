//! Outcome categories of a QA check and the normalization policy that maps
//! free-form status strings onto them.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Outcome category of a QA check.
///
/// The set is closed: anything a check reports that is not `pass`, `warn` or
/// `fail` (in any ASCII casing) becomes [`QaStatus::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QaStatus {
    Pass,
    Warn,
    Fail,
    Error,
}

impl QaStatus {
    /// All statuses, in severity order.
    pub const ALL: [QaStatus; 4] = [
        QaStatus::Pass,
        QaStatus::Warn,
        QaStatus::Fail,
        QaStatus::Error,
    ];

    /// Map an arbitrary status keyword onto the closed vocabulary.
    ///
    /// Matching is ASCII case-insensitive and exact: no trimming, no prefix
    /// matching. Empty and unknown keywords map to [`QaStatus::Error`].
    pub fn normalize(raw: &str) -> Self {
        [QaStatus::Pass, QaStatus::Warn, QaStatus::Fail]
            .into_iter()
            .find(|status| raw.eq_ignore_ascii_case(status.as_str()))
            .unwrap_or(QaStatus::Error)
    }

    /// The wire keyword for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            QaStatus::Pass => "pass",
            QaStatus::Warn => "warn",
            QaStatus::Fail => "fail",
            QaStatus::Error => "error",
        }
    }

    pub fn is_pass(self) -> bool {
        self == QaStatus::Pass
    }
}

impl From<&str> for QaStatus {
    fn from(raw: &str) -> Self {
        QaStatus::normalize(raw)
    }
}

impl fmt::Display for QaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Parsing is fail-closed as well: an out-of-vocabulary status read back from a
// diagnostic or a report file becomes `error` instead of a parse failure.
impl<'de> Deserialize<'de> for QaStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(QaStatus::normalize(&raw))
    }
}
