//! Configuration for report collection.

use serde::{Deserialize, Serialize};

/// Report format version written into, and expected from, report documents.
pub const REPORT_VERSION: &str = "1.0";

/// Options for collecting and writing reports.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `report-version`,
/// `skip-node-types`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReportOptions {
    /// Version stamped on collected reports. Default: [`REPORT_VERSION`].
    pub report_version: String,
    /// Node types that only load data and never run a check (e.g. `file`).
    /// Their diagnostics are ignored.
    pub skip_node_types: Vec<String>,
    /// Prefix the host prepends to warnings raised from check code.
    pub warning_prefix: String,
    /// Spaces per indentation level in written report files.
    pub indent: usize,
}

impl ReportOptions {
    pub fn skips(&self, node_type: &str) -> bool {
        self.skip_node_types.iter().any(|t| t == node_type)
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            report_version: REPORT_VERSION.to_string(),
            skip_node_types: vec!["file".to_string()],
            warning_prefix: "Vex error: ".to_string(),
            indent: 4,
        }
    }
}
