//! Reading result records back out of a check node's diagnostics.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::record::QaResult;

/// Diagnostics the host collected from one node after cooking it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDiagnostics {
    pub node_name: String,
    pub node_type: String,
    /// Warning texts, in the order the node raised them.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Error texts, in the order the node raised them.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Parse the result record a check node emitted as its warning.
///
/// Returns `Ok(None)` when the node raised no warnings (loader nodes, or a
/// check that never reported). A check reports once, so only the first
/// warning is read. `prefix` is the text the host prepends to warnings; it is
/// stripped when present.
pub fn parse_node_warnings(
    node: &str,
    warnings: &[String],
    prefix: &str,
) -> Result<Option<QaResult>, ReportError> {
    let Some(first) = warnings.first() else {
        return Ok(None);
    };

    if warnings.len() > 1 {
        tracing::debug!(
            node,
            ignored = warnings.len() - 1,
            "node raised several warnings, reading the first"
        );
    }

    let text = first.strip_prefix(prefix).unwrap_or(first).trim();
    let result = serde_json::from_str(text).map_err(|source| ReportError::MalformedDiagnostic {
        node: node.to_string(),
        source,
    })?;

    Ok(Some(result))
}

/// Join a node's error texts into one message, one error per line.
pub fn parse_node_errors(errors: &[String]) -> String {
    errors.join("\n")
}
