//! Collecting per-node results into a report document, and writing or
//! displaying that document.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::config::ReportOptions;
use crate::diagnostic::{parse_node_errors, parse_node_warnings, NodeDiagnostics};
use crate::error::ReportError;
use crate::status::QaStatus;

/// Message recorded for a check node that neither errored nor reported.
pub const NO_RESULT_MESSAGE: &str = "Check did not report a result";

/// Outcome of one check node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReport {
    pub node_name: String,
    pub node_type: String,
    pub status: QaStatus,
    pub message: String,
}

/// Context of a check run, supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportMetadata {
    pub user: String,
    /// Machine the checks ran on.
    pub machine: String,
    pub time: String,
    pub asset_path: String,
    /// Whether the host managed to cook the node chain.
    pub cook_success: bool,
}

/// All check results for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub version: String,
    pub user: String,
    /// Machine name.
    pub node: String,
    pub time: String,
    pub asset_path: String,
    pub cook_success: bool,
    pub reports: Vec<NodeReport>,
}

/// Build a report from the diagnostics of a node chain.
///
/// Node errors take precedence over the node's reported result; nodes of a
/// skipped type are left out entirely.
pub fn collect_report(
    meta: ReportMetadata,
    nodes: &[NodeDiagnostics],
    options: &ReportOptions,
) -> Result<ReportDocument, ReportError> {
    let mut reports = Vec::with_capacity(nodes.len());

    for node in nodes {
        if options.skips(&node.node_type) {
            tracing::debug!(node = %node.node_name, node_type = %node.node_type, "skipping loader node");
            continue;
        }

        let (status, message) = if !node.errors.is_empty() {
            (QaStatus::Error, parse_node_errors(&node.errors))
        } else {
            match parse_node_warnings(&node.node_name, &node.warnings, &options.warning_prefix)? {
                Some(result) => (result.status, result.message),
                None => {
                    tracing::warn!(node = %node.node_name, "check node did not report a result");
                    (QaStatus::Error, NO_RESULT_MESSAGE.to_string())
                }
            }
        };

        tracing::debug!(node = %node.node_name, %status, "collected check result");
        reports.push(NodeReport {
            node_name: node.node_name.clone(),
            node_type: node.node_type.clone(),
            status,
            message,
        });
    }

    Ok(ReportDocument {
        version: options.report_version.clone(),
        user: meta.user,
        node: meta.machine,
        time: meta.time,
        asset_path: meta.asset_path,
        cook_success: meta.cook_success,
        reports,
    })
}

impl ReportDocument {
    /// True when every check passed. A report without checks passes.
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(|r| r.status.is_pass())
    }

    pub fn ensure_version(&self, expected: &str) -> Result<(), ReportError> {
        if self.version == expected {
            Ok(())
        } else {
            Err(ReportError::VersionMismatch {
                found: self.version.clone(),
                expected: expected.to_string(),
            })
        }
    }

    /// Serialize with keys sorted at every level, `indent` spaces per level,
    /// and a trailing newline.
    pub fn to_json_string(&self, indent: usize) -> Result<String, ReportError> {
        let value = sort_keys(serde_json::to_value(self)?);
        let indent = " ".repeat(indent);

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        buf.push(b'\n');

        // serde_json only ever writes UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k, sort_keys(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Write `report` to `path`, creating the parent directory when needed.
pub fn write_json_report(
    report: &ReportDocument,
    path: &Path,
    indent: usize,
) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }

    let json = report.to_json_string(indent)?;
    fs::write(path, json).map_err(|e| ReportError::io(path, e))?;

    tracing::debug!(path = %path.display(), checks = report.reports.len(), "wrote report");
    Ok(())
}

/// Load a report previously written by [`write_json_report`].
pub fn read_json_report(path: &Path) -> Result<ReportDocument, ReportError> {
    let content = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Render a report as a text tree for the terminal.
///
/// ```text
/// [X] Checks for assets/crate.obj
/// ├── check_polycount1
/// │   ├── PASS | check_polycount
/// │   └── 1200 polygons
/// └── check_holes1
///     ├── FAIL | check_holes
///     └── Geometry has holes
/// ```
pub fn render_terminal(report: &ReportDocument, expected_version: &str) -> Result<String, ReportError> {
    report.ensure_version(expected_version)?;

    let marker = if report.all_passed() { "[OK]" } else { "[X]" };
    let mut out = format!("{marker} Checks for {}\n", report.asset_path);

    for (i, node) in report.reports.iter().enumerate() {
        let last_node = i + 1 == report.reports.len();
        let (branch, indent) = tree_glyphs(last_node);
        out.push_str(&format!("{branch}{}\n", node.node_name));

        let has_message = !node.message.is_empty();
        let (status_branch, _) = tree_glyphs(!has_message);
        out.push_str(&format!(
            "{indent}{status_branch}{} | {}\n",
            node.status.as_str().to_ascii_uppercase(),
            node.node_type
        ));

        if has_message {
            let (message_branch, message_indent) = tree_glyphs(true);
            for (j, line) in node.message.lines().enumerate() {
                let lead = if j == 0 { message_branch } else { message_indent };
                out.push_str(&format!("{indent}{lead}{line}\n"));
            }
        }
    }

    Ok(out)
}

fn tree_glyphs(last: bool) -> (&'static str, &'static str) {
    if last {
        ("└── ", "    ")
    } else {
        ("├── ", "│   ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REPORT_VERSION;
    use crate::record::QaResult;
    use pretty_assertions::assert_eq;

    fn check_node(name: &str, node_type: &str, status: &str, message: &str) -> NodeDiagnostics {
        let record = QaResult::new(status, message).encode().unwrap();
        NodeDiagnostics {
            node_name: name.to_string(),
            node_type: node_type.to_string(),
            warnings: vec![format!("Vex error: {record}")],
            errors: Vec::new(),
        }
    }

    fn meta() -> ReportMetadata {
        ReportMetadata {
            user: "artist".to_string(),
            machine: "WS-042".to_string(),
            time: "2024-05-01 10:00:00.000000".to_string(),
            asset_path: "assets/crate.obj".to_string(),
            cook_success: true,
        }
    }

    #[test]
    fn test_collect_skips_loader_nodes() {
        let nodes = vec![
            NodeDiagnostics {
                node_name: "file_crate".to_string(),
                node_type: "file".to_string(),
                ..Default::default()
            },
            check_node("check_polycount1", "check_polycount", "PASS", "1200 polygons"),
        ];

        let report = collect_report(meta(), &nodes, &ReportOptions::default()).unwrap();
        assert_eq!(report.version, REPORT_VERSION);
        assert_eq!(report.node, "WS-042");
        assert_eq!(
            report.reports,
            vec![NodeReport {
                node_name: "check_polycount1".to_string(),
                node_type: "check_polycount".to_string(),
                status: QaStatus::Pass,
                message: "1200 polygons".to_string(),
            }]
        );
        assert!(report.all_passed());
    }

    #[test]
    fn test_collect_errors_take_precedence() {
        let mut node = check_node("check_uvs1", "check_normalized_uvs", "pass", "ok");
        node.errors = vec!["Cook failed".to_string(), "No UV attribute".to_string()];

        let report = collect_report(meta(), &[node], &ReportOptions::default()).unwrap();
        assert_eq!(report.reports[0].status, QaStatus::Error);
        assert_eq!(report.reports[0].message, "Cook failed\nNo UV attribute");
        assert!(!report.all_passed());
    }

    #[test]
    fn test_collect_silent_check_is_error() {
        let node = NodeDiagnostics {
            node_name: "asset_info1".to_string(),
            node_type: "asset_info".to_string(),
            ..Default::default()
        };

        let report = collect_report(meta(), &[node], &ReportOptions::default()).unwrap();
        assert_eq!(report.reports[0].status, QaStatus::Error);
        assert_eq!(report.reports[0].message, NO_RESULT_MESSAGE);
    }

    #[test]
    fn test_collect_propagates_malformed_warning() {
        let node = NodeDiagnostics {
            node_name: "broken1".to_string(),
            node_type: "broken".to_string(),
            warnings: vec!["Vex error: not a record".to_string()],
            errors: Vec::new(),
        };

        let err = collect_report(meta(), &[node], &ReportOptions::default()).unwrap_err();
        assert!(matches!(err, ReportError::MalformedDiagnostic { .. }));
    }

    #[test]
    fn test_empty_report_passes() {
        let report = collect_report(meta(), &[], &ReportOptions::default()).unwrap();
        assert!(report.all_passed());
    }

    #[test]
    fn test_json_keys_sorted_with_indent() {
        let nodes = vec![check_node("c1", "check", "warn", "w")];
        let report = collect_report(meta(), &nodes, &ReportOptions::default()).unwrap();

        let json = report.to_json_string(4).unwrap();
        let expected = r#"{
    "asset_path": "assets/crate.obj",
    "cook_success": true,
    "node": "WS-042",
    "reports": [
        {
            "message": "w",
            "node_name": "c1",
            "node_type": "check",
            "status": "warn"
        }
    ],
    "time": "2024-05-01 10:00:00.000000",
    "user": "artist",
    "version": "1.0"
}
"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_write_and_read_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports").join("crate.obj.json");

        let nodes = vec![check_node("c1", "check", "fail", "Geometry has holes")];
        let report = collect_report(meta(), &nodes, &ReportOptions::default()).unwrap();

        write_json_report(&report, &path, 4).unwrap();
        let loaded = read_json_report(&path).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn test_read_missing_report_is_io_error() {
        let err = read_json_report(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }

    #[test]
    fn test_render_tree() {
        let nodes = vec![
            check_node("check_polycount1", "check_polycount", "pass", "1200 polygons"),
            check_node("check_uvs1", "check_normalized_uvs", "warn", ""),
            check_node("check_holes1", "check_holes", "FAIL", "Geometry has holes\nat 3 edges"),
        ];
        let report = collect_report(meta(), &nodes, &ReportOptions::default()).unwrap();

        let rendered = render_terminal(&report, REPORT_VERSION).unwrap();
        let expected = "\
[X] Checks for assets/crate.obj
├── check_polycount1
│   ├── PASS | check_polycount
│   └── 1200 polygons
├── check_uvs1
│   └── WARN | check_normalized_uvs
└── check_holes1
    ├── FAIL | check_holes
    └── Geometry has holes
        at 3 edges
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_all_passed_marker() {
        let nodes = vec![check_node("c1", "check", "Pass", "")];
        let report = collect_report(meta(), &nodes, &ReportOptions::default()).unwrap();
        let rendered = render_terminal(&report, REPORT_VERSION).unwrap();
        assert!(rendered.starts_with("[OK] Checks for assets/crate.obj\n"));
    }

    #[test]
    fn test_render_rejects_other_version() {
        let mut report = collect_report(meta(), &[], &ReportOptions::default()).unwrap();
        report.version = "0.9".to_string();

        let err = render_terminal(&report, REPORT_VERSION).unwrap_err();
        assert!(matches!(err, ReportError::VersionMismatch { .. }));
    }
}
