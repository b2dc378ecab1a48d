//! # qa-report-core
//!
//! Uniform reporting of QA check results from inspection pipeline nodes.
//!
//! A check calls [`report_qa_result`] with a free-form status keyword and a
//! message. The status is normalized onto `pass | warn | fail | error`, the
//! pair is encoded as a two-key JSON record and handed to the host's
//! diagnostic channel. Downstream, [`collect_report`] reads those records back
//! from each node's diagnostics and assembles a per-asset report.

pub mod config;
pub mod diagnostic;
pub mod emitter;
pub mod error;
pub mod record;
pub mod report;
pub mod status;

pub use config::{ReportOptions, REPORT_VERSION};
pub use diagnostic::{parse_node_errors, parse_node_warnings, NodeDiagnostics};
pub use emitter::{DiagnosticEmitter, FnEmitter, StderrEmitter, TracingEmitter};
pub use error::{ErrorCode, ReportError};
pub use record::QaResult;
pub use report::{
    collect_report, read_json_report, render_terminal, write_json_report, NodeReport,
    ReportDocument, ReportMetadata,
};
pub use status::QaStatus;

/// Report the outcome of a QA check through `emitter`.
///
/// Unrecognized statuses are reported as `error`; they are never rejected.
/// The emitter is called exactly once, after the record is fully encoded. If
/// encoding fails nothing is emitted and the error is returned.
pub fn report_qa_result<E>(emitter: &mut E, status: &str, message: &str) -> Result<(), ReportError>
where
    E: DiagnosticEmitter + ?Sized,
{
    let result = QaResult::new(status, message);
    if !status.eq_ignore_ascii_case(result.status.as_str()) {
        tracing::debug!(raw = status, "unrecognized status reported as error");
    }

    let text = result.encode()?;
    emitter.emit(&text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emits_exactly_once() {
        let mut sink: Vec<String> = Vec::new();
        report_qa_result(&mut sink, "Warn", "Non-manifold edges").unwrap();

        assert_eq!(sink.len(), 1);
        let record = QaResult::decode(&sink[0]).unwrap();
        assert_eq!(record.status, QaStatus::Warn);
        assert_eq!(record.message, "Non-manifold edges");
    }

    #[test]
    fn test_accepts_dyn_emitter() {
        let mut sink: Vec<String> = Vec::new();
        let emitter: &mut dyn DiagnosticEmitter = &mut sink;
        report_qa_result(emitter, "banana", "unexpected").unwrap();
        assert!(sink[0].contains("\"error\""));
    }
}
