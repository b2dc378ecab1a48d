//! The diagnostic channel a check reports through.
//!
//! The host owns the channel; this crate only needs something that accepts
//! one serialized record per call.

use std::io::Write;

/// Host-side sink for serialized result records.
pub trait DiagnosticEmitter {
    /// Associate `text` with the invoking check.
    fn emit(&mut self, text: &str);
}

impl<E: DiagnosticEmitter + ?Sized> DiagnosticEmitter for &mut E {
    fn emit(&mut self, text: &str) {
        (**self).emit(text);
    }
}

/// Collects every emitted text in order.
impl DiagnosticEmitter for Vec<String> {
    fn emit(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Adapts a closure into an emitter.
pub struct FnEmitter<F>(pub F);

impl<F: FnMut(&str)> DiagnosticEmitter for FnEmitter<F> {
    fn emit(&mut self, text: &str) {
        (self.0)(text);
    }
}

/// Writes each record to standard error, followed by a newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrEmitter;

impl DiagnosticEmitter for StderrEmitter {
    fn emit(&mut self, text: &str) {
        let mut stderr = std::io::stderr().lock();
        if let Err(e) = writeln!(stderr, "{text}") {
            tracing::warn!(error = %e, "failed to write diagnostic to stderr");
        }
    }
}

/// Forwards each record as a `WARN` tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEmitter;

impl DiagnosticEmitter for TracingEmitter {
    fn emit(&mut self, text: &str) {
        tracing::warn!(target: "qa_report", "{text}");
    }
}
