//! Structured events reported while formatting
//!
//! The formatter never logs on its own. Callers hand it a
//! [`DiagnosticSink`]: tests collect into a `Vec`, the CLI forwards to
//! `tracing` through [`TracingSink`].

use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No structural rule matched the line
    FallbackParagraph { line: usize, text: String },
    /// An article header and the number of body blocks under it
    ArticleParsed {
        line: usize,
        header: String,
        blocks: usize,
    },
    /// Rendered output lost words relative to the input
    LowCoverage {
        ratio: f64,
        threshold: f64,
        input_words: usize,
        output_words: usize,
    },
    Summary {
        lines: usize,
        nodes: usize,
        coverage: f64,
    },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::FallbackParagraph { .. } | Diagnostic::ArticleParsed { .. } => Level::Debug,
            Diagnostic::Summary { .. } => Level::Info,
            Diagnostic::LowCoverage { .. } => Level::Warn,
        }
    }

    /// Human-readable log line for the event
    pub fn message(&self) -> &'static str {
        match self {
            Diagnostic::FallbackParagraph { .. } => "no rule matched, emitting paragraph",
            Diagnostic::ArticleParsed { .. } => "parsed article",
            Diagnostic::LowCoverage { .. } => "rendered contract lost words",
            Diagnostic::Summary { .. } => "formatted contract",
        }
    }
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics as `tracing` events at their own level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let message = diagnostic.message();
        match diagnostic.level() {
            Level::Debug => debug!(event = ?diagnostic, "{message}"),
            Level::Info => info!(event = ?diagnostic, "{message}"),
            Level::Warn => warn!(event = ?diagnostic, "{message}"),
        }
    }
}
