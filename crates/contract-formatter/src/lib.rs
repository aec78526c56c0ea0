//! Vietnamese legal contract formatter
//!
//! Turns the semi-structured contract text returned by a text generator
//! into typed [`DocumentNode`]s and renders them as print-ready HTML:
//! - national header, title, number line and legal bases
//! - party blocks and whereas clauses
//! - articles with clauses, sub-clauses, items and pipe tables
//! - one or two column signature blocks
//!
//! Formatting is total: any input produces a document, and problems are
//! reported as [`Diagnostic`]s to the sink supplied by the caller.

pub mod coverage;
pub mod diagnostics;
pub mod inline;
pub mod node;
pub mod patterns;
pub mod render;
pub mod segmenter;
pub mod style;

mod article;
mod preamble;
mod signature;
mod table;

pub use coverage::Coverage;
pub use diagnostics::{Diagnostic, DiagnosticSink, Level, NullSink, TracingSink};
pub use inline::{escape_html, format_inline};
pub use node::{DocumentNode, LineSpan, NodeKind, Party, SignatureColumn, Table};
pub use render::render;
pub use style::{render_page, CONTRACT_STYLESHEET};

use serde::{Deserialize, Serialize};
use segmenter::Scan;

/// Coverage ratio below which a [`Diagnostic::LowCoverage`] is reported
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 0.95;

/// Lines a signature block may span, marker included
pub const DEFAULT_SIGNATURE_LOOKAHEAD: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterOptions {
    pub coverage_threshold: f64,
    pub signature_lookahead: usize,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            coverage_threshold: DEFAULT_COVERAGE_THRESHOLD,
            signature_lookahead: DEFAULT_SIGNATURE_LOOKAHEAD,
        }
    }
}

/// Rendered contract with the nodes it was built from
#[derive(Debug, Clone, Serialize)]
pub struct FormattedContract {
    pub html: String,
    pub nodes: Vec<DocumentNode>,
    pub coverage: Coverage,
}

#[derive(Debug, Clone, Default)]
pub struct ContractFormatter {
    pub options: FormatterOptions,
}

impl ContractFormatter {
    pub fn new(options: FormatterOptions) -> Self {
        Self { options }
    }

    /// Segment `text` into nodes without rendering
    pub fn segment(&self, text: &str, sink: &mut dyn DiagnosticSink) -> Vec<DocumentNode> {
        let scan = Scan::new(text, self.options.signature_lookahead);
        segmenter::segment(&scan, sink)
    }

    /// Format `text`, logging diagnostics through `tracing`
    pub fn format(&self, text: &str) -> FormattedContract {
        self.format_with_sink(text, &mut TracingSink)
    }

    pub fn format_with_sink(&self, text: &str, sink: &mut dyn DiagnosticSink) -> FormattedContract {
        let nodes = self.segment(text, sink);
        let html = render(&nodes);
        let coverage = Coverage::measure(text, &html);

        if coverage.is_below(self.options.coverage_threshold) {
            sink.emit(Diagnostic::LowCoverage {
                ratio: coverage.ratio,
                threshold: self.options.coverage_threshold,
                input_words: coverage.input_words,
                output_words: coverage.output_words,
            });
        }
        sink.emit(Diagnostic::Summary {
            lines: text.lines().count(),
            nodes: nodes.len(),
            coverage: coverage.ratio,
        });

        FormattedContract {
            html,
            nodes,
            coverage,
        }
    }
}

/// Format with default options
pub fn format_contract(text: &str) -> FormattedContract {
    ContractFormatter::default().format(text)
}
