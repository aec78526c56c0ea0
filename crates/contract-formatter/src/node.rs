//! Typed document model produced by the segmenter

use serde::Serialize;

/// Source lines covered by a node, 0-based and end-exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(line: usize) -> Self {
        Self::new(line, line + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Party {
    A,
    B,
}

/// Pipe table after column trimming; every row has `header.len()` cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// One party's signature lines (title, note, name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureColumn {
    pub party: Party,
    pub lines: Vec<String>,
}

/// Node payloads. Text fields hold the source text with inline emphasis
/// markers still present; escaping happens in the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    NationalHeader { lines: Vec<String> },
    Title { text: String },
    NumberLine { number: String },
    CanCu { lines: Vec<String> },
    Party { party: Party, lines: Vec<String> },
    Whereas { text: String },
    ArticleHeader { text: String },
    Clause { number: String, text: String },
    Subclause { number: String, text: String },
    ListItem { text: String },
    Table(Table),
    Signature { columns: Vec<SignatureColumn> },
    Watermark { text: String },
    Spacing,
    Paragraph { text: String },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::NationalHeader { .. } => "national_header",
            NodeKind::Title { .. } => "title",
            NodeKind::NumberLine { .. } => "number_line",
            NodeKind::CanCu { .. } => "can_cu",
            NodeKind::Party { .. } => "party",
            NodeKind::Whereas { .. } => "whereas",
            NodeKind::ArticleHeader { .. } => "article_header",
            NodeKind::Clause { .. } => "clause",
            NodeKind::Subclause { .. } => "subclause",
            NodeKind::ListItem { .. } => "list_item",
            NodeKind::Table(_) => "table",
            NodeKind::Signature { .. } => "signature",
            NodeKind::Watermark { .. } => "watermark",
            NodeKind::Spacing => "spacing",
            NodeKind::Paragraph { .. } => "paragraph",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentNode {
    pub kind: NodeKind,
    pub span: LineSpan,
}

impl DocumentNode {
    pub fn new(kind: NodeKind, span: LineSpan) -> Self {
        Self { kind, span }
    }

    pub fn spacing(line: usize) -> Self {
        Self::new(NodeKind::Spacing, LineSpan::single(line))
    }
}
