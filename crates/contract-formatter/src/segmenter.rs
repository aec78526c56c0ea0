//! Greedy single-pass segmenter
//!
//! The segmenter walks the input once. At each cursor position the rules
//! of [`RULES`] are tried in order and the first one that matches claims
//! the line, possibly with a bounded run of following lines. The final
//! rule always matches, so every line ends up in exactly one node.

use crate::article;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::node::{DocumentNode, LineSpan, NodeKind};
use crate::patterns;
use crate::preamble;
use crate::signature;
use crate::table;

/// Trimmed input lines plus the limits rules may look ahead by
pub struct Scan<'a> {
    lines: Vec<&'a str>,
    pub signature_lookahead: usize,
}

impl<'a> Scan<'a> {
    pub fn new(text: &'a str, signature_lookahead: usize) -> Self {
        Self {
            lines: text.lines().map(str::trim).collect(),
            signature_lookahead,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line `index`, or `""` past the end
    pub fn line(&self, index: usize) -> &'a str {
        self.lines.get(index).copied().unwrap_or("")
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn is_blank(&self, index: usize) -> bool {
        self.line(index).is_empty()
    }

    /// Index of the first non-blank line after `index`
    pub fn next_non_blank(&self, index: usize) -> Option<usize> {
        (index + 1..self.len()).find(|&i| !self.is_blank(i))
    }
}

/// Nodes produced by one rule and the cursor after the lines it consumed
#[derive(Debug)]
pub struct Claim {
    pub nodes: Vec<DocumentNode>,
    pub next: usize,
}

impl Claim {
    pub fn new(nodes: Vec<DocumentNode>, next: usize) -> Self {
        Self { nodes, next }
    }

    pub fn single(kind: NodeKind, line: usize) -> Self {
        Self::new(vec![DocumentNode::new(kind, LineSpan::single(line))], line + 1)
    }

    /// Consume `line` without producing a node
    pub fn skip(line: usize) -> Self {
        Self::new(Vec::new(), line + 1)
    }
}

pub type Rule = fn(&Scan, usize) -> Option<Claim>;

/// Top-level rules in precedence order
pub const RULES: &[(&str, Rule)] = &[
    ("blank", blank),
    ("separator", separator),
    ("watermark", watermark),
    ("national_header", preamble::national_header),
    ("title", title),
    ("number_line", number_line),
    ("can_cu", preamble::can_cu),
    ("party", preamble::party),
    ("whereas", preamble::whereas),
    ("article", article::article),
    ("subclause", subclause),
    ("clause", clause),
    ("list_item", list_item),
    ("table", table_block),
    ("signature", signature::signature),
    ("paragraph", paragraph),
];

/// Split `scan` into nodes, reporting per-rule events to `sink`
pub fn segment(scan: &Scan, sink: &mut dyn DiagnosticSink) -> Vec<DocumentNode> {
    let mut nodes = Vec::new();
    let mut cursor = 0;

    while cursor < scan.len() {
        let (name, claim) = RULES
            .iter()
            .find_map(|(name, rule)| rule(scan, cursor).map(|claim| (*name, claim)))
            .unwrap_or_else(|| ("paragraph", fallback(scan, cursor)));

        match name {
            "paragraph" => sink.emit(Diagnostic::FallbackParagraph {
                line: cursor,
                text: scan.line(cursor).to_string(),
            }),
            "article" => {
                if let Some(header) = claim.nodes.first() {
                    if let NodeKind::ArticleHeader { text } = &header.kind {
                        sink.emit(Diagnostic::ArticleParsed {
                            line: cursor,
                            header: text.clone(),
                            blocks: claim.nodes.len() - 1,
                        });
                    }
                }
            }
            _ => {}
        }

        // a rule that consumes nothing would stall the walk
        cursor = claim.next.max(cursor + 1);
        nodes.extend(claim.nodes);
    }

    if nodes.is_empty() && !scan.is_empty() {
        nodes.push(DocumentNode::new(
            NodeKind::Spacing,
            LineSpan::new(0, scan.len()),
        ));
    }

    nodes
}

fn blank(scan: &Scan, i: usize) -> Option<Claim> {
    if !scan.is_blank(i) {
        return None;
    }
    if i > 0 && !scan.is_blank(i - 1) {
        Some(Claim::single(NodeKind::Spacing, i))
    } else {
        Some(Claim::skip(i))
    }
}

fn separator(scan: &Scan, i: usize) -> Option<Claim> {
    patterns::is_separator(scan.line(i)).then(|| Claim::single(NodeKind::Spacing, i))
}

fn watermark(scan: &Scan, i: usize) -> Option<Claim> {
    let text = patterns::watermark_text(scan.line(i))?;
    Some(Claim::single(
        NodeKind::Watermark {
            text: text.to_string(),
        },
        i,
    ))
}

fn title(scan: &Scan, i: usize) -> Option<Claim> {
    let line = scan.line(i);
    if !patterns::is_title(line) {
        return None;
    }
    let text = patterns::strip_markup(line).replace("**", "").to_uppercase();
    Some(Claim::single(NodeKind::Title { text }, i))
}

fn number_line(scan: &Scan, i: usize) -> Option<Claim> {
    let number = patterns::contract_number(scan.line(i))?;
    Some(Claim::single(NodeKind::NumberLine { number }, i))
}

fn subclause(scan: &Scan, i: usize) -> Option<Claim> {
    let (number, text) = patterns::subclause(scan.line(i))?;
    Some(Claim::single(NodeKind::Subclause { number, text }, i))
}

fn clause(scan: &Scan, i: usize) -> Option<Claim> {
    let (number, text) = patterns::clause(scan.line(i))?;
    Some(Claim::single(NodeKind::Clause { number, text }, i))
}

fn list_item(scan: &Scan, i: usize) -> Option<Claim> {
    let text = patterns::list_item(scan.line(i))?;
    Some(Claim::single(
        NodeKind::ListItem {
            text: text.to_string(),
        },
        i,
    ))
}

/// Table block starting at `i`, shared with the article body
pub fn table_block(scan: &Scan, i: usize) -> Option<Claim> {
    if !patterns::is_table_row(scan.line(i)) {
        return None;
    }
    let end = table::block_end(scan.lines(), i);
    let table = table::parse_table(&scan.lines()[i..end])?;
    Some(Claim::new(
        vec![DocumentNode::new(NodeKind::Table(table), LineSpan::new(i, end))],
        end,
    ))
}

fn paragraph(scan: &Scan, i: usize) -> Option<Claim> {
    Some(fallback(scan, i))
}

fn fallback(scan: &Scan, i: usize) -> Claim {
    Claim::single(
        NodeKind::Paragraph {
            text: scan.line(i).to_string(),
        },
        i,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::node::Party;
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<NodeKind> {
        let scan = Scan::new(text, 15);
        segment(&scan, &mut NullSink)
            .into_iter()
            .map(|node| node.kind)
            .collect()
    }

    #[test]
    fn test_article_with_clause_item_and_spacing() {
        assert_eq!(
            kinds("Điều 1: Phạm vi\n1. Clause one\n- item one\n\nĐiều 2: Khác"),
            vec![
                NodeKind::ArticleHeader {
                    text: "Điều 1: Phạm vi".to_string()
                },
                NodeKind::Clause {
                    number: "1".to_string(),
                    text: "Clause one".to_string()
                },
                NodeKind::ListItem {
                    text: "item one".to_string()
                },
                NodeKind::Spacing,
                NodeKind::ArticleHeader {
                    text: "Điều 2: Khác".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_padded_table() {
        let nodes = kinds("| A | B | | |\n|---|---|---|---|\n| 1 | 2 | | |");
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            NodeKind::Table(table) => {
                assert_eq!(table.header, vec!["A", "B"]);
                assert_eq!(table.rows, vec![vec!["1".to_string(), "2".to_string()]]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_no_leading_spacing() {
        assert_eq!(
            kinds("\n\nĐoạn văn"),
            vec![NodeKind::Paragraph {
                text: "Đoạn văn".to_string()
            }]
        );
    }

    #[test]
    fn test_blank_run_yields_one_spacer() {
        let nodes = kinds("Một\n\n\n\nHai");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1], NodeKind::Spacing);
    }

    #[test]
    fn test_whitespace_only_input_yields_a_node() {
        assert_eq!(kinds("   \n\t\n"), vec![NodeKind::Spacing]);
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_separator_and_watermark() {
        assert_eq!(
            kinds("---\n*** BẢN NHÁP ***"),
            vec![
                NodeKind::Spacing,
                NodeKind::Watermark {
                    text: "BẢN NHÁP".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_title_and_number_line() {
        assert_eq!(
            kinds("# **Hợp đồng dịch vụ**\n**Số:** 2025/3/HĐDV-EON"),
            vec![
                NodeKind::Title {
                    text: "HỢP ĐỒNG DỊCH VỤ".to_string()
                },
                NodeKind::NumberLine {
                    number: "2025/3/HĐDV-EON".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_top_level_subclause_and_clause() {
        assert_eq!(
            kinds("1.2. Chi tiết\n3. Tổng quát"),
            vec![
                NodeKind::Subclause {
                    number: "1.2".to_string(),
                    text: "Chi tiết".to_string()
                },
                NodeKind::Clause {
                    number: "3".to_string(),
                    text: "Tổng quát".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_spans_are_ordered_and_cover_claimed_lines() {
        let text = "**BÊN A:** CÔNG TY X\nĐịa chỉ: Số 1\n\n**BÊN B:** CÔNG TY Y\nMST: 0123";
        let scan = Scan::new(text, 15);
        let nodes = segment(&scan, &mut NullSink);
        let parties: Vec<_> = nodes
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Party { party, .. } => Some((*party, node.span)),
                _ => None,
            })
            .collect();
        assert_eq!(
            parties,
            vec![
                (Party::A, LineSpan::new(0, 2)),
                (Party::B, LineSpan::new(3, 5))
            ]
        );
    }

    #[test]
    fn test_fallback_paragraph_is_reported() {
        let scan = Scan::new("Một đoạn văn", 15);
        let mut events: Vec<Diagnostic> = Vec::new();
        segment(&scan, &mut events);
        assert_eq!(
            events,
            vec![Diagnostic::FallbackParagraph {
                line: 0,
                text: "Một đoạn văn".to_string()
            }]
        );
    }

    #[test]
    fn test_article_is_reported_with_block_count() {
        let scan = Scan::new("Điều 1: A\n1. x\n2. y", 15);
        let mut events: Vec<Diagnostic> = Vec::new();
        segment(&scan, &mut events);
        assert_eq!(
            events,
            vec![Diagnostic::ArticleParsed {
                line: 0,
                header: "Điều 1: A".to_string(),
                blocks: 2
            }]
        );
    }
}
