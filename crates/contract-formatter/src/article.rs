//! Article rule: a `Điều N` header followed by its body

use crate::node::{DocumentNode, LineSpan, NodeKind};
use crate::patterns;
use crate::segmenter::{self, Claim, Scan};

pub fn article(scan: &Scan, i: usize) -> Option<Claim> {
    let line = scan.line(i);
    if !patterns::is_article_header(line) {
        return None;
    }

    let mut nodes = vec![DocumentNode::new(
        NodeKind::ArticleHeader {
            text: patterns::strip_markup(line),
        },
        LineSpan::single(i),
    )];
    let mut has_content = false;
    let mut j = i + 1;

    while j < scan.len() {
        let line = scan.line(j);

        if line.is_empty() {
            if has_content && !scan.is_blank(j - 1) {
                nodes.push(DocumentNode::spacing(j));
            }
            j += 1;
            continue;
        }

        if ends_body(scan, j) {
            break;
        }

        if patterns::is_table_row(line) {
            if let Some(claim) = segmenter::table_block(scan, j) {
                nodes.extend(claim.nodes);
                has_content = true;
                j = claim.next;
                continue;
            }
        }

        nodes.push(DocumentNode::new(body_kind(line), LineSpan::single(j)));
        has_content = true;
        j += 1;
    }

    Some(Claim::new(nodes, j))
}

fn body_kind(line: &str) -> NodeKind {
    if let Some((number, text)) = patterns::subclause(line) {
        NodeKind::Subclause { number, text }
    } else if let Some((number, text)) = patterns::clause(line) {
        NodeKind::Clause { number, text }
    } else if let Some(text) = patterns::list_item(line) {
        NodeKind::ListItem {
            text: text.to_string(),
        }
    } else {
        NodeKind::Paragraph {
            text: line.to_string(),
        }
    }
}

/// Lines that hand control back to the top-level rules
fn ends_body(scan: &Scan, j: usize) -> bool {
    let line = scan.line(j);
    patterns::is_article_header(line)
        || patterns::is_separator(line)
        || patterns::watermark_text(line).is_some()
        || (patterns::is_signature_marker(line) && opens_signature(scan, j))
}

/// A marker inside a body starts the signature block when it names both
/// parties, or when what follows it can only be signature material.
fn opens_signature(scan: &Scan, j: usize) -> bool {
    let (a, b) = patterns::named_parties(scan.line(j));
    if a && b {
        return true;
    }
    match scan.next_non_blank(j) {
        Some(next) => patterns::is_signature_tail(scan.line(next)),
        None => true,
    }
}
