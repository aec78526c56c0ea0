//! HTML layout renderer
//!
//! Each node becomes one `<div>` with a `contract-*` class inside a single
//! `contract-document` root. The class names are shared with
//! [`crate::style::CONTRACT_STYLESHEET`] and with downstream PDF tooling.

use crate::inline::{escape_html, format_inline};
use crate::node::{DocumentNode, NodeKind, Party, SignatureColumn, Table};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BR: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
}

pub fn render(nodes: &[DocumentNode]) -> String {
    let mut html = String::from(r#"<div class="contract-document">"#);
    for node in nodes {
        render_node(&mut html, &node.kind);
    }
    html.push_str("</div>");
    html
}

fn render_node(out: &mut String, kind: &NodeKind) {
    match kind {
        NodeKind::NationalHeader { lines } => {
            div(out, "contract-national-header", &join_lines(lines));
        }
        NodeKind::Title { text } => div(out, "contract-title-main", &format_inline(text)),
        NodeKind::NumberLine { number } => {
            div(out, "contract-number-line", &format!("Số: {}", format_inline(number)));
        }
        NodeKind::CanCu { lines } => div(out, "contract-can-cu", &join_lines(lines)),
        NodeKind::Party { party, lines } => {
            let class = match party {
                Party::A => "contract-party-a",
                Party::B => "contract-party-b",
            };
            div(out, class, &join_lines(lines));
        }
        NodeKind::Whereas { text } => div(out, "contract-whereas", &format_inline(text)),
        NodeKind::ArticleHeader { text } => {
            div(out, "contract-article-header", &format_inline(text));
        }
        NodeKind::Clause { number, text } => {
            div(out, "contract-clause", &numbered(number, text));
        }
        NodeKind::Subclause { number, text } => {
            div(out, "contract-subclause", &numbered(number, text));
        }
        NodeKind::ListItem { text } => div(out, "contract-item", &format_inline(text)),
        NodeKind::Table(table) => render_table(out, table),
        NodeKind::Signature { columns } => render_signature(out, columns),
        NodeKind::Watermark { text } => div(out, "contract-watermark", &escape_html(text)),
        NodeKind::Spacing => div(out, "contract-spacing", ""),
        NodeKind::Paragraph { text } => div(out, "contract-paragraph", &format_inline(text)),
    }
}

fn div(out: &mut String, class: &str, inner: &str) {
    out.push_str(&format!(r#"<div class="{class}">{inner}</div>"#));
}

fn numbered(number: &str, text: &str) -> String {
    format!("{}. {}", escape_html(number), format_inline(text))
}

fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format_inline(line))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Cell text keeps `<br>` tags as line breaks; everything else is escaped
fn cell(text: &str) -> String {
    BR.split(text).map(format_inline).collect::<Vec<_>>().join("<br>")
}

fn render_table(out: &mut String, table: &Table) {
    out.push_str(r#"<div class="contract-table">"#);
    let rows = std::iter::once((&table.header, "contract-table-header"))
        .chain(table.rows.iter().map(|row| (row, "contract-table-cell")));
    for (row, class) in rows {
        out.push_str(r#"<div class="contract-table-row">"#);
        for text in row {
            div(out, class, &cell(text));
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
}

fn render_signature(out: &mut String, columns: &[SignatureColumn]) {
    out.push_str(r#"<div class="contract-signature-container">"#);
    for column in columns {
        let class = match column.party {
            Party::A => "contract-signature-a",
            Party::B => "contract-signature-b",
        };
        div(out, class, &join_lines(&column.lines));
    }
    out.push_str("</div>");
}
