//! Block rules for everything before the first article: national header,
//! legal bases, parties and whereas clauses

use crate::node::{DocumentNode, LineSpan, NodeKind};
use crate::patterns;
use crate::segmenter::{Claim, Scan};

/// Lines the national header may span, blanks included
const NATIONAL_HEADER_LOOKAHEAD: usize = 5;

/// Collect non-blank lines after `start` until `stop` matches.
///
/// Blank lines are absorbed only when more block content follows them;
/// trailing blanks are left for the caller.
fn collect_until(
    scan: &Scan,
    start: usize,
    limit: usize,
    stop: impl Fn(&str) -> bool,
) -> (Vec<String>, usize) {
    let mut lines = Vec::new();
    let mut end = start + 1;
    for j in start + 1..limit.min(scan.len()) {
        let line = scan.line(j);
        if line.is_empty() {
            continue;
        }
        if stop(line) {
            break;
        }
        lines.push(line.to_string());
        end = j + 1;
    }
    (lines, end)
}

fn block(kind: NodeKind, start: usize, end: usize) -> Claim {
    Claim::new(vec![DocumentNode::new(kind, LineSpan::new(start, end))], end)
}

pub fn national_header(scan: &Scan, i: usize) -> Option<Claim> {
    let line = scan.line(i);
    if !patterns::is_national_header(line) {
        return None;
    }

    let mut lines = vec![patterns::strip_markup(line)];
    let mut end = i + 1;
    let limit = (i + 1 + NATIONAL_HEADER_LOOKAHEAD).min(scan.len());
    for j in i + 1..limit {
        let line = scan.line(j);
        // rules under the motto belong to the header
        if line.is_empty() || patterns::is_separator(line) {
            continue;
        }
        if patterns::is_title(line)
            || patterns::is_section_boundary(line)
            || patterns::contract_number(line).is_some()
            || patterns::is_can_cu(line)
        {
            break;
        }
        lines.push(patterns::strip_markup(line));
        end = j + 1;
        if patterns::is_motto(line) {
            break;
        }
    }

    Some(block(NodeKind::NationalHeader { lines }, i, end))
}

pub fn can_cu(scan: &Scan, i: usize) -> Option<Claim> {
    let line = scan.line(i);
    if !patterns::is_can_cu(line) {
        return None;
    }
    let (rest, end) = collect_until(scan, i, scan.len(), |l| {
        patterns::is_section_boundary(l)
            || patterns::is_separator(l)
            || patterns::watermark_text(l).is_some()
            || patterns::is_title(l)
            || patterns::is_national_header(l)
    });
    let mut lines = vec![line.to_string()];
    lines.extend(rest);
    Some(block(NodeKind::CanCu { lines }, i, end))
}

pub fn party(scan: &Scan, i: usize) -> Option<Claim> {
    let line = scan.line(i);
    let party = patterns::party_header(line)?;
    let (rest, end) = collect_until(scan, i, scan.len(), |l| {
        patterns::is_section_boundary(l)
            || patterns::is_separator(l)
            || patterns::watermark_text(l).is_some()
    });
    let mut lines = vec![patterns::strip_markup(line)];
    lines.extend(rest);
    Some(block(NodeKind::Party { party, lines }, i, end))
}

pub fn whereas(scan: &Scan, i: usize) -> Option<Claim> {
    let line = scan.line(i);
    if !patterns::is_whereas(line) {
        return None;
    }
    let (rest, end) = collect_until(scan, i, scan.len(), |l| {
        patterns::is_article_header(l)
            || patterns::is_signature_marker(l)
            || patterns::is_separator(l)
    });
    let mut text = line.to_string();
    for part in rest {
        text.push(' ');
        text.push_str(&part);
    }
    Some(block(NodeKind::Whereas { text }, i, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Party;
    use pretty_assertions::assert_eq;

    fn claim(rule: fn(&Scan, usize) -> Option<Claim>, text: &str) -> Claim {
        rule(&Scan::new(text, 15), 0).unwrap()
    }

    #[test]
    fn test_national_header_stops_after_motto() {
        let claim = claim(
            national_header,
            "**CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM**\n**Độc lập - Tự do - Hạnh phúc**\n---\n\nHỢP ĐỒNG DỊCH VỤ",
        );
        assert_eq!(claim.next, 2);
        assert_eq!(
            claim.nodes[0].kind,
            NodeKind::NationalHeader {
                lines: vec![
                    "CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM".to_string(),
                    "Độc lập - Tự do - Hạnh phúc".to_string()
                ]
            }
        );
    }

    #[test]
    fn test_national_header_absorbs_inner_separator() {
        let claim = claim(
            national_header,
            "CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM\n---\nĐộc lập – Tự do – Hạnh phúc",
        );
        assert_eq!(claim.next, 3);
        assert_eq!(claim.nodes[0].span, LineSpan::new(0, 3));
    }

    #[test]
    fn test_national_header_stops_at_title() {
        let claim = claim(
            national_header,
            "CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM\nHỢP ĐỒNG DỊCH VỤ",
        );
        assert_eq!(claim.next, 1);
    }

    #[test]
    fn test_can_cu_spans_blank_separated_references() {
        let claim = claim(
            can_cu,
            "*Căn cứ Bộ luật Dân sự 2015;*\n\n*Căn cứ Luật Thương mại 2005;*\n\n**BÊN A:** X",
        );
        assert_eq!(claim.next, 3);
        match &claim.nodes[0].kind {
            NodeKind::CanCu { lines } => assert_eq!(lines.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_party_block_stops_at_opposing_party() {
        let claim = claim(
            party,
            "### BÊN A (Bên cung cấp):\nCÔNG TY X\nMã số thuế: 0123456789\n### BÊN B (Bên sử dụng):",
        );
        assert_eq!(claim.next, 3);
        assert_eq!(
            claim.nodes[0].kind,
            NodeKind::Party {
                party: Party::A,
                lines: vec![
                    "BÊN A (Bên cung cấp):".to_string(),
                    "CÔNG TY X".to_string(),
                    "Mã số thuế: 0123456789".to_string()
                ]
            }
        );
    }

    #[test]
    fn test_whereas_joins_lines() {
        let claim = claim(whereas, "Xét rằng Bên A có năng lực\nvà Bên B có nhu cầu\n\nĐiều 1: X");
        assert_eq!(
            claim.nodes[0].kind,
            NodeKind::Whereas {
                text: "Xét rằng Bên A có năng lực và Bên B có nhu cầu".to_string()
            }
        );
        assert_eq!(claim.next, 2);
    }
}
