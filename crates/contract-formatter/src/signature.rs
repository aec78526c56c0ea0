//! Signature blocks
//!
//! A block opens on a `ĐẠI DIỆN ...` marker and collects lines within the
//! configured lookahead window. Two layouts occur in practice:
//!
//! - one marker naming both parties, every following line holding the A
//!   and B text side by side separated by a wide gap
//! - an A block followed by a B block, one party per line group
//!
//! Both end up as one [`NodeKind::Signature`] with a column per party.

use crate::node::{DocumentNode, LineSpan, NodeKind, Party, SignatureColumn};
use crate::patterns;
use crate::segmenter::{Claim, Scan};

pub fn signature(scan: &Scan, i: usize) -> Option<Claim> {
    if !patterns::is_signature_marker(scan.line(i)) {
        return None;
    }

    let (lines, end) = collect(scan, i);
    let (a, b) = patterns::named_parties(lines[0]);
    let columns = if a && b {
        side_by_side(&lines)
    } else {
        stacked(&lines, b && !a)
    };

    Some(Claim::new(
        vec![DocumentNode::new(
            NodeKind::Signature { columns },
            LineSpan::new(i, end),
        )],
        end,
    ))
}

/// Non-blank lines of the block and the index one past the last of them
fn collect<'a>(scan: &Scan<'a>, start: usize) -> (Vec<&'a str>, usize) {
    let limit = (start + scan.signature_lookahead.max(1)).min(scan.len());
    let mut lines = vec![scan.line(start)];
    let mut end = start + 1;
    let mut j = start + 1;

    while j < limit {
        let line = scan.line(j);
        if line.is_empty() {
            let more = scan
                .next_non_blank(j)
                .filter(|&next| next < limit)
                .is_some_and(|next| continues_block(scan.line(next)));
            if !more && lines.len() >= 3 {
                break;
            }
            j += 1;
            continue;
        }
        if is_boundary(line) {
            break;
        }
        lines.push(line);
        j += 1;
        end = j;
    }

    (lines, end)
}

fn continues_block(line: &str) -> bool {
    patterns::continues_signature(line)
        || patterns::is_signature_tail(line)
        || patterns::is_signature_marker(line)
}

fn is_boundary(line: &str) -> bool {
    patterns::is_article_header(line)
        || patterns::party_header(line).is_some()
        || patterns::watermark_text(line).is_some()
        || patterns::is_separator(line)
        || patterns::is_national_header(line)
        || patterns::is_title(line)
}

/// Columns separated by a wide gap on every line
fn side_by_side(lines: &[&str]) -> Vec<SignatureColumn> {
    let mut a = Vec::new();
    let mut b = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let mut parts = patterns::split_columns(line);
        if index == 0 && parts.len() < 2 {
            if let Some((left, right)) = patterns::split_at_party_b(line) {
                parts = vec![left, right];
            }
        }
        match parts.as_slice() {
            [] => {}
            [only] => a.push(balance_bold(only)),
            [left, rest @ ..] => {
                a.push(balance_bold(left));
                b.push(balance_bold(&rest.join(" ")));
            }
        }
    }

    vec![
        SignatureColumn {
            party: Party::A,
            lines: a,
        },
        SignatureColumn {
            party: Party::B,
            lines: b,
        },
    ]
}

/// One group of lines per party, split at the first later marker naming B
fn stacked(lines: &[&str], starts_with_b: bool) -> Vec<SignatureColumn> {
    let (first_party, second_party) = if starts_with_b {
        (Party::B, Party::A)
    } else {
        (Party::A, Party::B)
    };
    let own = |line: &str| line.to_string();

    let split = (!starts_with_b)
        .then(|| {
            lines.iter().skip(1).position(|line| {
                patterns::is_signature_marker(line) && patterns::named_parties(line).1
            })
        })
        .flatten()
        .map(|offset| offset + 1);

    match split {
        Some(at) => vec![
            SignatureColumn {
                party: first_party,
                lines: lines[..at].iter().copied().map(own).collect(),
            },
            SignatureColumn {
                party: second_party,
                lines: lines[at..].iter().copied().map(own).collect(),
            },
        ],
        None => vec![SignatureColumn {
            party: first_party,
            lines: lines.iter().copied().map(own).collect(),
        }],
    }
}

/// Drop `**` markers left unpaired by a column split
fn balance_bold(text: &str) -> String {
    if text.matches("**").count() % 2 == 1 {
        text.replace("**", "").trim().to_string()
    } else {
        text.to_string()
    }
}
