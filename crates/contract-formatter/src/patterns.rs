//! Line classification patterns for the contract dialect
//!
//! Every predicate takes an already-trimmed line.

use crate::node::Party;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `---`, `===`, `___` or `***` rules
    static ref SEPARATOR: Regex = Regex::new(r"^(?:-{3,}|={3,}|_{3,}|\*{3,})$").unwrap();

    /// `*** text ***`
    static ref WATERMARK: Regex = Regex::new(r"^\*\*\* (.+?) \*\*\*$").unwrap();

    static ref NATIONAL_HEADER: Regex =
        Regex::new(r"(?i)^\*{0,2}CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM").unwrap();

    static ref MOTTO: Regex = Regex::new(r"(?i)^\*{0,2}Độc lập.*Tự do.*Hạnh phúc").unwrap();

    /// Heading form accepts any case; the bare form must be upper-case so
    /// that sentences opening with "Hợp đồng này ..." stay paragraphs
    static ref TITLE_HEADING: Regex = Regex::new(r"(?i)^#+\s*(?:\*\*)?HỢP ĐỒNG").unwrap();
    static ref TITLE_PLAIN: Regex = Regex::new(r"^(?:\*\*)?HỢP ĐỒNG").unwrap();

    /// `Số: 12/2025`, `**Số: 12/2025**`, `**Số:** 12/2025`
    static ref NUMBER_LINE: Regex =
        Regex::new(r"(?i)^(?:\*\*)?Số\s*:\s*(?:\*\*)?\s*(.+?)\s*(?:\*\*)?$").unwrap();

    static ref CAN_CU: Regex = Regex::new(r"(?i)^\*{0,2}Căn cứ").unwrap();

    static ref PARTY_A: Regex = Regex::new(r"(?i)^(?:#+\s*)?(?:\*\*)?BÊN A(?:\*\*)?\s*[:(]").unwrap();
    static ref PARTY_B: Regex = Regex::new(r"(?i)^(?:#+\s*)?(?:\*\*)?BÊN B(?:\*\*)?\s*[:(]").unwrap();

    static ref WHEREAS: Regex = Regex::new(r"(?i)^(?:\*\*)?Xét rằng").unwrap();

    /// `Điều N` as heading, bold, all-caps or plain; also numberless `### ĐIỀU ...` headings
    static ref ARTICLE: Regex =
        Regex::new(r"(?i)^(?:(?:#+\s*)?(?:\*\*)?Điều\s+\d+|#+\s*(?:\*\*)?Điều)").unwrap();

    static ref SUBCLAUSE_BOLD: Regex = Regex::new(r"^\*\*(\d+(?:\.\d+)+)\.\s+(.+?)\*\*$").unwrap();
    static ref SUBCLAUSE: Regex = Regex::new(r"^(\d+(?:\.\d+)+)\.\s+(.+)$").unwrap();
    static ref CLAUSE: Regex = Regex::new(r"^(\d+)\.\s+(.+)$").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"^[-*]\s+(.+)$").unwrap();

    static ref TABLE_SEPARATOR_ROW: Regex = Regex::new(r"^[|\s\-:]+$").unwrap();

    /// Upper-case `ĐẠI DIỆN BÊN ...` markers, or a mixed-case
    /// `Đại diện Bên A` standing alone on its line
    static ref SIGNATURE_MARKER: Regex = Regex::new(
        r"^(?:\*\*)?(?:ĐẠI DIỆN(?:\s+(?:BÊN|CÁC BÊN|HAI BÊN)|\s*(?:\*\*)?\s*$)|(?i:đại diện\s+bên\s+[ab])(?:\s*\([^)]*\))?[\s:*]*$)"
    )
    .unwrap();

    static ref SIGNATURE_NOTE: Regex = Regex::new(r"Ký tên|đóng dấu|Đã ký|^\(").unwrap();

    static ref SURNAME: Regex = Regex::new(
        r"^(?:Nguyễn|Trần|Lê|Phạm|Hoàng|Huỳnh|Phan|Vũ|Võ|Đặng|NGUYỄN|TRẦN|LÊ|PHẠM|HOÀNG|HUỲNH|PHAN|VŨ|VÕ|ĐẶNG)\b"
    )
    .unwrap();

    /// A line of capitals only, e.g. a position title under a signature marker
    static ref UPPERCASE_LINE: Regex = Regex::new(r"^\p{Lu}[\p{Lu}\s.,:()\-]+$").unwrap();

    static ref BOLD_CAPITAL_START: Regex = Regex::new(r"^\*\*\p{Lu}").unwrap();

    static ref COLUMN_GAP: Regex = Regex::new(r"\s{3,}").unwrap();

    static ref PARTY_B_MENTION: Regex = Regex::new(r"(?i)(?:đại diện\s+)?bên\s+b\b").unwrap();

    static ref HEADING_PREFIX: Regex = Regex::new(r"^#+\s*").unwrap();
}

pub fn is_separator(line: &str) -> bool {
    SEPARATOR.is_match(line)
}

pub fn watermark_text(line: &str) -> Option<&str> {
    WATERMARK
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

pub fn is_national_header(line: &str) -> bool {
    NATIONAL_HEADER.is_match(line)
}

pub fn is_motto(line: &str) -> bool {
    MOTTO.is_match(line)
}

pub fn is_title(line: &str) -> bool {
    TITLE_HEADING.is_match(line) || TITLE_PLAIN.is_match(line)
}

/// Contract number from a `Số:` line, markup stripped
pub fn contract_number(line: &str) -> Option<String> {
    let caps = NUMBER_LINE.captures(line)?;
    let number = caps.get(1)?.as_str().trim_matches(|c: char| c == '*' || c.is_whitespace());
    (!number.is_empty()).then(|| number.to_string())
}

pub fn is_can_cu(line: &str) -> bool {
    CAN_CU.is_match(line)
}

pub fn party_header(line: &str) -> Option<Party> {
    if PARTY_A.is_match(line) {
        Some(Party::A)
    } else if PARTY_B.is_match(line) {
        Some(Party::B)
    } else {
        None
    }
}

pub fn is_whereas(line: &str) -> bool {
    WHEREAS.is_match(line)
}

pub fn is_article_header(line: &str) -> bool {
    ARTICLE.is_match(line)
}

/// `(number, text)` of an `N.M.` line, checked before [`clause`]
pub fn subclause(line: &str) -> Option<(String, String)> {
    let caps = SUBCLAUSE_BOLD
        .captures(line)
        .or_else(|| SUBCLAUSE.captures(line))?;
    Some((caps[1].to_string(), caps[2].trim().to_string()))
}

pub fn clause(line: &str) -> Option<(String, String)> {
    let caps = CLAUSE.captures(line)?;
    Some((caps[1].to_string(), caps[2].trim().to_string()))
}

pub fn list_item(line: &str) -> Option<&str> {
    LIST_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// A line that opens a pipe table: at least two pipes
pub fn is_table_row(line: &str) -> bool {
    line.contains('|') && line.split('|').count() >= 3
}

pub fn is_table_separator_row(line: &str) -> bool {
    TABLE_SEPARATOR_ROW.is_match(line)
}

pub fn is_signature_marker(line: &str) -> bool {
    SIGNATURE_MARKER.is_match(line)
}

/// Lines that can only follow a signature marker: signing notes,
/// parenthesized instructions, signatory names and capitalized titles
pub fn is_signature_tail(line: &str) -> bool {
    SIGNATURE_NOTE.is_match(line) || SURNAME.is_match(line) || UPPERCASE_LINE.is_match(line)
}

/// Signature lines that continue a block after a blank line
pub fn continues_signature(line: &str) -> bool {
    BOLD_CAPITAL_START.is_match(line)
        || line.contains("**")
        || (UPPERCASE_LINE.is_match(line) && split_columns(line).len() >= 2)
}

/// Any line that opens a new top-level section
pub fn is_section_boundary(line: &str) -> bool {
    party_header(line).is_some()
        || is_whereas(line)
        || is_article_header(line)
        || is_signature_marker(line)
}

/// Split a two-column line on runs of three or more spaces
pub fn split_columns(line: &str) -> Vec<&str> {
    COLUMN_GAP
        .split(line)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Split a single-spaced two-party line before its last `Bên B` mention
pub fn split_at_party_b(line: &str) -> Option<(&str, &str)> {
    let mention = PARTY_B_MENTION.find_iter(line).last()?;
    let (left, right) = line.split_at(mention.start());
    let left = left.trim();
    (!left.is_empty()).then(|| (left, right.trim()))
}

/// Which of `BÊN A` / `BÊN B` a line names, in any case
pub fn named_parties(line: &str) -> (bool, bool) {
    let upper = line.replace("**", "").to_uppercase();
    (upper.contains("BÊN A"), upper.contains("BÊN B"))
}

/// Drop a leading `#` heading marker and `**` wrapping the whole line.
///
/// Bold that covers only part of the line is left for inline emphasis.
pub fn strip_markup(line: &str) -> String {
    let text = HEADING_PREFIX.replace(line, "");
    let text = text.trim();
    if let Some(inner) = text
        .strip_prefix("**")
        .and_then(|rest| rest.strip_suffix("**"))
    {
        if !inner.contains("**") {
            return inner.trim().to_string();
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_forms() {
        for line in [
            "Điều 1: Phạm vi",
            "### Điều 2. Phí dịch vụ",
            "**Điều 3: Phạt vi phạm**",
            "ĐIỀU 4: THỜI HẠN",
            "## ĐIỀU KHOẢN CHUNG",
        ] {
            assert!(is_article_header(line), "{line}");
        }
        assert!(!is_article_header("Điều kiện thanh toán như sau"));
    }

    #[test]
    fn test_party_headers() {
        assert_eq!(party_header("**BÊN A (Bên cung cấp):**"), Some(Party::A));
        assert_eq!(party_header("### Bên B: CÔNG TY X"), Some(Party::B));
        assert_eq!(party_header("**Bên A**: CÔNG TY Y"), Some(Party::A));
        assert_eq!(party_header("Bên A có nghĩa vụ thanh toán"), None);
    }

    #[test]
    fn test_title_requires_caps_without_heading() {
        assert!(is_title("HỢP ĐỒNG DỊCH VỤ"));
        assert!(is_title("# Hợp đồng dịch vụ"));
        assert!(is_title("**HỢP ĐỒNG CUNG CẤP DỊCH VỤ**"));
        assert!(!is_title("Hợp đồng này được lập thành 02 bản"));
    }

    #[test]
    fn test_contract_number_forms() {
        assert_eq!(contract_number("Số: 2025/3/HĐDV-EON").as_deref(), Some("2025/3/HĐDV-EON"));
        assert_eq!(contract_number("**Số: 12/HĐ**").as_deref(), Some("12/HĐ"));
        assert_eq!(contract_number("**Số:** 12/HĐ").as_deref(), Some("12/HĐ"));
        assert_eq!(contract_number("**Số:**"), None);
        assert_eq!(contract_number("Số tiền: 5.000.000"), None);
    }

    #[test]
    fn test_subclause_before_clause() {
        assert_eq!(
            subclause("1.2. Something"),
            Some(("1.2".to_string(), "Something".to_string()))
        );
        assert_eq!(clause("1.2. Something"), None);
        assert_eq!(
            subclause("**2.1. Quyền của Bên A**"),
            Some(("2.1".to_string(), "Quyền của Bên A".to_string()))
        );
        assert_eq!(subclause("1.500.000 đồng"), None);
    }

    #[test]
    fn test_signature_markers() {
        assert!(is_signature_marker("**ĐẠI DIỆN BÊN A**"));
        assert!(is_signature_marker(
            "ĐẠI DIỆN BÊN A                    ĐẠI DIỆN BÊN B"
        ));
        assert!(is_signature_marker("Đại diện Bên B"));
        assert!(is_signature_marker("Đại diện Bên A (Ký, ghi rõ họ tên):"));
        assert!(!is_signature_marker("Đại diện: Ông NGUYỄN VĂN AN"));
        assert!(!is_signature_marker("Đại diện Bên A có trách nhiệm ký nhận"));
    }

    #[test]
    fn test_signature_tail() {
        assert!(is_signature_tail("(Ký, ghi rõ họ tên)"));
        assert!(is_signature_tail("NGUYỄN VĂN AN"));
        assert!(is_signature_tail("GIÁM ĐỐC"));
        assert!(is_signature_tail("Đã ký"));
        assert!(!is_signature_tail("Các bên cam kết thực hiện đúng hợp đồng."));
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("### **Điều 1: Phạm vi**"), "Điều 1: Phạm vi");
        assert_eq!(strip_markup("**Điều 1:** Phạm vi"), "**Điều 1:** Phạm vi");
    }

    #[test]
    fn test_split_at_party_b() {
        assert_eq!(
            split_at_party_b("ĐẠI DIỆN BÊN A ĐẠI DIỆN BÊN B"),
            Some(("ĐẠI DIỆN BÊN A", "ĐẠI DIỆN BÊN B"))
        );
        assert_eq!(split_at_party_b("ĐẠI DIỆN BÊN B"), None);
        assert_eq!(split_at_party_b("ĐẠI DIỆN BÊN A"), None);
    }

    #[test]
    fn test_named_parties() {
        assert_eq!(named_parties("**Đại diện Bên B**"), (false, true));
        assert_eq!(named_parties("ĐẠI DIỆN BÊN A     ĐẠI DIỆN BÊN B"), (true, true));
        assert_eq!(named_parties("ĐẠI DIỆN"), (false, false));
    }

    #[test]
    fn test_split_columns() {
        assert_eq!(
            split_columns("GIÁM ĐỐC      TỔNG GIÁM ĐỐC"),
            vec!["GIÁM ĐỐC", "TỔNG GIÁM ĐỐC"]
        );
        assert_eq!(split_columns("NGUYỄN VĂN AN"), vec!["NGUYỄN VĂN AN"]);
    }
}
