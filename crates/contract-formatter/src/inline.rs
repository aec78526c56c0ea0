//! Inline text rendering: escaping and `**bold**` / `*italic*` emphasis

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref STRONG: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref EM: Regex = Regex::new(r"\*(.+?)\*").unwrap();
}

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text`, then turn emphasis markers into `<strong>` / `<em>`.
///
/// Escaping runs first so that markup inside the source text never
/// survives as live HTML.
pub fn format_inline(text: &str) -> String {
    let escaped = escape_html(text);
    let strong = STRONG.replace_all(&escaped, "<strong>${1}</strong>");
    EM.replace_all(&strong, "<em>${1}</em>").into_owned()
}
