//! Print stylesheet for rendered contracts

use crate::inline::escape_html;

/// A4 layout for every `contract-*` class emitted by the renderer
pub const CONTRACT_STYLESHEET: &str = r#"@page {
  size: A4;
  margin: 20mm;
}

body {
  font-family: "Times New Roman", Times, serif;
  font-size: 13pt;
  line-height: 1.6;
  color: #000;
}

.contract-document {
  max-width: 210mm;
  margin: 0 auto;
}

.contract-national-header {
  text-align: center;
  font-weight: bold;
  font-size: 13pt;
  margin-bottom: 16px;
}

.contract-title-main {
  text-align: center;
  font-weight: bold;
  font-size: 16pt;
  text-transform: uppercase;
  letter-spacing: 1px;
  margin: 16px 0 8px;
}

.contract-number-line {
  text-align: center;
  font-weight: bold;
  font-size: 12pt;
  margin-bottom: 16px;
}

.contract-can-cu {
  font-style: italic;
  margin: 4px 0;
}

.contract-party-a,
.contract-party-b {
  margin: 12px 0 8px;
}

.contract-party-a {
  margin-top: 12px;
}

.contract-whereas {
  font-style: italic;
  text-align: justify;
  margin: 8px 0;
}

.contract-article-header {
  font-weight: bold;
  font-size: 13pt;
  text-transform: uppercase;
  letter-spacing: 0.5px;
  margin: 16px 0 8px;
  page-break-after: avoid;
  page-break-inside: avoid;
}

.contract-clause {
  margin-left: 24px;
  text-align: justify;
  margin-bottom: 4px;
}

.contract-subclause {
  margin-left: 32px;
  font-weight: bold;
  margin-bottom: 4px;
}

.contract-item {
  margin-left: 36px;
  text-indent: -18px;
  margin-bottom: 2px;
}

.contract-item::before {
  content: "- ";
}

.contract-paragraph {
  text-align: justify;
  line-height: 1.8;
  margin-bottom: 6px;
}

.contract-spacing {
  height: 1px;
  margin: 6px 0;
}

.contract-table {
  border: 1px solid #333;
  margin: 12px 0;
  page-break-inside: avoid;
}

.contract-table-row {
  display: flex;
  border-bottom: 1px solid #333;
  page-break-inside: avoid;
}

.contract-table-row:last-child {
  border-bottom: none;
}

.contract-table-header {
  flex: 1;
  font-weight: bold;
  background: #f0f0f0;
  text-align: center;
  padding: 6px;
  border-right: 1px solid #333;
}

.contract-table-cell {
  flex: 1;
  padding: 6px;
  border-right: 1px solid #333;
}

.contract-table-header:last-child,
.contract-table-cell:last-child {
  border-right: none;
}

.contract-signature-container {
  display: flex;
  justify-content: space-between;
  margin-top: 60px;
  page-break-inside: avoid;
}

.contract-signature-a,
.contract-signature-b {
  flex: 0 0 48%;
  font-weight: bold;
}

.contract-signature-a {
  text-align: left;
}

.contract-signature-b {
  text-align: right;
}

.contract-watermark {
  text-align: center;
  font-style: italic;
  color: #666;
  font-size: 10pt;
  margin: 8px 0;
}
"#;

/// Wrap a rendered fragment into a standalone printable document
pub fn render_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"vi\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        CONTRACT_STYLESHEET,
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_covers_renderer_classes() {
        for class in [
            "contract-article-header",
            "contract-table-row",
            "contract-table-header",
            "contract-table-cell",
            "contract-signature-container",
            "contract-signature-a",
            "contract-signature-b",
            "contract-paragraph",
            "contract-clause",
            "contract-subclause",
            "contract-item",
            "contract-party-a",
            "contract-party-b",
            "contract-whereas",
            "contract-watermark",
            "contract-national-header",
            "contract-title-main",
            "contract-number-line",
            "contract-can-cu",
            "contract-spacing",
        ] {
            assert!(
                CONTRACT_STYLESHEET.contains(&format!(".{class}")),
                "missing {class}"
            );
        }
    }

    #[test]
    fn test_page_escapes_title() {
        let page = render_page("A & B", "<div></div>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains("size: A4;"));
        assert!(page.contains("<body>\n<div></div>\n</body>"));
    }
}
