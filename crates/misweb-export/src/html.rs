//! Print-document assembly
//!
//! Builds a complete standalone HTML document around a pre-rendered report
//! table. Page size and orientation are declared with `@page` rules; the
//! document prints itself from a window `load` listener so the dialog never
//! opens before layout settles.

/// Escape text for interpolation into HTML
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Printed page size and orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    A4Portrait,
    A4Landscape,
    A3Landscape,
}

impl PageLayout {
    /// `@page` rule for the embedded stylesheet
    pub fn page_rule(&self) -> &'static str {
        match self {
            PageLayout::A4Portrait => "@page { size: A4 portrait; margin: 12mm; }",
            PageLayout::A4Landscape => "@page { size: A4 landscape; margin: 10mm; }",
            PageLayout::A3Landscape => "@page { size: A3 landscape; margin: 10mm; }",
        }
    }
}

const BASE_CSS: &str = r#"
body { font-family: 'Segoe UI', Arial, sans-serif; font-size: 11px; color: #111; margin: 0; }
.doc-header { text-align: center; margin-bottom: 12px; }
.doc-header h1 { font-size: 16px; margin: 0 0 4px 0; }
.doc-header p { margin: 2px 0; font-size: 12px; }
table.report { border-collapse: collapse; width: 100%; }
table.report th, table.report td { border: 1px solid #444; padding: 3px 6px; }
table.report th { background: #eee; text-align: center; }
table.report td.num { text-align: right; white-space: nowrap; }
table.report tr.subtotal td { font-weight: bold; background: #f5f5f5; }
table.report tr.grand-total td { font-weight: bold; background: #e8e8e8; }
table.report td.group-head { font-weight: bold; vertical-align: top; }
.doc-footer { margin-top: 28px; display: flex; justify-content: space-between; font-size: 11px; }
.doc-footer .sig { width: 30%; border-top: 1px solid #444; text-align: center; padding-top: 4px; }
"#;

/// A print-ready report document
#[derive(Debug)]
pub struct PrintDocument {
    title: String,
    layout: PageLayout,
    sub_headings: Vec<String>,
    table_html: String,
    signatures: Vec<String>,
}

impl PrintDocument {
    pub fn new(title: impl Into<String>, layout: PageLayout) -> Self {
        Self {
            title: title.into(),
            layout,
            sub_headings: Vec::new(),
            table_html: String::new(),
            signatures: Vec::new(),
        }
    }

    /// Add a centred sub-heading line (entity name, period label)
    pub fn sub_heading(mut self, text: impl Into<String>) -> Self {
        self.sub_headings.push(text.into());
        self
    }

    /// Set the report table markup; the caller has already escaped all
    /// interpolated values.
    pub fn table(mut self, table_html: impl Into<String>) -> Self {
        self.table_html = table_html.into();
        self
    }

    /// Add a signature line to the footer
    pub fn signature(mut self, label: impl Into<String>) -> Self {
        self.signatures.push(label.into());
        self
    }

    /// Render the complete standalone document
    pub fn render(&self) -> String {
        let sub_headings: String = self
            .sub_headings
            .iter()
            .map(|s| format!("<p>{}</p>", escape_html(s)))
            .collect();

        let footer = if self.signatures.is_empty() {
            String::new()
        } else {
            let sigs: String = self
                .signatures
                .iter()
                .map(|s| format!("<div class='sig'>{}</div>", escape_html(s)))
                .collect();
            format!("<div class='doc-footer'>{}</div>", sigs)
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>
{page_rule}
{base_css}
</style>
</head>
<body>
<div class="doc-header">
<h1>{title}</h1>
{sub_headings}
</div>
{table}
{footer}
<script>
window.addEventListener('load', function () {{ window.print(); }});
</script>
</body>
</html>"#,
            title = escape_html(&self.title),
            page_rule = self.layout.page_rule(),
            base_css = BASE_CSS,
            sub_headings = sub_headings,
            table = self.table_html,
            footer = footer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<td>\"x\"</td>"), "&lt;td&gt;&quot;x&quot;&lt;/td&gt;");
        assert_eq!(escape_html("O'Neil"), "O&#39;Neil");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_document_structure() {
        let doc = PrintDocument::new("Ledger Card <41010>", PageLayout::A4Landscape)
            .sub_heading("Area North & East")
            .table("<table class='report'><tr><td>x</td></tr></table>")
            .signature("Prepared by")
            .signature("Checked by");
        let html = doc.render();

        assert!(html.contains("size: A4 landscape"));
        assert!(html.contains("Ledger Card &lt;41010&gt;"));
        assert!(html.contains("Area North &amp; East"));
        assert!(html.contains("<table class='report'>"));
        assert!(html.contains("Prepared by"));
        // Print fires on load, never on a timer
        assert!(html.contains("window.addEventListener('load'"));
        assert!(!html.contains("setTimeout"));
    }

    #[test]
    fn test_layout_rules() {
        assert!(PageLayout::A3Landscape.page_rule().contains("A3 landscape"));
        assert!(PageLayout::A4Portrait.page_rule().contains("A4 portrait"));
    }
}
