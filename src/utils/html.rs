//! Plain-text rendering of the HTML snippets found in book descriptions.

use scraper::{ElementRef, Html, Node};

/// Elements that start a new paragraph.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "table", "tr",
];

/// Convert an HTML fragment to readable plain text.
///
/// Markup is dropped and entities are decoded. Paragraph-level elements become
/// blank-line separated blocks, `<br>` becomes a line break and list items get
/// a bullet.
///
/// ```
/// use book_search::utils::html_to_text;
///
/// let text = html_to_text("<p>First <b>bold</b> part.</p><p>Second<br>line</p>");
/// assert_eq!(text, "First bold part.\n\nSecond\nline");
/// ```
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut raw = String::new();
    collect_text(fragment.root_element(), &mut raw);
    normalize_lines(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.replace(['\n', '\r'], " ")),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = el.name();
                if name == "br" {
                    out.push('\n');
                } else if name == "li" {
                    out.push_str("\n• ");
                    collect_text(child_el, out);
                } else if BLOCK_ELEMENTS.contains(&name) {
                    out.push_str("\n\n");
                    collect_text(child_el, out);
                    out.push_str("\n\n");
                } else {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

/// Collapse runs of whitespace within lines and runs of blank lines between them.
fn normalize_lines(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in raw.split('\n') {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() && lines.last().map_or(true, String::is_empty) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}
