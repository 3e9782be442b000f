//! Text sanitization for titles, summaries and bodies
//!
//! Remote documents carry HTML fragments, entity-encoded text, invisible
//! characters and hard-wrapped lines. Everything stored in a record goes
//! through [`clean_text`] or [`html_to_text`] so that the checksum only
//! depends on the visible text.

use scraper::{Html, Node};

use crate::utils::normalize_whitespace;

/// Elements that separate words when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "pre", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6",
    "tr", "td", "th", "table", "hr", "section", "article",
];

/// Clean plain text
///
/// Steps:
/// 1. Remove zero-width characters
/// 2. Remove control characters
/// 3. Decode HTML entities
/// 4. Collapse whitespace (newlines included) to single spaces
///
/// # Examples
///
/// ```
/// use crawlhub::parser::sanitize::clean_text;
///
/// let title = "Attention Is\n  All You Need &amp; More\u{200B}";
/// assert_eq!(clean_text(title), "Attention Is All You Need & More");
/// ```
pub fn clean_text(text: &str) -> String {
    let text = remove_zero_width(text);
    let text = remove_control_chars(&text);
    let text = decode_html_entities(&text);
    normalize_whitespace(&text)
}

/// Visible text of an HTML fragment
///
/// Tags are dropped, entities decoded, and block-level elements separate
/// the words around them.
///
/// # Examples
///
/// ```
/// use crawlhub::parser::sanitize::html_to_text;
///
/// let html = "<p>Hello <strong>World</strong></p><p>Again</p>";
/// assert_eq!(html_to_text(html), "Hello World Again");
/// ```
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());

    for node in fragment.tree.root().descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => out.push(' '),
            _ => {}
        }
    }

    let text = remove_zero_width(&out);
    let text = remove_control_chars(&text);
    normalize_whitespace(&text)
}

/// Remove zero-width spaces and similar invisible characters
///
/// Removes U+200B to U+200F, U+2028 to U+202F and the byte order mark.
pub fn remove_zero_width(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202F}' |
                '\u{FEFF}'
            )
        })
        .collect()
}

/// Remove control characters except newline and tab
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Decode named and numeric HTML entities
pub fn decode_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_zero_width() {
        let text = "a\u{200B}b\u{FEFF}c\u{2028}d";
        assert_eq!(remove_zero_width(text), "abcd");
    }

    #[test]
    fn test_remove_control_chars() {
        let text = "Hello\x00World\x07Test\nNewline";
        let clean = remove_control_chars(text);
        assert!(!clean.contains('\x00'));
        assert!(!clean.contains('\x07'));
        assert!(clean.contains('\n'));
    }

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(
            decode_html_entities("&lt;div&gt;Hello &amp; World&#39;s&lt;/div&gt;"),
            "<div>Hello & World's</div>"
        );
        assert_eq!(decode_html_entities("caf&eacute;"), "café");
    }

    #[test]
    fn test_clean_text_collapses_wrapped_lines() {
        let title = "  Large Language\n    Models as\tAgents  ";
        assert_eq!(clean_text(title), "Large Language Models as Agents");
    }

    #[test]
    fn test_clean_text_keeps_angle_brackets() {
        assert_eq!(clean_text("bounds for x &lt; y"), "bounds for x < y");
        assert_eq!(clean_text("when p < 0.05"), "when p < 0.05");
    }

    #[test]
    fn test_html_to_text_nested() {
        let html = "<div><p>Para <span>with <em>nested</em> tags</span></p></div>";
        assert_eq!(html_to_text(html), "Para with nested tags");
    }

    #[test]
    fn test_html_to_text_blocks_and_entities() {
        let html = "<p>First&nbsp;line</p><ul><li>one</li><li>two</li></ul>x&amp;y<br>z";
        assert_eq!(html_to_text(html), "First line one two x&y z");
    }

    #[test]
    fn test_html_to_text_plain_input() {
        assert_eq!(html_to_text("just text"), "just text");
        assert_eq!(html_to_text(""), "");
    }
}
