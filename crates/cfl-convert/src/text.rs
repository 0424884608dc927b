//! Rendered page HTML to terminal text.

use std::sync::LazyLock;

use regex::Regex;

/// Regex to match script and style elements with their content.
static SCRIPT_STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").unwrap());

static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// Regex to match closing tags of block elements.
static BLOCK_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(p|div|h[1-6]|li|tr|table|pre|blockquote|ul|ol)\s*>").unwrap()
});

/// Regex to match the boundary between two adjacent table cells.
static CELL_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</t[dh]\s*>\s*<t[dh]\b[^>]*>").unwrap());

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Regex to match two or more consecutive blank lines.
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap());

/// Reduce HTML to readable plain text.
///
/// Block elements end lines and cells of a table row are joined with ` | `.
/// List items get a bullet, remaining tags are dropped, entities are decoded
/// and runs of blank lines collapse to one.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_STYLE_RE.replace_all(html, "");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = CELL_GAP_RE.replace_all(&text, " | ");
    let text = LIST_ITEM_RE.replace_all(&text, "• ");
    let text = BLOCK_END_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = html_escape::decode_html_entities(&text);
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    text.trim().to_owned()
}
