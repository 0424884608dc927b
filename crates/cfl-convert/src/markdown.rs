//! In-process Markdown rendering.

use std::path::Path;

use pulldown_cmark::{Options, Parser, html};

use crate::ConvertError;

/// Render GitHub-flavored Markdown to HTML.
///
/// Enables tables, strikethrough, task lists and GFM blockquote tags.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM;
    let parser = Parser::new_ext(markdown, options);

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Render a Markdown file and write the HTML to `output`.
///
/// Mirrors [`PandocConverter::convert`](crate::PandocConverter::convert) for
/// the builtin converter.
pub fn render_markdown_file(input: &Path, output: &Path) -> Result<String, ConvertError> {
    let markdown = std::fs::read_to_string(input)?;
    let html = render_markdown(&markdown);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &html)?;
    Ok(html)
}
