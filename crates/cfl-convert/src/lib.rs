//! Markdown to HTML conversion for Confluence pages.
//!
//! Two converters produce storage-format HTML:
//!
//! - [`PandocConverter`] shells out to `pandoc -f gfm -t html`.
//! - [`render_markdown`] renders in-process with `pulldown-cmark`.
//!
//! [`html_to_text`] goes the other way, reducing rendered page HTML to text
//! suitable for a terminal.

mod args;
mod error;
mod markdown;
mod pandoc;
mod text;

pub use args::split_args;
pub use error::ConvertError;
pub use markdown::{render_markdown, render_markdown_file};
pub use pandoc::PandocConverter;
pub use text::html_to_text;
