//! Conversations for outlining and drafting a Confluence document.

use crate::Message;

/// Tone used when the author gives none.
pub const DEFAULT_TONE: &str = "practical, concise";

const SYSTEM: &str = "You are an experienced technical writer producing Markdown documents \
for a Confluence wiki. Write short paragraphs under descriptive headings, favour concrete \
steps over prose, and put commands or code in fenced blocks. Leave out filler. When an \
outline is given, keep to it.";

/// What the document is and who it is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brief {
    pub title: String,
    pub audience: String,
    pub purpose: String,
    pub tone: String,
}

impl Brief {
    fn describe(&self) -> String {
        format!(
            "Title: {}\nAudience: {}\nPurpose: {}\nTone: {}\n",
            self.title, self.audience, self.purpose, self.tone
        )
    }
}

/// Ask for a 4 to 8 section Markdown outline.
#[must_use]
pub fn outline_messages(brief: &Brief) -> Vec<Message> {
    vec![
        Message::system(SYSTEM),
        Message::user(format!(
            "{}\nWrite a Markdown outline for this document: between 4 and 8 top-level \
             sections, each with a few short bullets. Reply with the Markdown only, \
             no commentary.\n",
            brief.describe()
        )),
    ]
}

/// Ask for the full document following `outline`.
#[must_use]
pub fn draft_messages(brief: &Brief, outline: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM),
        Message::user(format!(
            "{}\nOutline:\n{}\n\nWrite the complete document in Markdown for Confluence, \
             following the outline. Use headings and lists, and code blocks where they \
             help. Keep it practical and easy to skim. Begin with an H1 title and add \
             no front matter.\n",
            brief.describe(),
            outline.trim_end()
        )),
    ]
}

/// Outline opened in the editor when no model is used.
#[must_use]
pub fn outline_template(title: &str) -> String {
    format!("# Outline for: {title}\n\n- Section 1\n- Section 2\n- Section 3\n")
}

/// Draft opened in the editor when no model is used.
#[must_use]
pub fn draft_template(title: &str) -> String {
    format!("# {title}\n\n## Introduction\n\n...\n\n## Details\n\n...\n")
}
