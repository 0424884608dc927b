//! `confluence author`: guided drafting with an optional self-hosted LLM.
//!
//! Asks for a title, audience and purpose, lets the model (or a template)
//! propose an outline and then a draft, opens each in the editor, and
//! publishes the result as a new page after confirmation. The Markdown is
//! kept under the drafts directory either way.

use std::path::{Path, PathBuf};

use cfl_confluence::ConfluenceClient;
use cfl_convert::{ConvertError, render_markdown_file};
use cfl_llm::ChatModel;
use cfl_llm::prompts::{self, Brief, DEFAULT_TONE};
use chrono::{Local, NaiveDate};
use clap::Args;

use super::convert::{Converter, ConverterArgs};
use super::create::{CreatePlan, IfExists, page_title, publish, report};
use crate::context::{ConnectionArgs, Context};
use crate::editor::{CommandEditor, Editor};
use crate::error::CliError;
use crate::prompt::{Prompt, TermPrompt};

/// Arguments for the author command.
#[derive(Args)]
pub(crate) struct AuthorArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Space key (overrides default_space_key from config).
    #[arg(long, env = "CONFLUENCE_SPACE_KEY")]
    space_key: Option<String>,

    /// Parent page ID (omit to create at space root).
    #[arg(long, env = "CONFLUENCE_PARENT_ID")]
    parent_page_id: Option<String>,

    /// Document title (asked when omitted).
    #[arg(long)]
    title: Option<String>,

    /// Who the document is for, e.g. "SREs" (asked when omitted).
    #[arg(long)]
    audience: Option<String>,

    /// What readers should achieve (asked when omitted).
    #[arg(long)]
    purpose: Option<String>,

    /// Style and tone given to the model.
    #[arg(long, default_value = DEFAULT_TONE)]
    tone: String,

    /// Skip the LLM and start from a blank template.
    #[arg(long)]
    no_llm: bool,

    /// Do not append " - YYYY-MM-DD" to the page title.
    #[arg(long)]
    no_date: bool,

    /// What to do when a same-title page exists under the same parent/space.
    #[arg(long, value_enum, default_value_t, ignore_case = true)]
    if_exists: IfExists,

    /// Directory for saved drafts (default: ~/.confluence-cli/drafts).
    #[arg(long)]
    drafts_dir: Option<PathBuf>,

    #[command(flatten)]
    backend: ConverterArgs,
}

/// Where the page goes.
struct Target {
    space: String,
    parent_id: Option<String>,
    date: Option<NaiveDate>,
}

impl AuthorArgs {
    /// Execute the author command.
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let profile = ctx.profile()?;
        let target = Target {
            space: profile.resolve_space_key(self.space_key.as_deref())?,
            parent_id: self
                .parent_page_id
                .clone()
                .filter(|id| !id.is_empty())
                .or_else(|| profile.parent_page_id.clone()),
            date: (!self.no_date).then(|| Local::now().date_naive()),
        };
        let client = self.connection.client(ctx)?;
        let model = if self.no_llm {
            None
        } else {
            Some(cfl_llm::from_settings(&profile.llm_settings())?)
        };
        let mut editor = CommandEditor::from_env()?;

        self.run(
            ctx,
            &client,
            &target,
            model.as_deref(),
            &mut TermPrompt::new(),
            &mut editor,
        )
    }

    fn run(
        &self,
        ctx: &Context,
        client: &ConfluenceClient,
        target: &Target,
        model: Option<&dyn ChatModel>,
        prompt: &mut dyn Prompt,
        editor: &mut dyn Editor,
    ) -> Result<(), CliError> {
        let brief = self.brief(prompt)?;

        let outline = match model {
            Some(model) => {
                ctx.output
                    .info(&format!("Drafting an outline with {}...", model.describe()));
                model.chat(&prompts::outline_messages(&brief))?
            }
            None => prompts::outline_template(&brief.title),
        };
        ctx.output.highlight("--- Outline (edit in your editor) ---");
        let outline = editor.edit(&outline, "outline.md")?;

        let draft = match model {
            Some(model) => {
                ctx.output
                    .info(&format!("Writing the draft with {}...", model.describe()));
                model.chat(&prompts::draft_messages(&brief, &outline))?
            }
            None => prompts::draft_template(&brief.title),
        };
        ctx.output.highlight("--- Draft (edit in your editor) ---");
        let draft = editor.edit(&draft, "draft.md")?;

        let saved = self.save_draft(&brief.title, &draft)?;
        ctx.output.info(&format!("Saved draft: {}", saved.display()));

        ctx.output.info("Ready to publish this Markdown to Confluence.");
        ctx.output.info(&format!("Space: {}", target.space));
        if let Some(parent) = &target.parent_id {
            ctx.output.info(&format!("Parent page id: {parent}"));
        }
        if !prompt.confirm("Publish now?", true)? {
            ctx.output.warning("Aborted (draft not published).");
            return Ok(());
        }

        let html = self.to_html(ctx, &draft)?;
        let plan = CreatePlan::new(
            page_title(&brief.title, target.date),
            target.space.clone(),
            target.parent_id.clone(),
            self.if_exists,
        );
        let published = publish(client, &plan, &html, &ctx.output)?;
        report(ctx, client, &plan, &published)
    }

    fn brief(&self, prompt: &mut dyn Prompt) -> Result<Brief, CliError> {
        Ok(Brief {
            title: required(prompt, self.title.as_deref(), "Document title")?,
            audience: required(
                prompt,
                self.audience.as_deref(),
                "Audience (e.g., SREs, Backend devs, Everyone)",
            )?,
            purpose: required(
                prompt,
                self.purpose.as_deref(),
                "Purpose (what should readers achieve?)",
            )?,
            tone: self.tone.clone(),
        })
    }

    fn save_draft(&self, title: &str, markdown: &str) -> Result<PathBuf, CliError> {
        let dir = self
            .drafts_dir
            .clone()
            .unwrap_or_else(cfl_config::default_drafts_dir);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.md", slug(title)));
        std::fs::write(&path, markdown)?;
        Ok(path)
    }

    /// Convert with the chosen backend, falling back to the builtin
    /// renderer when pandoc is not installed.
    fn to_html(&self, ctx: &Context, markdown: &str) -> Result<String, CliError> {
        let dir = tempfile::TempDir::new()?;
        let input = dir.path().join("draft.md");
        let output = dir.path().join("draft.html");
        std::fs::write(&input, markdown)?;

        ctx.output
            .info(&format!("Converting draft ({})", self.backend.label()));
        match self.backend.convert(&input, &output) {
            Err(CliError::Convert(ConvertError::ToolNotFound { .. }))
                if self.backend.converter == Converter::Pandoc =>
            {
                ctx.output
                    .warning("pandoc not found; using the builtin Markdown renderer.");
                builtin(&input, &output)
            }
            result => result,
        }
    }
}

fn builtin(input: &Path, output: &Path) -> Result<String, CliError> {
    Ok(render_markdown_file(input, output)?)
}

/// Flag value, or the user's answer; blank is an error.
fn required(
    prompt: &mut dyn Prompt,
    given: Option<&str>,
    label: &str,
) -> Result<String, CliError> {
    let value = match given {
        Some(value) => value.trim().to_owned(),
        None => prompt.ask(label, None, false)?,
    };
    if value.is_empty() {
        return Err(CliError::Validation(format!("{label}: a value is required")));
    }
    Ok(value)
}

/// Lowercase ASCII words joined by `-`; `draft` when nothing is left.
fn slug(title: &str) -> String {
    let mut slug = String::new();
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "draft".to_owned()
    } else {
        slug.to_owned()
    }
}
