//! `confluence update` command implementation.

use cfl_confluence::{ConfluenceClient, PageUpdate};
use clap::Args;
use serde_json::json;

use super::convert::ConversionArgs;
use crate::context::{ConnectionArgs, Context};
use crate::error::CliError;

/// Arguments for the update command.
#[derive(Args)]
pub(crate) struct UpdateArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Page ID to update (skips title resolution).
    #[arg(long, required_unless_present = "title")]
    page_id: Option<String>,

    /// Title to resolve in the space.
    #[arg(long, conflicts_with = "page_id")]
    title: Option<String>,

    /// Space key used when resolving by title.
    #[arg(long, env = "CONFLUENCE_SPACE_KEY")]
    space_key: Option<String>,

    /// Parent to disambiguate a title match.
    #[arg(long, env = "CONFLUENCE_PARENT_ID")]
    parent_page_id: Option<String>,

    #[command(flatten)]
    conversion: ConversionArgs,

    /// Do not mark the update as a minor edit.
    #[arg(long)]
    no_minor_edit: bool,

    /// Do not notify watchers.
    #[arg(long)]
    no_notify_watchers: bool,

    /// Preview without converting or updating.
    #[arg(long)]
    dry_run: bool,
}

impl UpdateArgs {
    /// Execute the update command.
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let client = self.connection.client(ctx)?;
        let page_id = self.resolve_page_id(ctx, &client)?;
        ctx.output.info(&format!("Updating page {page_id}"));

        let minor_edit = !self.no_minor_edit;
        let notify_watchers = !self.no_notify_watchers;

        if self.dry_run {
            ctx.output
                .warning("DRY-RUN: Skipping conversion and API call");
            ctx.output.json(&json!({
                "action": "update",
                "page_id": page_id,
                "minor_edit": minor_edit,
                "notify_watchers": notify_watchers,
                "from_md": self.conversion.input_md_file,
                "to_html": self.conversion.html_file,
            }))?;
            return Ok(());
        }

        let html = self.conversion.run_reporting(ctx)?;
        let page = client.update_page(&PageUpdate {
            page_id: &page_id,
            body_html: &html,
            title: None,
            minor_edit,
            notify_watchers,
        })?;

        if ctx.json {
            ctx.output.json(&page)?;
            return Ok(());
        }

        ctx.output.success(&format!(
            "Updated page id {} to version {}",
            page.id.as_deref().unwrap_or(&page_id),
            page.version_number()
        ));
        if let Some(link) = client.page_link(&page) {
            ctx.output.data(&link);
        }
        Ok(())
    }

    fn resolve_page_id(&self, ctx: &Context, client: &ConfluenceClient) -> Result<String, CliError> {
        if let Some(page_id) = self.page_id.as_deref().filter(|id| !id.is_empty()) {
            return Ok(page_id.to_owned());
        }
        let title = self
            .title
            .as_deref()
            .ok_or_else(|| CliError::Validation("provide --page-id or --title".to_owned()))?;
        let space = ctx.profile()?.resolve_space_key(self.space_key.as_deref())?;
        find_page_id(client, title, &space, self.parent_page_id.as_deref())
    }
}

/// ID of the current page with this title, optionally under `parent`.
pub(crate) fn find_page_id(
    client: &ConfluenceClient,
    title: &str,
    space: &str,
    parent: Option<&str>,
) -> Result<String, CliError> {
    client
        .find_page_by_title(title, space, parent)?
        .and_then(|page| page.id)
        .ok_or_else(|| {
            CliError::Validation(format!(
                "page not found by title/space/parent: \"{title}\" in {space}"
            ))
        })
}
