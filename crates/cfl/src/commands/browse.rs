//! `confluence browse` commands: list, children, search, open, tree, view,
//! interactive.

use cfl_confluence::{ConfluenceClient, Page};
use cfl_convert::html_to_text;
use clap::{ArgGroup, Args, Subcommand};
use console::Term;
use serde_json::{Value, json};

use crate::browser;
use crate::context::{ConnectionArgs, Context};
use crate::error::CliError;
use crate::tui::{self, Navigator};

/// Browse pages.
#[derive(Subcommand)]
pub(crate) enum BrowseCommand {
    /// List current pages in a space (flat list).
    List(ListArgs),
    /// List current child pages of a page.
    Children(ChildrenArgs),
    /// Search pages with CQL or a simple text query.
    Search(SearchArgs),
    /// Open a page in the browser by ID or title.
    Open(PageRefArgs),
    /// Print a space's page tree starting at its homepage.
    Tree(TreeArgs),
    /// Render a page as text in the terminal.
    View(ViewArgs),
    /// Full-screen browser starting at a space's homepage.
    ///
    /// Keys: ↑/↓ move, → children, ← back, Enter open in browser, v view,
    /// / search, s switch space, g go to page id, n/p next/prev page,
    /// [ ] page size, r refresh, q quit.
    Interactive(InteractiveArgs),
}

impl BrowseCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            Self::List(args) => args.execute(ctx),
            Self::Children(args) => args.execute(ctx),
            Self::Search(args) => args.execute(ctx),
            Self::Open(args) => open_page(ctx, &args),
            Self::Tree(args) => args.execute(ctx),
            Self::View(args) => args.execute(ctx),
            Self::Interactive(args) => args.execute(ctx),
        }
    }
}

/// Pagination and open-first options shared by listing commands.
#[derive(Args)]
pub(crate) struct PagingArgs {
    /// Number of results (max 100).
    #[arg(long, default_value_t = 25)]
    limit: u32,

    /// Pagination start offset.
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Open the first result in the browser.
    #[arg(long)]
    open: bool,
}

/// Arguments for `browse list`.
#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Space key (overrides default_space_key from config).
    #[arg(long, env = "CONFLUENCE_SPACE_KEY")]
    space_key: Option<String>,

    /// Filter: title contains this string (case-insensitive).
    #[arg(long)]
    title_contains: Option<String>,

    #[command(flatten)]
    paging: PagingArgs,
}

impl ListArgs {
    fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let space = ctx.profile()?.resolve_space_key(self.space_key.as_deref())?;
        let client = self.connection.client(ctx)?;
        let pages = client.list_pages_in_space(
            &space,
            self.paging.limit,
            self.paging.start,
            self.title_contains.as_deref(),
        )?;
        show_results(ctx, &client, &pages, &self.paging, "No pages found.")
    }
}

/// Arguments for `browse children`.
#[derive(Args)]
pub(crate) struct ChildrenArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Parent page ID.
    #[arg(long)]
    page_id: String,

    #[command(flatten)]
    paging: PagingArgs,
}

impl ChildrenArgs {
    fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let client = self.connection.client(ctx)?;
        let pages = client.list_children(&self.page_id, self.paging.limit, self.paging.start)?;
        show_results(ctx, &client, &pages, &self.paging, "No children found.")
    }
}

/// Arguments for `browse search`.
#[derive(Args)]
#[command(group(ArgGroup::new("criteria").required(true).args(["cql", "query"])))]
pub(crate) struct SearchArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Raw CQL, e.g. "type=page AND space=DOC ORDER BY lastmodified DESC".
    #[arg(long)]
    cql: Option<String>,

    /// Simple full-text query, converted to CQL.
    #[arg(long)]
    query: Option<String>,

    /// Limit a simple query to a space.
    #[arg(long, env = "CONFLUENCE_SPACE_KEY")]
    space_key: Option<String>,

    #[command(flatten)]
    paging: PagingArgs,
}

impl SearchArgs {
    fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let cql = match (self.cql, self.query) {
            (Some(cql), _) => cql,
            (None, Some(query)) => {
                let profile = ctx.profile()?;
                let space = if self.space_key.is_some() || profile.has_space_key() {
                    Some(profile.resolve_space_key(self.space_key.as_deref())?)
                } else {
                    None
                };
                simple_query_cql(&query, space.as_deref())
            }
            (None, None) => {
                return Err(CliError::Validation("provide --cql or --query".to_owned()));
            }
        };

        let client = self.connection.client(ctx)?;
        let pages = client.search_cql(&cql, self.paging.limit, self.paging.start)?;
        show_results(ctx, &client, &pages, &self.paging, "No results.")
    }
}

/// CQL for a plain-text query over current pages, newest first.
pub(crate) fn simple_query_cql(query: &str, space: Option<&str>) -> String {
    let mut parts = vec![
        format!("text~\"{}\"", query.replace('"', "\\\"")),
        "type=page".to_owned(),
        "status=current".to_owned(),
    ];
    if let Some(space) = space {
        parts.push(format!("space={space}"));
    }
    format!("{} ORDER BY lastmodified DESC", parts.join(" AND "))
}

/// A page given by ID, or by title within a space.
#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["page_id", "title"])))]
pub(crate) struct PageRefArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Page ID.
    #[arg(long)]
    page_id: Option<String>,

    /// Resolve by exact title.
    #[arg(long)]
    title: Option<String>,

    /// Space key when resolving by title.
    #[arg(long, env = "CONFLUENCE_SPACE_KEY")]
    space_key: Option<String>,
}

impl PageRefArgs {
    /// Fetch the referenced page (with links and space).
    fn resolve(&self, ctx: &Context, client: &ConfluenceClient) -> Result<Page, CliError> {
        if let Some(page_id) = &self.page_id {
            return Ok(client.get_page(page_id, &["space", "_links"])?);
        }
        let Some(title) = &self.title else {
            return Err(CliError::Validation("provide --page-id or --title".to_owned()));
        };
        let space = ctx.profile()?.resolve_space_key(self.space_key.as_deref())?;
        client
            .find_page_by_title(title, &space, None)?
            .ok_or_else(|| CliError::Validation(format!("page not found: \"{title}\" in {space}")))
    }
}

fn open_page(ctx: &Context, args: &PageRefArgs) -> Result<(), CliError> {
    let client = args.connection.client(ctx)?;
    let page = args.resolve(ctx, &client)?;

    match client.page_link(&page) {
        Some(link) => {
            ctx.output.info(&format!("Opening: {link}"));
            browser::open(&link)
        }
        None => {
            ctx.output
                .warning("Could not build a web link from the API response.");
            ctx.output
                .data(&format!("Page ID: {}", page.id.as_deref().unwrap_or("?")));
            Ok(())
        }
    }
}

/// Arguments for `browse tree`.
#[derive(Args)]
pub(crate) struct TreeArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Space whose tree to print.
    #[arg(long, env = "CONFLUENCE_SPACE_KEY")]
    space_key: Option<String>,

    /// Maximum depth below the homepage (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    max_depth: usize,
}

impl TreeArgs {
    fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let space = ctx.profile()?.resolve_space_key(self.space_key.as_deref())?;
        let client = self.connection.client(ctx)?;

        let home_id = client.get_space_homepage(&space)?.ok_or_else(|| {
            CliError::Validation(format!(
                "space '{space}' has no homepage (or it is not accessible)"
            ))
        })?;
        let root = client.get_page(&home_id, &[])?;

        ctx.output
            .data_heading(&format!("{}  [id:{home_id}]  (homepage)", title_or_untitled(&root)));
        let mut lines = Vec::new();
        tree_lines(&client, &home_id, 1, self.max_depth, &mut lines)?;
        for line in &lines {
            ctx.output.data(line);
        }
        Ok(())
    }
}

/// Depth-first listing of the tree under `parent_id`, one indented line per page.
fn tree_lines(
    client: &ConfluenceClient,
    parent_id: &str,
    depth: usize,
    max_depth: usize,
    lines: &mut Vec<String>,
) -> Result<(), CliError> {
    for child in client.list_all_children(parent_id)? {
        let id = child.id.as_deref().unwrap_or_default();
        lines.push(format!(
            "{}• {}  [id:{id}]",
            "  ".repeat(depth),
            title_or_untitled(&child)
        ));
        if !id.is_empty() && (max_depth == 0 || depth < max_depth) {
            tree_lines(client, id, depth + 1, max_depth, lines)?;
        }
    }
    Ok(())
}

/// Arguments for `browse view`.
#[derive(Args)]
pub(crate) struct ViewArgs {
    #[command(flatten)]
    page: PageRefArgs,

    /// Use `body.view` instead of the cleaner `body.export_view`.
    #[arg(long)]
    no_export: bool,

    /// Print straight to stdout even when the page is taller than the terminal.
    #[arg(long)]
    no_pager: bool,
}

impl ViewArgs {
    fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let client = self.page.connection.client(ctx)?;
        let page = self.page.resolve(ctx, &client)?;
        let page_id = page
            .id
            .as_deref()
            .ok_or_else(|| CliError::Validation("page response has no id".to_owned()))?;

        let html = client.get_page_rendered_html(page_id, !self.no_export)?;
        if html.is_empty() {
            ctx.output.warning("No rendered content returned by API.");
            return Ok(());
        }

        let text = html_to_text(&html);
        if ctx.json {
            ctx.output.json(&json!({
                "id": page_id,
                "title": page.title,
                "text": text,
            }))?;
            return Ok(());
        }

        let heading = if page.title.is_empty() { page_id } else { page.title.as_str() };
        let stdout = Term::stdout();
        if !self.no_pager && stdout.is_term() && needs_pager(&text, stdout.size().0) {
            return tui::page(heading, &text);
        }
        ctx.output.data_heading(heading);
        ctx.output.data("");
        ctx.output.data(&text);
        Ok(())
    }
}

/// Whether `text` plus its heading overflows a screen of `rows`.
fn needs_pager(text: &str, rows: u16) -> bool {
    text.lines().count() + 2 > usize::from(rows)
}

/// Arguments for `browse interactive`.
#[derive(Args)]
pub(crate) struct InteractiveArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Start in this space (default: profile default; switch in-app with "s").
    #[arg(long, env = "CONFLUENCE_SPACE_KEY")]
    space_key: Option<String>,
}

impl InteractiveArgs {
    fn execute(self, ctx: &Context) -> Result<(), CliError> {
        if !Term::stdout().is_term() {
            return Err(CliError::Validation(
                "browse interactive needs a terminal".to_owned(),
            ));
        }
        let profile = ctx.profile()?;
        let space = if self.space_key.is_some() || profile.has_space_key() {
            Some(profile.resolve_space_key(self.space_key.as_deref())?)
        } else {
            None
        };
        let client = self.connection.client(ctx)?;

        let mut nav = Navigator::new(&client);
        nav.start(space.as_deref());
        tui::browse(&mut nav)
    }
}

pub(crate) fn title_or_untitled(page: &Page) -> &str {
    if page.title.is_empty() {
        "(untitled)"
    } else {
        &page.title
    }
}

/// Print a numbered result list (or JSON), then optionally open the first hit.
fn show_results(
    ctx: &Context,
    client: &ConfluenceClient,
    pages: &[Page],
    paging: &PagingArgs,
    empty_message: &str,
) -> Result<(), CliError> {
    if ctx.json {
        let items: Vec<Value> = pages
            .iter()
            .map(|page| {
                json!({
                    "id": page.id,
                    "title": page.title,
                    "link": client.page_link(page),
                })
            })
            .collect();
        ctx.output.json(&items)?;
    } else if pages.is_empty() {
        ctx.output.warning(empty_message);
        return Ok(());
    } else {
        for line in result_lines(pages, paging.start) {
            ctx.output.data(&line);
        }
    }

    if paging.open
        && let Some(link) = pages.first().and_then(|page| client.page_link(page))
    {
        ctx.output.info(&format!("Opening: {link}"));
        browser::open(&link)?;
    }
    Ok(())
}

/// `"  1. Title  [id:123]"`, numbered from `start + 1`.
pub(crate) fn result_lines(pages: &[Page], start: u32) -> Vec<String> {
    (u64::from(start) + 1..)
        .zip(pages)
        .map(|(n, page)| {
            format!(
                "{n:>3}. {}  [id:{}]",
                page.title,
                page.id.as_deref().unwrap_or_default()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::testing;

    fn page(id: &str, title: &str) -> Page {
        serde_json::from_value(json!({"id": id, "title": title})).unwrap()
    }

    #[test]
    fn test_simple_query_cql() {
        assert_eq!(
            simple_query_cql("release notes", Some("DOC")),
            r#"text~"release notes" AND type=page AND status=current AND space=DOC ORDER BY lastmodified DESC"#
        );
        assert_eq!(
            simple_query_cql(r#"say "hi""#, None),
            r#"text~"say \"hi\"" AND type=page AND status=current ORDER BY lastmodified DESC"#
        );
    }

    #[test]
    fn test_needs_pager() {
        assert!(!needs_pager("a\nb", 24));
        assert!(needs_pager(&"line\n".repeat(23), 24));
        assert!(!needs_pager(&"line\n".repeat(22), 24));
    }

    #[test]
    fn test_result_lines_numbering() {
        let pages = vec![page("1", "Alpha"), page("2", "Beta")];
        assert_eq!(
            result_lines(&pages, 25),
            vec![" 26. Alpha  [id:1]".to_owned(), " 27. Beta  [id:2]".to_owned()]
        );
    }

    #[test]
    fn test_tree_lines_depth_first() {
        let (client, seen) = testing::client(vec![
            (200, json!({"results": [{"id": "a", "title": "A"}, {"id": "b", "title": "B"}]})),
            (200, json!({"results": [{"id": "a1", "title": "A1"}]})),
            (200, json!({"results": []})),
            (200, json!({"results": []})),
        ]);

        let mut lines = Vec::new();
        tree_lines(&client, "home", 1, 0, &mut lines).unwrap();

        assert_eq!(
            lines,
            vec![
                "  • A  [id:a]".to_owned(),
                "    • A1  [id:a1]".to_owned(),
                "  • B  [id:b]".to_owned(),
            ]
        );
        assert!(seen.url(0).contains("/content/home/child/page"));
        assert!(seen.url(1).contains("/content/a/child/page"));
        assert!(seen.url(2).contains("/content/a1/child/page"));
        assert!(seen.url(3).contains("/content/b/child/page"));
    }

    #[test]
    fn test_tree_lines_max_depth() {
        let (client, seen) = testing::client(vec![(
            200,
            json!({"results": [{"id": "a", "title": "A"}, {"id": "b", "title": ""}]}),
        )]);

        let mut lines = Vec::new();
        tree_lines(&client, "home", 1, 1, &mut lines).unwrap();

        assert_eq!(
            lines,
            vec!["  • A  [id:a]".to_owned(), "  • (untitled)  [id:b]".to_owned()]
        );
        assert_eq!(seen.methods().len(), 1);
    }
}
