//! `confluence create` command implementation.

use cfl_confluence::{ConfluenceClient, NewPage, Page, PageUpdate};
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::json;

use super::convert::ConversionArgs;
use crate::browser;
use crate::context::{ConnectionArgs, Context};
use crate::error::CliError;
use crate::output::Output;

/// Highest suffix tried by `--if-exists suffix`.
const MAX_SUFFIX: u32 = 20;

/// What to do when a same-titled page already exists.
#[derive(ValueEnum, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum IfExists {
    /// Stop with exit code 2.
    #[default]
    Fail,
    /// Open the existing page in the browser.
    Open,
    /// Replace the existing page's body.
    Update,
    /// Create "Title (2)", "Title (3)", ... up to 20.
    Suffix,
}

/// What `create` ended up doing.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Action {
    Create,
    Update,
    Open,
}

/// Arguments for the create command.
#[derive(Args)]
pub(crate) struct CreateArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Space key (overrides default_space_key from config).
    #[arg(long, env = "CONFLUENCE_SPACE_KEY")]
    space_key: Option<String>,

    /// Parent page ID (omit to create at space root).
    #[arg(long, env = "CONFLUENCE_PARENT_ID")]
    parent_page_id: Option<String>,

    /// Title prefix for the page.
    #[arg(long)]
    page_title: String,

    /// Do not append " - YYYY-MM-DD" to the title.
    #[arg(long)]
    no_date: bool,

    #[command(flatten)]
    conversion: ConversionArgs,

    /// What to do when a same-title page exists under the same parent/space.
    #[arg(long, value_enum, default_value_t, ignore_case = true)]
    if_exists: IfExists,

    /// Deprecated: same as `--if-exists update`.
    #[arg(long)]
    update_if_exists: bool,

    /// Add a label (repeatable).
    #[arg(long = "label")]
    labels: Vec<String>,

    /// Mark an update of an existing page as a minor edit.
    #[arg(long)]
    minor_edit: bool,

    /// Do not notify watchers.
    #[arg(long)]
    no_notify_watchers: bool,

    /// Print the plan as JSON without calling the API.
    #[arg(long)]
    dry_run: bool,
}

/// Planned create, printed by `--dry-run` and echoed in `--json` results.
#[derive(Serialize, Debug, Clone)]
pub(super) struct CreatePlan {
    action: Option<Action>,
    title: String,
    space: String,
    parent_id: Option<String>,
    labels: Vec<String>,
    minor_edit: bool,
    notify_watchers: bool,
    strategy: IfExists,
}

impl CreatePlan {
    /// Plain create without labels, notifying watchers.
    pub(super) fn new(
        title: String,
        space: String,
        parent_id: Option<String>,
        strategy: IfExists,
    ) -> Self {
        Self {
            action: None,
            title,
            space,
            parent_id,
            labels: Vec::new(),
            minor_edit: false,
            notify_watchers: true,
            strategy,
        }
    }
}

/// Result of publishing a plan.
#[derive(Debug)]
pub(super) struct Published {
    action: Action,
    title: String,
    page: Page,
}

impl CreateArgs {
    /// Execute the create command.
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let profile = ctx.profile()?;
        let space = profile.resolve_space_key(self.space_key.as_deref())?;
        let parent_id = self
            .parent_page_id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| profile.parent_page_id.clone());

        let date = (!self.no_date).then(|| Local::now().date_naive());
        let title = page_title(&self.page_title, date);

        let html = self.conversion.run_reporting(ctx)?;
        ctx.output.info(&format!("Computed title: {title}"));

        let plan = CreatePlan {
            action: None,
            title,
            space,
            parent_id,
            labels: self.labels.clone(),
            minor_edit: self.minor_edit,
            notify_watchers: !self.no_notify_watchers,
            strategy: self.strategy(),
        };

        if self.dry_run {
            ctx.output
                .warning("DRY-RUN: Skipping API calls. Would create or update page:");
            ctx.output.json(&plan)?;
            return Ok(());
        }

        let client = self.connection.client(ctx)?;
        let published = publish(&client, &plan, &html, &ctx.output)?;
        report(ctx, &client, &plan, &published)
    }

    fn strategy(&self) -> IfExists {
        if self.update_if_exists && self.if_exists == IfExists::Fail {
            IfExists::Update
        } else {
            self.if_exists
        }
    }
}

/// `"{prefix} - YYYY-MM-DD"`, or the bare prefix without a date.
pub(super) fn page_title(prefix: &str, date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("{prefix} - {}", date.format("%Y-%m-%d")),
        None => prefix.to_owned(),
    }
}

fn suffixed_title(title: &str, n: u32) -> String {
    format!("{title} ({n})")
}

/// Create the page, or apply the duplicate strategy when the title is taken.
pub(super) fn publish(
    client: &ConfluenceClient,
    plan: &CreatePlan,
    html: &str,
    output: &Output,
) -> Result<Published, CliError> {
    let parent = plan.parent_id.as_deref();

    let Some(existing) = client.find_page_by_title(&plan.title, &plan.space, parent)? else {
        let page = create(client, plan, &plan.title, html, output)?;
        return Ok(Published {
            action: Action::Create,
            title: plan.title.clone(),
            page,
        });
    };

    let id = existing.id.clone().unwrap_or_default();
    let location = match parent {
        Some(parent) => format!("parent {parent}"),
        None => format!("space {}", plan.space),
    };
    output.warning(&format!(
        "A page with this title already exists in {location}: {} [id:{id}]",
        plan.title
    ));
    if let Some(link) = client.page_link(&existing) {
        output.info(&format!("Open existing: {link}"));
    }

    match plan.strategy {
        IfExists::Fail => Err(CliError::PageExists {
            title: plan.title.clone(),
            id,
        }),
        IfExists::Open => Ok(Published {
            action: Action::Open,
            title: plan.title.clone(),
            page: existing,
        }),
        IfExists::Update => {
            let page = client.update_page(&PageUpdate {
                page_id: &id,
                body_html: html,
                title: Some(&plan.title),
                minor_edit: plan.minor_edit,
                notify_watchers: plan.notify_watchers,
            })?;
            add_labels(client, &page, &plan.labels, output);
            Ok(Published {
                action: Action::Update,
                title: plan.title.clone(),
                page,
            })
        }
        IfExists::Suffix => {
            for n in 2..=MAX_SUFFIX {
                let candidate = suffixed_title(&plan.title, n);
                if client
                    .find_page_by_title(&candidate, &plan.space, parent)?
                    .is_some()
                {
                    continue;
                }
                let page = create(client, plan, &candidate, html, output)?;
                return Ok(Published {
                    action: Action::Create,
                    title: candidate,
                    page,
                });
            }
            output.warning(&format!(
                "Could not find a free suffix after {MAX_SUFFIX} attempts; aborting."
            ));
            Err(CliError::NoFreeTitle {
                title: plan.title.clone(),
                attempts: MAX_SUFFIX - 1,
            })
        }
    }
}

fn create(
    client: &ConfluenceClient,
    plan: &CreatePlan,
    title: &str,
    html: &str,
    output: &Output,
) -> Result<Page, CliError> {
    let page = client.create_page(&NewPage {
        title,
        space_key: &plan.space,
        body_html: html,
        parent_id: plan.parent_id.as_deref(),
        notify_watchers: plan.notify_watchers,
    })?;
    add_labels(client, &page, &plan.labels, output);
    Ok(page)
}

/// Labels are best-effort: a failure is reported but does not fail the command.
fn add_labels(client: &ConfluenceClient, page: &Page, labels: &[String], output: &Output) {
    if labels.is_empty() {
        return;
    }
    let Some(id) = page.id.as_deref() else {
        output.warning("Response did not include an 'id'; labels not added.");
        return;
    };
    if let Err(e) = client.add_labels(id, labels) {
        output.warning(&format!("Failed to add labels: {e}"));
    }
}

pub(super) fn report(
    ctx: &Context,
    client: &ConfluenceClient,
    plan: &CreatePlan,
    published: &Published,
) -> Result<(), CliError> {
    let link = client.page_link(&published.page);

    if published.action == Action::Open {
        if let Some(link) = &link {
            ctx.output.info(&format!("Opening: {link}"));
            browser::open(link)?;
        }
        return Ok(());
    }

    if ctx.json {
        let result = CreatePlan {
            action: Some(published.action),
            title: published.title.clone(),
            ..plan.clone()
        };
        ctx.output.json(&json!({
            "result": result,
            "page": published.page,
        }))?;
        return Ok(());
    }

    let verb = match published.action {
        Action::Update => "update",
        Action::Create | Action::Open => "create",
    };
    match published.page.id.as_deref() {
        Some(id) => ctx
            .output
            .success(&format!("Done: {verb} -> page id {id}")),
        None => ctx.output.warning("Response did not include an 'id'."),
    }
    if let Some(link) = link {
        ctx.output.data(&link);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use cfl_confluence::Method;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::commands::convert::Converter;
    use crate::commands::convert::tests::backend;
    use crate::testing;

    fn plan(strategy: IfExists, labels: &[&str]) -> CreatePlan {
        CreatePlan {
            action: None,
            title: "Notes".to_owned(),
            space: "DOC".to_owned(),
            parent_id: None,
            labels: labels.iter().map(|l| (*l).to_owned()).collect(),
            minor_edit: false,
            notify_watchers: true,
            strategy,
        }
    }

    fn found(id: &str) -> (u16, Value) {
        (
            200,
            json!({"results": [{"id": id, "title": "Notes", "_links": {"webui": format!("/pages/{id}")}}]}),
        )
    }

    fn none() -> (u16, Value) {
        (200, json!({"results": []}))
    }

    fn created(id: &str) -> (u16, Value) {
        (200, json!({"id": id, "title": "x", "version": {"number": 1}}))
    }

    #[test]
    fn test_page_title() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7);
        assert_eq!(page_title("Release", date), "Release - 2024-03-07");
        assert_eq!(page_title("Release", None), "Release");
        assert_eq!(suffixed_title("Release", 2), "Release (2)");
    }

    #[test]
    fn test_update_if_exists_alias() {
        let args = CreateArgs {
            connection: ConnectionArgs::default(),
            space_key: None,
            parent_page_id: None,
            page_title: "T".to_owned(),
            no_date: true,
            conversion: ConversionArgs {
                input_md_file: "in.md".into(),
                html_file: "out.html".into(),
                backend: backend(Converter::Builtin),
            },
            if_exists: IfExists::Fail,
            update_if_exists: true,
            labels: Vec::new(),
            minor_edit: false,
            no_notify_watchers: false,
            dry_run: false,
        };
        assert_eq!(args.strategy(), IfExists::Update);
    }

    #[test]
    fn test_creates_when_title_free() {
        let (client, seen) = testing::client(vec![none(), created("9"), (200, json!({}))]);

        let published =
            publish(&client, &plan(IfExists::Fail, &["docs"]), "<p>x</p>", &Output::new(true))
                .unwrap();

        assert_eq!(published.action, Action::Create);
        assert_eq!(published.page.id.as_deref(), Some("9"));
        assert_eq!(seen.methods(), vec![Method::Get, Method::Post, Method::Post]);
        assert_eq!(seen.body(1)["title"], "Notes");
        assert!(seen.url(2).ends_with("/rest/api/content/9/label"));
        assert_eq!(seen.body(2), json!([{"prefix": "global", "name": "docs"}]));
    }

    #[test]
    fn test_existing_page_fails() {
        let (client, seen) = testing::client(vec![found("5")]);

        let err = publish(&client, &plan(IfExists::Fail, &[]), "", &Output::new(true)).unwrap_err();

        assert!(matches!(err, CliError::PageExists { ref id, .. } if id == "5"));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(seen.methods(), vec![Method::Get]);
    }

    #[test]
    fn test_existing_page_suffix() {
        let (client, seen) =
            testing::client(vec![found("5"), found("6"), none(), created("7")]);

        let published =
            publish(&client, &plan(IfExists::Suffix, &[]), "", &Output::new(true)).unwrap();

        assert_eq!(published.title, "Notes (3)");
        assert!(seen.url(1).contains("title=Notes%20%282%29"));
        assert!(seen.url(2).contains("title=Notes%20%283%29"));
        assert_eq!(seen.body(3)["title"], "Notes (3)");
    }

    #[test]
    fn test_suffix_exhausted() {
        let responses = std::iter::repeat_with(|| found("5")).take(20).collect();
        let (client, _seen) = testing::client(responses);

        let err = publish(&client, &plan(IfExists::Suffix, &[]), "", &Output::new(true)).unwrap_err();

        assert!(matches!(err, CliError::NoFreeTitle { attempts: 19, .. }));
    }

    #[test]
    fn test_existing_page_update() {
        let (client, seen) = testing::client(vec![
            found("5"),
            (200, json!({"id": "5", "title": "Notes", "version": {"number": 3}})),
            (200, json!({"id": "5", "title": "Notes", "version": {"number": 4}})),
        ]);

        let published =
            publish(&client, &plan(IfExists::Update, &[]), "<p>new</p>", &Output::new(true))
                .unwrap();

        assert_eq!(published.action, Action::Update);
        assert_eq!(published.page.version_number(), 4);
        assert_eq!(seen.methods(), vec![Method::Get, Method::Get, Method::Put]);
        assert_eq!(seen.body(2)["version"]["number"], 4);
        assert_eq!(seen.body(2)["body"]["storage"]["value"], "<p>new</p>");
    }

    #[test]
    fn test_label_failure_is_not_fatal() {
        let (client, _seen) = testing::client(vec![
            none(),
            created("9"),
            (500, json!({"message": "boom"})),
        ]);

        let published =
            publish(&client, &plan(IfExists::Fail, &["x"]), "", &Output::new(true)).unwrap();

        assert_eq!(published.page.id.as_deref(), Some("9"));
    }

    #[test]
    fn test_existing_page_open() {
        let (client, _seen) = testing::client(vec![found("5")]);

        let published =
            publish(&client, &plan(IfExists::Open, &[]), "", &Output::new(true)).unwrap();

        assert_eq!(published.action, Action::Open);
        assert_eq!(
            client.page_link(&published.page).as_deref(),
            Some("https://wiki.example.com/pages/5")
        );
    }

    #[test]
    fn test_plan_json_shape() {
        let value = serde_json::to_value(plan(IfExists::Suffix, &["a"])).unwrap();
        assert_eq!(
            value,
            json!({
                "action": null,
                "title": "Notes",
                "space": "DOC",
                "parent_id": null,
                "labels": ["a"],
                "minor_edit": false,
                "notify_watchers": true,
                "strategy": "suffix"
            })
        );
    }
}
