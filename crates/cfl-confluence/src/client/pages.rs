//! Page operations for Confluence API.

use serde_json::{Value, json};
use tracing::{info, warn};

use super::{ConfluenceClient, Request, encode};
use crate::error::ConfluenceError;
use crate::types::{ContentList, Page};

/// Expansion used when reading a page before showing or updating it.
pub const DEFAULT_EXPAND: &[&str] = &["version", "ancestors", "body.storage", "_links"];

/// Page to create.
#[derive(Debug, Clone)]
pub struct NewPage<'a> {
    /// Page title.
    pub title: &'a str,
    /// Target space key.
    pub space_key: &'a str,
    /// Body in storage representation.
    pub body_html: &'a str,
    /// Optional parent page; the page lands at the space root otherwise.
    pub parent_id: Option<&'a str>,
    /// Whether watchers are notified.
    pub notify_watchers: bool,
}

/// Update of an existing page's body (and optionally title).
#[derive(Debug, Clone)]
pub struct PageUpdate<'a> {
    /// Page to update.
    pub page_id: &'a str,
    /// New body in storage representation.
    pub body_html: &'a str,
    /// New title; the current title is kept when `None`.
    pub title: Option<&'a str>,
    /// Mark the new version as a minor edit.
    pub minor_edit: bool,
    /// Whether watchers are notified.
    pub notify_watchers: bool,
}

impl ConfluenceClient {
    /// Create a page.
    ///
    /// Sent once: creation is not idempotent, so transient failures are not retried.
    pub fn create_page(&self, page: &NewPage<'_>) -> Result<Page, ConfluenceError> {
        let mut payload = json!({
            "type": "page",
            "title": page.title,
            "space": {"key": page.space_key},
            "body": {
                "storage": {
                    "value": page.body_html,
                    "representation": "storage"
                }
            }
        });

        if let Some(parent_id) = page.parent_id {
            payload["ancestors"] = json!([{"id": parent_id}]);
        }

        info!(
            "Creating page '{}' in space {}",
            page.title, page.space_key
        );

        let value = self.execute(
            Request::post("/rest/api/content", payload)
                .query("notifyWatchers", page.notify_watchers),
        )?;
        let created: Page = serde_json::from_value(value)?;
        info!("Created page {}", created.id.as_deref().unwrap_or("?"));
        Ok(created)
    }

    /// Get page by ID with field expansion.
    pub fn get_page(&self, page_id: &str, expand: &[&str]) -> Result<Page, ConfluenceError> {
        info!("Getting page {}", page_id);

        let mut request = Request::get(format!("/rest/api/content/{}", encode(page_id)));
        if !expand.is_empty() {
            request = request.query("expand", expand.join(","));
        }

        Ok(serde_json::from_value(self.execute(request)?)?)
    }

    /// Get rendered HTML for display.
    ///
    /// `export` selects `body.export_view` (cleaner, printable) over `body.view`.
    /// Returns an empty string when the API sends no rendered body.
    pub fn get_page_rendered_html(
        &self,
        page_id: &str,
        export: bool,
    ) -> Result<String, ConfluenceError> {
        let expand = if export { "body.export_view" } else { "body.view" };
        let page = self.get_page(page_id, &[expand])?;

        let html = page.body.and_then(|body| {
            if export {
                body.export_view
            } else {
                body.view
            }
        });
        Ok(html.map(|s| s.value).unwrap_or_default())
    }

    /// Find a current (non-archived) page by exact title.
    ///
    /// With `parent_id`, only pages whose ancestor chain contains that parent
    /// match, so same-titled pages elsewhere in the space are ignored.
    pub fn find_page_by_title(
        &self,
        title: &str,
        space_key: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<Page>, ConfluenceError> {
        let request = Request::get("/rest/api/content")
            .query("type", "page")
            .query("spaceKey", space_key)
            .query("title", title)
            .query("expand", "ancestors,version,_links")
            .query("status", "current")
            .query("limit", 25);

        let list: ContentList = serde_json::from_value(self.execute(request)?)?;

        let found = match parent_id {
            None => list.results.into_iter().next(),
            Some(parent_id) => list
                .results
                .into_iter()
                .find(|page| page.has_ancestor(parent_id)),
        };
        Ok(found)
    }

    /// Update a page's storage body (and optionally its title).
    ///
    /// Reads the current version, writes `version + 1`, and on a version
    /// conflict (HTTP 409) re-reads the version and writes exactly once more.
    /// A failure of the second write is returned unchanged.
    ///
    /// When the re-read page already carries the new title and body (an
    /// earlier attempt landed even though its response was lost), the
    /// re-read page is returned without writing again.
    pub fn update_page(&self, update: &PageUpdate<'_>) -> Result<Page, ConfluenceError> {
        let current = self.get_page(update.page_id, DEFAULT_EXPAND)?;
        let mut payload = update_payload(update, &current);

        match self.put_page(update, &mut payload, current.version_number()) {
            Err(err) if err.is_conflict() => {
                warn!(
                    "Version conflict on page {}; refetching and retrying once",
                    update.page_id
                );
                let refreshed = self.get_page(update.page_id, DEFAULT_EXPAND)?;
                if refreshed.version_number() > current.version_number()
                    && holds_payload(&refreshed, &payload)
                {
                    info!(
                        "Page {} already holds this content at version {}",
                        update.page_id,
                        refreshed.version_number()
                    );
                    return Ok(refreshed);
                }
                self.put_page(update, &mut payload, refreshed.version_number())
            }
            result => result,
        }
    }

    /// PUT the payload as version `current_version + 1`, requiring exactly 200.
    fn put_page(
        &self,
        update: &PageUpdate<'_>,
        payload: &mut Value,
        current_version: u32,
    ) -> Result<Page, ConfluenceError> {
        let next_version = current_version + 1;
        payload["version"]["number"] = json!(next_version);

        info!(
            "Updating page {} from version {} to {}",
            update.page_id, current_version, next_version
        );

        let value = self.execute(
            Request::put(
                format!("/rest/api/content/{}", encode(update.page_id)),
                payload.clone(),
            )
            .query("notifyWatchers", update.notify_watchers)
            .expect(&[200]),
        )?;
        let page: Page = serde_json::from_value(value)?;
        info!(
            "Updated page {} to version {}",
            update.page_id,
            page.version_number()
        );
        Ok(page)
    }
}

/// Payload for a content PUT; the version number is filled in per attempt.
fn update_payload(update: &PageUpdate<'_>, current: &Page) -> Value {
    json!({
        "id": update.page_id,
        "type": current.content_type.as_deref().unwrap_or("page"),
        "title": update.title.unwrap_or(current.title.as_str()),
        "version": {
            "number": current.version_number() + 1,
            "minorEdit": update.minor_edit
        },
        "body": {
            "storage": {
                "value": update.body_html,
                "representation": "storage"
            }
        }
    })
}

/// Whether `page` already has the title and storage body of `payload`.
fn holds_payload(page: &Page, payload: &Value) -> bool {
    payload["title"].as_str() == Some(page.title.as_str())
        && payload["body"]["storage"]["value"].as_str() == page.storage_html()
}
