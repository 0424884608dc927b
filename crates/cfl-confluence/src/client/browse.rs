//! Listing and search operations for Confluence API.

use tracing::info;

use super::{ConfluenceClient, Request, clamp_limit, encode};
use crate::error::ConfluenceError;
use crate::types::{ContentList, Page, SearchResponse};

/// Page size used when walking all children.
const CHILDREN_PAGE_SIZE: u32 = 100;

impl ConfluenceClient {
    /// Flat listing of current pages in a space.
    ///
    /// `title_contains` is sent as the server-side title filter and also
    /// applied client-side as a case-insensitive substring match.
    pub fn list_pages_in_space(
        &self,
        space_key: &str,
        limit: u32,
        start: u32,
        title_contains: Option<&str>,
    ) -> Result<Vec<Page>, ConfluenceError> {
        let mut request = Request::get("/rest/api/content")
            .query("type", "page")
            .query("spaceKey", space_key)
            .query("limit", clamp_limit(limit))
            .query("start", start)
            .query("expand", "_links")
            .query("status", "current");
        if let Some(title) = title_contains {
            request = request.query("title", title);
        }

        let list: ContentList = serde_json::from_value(self.execute(request)?)?;

        let pages = match title_contains {
            Some(needle) => {
                let needle = needle.to_lowercase();
                list.results
                    .into_iter()
                    .filter(|p| p.title.to_lowercase().contains(&needle))
                    .collect()
            }
            None => list.results,
        };
        Ok(pages)
    }

    /// One page of current direct children of a page.
    pub fn list_children(
        &self,
        page_id: &str,
        limit: u32,
        start: u32,
    ) -> Result<Vec<Page>, ConfluenceError> {
        let request = Request::get(format!("/rest/api/content/{}/child/page", encode(page_id)))
            .query("limit", clamp_limit(limit))
            .query("start", start)
            .query("expand", "_links")
            .query("status", "current");

        let list: ContentList = serde_json::from_value(self.execute(request)?)?;
        Ok(list.results)
    }

    /// All current direct children of a page, in server order.
    ///
    /// Fetches 100 at a time until an empty or short page signals the end.
    pub fn list_all_children(&self, page_id: &str) -> Result<Vec<Page>, ConfluenceError> {
        let mut children = Vec::new();
        let mut start = 0;

        loop {
            let chunk = self.list_children(page_id, CHILDREN_PAGE_SIZE, start)?;
            let exhausted = chunk.len() < CHILDREN_PAGE_SIZE as usize;
            children.extend(chunk);
            if exhausted {
                break;
            }
            start += CHILDREN_PAGE_SIZE;
        }

        info!("Found {} children of page {}", children.len(), page_id);
        Ok(children)
    }

    /// Search with CQL, keeping only page hits.
    pub fn search_cql(
        &self,
        cql: &str,
        limit: u32,
        start: u32,
    ) -> Result<Vec<Page>, ConfluenceError> {
        let request = Request::get("/rest/api/search")
            .query("cql", cql)
            .query("limit", clamp_limit(limit))
            .query("start", start)
            .query("expand", "content._links");

        let response: SearchResponse = serde_json::from_value(self.execute(request)?)?;
        Ok(response
            .results
            .into_iter()
            .filter_map(|hit| hit.content)
            .filter(|content| content.content_type.as_deref() == Some("page"))
            .collect())
    }
}
