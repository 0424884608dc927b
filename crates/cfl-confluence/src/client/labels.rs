//! Label operations for Confluence API.

use serde_json::{Value, json};
use tracing::info;

use super::{ConfluenceClient, Request, encode};
use crate::error::ConfluenceError;

impl ConfluenceClient {
    /// Attach global labels to a page. Does nothing for an empty list.
    pub fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ConfluenceError> {
        if labels.is_empty() {
            return Ok(());
        }

        let payload: Vec<Value> = labels
            .iter()
            .map(|name| json!({"prefix": "global", "name": name}))
            .collect();

        info!("Adding {} label(s) to page {}", labels.len(), page_id);
        self.execute(Request::post(
            format!("/rest/api/content/{}/label", encode(page_id)),
            Value::Array(payload),
        ))?;
        Ok(())
    }
}
