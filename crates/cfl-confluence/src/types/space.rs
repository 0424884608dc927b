//! Confluence space and search types.

use serde::Deserialize;

use super::page::Page;

/// Space with its homepage expanded.
#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    /// Space key.
    #[serde(default)]
    pub key: String,
    /// Homepage content, when the space has one.
    #[serde(default)]
    pub homepage: Option<Page>,
}

/// CQL search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Search hits.
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One CQL search hit.
///
/// Non-content hits (users, spaces) carry no `content` object.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Matched content.
    #[serde(default)]
    pub content: Option<Page>,
}
