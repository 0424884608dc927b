//! Confluence API types.

mod page;
mod space;

pub use page::{Ancestor, Body, ContentList, Links, Page, SpaceRef, Storage, Version};
pub use space::{SearchResponse, SearchResult, Space};
