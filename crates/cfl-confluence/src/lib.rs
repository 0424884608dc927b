//! Confluence REST API client.
//!
//! This crate provides the network core of the `confluence` CLI:
//! - [`ConfluenceClient`]: bearer-token client with retry and typed errors
//! - Page operations: create, read, find by title, update with conflict retry
//! - Browsing: space listing, children, CQL search, space homepage, page links
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cfl_confluence::{ClientOptions, ConfluenceClient, PageUpdate};
//!
//! let client = ConfluenceClient::new(
//!     "https://example.atlassian.net/wiki",
//!     "personal-access-token",
//!     ClientOptions::default(),
//! );
//!
//! let page = client.update_page(&PageUpdate {
//!     page_id: "123",
//!     body_html: "<p>Hello</p>",
//!     title: None,
//!     minor_edit: true,
//!     notify_watchers: false,
//! })?;
//! println!("Now at version {}", page.version_number());
//! # Ok(())
//! # }
//! ```

// API client
mod client;
pub use client::{
    ClientOptions, ConfluenceClient, DEFAULT_EXPAND, HttpRequest, HttpResponse, Method, NewPage,
    PageUpdate, RetryPolicy, Transport, UreqTransport,
};

mod links;

// Types
pub mod types;
pub use types::Page;

// Errors
pub mod error;
pub use error::{ConfluenceError, ErrorKind};

#[cfg(test)]
mod testing;
