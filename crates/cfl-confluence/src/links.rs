//! Browsable page URLs.

use crate::client::ConfluenceClient;
use crate::types::Page;

impl ConfluenceClient {
    /// Direct link to a page from an API response.
    ///
    /// Prefers `_links.base + _links.webui`, then `webui` or `tinyui` joined to
    /// the client base URL, then a URL built from the page ID. Cloud base URLs
    /// end in `/wiki` and address pages under their space when it is known.
    /// Returns `None` when the response has neither links nor an ID.
    pub fn page_link(&self, page: &Page) -> Option<String> {
        let links = &page.links;

        if let Some(webui) = &links.webui {
            if let Some(base) = &links.base {
                return Some(format!("{base}{webui}"));
            }
            return Some(self.join(webui));
        }

        if let Some(tinyui) = &links.tinyui {
            return Some(self.join(tinyui));
        }

        let page_id = page.id.as_deref()?;
        let base_url = self.base_url();
        match page.space_key() {
            Some(space_key) if base_url.ends_with("/wiki") => {
                Some(format!("{base_url}/spaces/{space_key}/pages/{page_id}"))
            }
            _ => Some(format!("{base_url}/pages/{page_id}")),
        }
    }

    fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url(), path)
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }
}
