//! Space operations for Confluence API.

use tracing::info;

use super::{ConfluenceClient, Request, encode};
use crate::error::ConfluenceError;
use crate::types::Space;

impl ConfluenceClient {
    /// Homepage ID of a space, `None` when the space has no homepage.
    pub fn get_space_homepage(&self, space_key: &str) -> Result<Option<String>, ConfluenceError> {
        info!("Getting homepage of space {}", space_key);

        let request = Request::get(format!("/rest/api/space/{}", encode(space_key)))
            .query("expand", "homepage");
        let space: Space = serde_json::from_value(self.execute(request)?)?;

        Ok(space.homepage.and_then(|home| home.id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::HttpResponse;
    use crate::error::ErrorKind;
    use crate::testing::{ScriptedTransport, ok};

    #[test]
    fn test_space_homepage() {
        let (client, calls) = ScriptedTransport::client(
            vec![ok(&json!({"key": "DOC", "homepage": {"id": 65_537, "title": "Home"}}))],
            0,
        );

        assert_eq!(client.get_space_homepage("DOC").unwrap().as_deref(), Some("65537"));
        assert_eq!(
            calls.last().url,
            "https://wiki.example.com/rest/api/space/DOC?expand=homepage"
        );
    }

    #[test]
    fn test_space_without_homepage() {
        let (client, _) = ScriptedTransport::client(vec![ok(&json!({"key": "DOC"}))], 0);
        assert!(client.get_space_homepage("DOC").unwrap().is_none());
    }

    #[test]
    fn test_missing_space() {
        let (client, _) = ScriptedTransport::client(vec![Ok(HttpResponse::new(404, ""))], 0);
        let err = client.get_space_homepage("NOPE").unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }
}
