//! Confluence page types.

use serde::{Deserialize, Deserializer, Serialize};

/// Confluence page (or other content object).
///
/// Only fields the client reads are modelled; serde ignores the rest.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Content type ("page", "blogpost", ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Content status ("current", "archived", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Owning space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<SpaceRef>,
    /// Version information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    /// Parent chain, root first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<Ancestor>,
    /// Page body content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl Page {
    /// Current version number, 0 when the response carried none.
    #[must_use]
    pub fn version_number(&self) -> u32 {
        self.version.as_ref().map_or(0, |v| v.number)
    }

    /// Whether `parent_id` appears anywhere in the ancestor chain.
    #[must_use]
    pub fn has_ancestor(&self, parent_id: &str) -> bool {
        self.ancestors.iter().any(|a| a.id == parent_id)
    }

    /// Storage-format body, when `body.storage` was expanded.
    #[must_use]
    pub fn storage_html(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map(|s| s.value.as_str())
    }

    /// Space key, if the response included the space.
    #[must_use]
    pub fn space_key(&self) -> Option<&str> {
        self.space.as_ref().map(|s| s.key.as_str())
    }
}

/// Reference to a space by key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpaceRef {
    /// Space key.
    pub key: String,
}

/// Ancestor reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ancestor {
    /// Ancestor page ID.
    #[serde(deserialize_with = "id")]
    pub id: String,
    /// Ancestor title, when expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
    /// Whether the edit was marked minor.
    #[serde(rename = "minorEdit", default)]
    pub minor_edit: bool,
    /// Version message/comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Page body content.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Body {
    /// Storage format content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Storage>,
    /// Rendered web view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<Storage>,
    /// Rendered export view (printable).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_view: Option<Storage>,
}

/// Body representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    /// HTML content.
    pub value: String,
    /// Content representation ("storage", "view", "export_view").
    #[serde(default)]
    pub representation: String,
}

/// Hypermedia links.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Links {
    /// Web UI path relative to `base`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webui: Option<String>,
    /// Site base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Short link path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tinyui: Option<String>,
    /// API self link.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Content listing response (`results` only).
#[derive(Debug, Clone, Deserialize)]
pub struct ContentList {
    /// Content objects.
    #[serde(default)]
    pub results: Vec<Page>,
}

/// Content IDs arrive as strings from most deployments and as numbers from some.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
