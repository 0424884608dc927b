//! Profile configuration for the `confluence` CLI.
//!
//! Credentials and defaults live in a TOML file with one table per profile:
//!
//! ```toml
//! [default]
//! base_url = "https://example.atlassian.net/wiki"
//! pat = "${CONFLUENCE_TOKEN}"
//! default_space_key = "DOC"
//!
//! [staging]
//! base_url = "https://wiki.staging.example.com"
//! pat = "..."
//! ```
//!
//! LLM settings for `confluence author` sit either in a nested table or as
//! flat keys in the profile; the nested table wins:
//!
//! ```toml
//! [work.llm]
//! provider = "openai_compat"
//! api_base = "http://localhost:8000/v1"
//! api_key = "${LLM_KEY}"
//! model = "mistral-7b-instruct"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `base_url`, `pat`, `default_space_key`, `space_key` and the LLM endpoint
//! and key settings support `${VAR}` and `${VAR:-default}` references.
//!
//! Keys this crate does not know about are ignored on load and preserved on save.

mod expand;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use toml::{Table, Value};

/// Profile used when none is selected.
pub const DEFAULT_PROFILE: &str = "default";

/// Location of the profile file, before tilde expansion.
const DEFAULT_CONFIG_PATH: &str = "~/.config/confluence-cli/config.toml";

/// Default config file path (`~/.config/confluence-cli/config.toml`).
#[must_use]
pub fn default_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())
}

/// Where `confluence author` keeps drafts, before tilde expansion.
const DEFAULT_DRAFTS_DIR: &str = "~/.confluence-cli/drafts";

/// Default drafts directory (`~/.confluence-cli/drafts`).
#[must_use]
pub fn default_drafts_dir() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_DRAFTS_DIR).as_ref())
}

/// One profile table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Profile {
    /// Confluence base URL (Cloud URLs end in `/wiki`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Personal access token / API token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pat: Option<String>,
    /// Space used when a command gets no `--space-key`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_space_key: Option<String>,
    /// Older spelling of `default_space_key`, still honoured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_key: Option<String>,
    /// Parent page used by `create` when none is given.
    #[serde(
        deserialize_with = "string_or_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_page_id: Option<String>,
    /// HTTP timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Retry budget for transient failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    /// Flat form of [`LlmSettings::provider`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
    /// Flat form of [`LlmSettings::model`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Flat form of [`LlmSettings::ollama_base`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_base: Option<String>,
    /// Flat form of [`LlmSettings::api_base`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Flat form of [`LlmSettings::api_key`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Nested `[<profile>.llm]` table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmSettings>,
}

/// LLM provider used by `confluence author`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmSettings {
    /// `ollama` or `openai_compat`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Ollama server URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_base: Option<String>,
    /// OpenAI-compatible API base, including the version path (`.../v1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// OpenAI-compatible API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl LlmSettings {
    /// Provider name, trimmed and lowercased; `None` when unset or blank.
    #[must_use]
    pub fn provider_name(&self) -> Option<String> {
        non_empty(self.provider.as_deref().map(str::trim)).map(str::to_lowercase)
    }

    fn problems(&self) -> Vec<String> {
        let missing = |key: &str, value: &Option<String>| {
            non_empty(value.as_deref().map(str::trim)).is_none().then(|| key.to_owned())
        };

        match self.provider_name().as_deref() {
            None | Some("ollama") => Vec::new(),
            Some("openai_compat") => [
                missing("api_base", &self.api_base),
                missing("api_key", &self.api_key),
                missing("model", &self.model),
            ]
            .into_iter()
            .flatten()
            .map(|key| format!("llm.{key} is required for provider=openai_compat"))
            .collect(),
            Some(other) => vec![format!("llm.provider invalid: \"{other}\"")],
        }
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("llm.ollama_base", &mut self.ollama_base),
            ("llm.api_base", &mut self.api_base),
            ("llm.api_key", &mut self.api_key),
        ] {
            if let Some(v) = value {
                *v = expand::expand_env(v, key)?;
            }
        }
        Ok(())
    }
}

impl Profile {
    /// Resolve the space key: explicit value, then `space_key`, then `default_space_key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when none of them is set.
    pub fn resolve_space_key(&self, explicit: Option<&str>) -> Result<String, ConfigError> {
        non_empty(explicit)
            .or_else(|| non_empty(self.space_key.as_deref()))
            .or_else(|| non_empty(self.default_space_key.as_deref()))
            .map(str::to_owned)
            .ok_or_else(|| ConfigError::Missing {
                key: "space_key".to_owned(),
                hint: "pass --space-key or set default_space_key in the profile".to_owned(),
            })
    }

    /// Whether any space key can be resolved without an explicit value.
    #[must_use]
    pub fn has_space_key(&self) -> bool {
        self.resolve_space_key(None).is_ok()
    }

    /// LLM settings: the nested `llm` table, with flat keys filling gaps.
    #[must_use]
    pub fn llm_settings(&self) -> LlmSettings {
        let nested = self.llm.clone().unwrap_or_default();
        LlmSettings {
            provider: nested.provider.or_else(|| self.llm_provider.clone()),
            model: nested.model.or_else(|| self.model.clone()),
            ollama_base: nested.ollama_base.or_else(|| self.ollama_base.clone()),
            api_base: nested.api_base.or_else(|| self.api_base.clone()),
            api_key: nested.api_key.or_else(|| self.api_key.clone()),
        }
    }

    /// Copy with secrets masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "***".to_owned());
        Self {
            pat: mask(&self.pat),
            api_key: mask(&self.api_key),
            llm: self.llm.as_ref().map(|llm| LlmSettings {
                api_key: mask(&llm.api_key),
                ..llm.clone()
            }),
            ..self.clone()
        }
    }

    /// Problems that would stop API commands from working.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        match non_empty(self.base_url.as_deref()) {
            None => problems.push("Missing required key: base_url".to_owned()),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                problems.push("base_url must start with http:// or https://".to_owned());
            }
            Some(_) => {}
        }
        if non_empty(self.pat.as_deref()).is_none() {
            problems.push("Missing required key: pat".to_owned());
        }
        if self.retries.is_some_and(|r| r > 10) {
            problems.push("retries cannot exceed 10".to_owned());
        }
        if self.timeout == Some(0) {
            problems.push("timeout must be greater than 0".to_owned());
        }
        problems.extend(self.llm_settings().problems());

        problems
    }

    /// Expand environment variable references in string values.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("base_url", &mut self.base_url),
            ("pat", &mut self.pat),
            ("default_space_key", &mut self.default_space_key),
            ("space_key", &mut self.space_key),
            ("ollama_base", &mut self.ollama_base),
            ("api_base", &mut self.api_base),
            ("api_key", &mut self.api_key),
        ] {
            if let Some(v) = value {
                *v = expand::expand_env(v, key)?;
            }
        }
        if let Some(llm) = &mut self.llm {
            llm.expand_env_vars()?;
        }
        Ok(())
    }
}

/// Where a loaded profile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    /// The requested profile table.
    File,
    /// `[default]`, because the requested profile does not exist.
    DefaultFallback,
    /// Nothing: no config file, or neither table exists.
    Empty,
}

/// Profile plus where it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedProfile {
    /// Requested profile name.
    pub name: String,
    /// Config file path.
    pub path: PathBuf,
    /// How the profile was found.
    pub source: ProfileSource,
    /// Profile values (environment references expanded).
    pub profile: Profile,
}

/// Reads and writes the profile file.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Store at `path`, or at [`default_config_path`] when `None`.
    #[must_use]
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map_or_else(default_config_path, Path::to_path_buf),
        }
    }

    /// Config file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a profile, falling back to `[default]`.
    ///
    /// A missing file yields an empty profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, the profile is
    /// not a table, or an environment reference is unset.
    pub fn load(&self, name: &str) -> Result<LoadedProfile, ConfigError> {
        let table = self.read_table()?;

        let (source, value) = match (table.get(name), table.get(DEFAULT_PROFILE)) {
            (Some(value), _) => (ProfileSource::File, Some(value)),
            (None, Some(value)) => (ProfileSource::DefaultFallback, Some(value)),
            (None, None) => (ProfileSource::Empty, None),
        };

        let mut profile = match value {
            Some(Value::Table(t)) => Value::Table(t.clone()).try_into::<Profile>()?,
            Some(_) => {
                return Err(ConfigError::Validation(format!(
                    "profile [{name}] must be a table"
                )));
            }
            None => Profile::default(),
        };
        profile.expand_env_vars()?;

        Ok(LoadedProfile {
            name: name.to_owned(),
            path: self.path.clone(),
            source,
            profile,
        })
    }

    /// The named profile table exactly as written in the file.
    ///
    /// Unlike [`ProfileStore::load`] there is no `[default]` fallback and no
    /// environment expansion, so `${VAR}` references come back verbatim.
    /// A missing file or table yields an empty profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the profile
    /// is not a table.
    pub fn load_stored(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.read_table()?.remove(name) {
            Some(Value::Table(t)) => Ok(Value::Table(t).try_into::<Profile>()?),
            Some(_) => Err(ConfigError::Validation(format!(
                "profile [{name}] must be a table"
            ))),
            None => Ok(Profile::default()),
        }
    }

    /// Write `updates` into a profile.
    ///
    /// Merges into the existing table unless `replace` is set. Other profiles
    /// and unknown keys are kept; a `[default]` table always exists afterwards.
    /// A dotted key such as `llm.model` writes into the nested table. Values
    /// are stored verbatim (no environment expansion).
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file is unreadable or invalid, or the
    /// new file cannot be written.
    pub fn save(&self, name: &str, updates: &[(&str, &str)], replace: bool) -> Result<(), ConfigError> {
        let mut table = self.read_table()?;

        let mut profile = match table.remove(name) {
            Some(Value::Table(existing)) if !replace => existing,
            _ => Table::new(),
        };
        for (key, value) in updates {
            let value = Value::String((*value).to_owned());
            match key.split_once('.') {
                Some((section, field)) => {
                    let entry = profile
                        .entry(section)
                        .or_insert_with(|| Value::Table(Table::new()));
                    if !entry.is_table() {
                        *entry = Value::Table(Table::new());
                    }
                    if let Value::Table(nested) = entry {
                        nested.insert(field.to_owned(), value);
                    }
                }
                None => {
                    profile.insert((*key).to_owned(), value);
                }
            }
        }
        table.insert(name.to_owned(), Value::Table(profile));
        table
            .entry(DEFAULT_PROFILE)
            .or_insert_with(|| Value::Table(Table::new()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&table)?)?;
        Ok(())
    }

    fn read_table(&self) -> Result<Table, ConfigError> {
        if !self.path.exists() {
            return Ok(Table::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Resolve a required setting: explicit value first, then the profile value.
///
/// Empty strings count as unset.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] when neither is set.
pub fn resolve_required(
    key: &str,
    explicit: Option<&str>,
    profile_value: Option<&str>,
) -> Result<String, ConfigError> {
    non_empty(explicit)
        .or_else(|| non_empty(profile_value))
        .map(str::to_owned)
        .ok_or_else(|| ConfigError::Missing {
            key: key.to_owned(),
            hint: format!("pass --{} or run `confluence auth login`", key.replace('_', "-")),
        })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Accept `parent_page_id = 123` as well as `parent_page_id = "123"`.
fn string_or_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    }))
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML write error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Required setting missing from both the command line and the profile.
    #[error("Missing required option: {key} ({hint})")]
    Missing {
        /// Setting name.
        key: String,
        /// How to provide it.
        hint: String,
    },
    /// Environment variable error during expansion.
    #[error("Environment variable error in {key}: {message}")]
    EnvVar {
        /// Profile key (e.g., "pat").
        key: String,
        /// Error message (e.g., "${`CONFLUENCE_TOKEN`} not set").
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn store_with(content: &str) -> (TempDir, ProfileStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        let store = ProfileStore::new(Some(&path));
        (dir, store)
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with(".config/confluence-cli/config.toml"));
        assert!(!path.starts_with("~"));
        assert!(default_drafts_dir().ends_with(".confluence-cli/drafts"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(Some(&dir.path().join("absent.toml")));

        let loaded = store.load("work").unwrap();

        assert_eq!(loaded.source, ProfileSource::Empty);
        assert_eq!(loaded.profile, Profile::default());
    }

    #[test]
    fn test_load_named_profile() {
        let (_dir, store) = store_with(
            r#"
[default]
base_url = "https://default.example.com"

[work]
base_url = "https://corp.atlassian.net/wiki"
pat = "tok"
default_space_key = "ENG"
parent_page_id = 4242
retries = 5
llm_provider = "ollama"
"#,
        );

        let loaded = store.load("work").unwrap();

        assert_eq!(loaded.source, ProfileSource::File);
        assert_eq!(
            loaded.profile,
            Profile {
                base_url: Some("https://corp.atlassian.net/wiki".to_owned()),
                pat: Some("tok".to_owned()),
                default_space_key: Some("ENG".to_owned()),
                parent_page_id: Some("4242".to_owned()),
                retries: Some(5),
                llm_provider: Some("ollama".to_owned()),
                ..Profile::default()
            }
        );
    }

    #[test]
    fn test_load_falls_back_to_default() {
        let (_dir, store) = store_with("[default]\nbase_url = \"https://d.example.com\"\n");

        let loaded = store.load("missing").unwrap();

        assert_eq!(loaded.source, ProfileSource::DefaultFallback);
        assert_eq!(loaded.profile.base_url.as_deref(), Some("https://d.example.com"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let (_dir, store) = store_with("[default\nbase_url = ");
        assert!(matches!(store.load("default"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_expands_env() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("CFL_TEST_PROFILE_PAT", "from-env");
        }
        let (_dir, store) = store_with("[default]\npat = \"${CFL_TEST_PROFILE_PAT}\"\n");

        let loaded = store.load("default").unwrap();

        assert_eq!(loaded.profile.pat.as_deref(), Some("from-env"));
        unsafe {
            std::env::remove_var("CFL_TEST_PROFILE_PAT");
        }
    }

    #[test]
    fn test_load_stored_keeps_references_and_skips_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("CFL_TEST_STORED_PAT", "resolved");
        }
        let (_dir, store) = store_with(
            r#"
[default]
base_url = "https://default.example.com"

[work]
pat = "${CFL_TEST_STORED_PAT}"
"#,
        );

        let stored = store.load_stored("work").unwrap();

        assert_eq!(stored.pat.as_deref(), Some("${CFL_TEST_STORED_PAT}"));
        assert_eq!(stored.base_url, None);
        assert_eq!(store.load_stored("absent").unwrap(), Profile::default());
        unsafe {
            std::env::remove_var("CFL_TEST_STORED_PAT");
        }
    }

    #[test]
    fn test_llm_settings_nested_over_flat() {
        let (_dir, store) = store_with(
            r#"
[default]
llm_provider = "ollama"
model = "flat-model"
api_key = "flat-key"

[default.llm]
provider = "openai_compat"
api_base = "http://localhost:8000/v1"
"#,
        );

        let profile = store.load("default").unwrap().profile;
        let llm = profile.llm_settings();

        assert_eq!(llm.provider_name().as_deref(), Some("openai_compat"));
        assert_eq!(llm.model.as_deref(), Some("flat-model"));
        assert_eq!(llm.api_base.as_deref(), Some("http://localhost:8000/v1"));
        assert_eq!(llm.api_key.as_deref(), Some("flat-key"));
        assert_eq!(llm.ollama_base, None);
    }

    #[test]
    fn test_llm_problems() {
        let base = Profile {
            base_url: Some("https://wiki.example.com".to_owned()),
            pat: Some("t".to_owned()),
            ..Profile::default()
        };

        let unknown = Profile {
            llm_provider: Some("Claude".to_owned()),
            ..base.clone()
        };
        assert_eq!(unknown.problems(), vec![r#"llm.provider invalid: "claude""#.to_owned()]);

        let openai = Profile {
            llm: Some(LlmSettings {
                provider: Some("openai_compat".to_owned()),
                model: Some("m".to_owned()),
                ..LlmSettings::default()
            }),
            ..base.clone()
        };
        assert_eq!(
            openai.problems(),
            vec![
                "llm.api_base is required for provider=openai_compat".to_owned(),
                "llm.api_key is required for provider=openai_compat".to_owned()
            ]
        );

        let ollama = Profile {
            llm_provider: Some("ollama".to_owned()),
            ..base
        };
        assert!(ollama.problems().is_empty());
    }

    #[test]
    fn test_save_creates_file_with_default_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/config.toml");
        let store = ProfileStore::new(Some(&path));

        store
            .save("work", &[("base_url", "https://w.example.com"), ("pat", "t")], false)
            .unwrap();

        let table: Table = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(table.contains_key(DEFAULT_PROFILE));
        let loaded = store.load("work").unwrap();
        assert_eq!(loaded.profile.base_url.as_deref(), Some("https://w.example.com"));
        assert_eq!(loaded.profile.pat.as_deref(), Some("t"));
    }

    #[test]
    fn test_save_merges_and_keeps_unknown_keys() {
        let (_dir, store) = store_with(
            r#"
[default]
base_url = "https://old.example.com"
pat = "old"
model = "mistral:latest"

[other]
pat = "other-token"
"#,
        );

        store.save("default", &[("pat", "new")], false).unwrap();

        let table: Table =
            toml::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        let default = table["default"].as_table().unwrap();
        assert_eq!(default["pat"].as_str(), Some("new"));
        assert_eq!(default["base_url"].as_str(), Some("https://old.example.com"));
        assert_eq!(default["model"].as_str(), Some("mistral:latest"));
        assert_eq!(table["other"]["pat"].as_str(), Some("other-token"));
    }

    #[test]
    fn test_save_dotted_key_into_nested_table() {
        let (_dir, store) = store_with("[work.llm]\nprovider = \"ollama\"\nmodel = \"old\"\n");

        store.save("work", &[("llm.model", "llama3")], false).unwrap();

        let stored = store.load_stored("work").unwrap();
        let llm = stored.llm.unwrap();
        assert_eq!(llm.provider.as_deref(), Some("ollama"));
        assert_eq!(llm.model.as_deref(), Some("llama3"));
        assert_eq!(stored.model, None);
    }

    #[test]
    fn test_save_replace_profile() {
        let (_dir, store) = store_with("[default]\nbase_url = \"https://old\"\npat = \"old\"\n");

        store.save("default", &[("pat", "new")], true).unwrap();

        let loaded = store.load("default").unwrap();
        assert_eq!(loaded.profile.base_url, None);
        assert_eq!(loaded.profile.pat.as_deref(), Some("new"));
    }

    #[test]
    fn test_resolve_required() {
        assert_eq!(
            resolve_required("base_url", Some("https://cli"), Some("https://cfg")).unwrap(),
            "https://cli"
        );
        assert_eq!(
            resolve_required("base_url", Some(""), Some("https://cfg")).unwrap(),
            "https://cfg"
        );
        let err = resolve_required("base_url", None, Some("")).unwrap_err();
        assert!(err.to_string().contains("--base-url"));
    }

    #[test]
    fn test_resolve_space_key_precedence() {
        let profile = Profile {
            default_space_key: Some("DEF".to_owned()),
            space_key: Some("LEGACY".to_owned()),
            ..Profile::default()
        };
        assert_eq!(profile.resolve_space_key(Some("CLI")).unwrap(), "CLI");
        assert_eq!(profile.resolve_space_key(None).unwrap(), "LEGACY");

        let profile = Profile {
            default_space_key: Some("DEF".to_owned()),
            ..Profile::default()
        };
        assert_eq!(profile.resolve_space_key(None).unwrap(), "DEF");
        assert!(Profile::default().resolve_space_key(None).is_err());
        assert!(!Profile::default().has_space_key());
    }

    #[test]
    fn test_redacted_masks_token() {
        let profile = Profile {
            base_url: Some("https://x".to_owned()),
            pat: Some("secret".to_owned()),
            ..Profile::default()
        };
        let redacted = profile.redacted();
        assert_eq!(redacted.pat.as_deref(), Some("***"));
        assert_eq!(redacted.base_url, profile.base_url);

        let profile = Profile {
            api_key: Some("flat".to_owned()),
            llm: Some(LlmSettings {
                api_key: Some("nested".to_owned()),
                model: Some("m".to_owned()),
                ..LlmSettings::default()
            }),
            ..Profile::default()
        };
        let redacted = profile.redacted();
        assert_eq!(redacted.api_key.as_deref(), Some("***"));
        let llm = redacted.llm.unwrap();
        assert_eq!(llm.api_key.as_deref(), Some("***"));
        assert_eq!(llm.model.as_deref(), Some("m"));
    }

    #[test]
    fn test_problems() {
        assert_eq!(
            Profile::default().problems(),
            vec![
                "Missing required key: base_url".to_owned(),
                "Missing required key: pat".to_owned()
            ]
        );

        let bad_url = Profile {
            base_url: Some("wiki.example.com".to_owned()),
            pat: Some("t".to_owned()),
            timeout: Some(0),
            ..Profile::default()
        };
        assert_eq!(
            bad_url.problems(),
            vec![
                "base_url must start with http:// or https://".to_owned(),
                "timeout must be greater than 0".to_owned()
            ]
        );

        let ok = Profile {
            base_url: Some("https://wiki.example.com".to_owned()),
            pat: Some("t".to_owned()),
            ..Profile::default()
        };
        assert!(ok.problems().is_empty());
    }
}
