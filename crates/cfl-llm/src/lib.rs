//! Chat clients for self-hosted LLMs.
//!
//! Two providers are supported, both plain JSON over HTTP:
//!
//! - [`OllamaChat`]: Ollama's `/api/chat`
//! - [`OpenAiCompatChat`]: any server speaking OpenAI's `/chat/completions`
//!   (vLLM, llama.cpp server, LM Studio, ...)
//!
//! [`from_settings`] picks one from a profile's [`LlmSettings`].

mod error;
mod http;
mod ollama;
mod openai;
pub mod prompts;

use cfl_config::LlmSettings;
use serde::Serialize;

pub use error::LlmError;
pub use ollama::OllamaChat;
pub use openai::OpenAiCompatChat;

/// Ollama server used when the profile names none.
pub const DEFAULT_OLLAMA_BASE: &str = "http://localhost:11434";

/// Ollama model used when the profile names none.
pub const DEFAULT_OLLAMA_MODEL: &str = "mistral:latest";

/// Sampling temperature for drafting.
const TEMPERATURE: f32 = 0.3;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// System instruction.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A model that answers a conversation with one assistant message.
pub trait ChatModel {
    /// Assistant reply to `messages`.
    fn chat(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// Short description for progress messages, e.g. `ollama mistral:latest`.
    fn describe(&self) -> String;
}

/// Build the chat client a profile asks for.
///
/// Settings are trimmed; blank values count as unset.
///
/// # Errors
///
/// Returns [`LlmError::Config`] when no provider is set, the provider is
/// unknown, or `openai_compat` lacks `api_base`, `api_key` or `model`.
pub fn from_settings(settings: &LlmSettings) -> Result<Box<dyn ChatModel>, LlmError> {
    let value = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned);

    match settings.provider_name().as_deref() {
        None => Err(LlmError::Config(
            "no LLM configured; pass --no-llm, or set llm_provider (ollama or openai_compat) \
             and model in the profile (`confluence auth login --configure-llm`)"
                .to_owned(),
        )),
        Some("ollama") => Ok(Box::new(OllamaChat::new(
            &value(settings.ollama_base.as_deref()).unwrap_or_else(|| DEFAULT_OLLAMA_BASE.to_owned()),
            &value(settings.model.as_deref()).unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_owned()),
        ))),
        Some("openai_compat") => {
            let (api_base, api_key, model) = (
                value(settings.api_base.as_deref()),
                value(settings.api_key.as_deref()),
                value(settings.model.as_deref()),
            );
            match (api_base, api_key, model) {
                (Some(api_base), Some(api_key), Some(model)) => {
                    Ok(Box::new(OpenAiCompatChat::new(&api_base, &api_key, &model)))
                }
                (api_base, api_key, model) => {
                    let missing: Vec<&str> = [
                        ("api_base", api_base.is_none()),
                        ("api_key", api_key.is_none()),
                        ("model", model.is_none()),
                    ]
                    .into_iter()
                    .filter_map(|(key, absent)| absent.then_some(key))
                    .collect();
                    Err(LlmError::Config(format!(
                        "provider=openai_compat requires: {}",
                        missing.join(", ")
                    )))
                }
            }
        }
        Some(other) => Err(LlmError::Config(format!(
            "unknown LLM provider '{other}'; use ollama or openai_compat"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn settings(provider: &str) -> LlmSettings {
        LlmSettings {
            provider: Some(provider.to_owned()),
            ..LlmSettings::default()
        }
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        assert_eq!(
            serde_json::to_value(Message::system("be brief")).unwrap(),
            serde_json::json!({"role": "system", "content": "be brief"})
        );
    }

    #[test]
    fn test_from_settings_ollama_defaults() {
        let model = from_settings(&settings(" Ollama ")).unwrap();
        assert_eq!(model.describe(), "ollama mistral:latest");
    }

    #[test]
    fn test_from_settings_openai_missing_keys() {
        let mut openai = settings("openai_compat");
        openai.model = Some("m".to_owned());
        openai.api_key = Some("  ".to_owned());

        let err = from_settings(&openai).err().unwrap();

        assert_eq!(
            err.to_string(),
            "LLM configuration error: provider=openai_compat requires: api_base, api_key"
        );
    }

    #[test]
    fn test_from_settings_openai() {
        let openai = LlmSettings {
            provider: Some("openai_compat".to_owned()),
            api_base: Some("http://localhost:8000/v1/".to_owned()),
            api_key: Some("k".to_owned()),
            model: Some("mistral-7b-instruct".to_owned()),
            ..LlmSettings::default()
        };
        assert_eq!(
            from_settings(&openai).unwrap().describe(),
            "openai_compat mistral-7b-instruct"
        );
    }

    #[test]
    fn test_from_settings_unset_or_unknown() {
        assert!(matches!(
            from_settings(&LlmSettings::default()),
            Err(LlmError::Config(_))
        ));
        assert!(matches!(from_settings(&settings("gpt")), Err(LlmError::Config(_))));
    }
}
