use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use ureq::Agent;

use crate::http::{agent, post_json};
use crate::{ChatModel, LlmError, Message, TEMPERATURE};

const PROVIDER: &str = "openai_compat";

const TIMEOUT: Duration = Duration::from_secs(60);

const MAX_TOKENS: u32 = 1200;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiCompatChat {
    agent: Agent,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatChat {
    /// Client for `api_base` (e.g. `http://localhost:8000/v1`).
    #[must_use]
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        Self {
            agent: agent(TIMEOUT),
            url: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        }
    }

    fn request<'a>(&'a self, messages: &'a [Message]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        }
    }
}

fn reply(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_owned())
        .filter(|content| !content.is_empty())
        .ok_or(LlmError::EmptyReply(PROVIDER))
}

impl ChatModel for OpenAiCompatChat {
    fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        info!("asking {} at {}", self.model, self.url);
        let body = post_json(
            &self.agent,
            PROVIDER,
            &self.url,
            Some(&self.api_key),
            &self.request(messages),
        )?;
        reply(&body)
    }

    fn describe(&self) -> String {
        format!("{PROVIDER} {}", self.model)
    }
}
