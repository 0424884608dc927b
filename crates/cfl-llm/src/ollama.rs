use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use ureq::Agent;

use crate::http::{agent, post_json};
use crate::{ChatModel, LlmError, Message, TEMPERATURE};

const PROVIDER: &str = "ollama";

/// Local models are slow on first load.
const TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: Options,
}

#[derive(Serialize)]
struct Options {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

/// Client for Ollama's `/api/chat`.
pub struct OllamaChat {
    agent: Agent,
    url: String,
    model: String,
}

impl OllamaChat {
    /// Client for `base` (e.g. `http://localhost:11434`) and `model`.
    #[must_use]
    pub fn new(base: &str, model: &str) -> Self {
        Self {
            agent: agent(TIMEOUT),
            url: format!("{}/api/chat", base.trim_end_matches('/')),
            model: model.to_owned(),
        }
    }

    fn request<'a>(&'a self, messages: &'a [Message]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: Options {
                temperature: TEMPERATURE,
            },
        }
    }
}

fn reply(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .message
        .map(|m| m.content.trim().to_owned())
        .filter(|content| !content.is_empty())
        .ok_or(LlmError::EmptyReply(PROVIDER))
}

impl ChatModel for OllamaChat {
    fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        info!("asking {} at {}", self.model, self.url);
        let body = post_json(&self.agent, PROVIDER, &self.url, None, &self.request(messages))?;
        reply(&body)
    }

    fn describe(&self) -> String {
        format!("{PROVIDER} {}", self.model)
    }
}
