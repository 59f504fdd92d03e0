use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Printed when nothing matched and the fallback could not help either.
/// The caller cannot tell those two situations apart on purpose.
pub const DEFAULT_ANSWER: &str = "Sorry, I don't have an answer for that yet.";

const SYSTEM_INSTRUCTION: &str = "Answer the question.";
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_HISTORY_MESSAGES: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Per-session conversation history. Oldest messages are dropped once the
/// cap is reached; the fixed system instruction is prepended on every
/// request and does not count against the cap.
#[derive(Debug, Default)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: &str, content: &str) {
        self.messages.push(ChatMessage {
            role: role.to_string(),
            content: content.to_string(),
        });
        if self.messages.len() > MAX_HISTORY_MESSAGES {
            let excess = self.messages.len() - MAX_HISTORY_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for the conversational completion service consulted when the
/// corpus has no confident match.
pub struct FallbackClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    default_answer: String,
}

impl FallbackClient {
    /// Reads `OPENAI_API_KEY` (and optionally `OPENAI_BASE_URL`) from the
    /// environment. A missing key leaves the client in a degraded mode that
    /// always returns the default answer.
    pub fn from_env(default_answer: String) -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            endpoint: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            model: DEFAULT_MODEL.to_string(),
            default_answer,
        }
    }

    /// One attempt, no retries. Every failure mode (missing key, network,
    /// HTTP status, unexpected body shape) collapses to the default answer
    /// with a warning; the caller never sees an error.
    pub fn complete(&self, history: &mut ChatHistory, question: &str) -> String {
        history.push("user", question);

        let Some(api_key) = &self.api_key else {
            tracing::warn!("fallback disabled: OPENAI_API_KEY is not set");
            return self.default_answer.clone();
        };

        match self.request(api_key, history) {
            Ok(reply) => {
                history.push("assistant", &reply);
                reply
            }
            Err(err) => {
                tracing::warn!(error = %err, "fallback request failed");
                self.default_answer.clone()
            }
        }
    }

    fn request(&self, api_key: &str, history: &ChatHistory) -> anyhow::Result<String> {
        let mut messages = Vec::with_capacity(history.messages.len() + 1);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_INSTRUCTION.to_string(),
        });
        messages.extend(history.messages.iter().cloned());

        let response: ChatResponse = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages,
            })
            .send()?
            .error_for_status()?
            .json()?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("completion response had no message content"))
    }
}
