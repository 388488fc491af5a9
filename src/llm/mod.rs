//! Outbound chat-completions client.
//!
//! One blocking (per-request) POST to `{api_base_url}/chat/completions` with
//! a bounded timeout. Non-success statuses and empty choice lists surface as
//! upstream errors with the status and body attached; nothing is retried
//! here — the caller decides whether to re-run the whole generation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DaemonConfig, LlmConfig};
use crate::error::ApiError;

/// Seam between the orchestrator and the completion endpoint, so plan
/// generation is testable with a scripted backend.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Returns the first choice's message content for the given
    /// system + user messages.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ApiError>;
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// ─── Client ───────────────────────────────────────────────────────────────────

pub struct ChatClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    llm: LlmConfig,
}

impl ChatClient {
    pub fn new(config: &DaemonConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.llm.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: format!("{}/chat/completions", config.api_base_url),
            api_key: config.api_key.clone(),
            llm: config.llm.clone(),
        })
    }
}

#[async_trait]
impl Completion for ChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ApiError> {
        let request = ChatRequest {
            model: &self.llm.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: self.llm.max_tokens,
            temperature: self.llm.temperature,
            top_p: self.llm.top_p,
        };

        debug!(model = %self.llm.model, url = %self.url, "requesting completion");
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::UpstreamUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiError::UpstreamUnreachable(e.to_string()))?;

        let first = body.choices.into_iter().next().ok_or(ApiError::Upstream {
            status: status.as_u16(),
            body: "completion returned no choices".to_string(),
        })?;
        Ok(first.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_generation_parameters() {
        let req = ChatRequest {
            model: "llama-3.3-70b-versatile",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 1000,
            temperature: 0.7,
            top_p: 0.9,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "llama-3.3-70b-versatile");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn response_parses_first_choice() {
        let body =
            r###"{"choices":[{"message":{"role":"assistant","content":"##Duration\n4 weeks"}}]}"###;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "##Duration\n4 weeks");
    }

    #[test]
    fn response_tolerates_missing_choices_key() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }
}
