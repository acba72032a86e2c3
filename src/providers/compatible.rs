//! Generic OpenAI-compatible provider.
//! Groq, OpenAI and OpenRouter all expose the same `/chat/completions` shape,
//! so one implementation covers every backend the factory knows about.

use super::{api_error, traits::Provider};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upper bound for one completion round trip. Kept below the
/// gateway's request timeout so a slow model surfaces as a provider error.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 25;
const CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct OpenAiCompatibleProvider {
    name: String,
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    /// Pre-computed chat completions URL (avoids `format!` per request).
    cached_chat_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiCompatibleProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<&str>) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let cached_chat_url = if base_url.ends_with("chat/completions") {
            base_url.to_string()
        } else {
            format!("{base_url}/chat/completions")
        };

        Self {
            name: name.to_string(),
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            cached_chat_url,
            client: build_client(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }

    /// Replace the round-trip timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    pub fn chat_completions_url(&self) -> &str {
        &self.cached_chat_url
    }

    fn build_request(message: &str, model: &str, temperature: f64) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![Message {
                role: "user",
                content: message.to_string(),
            }],
            temperature,
        }
    }

    /// First choice's content, or an empty string when the completion has none.
    fn extract_text(chat_response: ChatResponse) -> String {
        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    async fn chat(&self, message: &str, model: &str, temperature: f64) -> anyhow::Result<String> {
        let auth_header = self.cached_auth_header.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "{} API key not set. Set MAILTONE_API_KEY or edit config.toml.",
                self.name
            )
        })?;

        let request = Self::build_request(message, model, temperature);
        let response = self
            .client
            .post(self.chat_completions_url())
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("{} request failed", self.name))?;

        if !response.status().is_success() {
            return Err(api_error(&self.name, response).await);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("{} response JSON decode failed", self.name))?;
        Ok(Self::extract_text(chat_response))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
