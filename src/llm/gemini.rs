//! Google Gemini provider.
//!
//! Talks to the `generativelanguage.googleapis.com` REST API:
//! - `POST /v1beta/models/{model}:generateContent` for whole responses
//! - `POST /v1beta/models/{model}:streamGenerateContent?alt=sse` for
//!   incremental chunks (SSE `data:` lines, one JSON payload per line)
//!
//! The API key is read from the `GEMINI_API_KEY` environment variable at
//! construction time.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::llm::{response_lines, Generator, Message, Role, TextStream};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiProvider {
    /// Create a new Gemini provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `GEMINI_API_KEY` is not in the environment.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow!("GEMINI_API_KEY environment variable not set"))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            base_url: config
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn endpoint(&self, method: &str, query: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}?{}key={}",
            self.base_url, self.model, method, query, self.api_key
        )
    }
}

#[async_trait]
impl Generator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat(&[Message::user(prompt)]).await
    }

    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let url = self.endpoint("generateContent", "");
        let body = build_request_body(messages);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Gemini request failed for model {}", self.model))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Gemini API error {}: {}", status, error_text);
        }

        let json: Value = response
            .json()
            .await
            .context("Failed to parse Gemini response as JSON")?;

        tracing::debug!(response = %json, "Gemini response");

        extract_text(&json)
    }

    async fn chat_stream(&self, messages: &[Message]) -> Result<TextStream> {
        let url = self.endpoint("streamGenerateContent", "alt=sse&");
        let body = build_request_body(messages);

        // No total timeout here: a streamed answer can legitimately take
        // longer than any single-request budget.
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Gemini stream request failed for model {}", self.model))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Gemini API error {}: {}", status, error_text);
        }

        let lines = response_lines(response.bytes_stream());
        let stream = lines.filter_map(|line_result| async move {
            match line_result {
                Ok(line) => sse_data_text(&line).map(Ok),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(stream))
    }
}

/// Build the request body shared by both call shapes.
///
/// System messages become `systemInstruction`; user/assistant turns map to
/// `contents` entries with the `user`/`model` roles.
fn build_request_body(messages: &[Message]) -> Value {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for message in messages {
        match message.role {
            Role::System => system_parts.push(json!({ "text": message.text })),
            Role::User => contents.push(json!({
                "role": "user",
                "parts": [{ "text": message.text }],
            })),
            Role::Assistant => contents.push(json!({
                "role": "model",
                "parts": [{ "text": message.text }],
            })),
        }
    }

    let mut body = json!({ "contents": contents });
    if !system_parts.is_empty() {
        body["systemInstruction"] = json!({ "parts": system_parts });
    }
    body
}

/// Extract the answer text from a `generateContent` response payload.
fn extract_text(json: &Value) -> Result<String> {
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| anyhow!("Invalid Gemini response: missing candidates[0].content.parts"))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect();

    Ok(text)
}

/// Extract incremental text from one SSE line, if it carries any.
fn sse_data_text(line: &str) -> Option<String> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    let json: Value = serde_json::from_str(data).ok()?;
    let text = extract_text(&json).ok()?;
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
