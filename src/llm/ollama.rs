//! Ollama provider.
//!
//! Talks to a local Ollama instance (default `http://localhost:11434`):
//! - `POST /api/generate` with `stream: false` for single-shot prompts
//! - `POST /api/chat` for conversations; with `stream: true` Ollama emits
//!   NDJSON, one `{"message":{"content":...},"done":...}` object per line.
//!
//! No API key is required.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::llm::{response_lines, Generator, Message, Role, TextStream};

const DEFAULT_URL: &str = "http://localhost:11434";

pub struct OllamaProvider {
    client: Client,
    model: String,
    url: String,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            model: config.model.clone(),
            url: config.url.clone().unwrap_or_else(|| DEFAULT_URL.to_string()),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    async fn post(&self, path: &str, body: &Value, streaming: bool) -> Result<reqwest::Response> {
        let mut request = self.client.post(format!("{}{}", self.url, path)).json(body);
        if !streaming {
            request = request.timeout(self.timeout);
        }

        let response = request.send().await.map_err(|e| {
            anyhow!(
                "Ollama connection error (is Ollama running at {}?): {}",
                self.url,
                e
            )
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Ollama API error {}: {}", status, error_text);
        }

        Ok(response)
    }
}

#[async_trait]
impl Generator for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let response = self.post("/api/generate", &body, false).await?;
        let json: Value = response
            .json()
            .await
            .context("Failed to parse Ollama response as JSON")?;

        tracing::debug!(response = %json, "Ollama generate response");

        json["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Invalid Ollama response: missing response field"))
    }

    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": to_chat_messages(messages),
            "stream": false,
        });

        let response = self.post("/api/chat", &body, false).await?;
        let json: Value = response
            .json()
            .await
            .context("Failed to parse Ollama response as JSON")?;

        tracing::debug!(response = %json, "Ollama chat response");

        json["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Invalid Ollama response: missing message.content"))
    }

    async fn chat_stream(&self, messages: &[Message]) -> Result<TextStream> {
        let body = json!({
            "model": self.model,
            "messages": to_chat_messages(messages),
            "stream": true,
        });

        let response = self.post("/api/chat", &body, true).await?;

        let lines = response_lines(response.bytes_stream());
        let stream = lines.filter_map(|line_result| async move {
            match line_result {
                Ok(line) => ndjson_chunk_text(&line).map(Ok),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(stream))
    }
}

/// Map conversation turns to Ollama's OpenAI-style message objects.
fn to_chat_messages(messages: &[Message]) -> Value {
    let converted: Vec<Value> = messages
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            json!({ "role": role, "content": m.text })
        })
        .collect();
    json!(converted)
}

/// Extract incremental text from one NDJSON line, if it carries any.
fn ndjson_chunk_text(line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }

    let json: Value = serde_json::from_str(line).ok()?;
    if json["done"].as_bool() == Some(true) {
        return None;
    }

    let text = json["message"]["content"].as_str()?;
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
