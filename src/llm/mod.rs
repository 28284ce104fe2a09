//! Generative provider abstraction and implementations.
//!
//! Defines the [`Generator`] trait and concrete implementations:
//! - **[`gemini::GeminiProvider`]** — calls the Google Gemini REST API;
//!   streaming via `streamGenerateContent` SSE.
//! - **[`ollama::OllamaProvider`]** — calls a local Ollama instance;
//!   streaming via `/api/chat` NDJSON.
//!
//! Two call shapes are consumed by the rest of the crate:
//! 1. single-shot prompt-to-text ([`Generator::generate`]), used for term
//!    generation and relevance refinement;
//! 2. conversation with seeded history ([`Generator::chat`] /
//!    [`Generator::chat_stream`]), used by the chat session.
//!
//! There is no retry at this layer: a provider failure propagates to the
//! caller as a fatal error.
//!
//! # Provider Selection
//!
//! Use [`create_provider`] to instantiate the appropriate provider based
//! on the configuration. Unknown provider names are rejected.

pub mod gemini;
pub mod ollama;

use anyhow::{bail, Result};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;

use crate::config::ProviderConfig;

/// A finite, pull-based stream of incremental answer text.
///
/// Once consumed it cannot be replayed; a caller that starts draining must
/// either finish or explicitly abandon it. What an abandoned stream means
/// for the provider-side conversation is defined by the provider, not here.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Trait for generative text backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Single-shot: generate text from a bare prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Complete a conversation and return the whole answer.
    async fn chat(&self, messages: &[Message]) -> Result<String>;

    /// Complete a conversation as a stream of incremental text chunks.
    async fn chat_stream(&self, messages: &[Message]) -> Result<TextStream>;
}

/// Create the appropriate [`Generator`] based on configuration.
///
/// # Errors
///
/// Returns an error for unknown provider names or if the provider cannot
/// be initialized (e.g. `GEMINI_API_KEY` missing for Gemini).
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Generator>> {
    match config.provider.as_str() {
        "gemini" => Ok(Box::new(gemini::GeminiProvider::new(config)?)),
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(config)?)),
        other => bail!("Unknown provider: {}. Must be gemini or ollama.", other),
    }
}

/// Split an HTTP byte stream into complete lines.
///
/// Both provider stream formats (SSE `data:` lines and NDJSON) are
/// line-delimited, and response chunks can split a line anywhere, so a
/// carry buffer is kept across chunks. A trailing unterminated line is
/// dropped with the stream; both formats terminate records with `\n`.
pub(crate) fn response_lines<B, S>(byte_stream: S) -> impl Stream<Item = Result<String>> + Send
where
    B: AsRef<[u8]> + Send + 'static,
    S: Stream<Item = reqwest::Result<B>> + Send + 'static,
{
    byte_stream
        .scan(String::new(), |buf, chunk_result| {
            let lines: Vec<Result<String>> = match chunk_result {
                Ok(chunk) => {
                    buf.push_str(&String::from_utf8_lossy(chunk.as_ref()));
                    let mut lines = Vec::new();
                    while let Some(pos) = buf.find('\n') {
                        let line = buf[..pos].trim_end_matches('\r').to_string();
                        buf.replace_range(..=pos, "");
                        lines.push(Ok(line));
                    }
                    lines
                }
                Err(e) => vec![Err(anyhow::Error::from(e))],
            };
            futures::future::ready(Some(lines))
        })
        .flat_map(futures::stream::iter)
}
