//! Seeded multi-turn chat session.
//!
//! A [`ChatSession`] owns the growing conversation history for one logical
//! conversation. It is seeded at creation with a fixed system instruction,
//! a user preamble embedding the retrieved note context, and a canned
//! acknowledgment turn, so the model is conversationally grounded before
//! the first real question.
//!
//! Sessions are not `Clone` and every ask takes `&mut self`, so at most
//! one ask can be in flight per session.

use anyhow::Result;

use crate::llm::{Generator, Message, TextStream};

const SYSTEM_INSTRUCTION: &str = "\
You are a helpful assistant that answers questions using the user's \
personal notes. Ground every answer in the provided note content. When the \
notes do not cover something, say so plainly instead of inventing details.";

const ACKNOWLEDGMENT: &str =
    "Understood. I will answer your questions using the provided notes.";

pub struct ChatSession<'a> {
    provider: &'a dyn Generator,
    messages: Vec<Message>,
}

impl<'a> ChatSession<'a> {
    /// Create a session seeded with `context` (the assembled note block or
    /// the no-notes sentinel).
    pub fn new(provider: &'a dyn Generator, context: &str) -> Self {
        let preamble = format!(
            "These are the notes relevant to my upcoming questions:\n\n\
             {context}\n\n\
             Use them to answer what I ask next."
        );

        Self {
            provider,
            messages: vec![
                Message::system(SYSTEM_INSTRUCTION),
                Message::user(preamble),
                Message::assistant(ACKNOWLEDGMENT),
            ],
        }
    }

    /// Ask a question and wait for the complete answer. The question and
    /// the answer are both appended to the session history.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        self.messages.push(Message::user(question));
        let answer = self.provider.chat(&self.messages).await?;
        self.messages.push(Message::assistant(answer.clone()));
        Ok(answer)
    }

    /// Ask a question and get the answer as a stream of text chunks.
    ///
    /// The stream is finite and cannot be replayed. The question is
    /// appended to the history immediately; the answer is NOT — after
    /// draining the stream the caller must pass the accumulated text to
    /// [`commit_answer`](Self::commit_answer). Abandoning the stream
    /// leaves the session without that assistant turn.
    pub async fn ask_stream(&mut self, question: &str) -> Result<TextStream> {
        self.messages.push(Message::user(question));
        self.provider.chat_stream(&self.messages).await
    }

    /// Record the answer accumulated from a drained [`ask_stream`](Self::ask_stream)
    /// stream, keeping the history consistent for the next turn.
    pub fn commit_answer(&mut self, answer: &str) {
        self.messages.push(Message::assistant(answer));
    }

    /// The full conversation history, seed turns included.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }
}
