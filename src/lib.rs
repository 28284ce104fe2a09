//! # Noteground
//!
//! A retrieval-grounded chat assistant over a local collection of
//! plain-text notes.
//!
//! Noteground turns a free-text question into concrete search terms via a
//! generative model, scores every note in a local vault by whole-word
//! keyword occurrence, asks the model a second time to keep only the
//! genuinely useful notes, concatenates the survivors into a bounded
//! context block, and seeds a multi-turn chat session with that context so
//! answers stay grounded in the user's own notes.
//!
//! ## Architecture
//!
//! ```text
//! question ──▶ terms ──▶ matcher ──▶ refine ──▶ context ──▶ chat
//!                │           │          │                     │
//!                ▼           ▼          ▼                     ▼
//!            Generator   note vault  Generator            Generator
//!            (1 call)    (walkdir)   (1 call)             (per turn)
//! ```
//!
//! The retrieval loop retries term generation with an exclusion hint when
//! no notes match, bounded by `retrieval.max_attempts`. A run that finds
//! nothing returns a sentinel string rather than an error, so the chat can
//! still proceed with an explicit "nothing found" context.
//!
//! ## Quick Start
//!
//! ```bash
//! ng notes                          # list the notes the scanner sees
//! ng terms "how do planes fly?"     # inspect generated search terms
//! ng retrieve "how do planes fly?"  # print the assembled context
//! ng ask "how do planes fly?"       # one question, one streamed answer
//! ng chat "how do planes fly?"      # interactive grounded conversation
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`notes`] | Note vault scanner |
//! | [`terms`] | Search term generation |
//! | [`matcher`] | Whole-word keyword scoring |
//! | [`refine`] | Model-assisted relevance filtering |
//! | [`context`] | Bounded context assembly |
//! | [`retrieval`] | Retry-with-exclusion orchestration |
//! | [`chat`] | Seeded multi-turn chat session |
//! | [`llm`] | Generative provider abstraction (Gemini, Ollama) |

pub mod chat;
pub mod config;
pub mod context;
pub mod llm;
pub mod matcher;
pub mod notes;
pub mod refine;
pub mod retrieval;
pub mod terms;
