//! Retrieval loop orchestration.
//!
//! Bounded retry-with-exclusion over term generation and keyword matching,
//! followed by a single refinement pass and bounded context assembly.
//!
//! State machine:
//! - generate terms (with an exclusion hint listing every earlier batch),
//!   rescan the vault, keyword-match;
//! - empty candidate set and attempts remaining → try again;
//! - first non-empty candidate set → refine exactly once; an empty refined
//!   set returns the sentinel (no return to the attempt loop);
//! - non-empty refined set → reverse to best-first, assemble, done;
//! - attempts exhausted → sentinel.
//!
//! "Nothing found" is a designed outcome, not an error: the sentinel string
//! lets a chat session proceed with an explicit empty-handed context.
//! Attempts are a plain counter — no backoff, no delays.

use anyhow::Result;

use crate::config::Config;
use crate::context::assemble;
use crate::llm::Generator;
use crate::matcher::match_notes;
use crate::notes::scan_notes;
use crate::refine::refine;
use crate::terms::generate_terms;

/// Returned when no attempt produced a usable set of notes.
pub const NO_NOTES_SENTINEL: &str = "No relevant notes were found in the note collection.";

/// Run the full retrieval loop for `question` and return the assembled
/// chat context, or [`NO_NOTES_SENTINEL`] when nothing usable was found.
///
/// The vault is rescanned on every attempt; there is no cache. Generative
/// failures (term generation or refinement) are fatal and propagate.
pub async fn retrieve(generator: &dyn Generator, config: &Config, question: &str) -> Result<String> {
    let mut tried: Vec<Vec<String>> = Vec::new();

    for attempt in 1..=config.retrieval.max_attempts {
        tracing::info!(attempt, max = config.retrieval.max_attempts, "retrieval attempt");

        let terms = generate_terms(generator, question, &tried).await?;
        let notes = scan_notes(&config.notes)?;
        let candidates = match_notes(&terms, &notes);
        tracing::info!(candidates = candidates.len(), "keyword matching done");

        tried.push(terms);

        if candidates.is_empty() {
            continue;
        }

        let refined = refine(generator, question, &candidates).await?;
        if refined.is_empty() {
            tracing::info!("refiner kept no candidates");
            return Ok(NO_NOTES_SENTINEL.to_string());
        }

        // The matcher orders ascending (strongest last); the assembler's
        // budget drops from the tail, so flip to best-first here.
        let mut best_first = refined;
        best_first.reverse();

        let context = assemble(
            &best_first,
            config.retrieval.max_notes,
            config.retrieval.max_context_chars,
        );
        tracing::debug!(context = %context, "assembled chat context");

        return Ok(context);
    }

    tracing::info!("all retrieval attempts exhausted");
    Ok(NO_NOTES_SENTINEL.to_string())
}
