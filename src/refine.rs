//! Model-assisted relevance filtering.
//!
//! The keyword matcher is recall-oriented: any whole-word hit makes a note
//! a candidate. This second pass shows the model every candidate's full
//! content and asks which notes are actually useful for the question.
//!
//! The response contract is structured: one note path per line, exactly as
//! written in the candidate headers. Selection is by exact match against
//! the known candidate paths — identifiers the model invents are ignored,
//! and a path that happens to be a substring of another cannot cause a
//! false positive.

use anyhow::Result;

use crate::context;
use crate::llm::Generator;
use crate::matcher::NoteMatch;

/// Filter `candidates` down to the notes the model considers useful.
///
/// Preserves the input's relative order and always returns a subset of the
/// input. A failure of the generative call is fatal to the retrieval
/// attempt — there is no fallback to the keyword-only set.
pub async fn refine(
    generator: &dyn Generator,
    question: &str,
    candidates: &[NoteMatch],
) -> Result<Vec<NoteMatch>> {
    let assembled = context::assemble(candidates, candidates.len(), usize::MAX);

    let prompt = format!(
        "I searched my notes for the question below and the candidate notes \
         follow, each delimited by lines naming its path.\n\n\
         Question: {question}\n\n\
         Candidate notes:\n{assembled}\n\
         Reply with the paths of the notes that are actually useful for \
         answering the question, one path per line, written exactly as in \
         the note delimiters. Reply with nothing else. If none of the notes \
         are useful, reply with an empty response."
    );

    let response = generator.generate(&prompt).await?;
    tracing::debug!(response = %response, "refinement response");

    let refined = parse_selection(&response, candidates);
    tracing::info!(
        kept = refined.len(),
        total = candidates.len(),
        "refined candidate set"
    );

    Ok(refined)
}

/// Keep the candidates whose path appears as one of the response's
/// (trimmed) lines. Input relative order is preserved; unknown paths in
/// the response are ignored.
pub fn parse_selection(response: &str, candidates: &[NoteMatch]) -> Vec<NoteMatch> {
    let kept: Vec<&str> = response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    candidates
        .iter()
        .filter(|c| kept.iter().any(|line| *line == c.path))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(path: &str) -> NoteMatch {
        NoteMatch {
            path: path.to_string(),
            count: 1,
            body: format!("body of {path}"),
        }
    }

    fn paths(matches: &[NoteMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.path.as_str()).collect()
    }

    #[test]
    fn test_single_selection() {
        let candidates = [candidate("a.md"), candidate("b.md"), candidate("c.md")];
        let refined = parse_selection("a.md\n", &candidates);
        assert_eq!(paths(&refined), vec!["a.md"]);
    }

    #[test]
    fn test_subset_preserves_input_order() {
        let candidates = [candidate("a.md"), candidate("b.md"), candidate("c.md")];
        // Response order must not matter.
        let refined = parse_selection("c.md\na.md\n", &candidates);
        assert_eq!(paths(&refined), vec!["a.md", "c.md"]);
    }

    #[test]
    fn test_unknown_paths_ignored() {
        let candidates = [candidate("a.md")];
        let refined = parse_selection("a.md\ninvented.md\n", &candidates);
        assert_eq!(paths(&refined), vec!["a.md"]);
    }

    #[test]
    fn test_lines_are_trimmed() {
        let candidates = [candidate("a.md"), candidate("b.md")];
        let refined = parse_selection("  a.md  \n\tb.md\n", &candidates);
        assert_eq!(paths(&refined), vec!["a.md", "b.md"]);
    }

    #[test]
    fn test_substring_path_is_not_a_false_positive() {
        // "a.md" is a substring of "extra/a.md"; only the exact line wins.
        let candidates = [candidate("a.md"), candidate("extra/a.md")];
        let refined = parse_selection("extra/a.md\n", &candidates);
        assert_eq!(paths(&refined), vec!["extra/a.md"]);
    }

    #[test]
    fn test_prose_response_selects_nothing() {
        // A chatty model that echoes paths mid-sentence selects nothing,
        // by design: only exact path lines count.
        let candidates = [candidate("a.md")];
        let refined = parse_selection("I think a.md looks useful.", &candidates);
        assert!(refined.is_empty());
    }

    #[test]
    fn test_empty_response_empty_selection() {
        let candidates = [candidate("a.md")];
        assert!(parse_selection("", &candidates).is_empty());
        assert!(parse_selection("\n\n", &candidates).is_empty());
    }
}
