//! Bounded context assembly.
//!
//! Concatenates selected notes into a single context string, each wrapped
//! in delimiter lines naming its source note, subject to a note cap and a
//! character budget. Idempotent for a fixed candidate list and limits.

use crate::matcher::NoteMatch;

/// Assemble up to `max_notes` candidates into a context string of at most
/// `max_chars` characters, in the given order.
///
/// The budget drops whole notes first: once the next note's full block
/// would overflow, it and everything after it are dropped. Callers should
/// therefore pass candidates best-first. The one exception is a first note
/// whose block alone exceeds the budget — its body is truncated at a char
/// boundary instead, so a non-empty candidate list never assembles to an
/// empty context.
pub fn assemble(candidates: &[NoteMatch], max_notes: usize, max_chars: usize) -> String {
    let mut out = String::new();

    for (i, candidate) in candidates.iter().take(max_notes).enumerate() {
        let header = format!("--- note: {} ---\n", candidate.path);
        let footer = format!("--- end note: {} ---\n", candidate.path);
        // +1 for the newline inserted after the body.
        let block_len = header.len() + candidate.body.len() + 1 + footer.len();

        if out.len() + block_len > max_chars {
            if i == 0 {
                let available = max_chars.saturating_sub(header.len() + 1 + footer.len());
                let body = truncate_at_char_boundary(&candidate.body, available);
                out.push_str(&header);
                out.push_str(body);
                out.push('\n');
                out.push_str(&footer);
            }
            break;
        }

        out.push_str(&header);
        out.push_str(&candidate.body);
        out.push('\n');
        out.push_str(&footer);
    }

    out
}

fn truncate_at_char_boundary(s: &str, mut max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    while max_len > 0 && !s.is_char_boundary(max_len) {
        max_len -= 1;
    }
    &s[..max_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(path: &str, body: &str) -> NoteMatch {
        NoteMatch {
            path: path.to_string(),
            count: 1,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_includes_every_candidate_once_in_order() {
        let candidates = [
            candidate("a.md", "alpha body"),
            candidate("b.md", "beta body"),
            candidate("c.md", "gamma body"),
        ];
        let context = assemble(&candidates, 10, usize::MAX);

        for c in &candidates {
            assert_eq!(context.matches(c.body.as_str()).count(), 1);
        }
        let a = context.find("alpha body").unwrap();
        let b = context.find("beta body").unwrap();
        let g = context.find("gamma body").unwrap();
        assert!(a < b && b < g);
    }

    #[test]
    fn test_delimiters_name_the_note() {
        let context = assemble(&[candidate("topics/a.md", "body")], 1, usize::MAX);
        assert!(context.contains("--- note: topics/a.md ---"));
        assert!(context.contains("--- end note: topics/a.md ---"));
    }

    #[test]
    fn test_note_cap_respected() {
        let candidates = [
            candidate("a.md", "alpha"),
            candidate("b.md", "beta"),
            candidate("c.md", "gamma"),
        ];
        let context = assemble(&candidates, 2, usize::MAX);
        assert!(context.contains("alpha"));
        assert!(context.contains("beta"));
        assert!(!context.contains("gamma"));
    }

    #[test]
    fn test_budget_drops_whole_trailing_notes() {
        let candidates = [
            candidate("a.md", &"x".repeat(100)),
            candidate("b.md", &"y".repeat(100)),
        ];
        // Enough for the first block but not the second.
        let first_block_len = assemble(&candidates[..1], 1, usize::MAX).len();
        let context = assemble(&candidates, 10, first_block_len + 10);
        assert!(context.contains('x'));
        assert!(!context.contains('y'));
        // The kept note is intact, not truncated.
        assert!(context.contains(&"x".repeat(100)));
    }

    #[test]
    fn test_oversized_first_note_truncated_not_dropped() {
        let candidates = [candidate("a.md", &"x".repeat(10_000))];
        let context = assemble(&candidates, 1, 200);
        assert!(!context.is_empty());
        assert!(context.len() <= 200);
        assert!(context.starts_with("--- note: a.md ---"));
        assert!(context.contains("--- end note: a.md ---"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let body = "é".repeat(1_000); // 2 bytes per char
        let candidates = [candidate("a.md", &body)];
        let context = assemble(&candidates, 1, 101);
        // Must not panic and must stay valid UTF-8 (checked by construction).
        assert!(context.len() <= 101);
    }

    #[test]
    fn test_idempotent() {
        let candidates = [candidate("a.md", "alpha"), candidate("b.md", "beta")];
        assert_eq!(assemble(&candidates, 5, 500), assemble(&candidates, 5, 500));
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(assemble(&[], 5, 500), "");
    }
}
