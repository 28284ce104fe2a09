//! Whole-word keyword scoring.
//!
//! Scores each note by the total number of non-overlapping, case-sensitive
//! whole-word occurrences of the search terms in its body. No index and no
//! incremental update — O(terms × notes × note size), which is fine for
//! the small local vaults this tool targets.

use regex::Regex;

use crate::notes::Note;

/// A note with at least one term occurrence.
#[derive(Debug, Clone)]
pub struct NoteMatch {
    pub path: String,
    pub count: usize,
    pub body: String,
}

/// Score `notes` against `terms`.
///
/// Term text is treated as a literal (special characters are escaped), and
/// an occurrence only counts when not adjacent to a word character.
/// Terms that are empty or whitespace-only after trimming are skipped —
/// term parsing deliberately does not validate term shape, so tolerance
/// lives here.
///
/// Notes with zero total occurrences are excluded. The result is sorted
/// ascending by match count: the strongest matches are at the END.
/// Callers that need best-first must reverse.
pub fn match_notes(terms: &[String], notes: &[Note]) -> Vec<NoteMatch> {
    let patterns: Vec<Regex> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .filter_map(|t| Regex::new(&format!(r"\b{}\b", regex::escape(t))).ok())
        .collect();

    let mut matches = Vec::new();

    for note in notes {
        let count: usize = patterns
            .iter()
            .map(|p| p.find_iter(&note.body).count())
            .sum();

        if count > 0 {
            matches.push(NoteMatch {
                path: note.path.clone(),
                count,
                body: note.body.clone(),
            });
        }
    }

    // Ascending: weakest first, strongest last. Pinned by tests; the
    // retrieval loop reverses before assembling the context.
    matches.sort_by_key(|m| m.count);

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(path: &str, body: &str) -> Note {
        Note {
            path: path.to_string(),
            body: body.to_string(),
        }
    }

    fn term(t: &str) -> Vec<String> {
        vec![t.to_string()]
    }

    #[test]
    fn test_whole_word_excludes_substring() {
        // "cat" twice as a word, once inside "catalog": count must be 2.
        let notes = [note("a.md", "cat and cat, plus catalog")];
        let matches = match_notes(&term("cat"), &notes);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].count, 2);
    }

    #[test]
    fn test_word_boundary_scenario() {
        let notes = [note("a.md", "the cat sat"), note("b.md", "cats and dogs")];
        let matches = match_notes(&term("cat"), &notes);
        // b.md has zero whole-word occurrences and is excluded entirely.
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "a.md");
        assert_eq!(matches[0].count, 1);
    }

    #[test]
    fn test_case_sensitive() {
        let notes = [note("a.md", "Cat cat CAT")];
        let matches = match_notes(&term("cat"), &notes);
        assert_eq!(matches[0].count, 1);
    }

    #[test]
    fn test_counts_summed_across_terms() {
        let notes = [note("a.md", "wing and lift and wing")];
        let terms = vec!["wing".to_string(), "lift".to_string()];
        let matches = match_notes(&terms, &notes);
        assert_eq!(matches[0].count, 3);
    }

    #[test]
    fn test_order_non_decreasing() {
        let notes = [
            note("three.md", "x x x"),
            note("one.md", "x"),
            note("two.md", "x x"),
        ];
        let matches = match_notes(&term("x"), &notes);
        let counts: Vec<usize> = matches.iter().map(|m| m.count).collect();
        assert_eq!(counts, vec![1, 2, 3]);
        for pair in counts.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_special_characters_treated_literally() {
        // "3.5" must match only the literal text, not "3a5" via a regex dot.
        let notes = [note("a.md", "version 3.5 here"), note("b.md", "code 3a5")];
        let matches = match_notes(&term("3.5"), &notes);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "a.md");
    }

    #[test]
    fn test_empty_and_whitespace_terms_skipped() {
        let notes = [note("a.md", "some words here")];
        let terms = vec!["".to_string(), "  ".to_string()];
        assert!(match_notes(&terms, &notes).is_empty());
    }

    #[test]
    fn test_no_matches_empty_result() {
        let notes = [note("a.md", "nothing relevant")];
        assert!(match_notes(&term("xyzzy"), &notes).is_empty());
    }
}
