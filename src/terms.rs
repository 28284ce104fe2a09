//! Search term generation.
//!
//! Turns a free-text question into a small batch of concrete search terms
//! via one generative call. The response contract is a comma-separated
//! list; parsing splits on commas and nothing else, so downstream code
//! must tolerate malformed terms (empty strings, embedded whitespace).

use anyhow::Result;

use crate::llm::Generator;

const TERM_PROMPT: &str = "\
Given a question, idea, or search topic, generate between 5 and 12 concrete \
search terms related to that topic. Avoid generic terms. Each term should be \
a single word where possible and never longer than two words, because each \
term will be counted as a whole-word occurrence inside note files. Keep any \
accents or diacritics the topic's language uses. Reply with the terms only, \
in the exact format \"term1,term2,term3\" with no spaces after the commas.

For example, for the question \"How do planes fly?\" a good reply would be:
\"aerodynamics,lift,wing,thrust,drag,airfoil,flight forces\"

Now generate the reply for this question:
";

/// Generate search terms for `question`.
///
/// `excluded` holds the term batches of earlier failed attempts; when
/// non-empty, an exclusion hint listing them is appended to the prompt so
/// the model tries different vocabulary.
///
/// One outbound generation call; failures propagate to the caller.
pub async fn generate_terms(
    generator: &dyn Generator,
    question: &str,
    excluded: &[Vec<String>],
) -> Result<Vec<String>> {
    let mut prompt = format!("{}{}", TERM_PROMPT, question);

    if !excluded.is_empty() {
        let tried: Vec<&str> = excluded
            .iter()
            .flatten()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        prompt.push_str(&format!(
            "\n\nThese terms were already tried and matched nothing; do not \
             repeat any of them: {}",
            tried.join(", ")
        ));
    }

    let raw = generator.generate(&prompt).await?;
    tracing::debug!(response = %raw, "term generation response");

    let terms = parse_terms(raw.trim());
    tracing::info!(count = terms.len(), terms = ?terms, "generated search terms");

    Ok(terms)
}

/// Split a raw model response into terms.
///
/// Splits on commas only — individual terms are not trimmed or validated.
pub fn parse_terms(raw: &str) -> Vec<String> {
    raw.split(',').map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_list() {
        let terms = parse_terms("lift,wing,thrust");
        assert_eq!(terms, vec!["lift", "wing", "thrust"]);
    }

    #[test]
    fn test_parse_keeps_malformed_terms() {
        // No per-term trimming: spaces and empty entries survive.
        let terms = parse_terms("lift, wing,,flight forces");
        assert_eq!(terms, vec!["lift", " wing", "", "flight forces"]);
    }

    #[test]
    fn test_parse_single_term() {
        assert_eq!(parse_terms("topology"), vec!["topology"]);
    }
}
