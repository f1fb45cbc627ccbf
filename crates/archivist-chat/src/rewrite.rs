//! Generic-query rewrite and follow-up detection (spec §4.7). Queries
//! that refer vaguely to "the documents" or "both" are expanded with
//! canonical search-friendly terms before retrieval; short or
//! pronoun-heavy queries are treated as follow-ups and prefixed with the
//! previous user turn.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern → canonical terms appended to the rewritten query. Checked in
/// order; a query can match more than one pattern, each contributing its
/// terms once.
struct GenericPattern {
    regex: Lazy<Regex>,
    terms: &'static str,
}

macro_rules! generic_pattern {
    ($pat:literal, $terms:literal) => {
        GenericPattern {
            regex: Lazy::new(|| Regex::new($pat).expect("static regex")),
            terms: $terms,
        }
    };
}

static COMPARE_BOTH: GenericPattern = generic_pattern!(
    r"(?i)compare\s+(both|all|these|the\s+documents)",
    "comparison similarities differences"
);
static SUMMARIZE_BOTH: GenericPattern = generic_pattern!(
    r"(?i)summari[sz]e\s+(both|all|these|the\s+documents)",
    "summary overview main points"
);
static SHORT_NOTES: GenericPattern = generic_pattern!(r"(?i)short\s+notes?", "summary key points overview");
static WHAT_IS_IN: GenericPattern = generic_pattern!(
    r"(?i)what\s+is\s+in\s+the\s+documents?",
    "summary overview content contents"
);

const GENERIC_PATTERNS: &[&GenericPattern] = &[&COMPARE_BOTH, &SUMMARIZE_BOTH, &SHORT_NOTES, &WHAT_IS_IN];

/// Alphabetic tokens longer than 3 characters extracted from a filename
/// stem (spec §4.7 "filenames in the session context contribute
/// extracted alphabetic tokens > 3 chars"). Distinct from the Retriever's
/// own filename-token fallback (`archivist_index::retriever`), which uses
/// a >2 cutoff for a different purpose (search-query fallback, not
/// query rewrite).
fn filename_tokens(filename: &str) -> Vec<String> {
    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
    stem.split(|c: char| !c.is_alphabetic())
        .filter(|tok| tok.len() > 3)
        .map(|tok| tok.to_lowercase())
        .collect()
}

/// Expand a generic query by appending canonical search terms and
/// filename-derived tokens. Returns the query unchanged if no generic
/// pattern matches.
pub fn rewrite_generic_query(query: &str, session_filenames: &[String]) -> String {
    let mut matched_terms: Vec<&'static str> = Vec::new();
    for pattern in GENERIC_PATTERNS {
        if pattern.regex.is_match(query) {
            matched_terms.push(pattern.terms);
        }
    }
    if matched_terms.is_empty() {
        return query.to_string();
    }

    let mut rewritten = query.to_string();
    for terms in matched_terms {
        rewritten.push(' ');
        rewritten.push_str(terms);
    }
    for filename in session_filenames {
        for token in filename_tokens(filename) {
            rewritten.push(' ');
            rewritten.push_str(&token);
        }
    }
    rewritten
}

/// Pronoun/discourse-marker set defining a follow-up query (spec §4.7).
const FOLLOW_UP_MARKERS: &[&str] = &[
    "it", "this", "that", "they", "them", "those", "these", "what about", "how about", "and",
    "also", "too", "as well",
];

/// True if `query` should be treated as a follow-up to the prior turn:
/// either it's five words or fewer, or it contains one of the follow-up
/// markers as a whole word/phrase.
pub fn is_follow_up(query: &str) -> bool {
    let word_count = query.split_whitespace().count();
    if word_count > 0 && word_count <= 5 {
        return true;
    }
    let lower = query.to_lowercase();
    FOLLOW_UP_MARKERS.iter().any(|marker| contains_word(&lower, marker))
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.contains(' ') {
        return haystack.contains(needle);
    }
    haystack.split(|c: char| !c.is_alphanumeric()).any(|w| w == needle)
}

/// Prefix a follow-up query with the previous user message, matching the
/// teacher-idiom "short-horizon conversation context" the Query Planner
/// injects (spec §2 item 9).
pub fn prefix_with_previous_turn(query: &str, previous_user_message: Option<&str>) -> String {
    match previous_user_message {
        Some(prev) if is_follow_up(query) => format!("{prev} {query}"),
        _ => query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_both_is_expanded() {
        let rewritten = rewrite_generic_query("compare both documents", &[]);
        assert!(rewritten.contains("comparison"));
    }

    #[test]
    fn unmatched_query_is_returned_unchanged() {
        assert_eq!(rewrite_generic_query("what was Q3 revenue", &[]), "what was Q3 revenue");
    }

    #[test]
    fn filename_tokens_are_appended_on_match() {
        let rewritten = rewrite_generic_query("summarize both please", &["Q3_2024_AnnualReport.pdf".to_string()]);
        assert!(rewritten.contains("annualreport"));
        assert!(!rewritten.contains("pdf"));
    }

    #[test]
    fn short_query_is_a_follow_up() {
        assert!(is_follow_up("what about it"));
        assert!(is_follow_up("and for 5 years"));
    }

    #[test]
    fn longer_query_without_markers_is_not_a_follow_up() {
        assert!(!is_follow_up("what was the company's total revenue last fiscal year"));
    }

    #[test]
    fn follow_up_gets_prefixed_with_previous_turn() {
        let result = prefix_with_previous_turn("and for 5 years", Some("What is my take-home salary?"));
        assert_eq!(result, "What is my take-home salary? and for 5 years");
    }

    #[test]
    fn non_follow_up_is_not_prefixed() {
        let query = "what was the company's total revenue last fiscal year";
        assert_eq!(prefix_with_previous_turn(query, Some("prev")), query);
    }
}
