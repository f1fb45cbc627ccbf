//! Query Planner orchestration (spec §4.7): classify, rewrite, detect
//! follow-up, and try the calculation shortcut, producing one outcome
//! the caller either answers directly from (no LLM call) or hands to
//! the Retriever + Answerer.

use crate::category::{classify, QueryCategory};
use crate::numeric;
use crate::rewrite;
use archivist_types::NumericContextCache;

#[derive(Debug, Clone)]
pub struct PlannerOutcome {
    pub category: QueryCategory,
    /// The query to run retrieval against: rewritten and, if a
    /// follow-up, prefixed with the previous user turn.
    pub retrieval_query: String,
    pub is_follow_up: bool,
    /// Set when the calculation shortcut fired; the caller should use
    /// this as the assistant reply directly, without calling the LLM or
    /// running retrieval at all (spec §4.7 Calculation shortcut).
    pub direct_answer: Option<String>,
}

pub struct QueryPlanner;

impl QueryPlanner {
    /// Runs the full planning pipeline for one user turn.
    pub fn plan(
        query: &str,
        previous_user_message: Option<&str>,
        session_filenames: &[String],
        numeric_cache: &NumericContextCache,
    ) -> PlannerOutcome {
        let is_follow_up = rewrite::is_follow_up(query);
        // Classification runs on the follow-up-prefixed text: a bare
        // "and for 5 years?" carries no calculation keywords of its own,
        // but combined with the prior turn it does (spec §9 "Numeric
        // follow-up" worked example).
        let prefixed = rewrite::prefix_with_previous_turn(query, previous_user_message);
        let category = classify(&prefixed);

        if category.is_calculation_like() {
            if let Some(direct_answer) = numeric::synthesize_calculation(&prefixed, numeric_cache) {
                return PlannerOutcome {
                    category,
                    retrieval_query: prefixed,
                    is_follow_up,
                    direct_answer: Some(direct_answer),
                };
            }
        }

        let retrieval_query = rewrite::rewrite_generic_query(&prefixed, session_filenames);

        PlannerOutcome { category, retrieval_query, is_follow_up, direct_answer: None }
    }

    /// Runs the post-response numeric-extraction pass (spec §4.7 "After
    /// each LLM response, the planner runs regexes over the response to
    /// extract and cache monetary figures").
    pub fn record_response(response: &str, numeric_cache: &mut NumericContextCache) {
        numeric::extract_and_cache(response, numeric_cache);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn calculation_shortcut_bypasses_retrieval_when_cache_has_a_base() {
        let mut cache = NumericContextCache::new(Duration::from_secs(60));
        cache.set(archivist_types::numeric_cache::TAKE_HOME_SALARY, 1_144_180.0, "₹1,144,180");
        let outcome = QueryPlanner::plan("and for 5 years?", Some("What is my take-home salary?"), &[], &cache);
        assert!(outcome.direct_answer.is_some());
    }

    #[test]
    fn no_shortcut_without_cache_falls_through_to_retrieval_query() {
        let cache = NumericContextCache::new(Duration::from_secs(60));
        let outcome = QueryPlanner::plan("and for 5 years?", Some("What is my take-home salary?"), &[], &cache);
        assert!(outcome.direct_answer.is_none());
        assert!(outcome.retrieval_query.starts_with("What is my take-home salary?"));
    }

    #[test]
    fn general_query_is_classified_and_left_unprefixed() {
        let cache = NumericContextCache::new(Duration::from_secs(60));
        let outcome = QueryPlanner::plan("northern lights appear over polar regions during winter nights", None, &[], &cache);
        assert_eq!(outcome.category, QueryCategory::General);
        assert!(!outcome.is_follow_up);
    }
}
