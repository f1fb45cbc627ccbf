//! Threshold-decaying Retriever (spec §4.8): widen the vector search
//! progressively rather than giving up after one call, then fall back to
//! a fixed set of domain-phrase queries before reporting empty/indexing.

use crate::indexer::{IndexerError, VectorIndexer};
use crate::provider::SearchHit;
use archivist_types::SessionId;

const MAX_PASSAGES: usize = 15;
const DESCENDING_THRESHOLDS: &[f32] = &[0.15, 0.10, 0.05];
const FALLBACK_THRESHOLD: f32 = 0.01;

/// Domain-phrase fallback queries tried, in order, once the rewritten
/// query itself yields nothing at any threshold (spec §4.8 step 3).
const FALLBACK_QUERY_PHRASES: &[&str] = &[
    "summary",
    "financial statement",
    "balance sheet",
    "annual report",
    "key findings",
];

/// `calculation`-flavored queries start from a much stricter threshold
/// than everything else (spec §4.8 step 1).
pub fn base_threshold(is_calculation_query: bool) -> f32 {
    if is_calculation_query {
        0.5
    } else {
        0.2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    Passages(Vec<SearchHit>),
    /// The session has documents but none are indexed yet.
    StillIndexing,
    /// The session has no documents at all, or every doc is indexed and
    /// truly nothing matches.
    Empty,
}

fn tokens_from_filename(filename: &str) -> Vec<String> {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|tok| tok.len() > 2)
        .map(|tok| tok.to_lowercase())
        .collect()
}

pub struct Retriever<'a> {
    indexer: &'a VectorIndexer,
}

impl<'a> Retriever<'a> {
    pub fn new(indexer: &'a VectorIndexer) -> Self {
        Self { indexer }
    }

    /// Run the full decaying-threshold + fallback-query algorithm (spec
    /// §4.8). `source_filenames` feeds the filename-token fallback
    /// queries alongside the fixed domain phrases.
    pub async fn retrieve(
        &self,
        session_id: &SessionId,
        query: &str,
        is_calculation_query: bool,
        source_filenames: &[String],
    ) -> Result<RetrievalOutcome, IndexerError> {
        let base = base_threshold(is_calculation_query);
        let mut thresholds = vec![base];
        thresholds.extend_from_slice(DESCENDING_THRESHOLDS);

        for threshold in thresholds {
            let hits = self
                .indexer
                .search(session_id, query, MAX_PASSAGES as u32, threshold)
                .await?;
            if !hits.is_empty() {
                return Ok(RetrievalOutcome::Passages(truncate(hits)));
            }
        }

        let mut fallback_queries: Vec<String> = FALLBACK_QUERY_PHRASES.iter().map(|s| s.to_string()).collect();
        for filename in source_filenames {
            fallback_queries.extend(tokens_from_filename(filename));
        }

        for fallback_query in fallback_queries {
            let hits = self
                .indexer
                .search(session_id, &fallback_query, MAX_PASSAGES as u32, FALLBACK_THRESHOLD)
                .await?;
            if !hits.is_empty() {
                return Ok(RetrievalOutcome::Passages(truncate(hits)));
            }
        }

        let files = self.indexer.vector_files(session_id).await?;
        if files.is_empty() {
            return Ok(RetrievalOutcome::Empty);
        }
        use crate::provider::FileIndexStatus;
        if files.iter().all(|f| f.status == FileIndexStatus::Completed) {
            Ok(RetrievalOutcome::Empty)
        } else {
            Ok(RetrievalOutcome::StillIndexing)
        }
    }
}

fn truncate(mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
    hits.truncate(MAX_PASSAGES);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculation_queries_use_a_stricter_base_threshold() {
        assert_eq!(base_threshold(true), 0.5);
        assert_eq!(base_threshold(false), 0.2);
    }

    #[test]
    fn filename_tokens_strip_extension_and_short_noise() {
        let tokens = tokens_from_filename("Q3_2024-Report.pdf");
        assert!(tokens.contains(&"2024".to_string()));
        assert!(tokens.contains(&"report".to_string()));
        assert!(!tokens.iter().any(|t| t == "pdf"));
    }

    #[test]
    fn truncate_caps_at_fifteen_passages() {
        let hits: Vec<SearchHit> = (0..30)
            .map(|i| SearchHit {
                file_id: format!("f{i}"),
                filename: "a.html".into(),
                score: 0.9,
                content_chunks: vec![],
            })
            .collect();
        assert_eq!(truncate(hits).len(), MAX_PASSAGES);
    }
}
