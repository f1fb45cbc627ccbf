//! Vector Indexer, Deduplication Index, and Retriever (spec §4.6, §4.8).

pub mod indexer;
pub mod provider;
pub mod retriever;

pub use indexer::{IndexerError, IndexerStats, VectorIndexer};
pub use provider::{FileIndexStatus, HttpVectorStoreProvider, SearchHit, VectorStoreError, VectorStoreFile, VectorStoreProvider};
pub use retriever::{base_threshold, RetrievalOutcome, Retriever};
