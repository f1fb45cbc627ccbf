//! Query Planner and Answerer (spec §4.7, §4.9): keyword-based query
//! classification, generic-query rewrite, follow-up detection, the
//! calculation shortcut over `NumericContextCache`, and LLM prompt
//! assembly. The Retriever itself (spec §4.8) lives in
//! `archivist_index::retriever`, since it operates directly on the
//! Vector Indexer this crate only consumes.

pub mod answerer;
pub mod category;
pub mod error;
pub mod llm;
pub mod numeric;
pub mod planner;
pub mod prompts;
pub mod rewrite;

pub use answerer::Answerer;
pub use category::QueryCategory;
pub use error::ChatError;
pub use llm::{AnswererConfig, CompletionRequest, CompletionResponse, HttpLlmProvider, LlmError, LlmProvider, Message, Role};
pub use planner::{PlannerOutcome, QueryPlanner};
