//! Search boundary: indexed candidate documents and the executor of the
//! filter + score contract.
//!
//! [`SearchBackend`] is what matching and ingestion talk to.
//! [`InMemorySearchBackend`] evaluates [`crate::scoring::HardFilters`] and the
//! [`crate::scoring::ScoringModel`] over every stored document in parallel,
//! then sorts once and truncates.

mod backend;
mod document;
mod error;
mod memory;

#[cfg(test)]
mod tests;

pub use backend::{
    BackendHealth, IndexOutcome, SearchBackend, SearchHit, SearchRequest, SearchResponse,
};
pub use document::{CandidateDocument, SkipReason};
pub use error::SearchError;
pub use memory::InMemorySearchBackend;
