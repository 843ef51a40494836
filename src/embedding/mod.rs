//! Text embedding: providers, the cache-backed aggregator and vector math.
//!
//! - [`EmbeddingProvider`] is the seam to the external embedding service.
//!   [`OpenAiEmbedder`] talks to an OpenAI-compatible API; [`HashingEmbedder`]
//!   is the deterministic offline provider.
//! - [`EmbeddingAggregator`] memoizes every text through
//!   [`crate::cache::EmbeddingCache`] and builds candidate and job vectors.
//!
//! Blank text never reaches a provider; it embeds to the zero vector.

mod aggregator;
mod error;
mod hashing;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod openai;
mod provider;
/// Vector helpers (norms, cosine, weighted means).
pub mod vector;


pub use aggregator::{CandidateTexts, EmbeddingAggregator, JobVectors, weighted_mean};
pub use error::EmbeddingError;
pub use hashing::{HASHING_MODEL_ID, HashingEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedEmbedder;
pub use openai::OpenAiEmbedder;
pub use provider::EmbeddingProvider;
