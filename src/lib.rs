//! SeniorMatch library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Enrichment
//! - [`record`] - raw upstream records to typed profiles and job documents
//! - [`experience`], [`seniority`], [`titles`] - derived profile attributes
//! - [`embedding`] - provider seam, cache-backed aggregation into the four vectors
//! - [`ingest`] - windowed pipeline from a [`ingest::RecordSource`] into a search backend
//!
//! ## Ranking
//! - [`scoring`] - hard filters, weighted dimensions, display breakdown
//! - [`search`] - [`SearchBackend`] contract and the in-memory executor
//! - [`matching`] - request → ranked, explained [`MatchResponse`]
//! - [`explain`] - human-readable match bullets
//!
//! ## Infrastructure
//! - [`Config`], [`SettingsStore`] - process configuration and persisted weights
//! - [`cache`], [`storage`], [`hashing`] - two-tier caches keyed by BLAKE3
//! - [`gateway`] - Axum HTTP surface
//!
//! ## Test/Mock Support
//! Scripted providers are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod experience;
pub mod explain;
pub mod gateway;
pub mod hashing;
pub mod ingest;
pub mod matching;
pub mod profile;
pub mod record;
pub mod scoring;
pub mod search;
pub mod seniority;
pub mod storage;
pub mod titles;

pub use cache::{Caches, EmbeddingCache, TitleCache};
pub use config::{Config, ConfigError, Settings, SettingsError, SettingsStore, SettingsUpdate};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
pub use embedding::{
    EmbeddingAggregator, EmbeddingError, EmbeddingProvider, HashingEmbedder, OpenAiEmbedder,
};
pub use experience::ExperienceScorer;
pub use hashing::{embedding_cache_key, hash_text, hash_to_u64, title_cache_key};
pub use ingest::{IngestError, IngestPipeline, IngestReport, JsonFileSource, RecordSource, SyncCheckpoint};
pub use matching::{CandidateMatch, MatchOverrides, MatchResponse, MatchService};
pub use profile::{CandidateProfile, GeoPoint, JobDocument, JobRequest, WorkExperienceEntry};
pub use record::RawRecord;
pub use scoring::{ScoreBreakdown, ScoringError, Weights};
pub use search::{InMemorySearchBackend, SearchBackend, SearchError};
pub use seniority::{SeniorityClassifier, SeniorityTier};
pub use titles::{OpenAiTitleMapper, TitleMapper, TitleStandardizer, TitleVocabulary, VocabularyMatcher};
