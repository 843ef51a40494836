//! Candidate and job ingestion.
//!
//! Records are pulled from a [`RecordSource`] in fixed-size windows. Each
//! window is enriched and streamed into the [`crate::search::SearchBackend`]
//! before the next one is fetched, so peak memory is bounded by the window
//! size rather than the population. A bad record or a failed external batch
//! degrades or skips that record only.

mod checkpoint;
mod error;
mod pipeline;
mod source;

#[cfg(test)]
mod tests;

pub use checkpoint::{CHECKPOINT_FILE_NAME, SyncCheckpoint};
pub use error::IngestError;
pub use pipeline::{IngestPipeline, IngestReport, JobSyncReport, MAX_FAILURE_SAMPLES};
pub use source::{JsonFileSource, RecordSource};
