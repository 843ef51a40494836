use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::Serialize;
use tracing::{Instrument, debug, info, info_span, instrument, warn};
use uuid::Uuid;

use super::checkpoint::SyncCheckpoint;
use super::error::IngestError;
use super::source::RecordSource;
use crate::constants::DEFAULT_INGEST_WINDOW;
use crate::embedding::EmbeddingAggregator;
use crate::experience::ExperienceScorer;
use crate::profile::CandidateProfile;
use crate::record::{RawRecord, normalize_candidate, normalize_job};
use crate::search::{CandidateDocument, IndexOutcome, SearchBackend, SkipReason};
use crate::seniority::SeniorityClassifier;
use crate::titles::TitleStandardizer;

/// Failure reasons kept verbatim in a report.
pub const MAX_FAILURE_SAMPLES: usize = 20;

/// Counts of one candidate ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub run_id: String,
    pub fetched: usize,
    pub indexed: usize,
    pub skipped_missing_location: usize,
    pub skipped_missing_title_vector: usize,
    pub failed: usize,
    /// Fields that fell back to defaults during normalization.
    pub degraded_fields: usize,
    pub failure_samples: Vec<String>,
}

impl IngestReport {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id: run_id.to_string(),
            ..Default::default()
        }
    }

    fn record_outcome(&mut self, outcome: IndexOutcome) {
        match outcome {
            IndexOutcome::Indexed { .. } => self.indexed += 1,
            IndexOutcome::Failed { post_id, reason } => {
                self.failed += 1;
                if self.failure_samples.len() < MAX_FAILURE_SAMPLES {
                    self.failure_samples.push(format!("post_id={post_id}: {reason}"));
                }
            }
        }
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MissingLocation => self.skipped_missing_location += 1,
            SkipReason::MissingTitleVector => self.skipped_missing_title_vector += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped_missing_location + self.skipped_missing_title_vector
    }
}

/// Counts of one job sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobSyncReport {
    pub fetched: usize,
    pub stored: usize,
    pub failed: usize,
}

/// Windowed enrichment: normalize, score experience, infer seniority,
/// standardize titles, embed, then stream into the backend.
///
/// Only one window of profiles is held at a time.
pub struct IngestPipeline<B: SearchBackend> {
    experience: ExperienceScorer,
    classifier: Arc<SeniorityClassifier>,
    titles: Arc<TitleStandardizer>,
    aggregator: Arc<EmbeddingAggregator>,
    backend: Arc<B>,
    window: usize,
}

impl<B: SearchBackend> IngestPipeline<B> {
    pub fn new(
        current_year: i32,
        classifier: Arc<SeniorityClassifier>,
        titles: Arc<TitleStandardizer>,
        aggregator: Arc<EmbeddingAggregator>,
        backend: Arc<B>,
    ) -> Self {
        Self {
            experience: ExperienceScorer::new(current_year),
            classifier,
            titles,
            aggregator,
            backend,
            window: DEFAULT_INGEST_WINDOW,
        }
    }

    /// Records per window (minimum 1).
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn current_year(&self) -> i32 {
        self.experience.current_year()
    }

    /// Normalized and enriched profile, without vectors.
    pub fn prepare(&self, raw: &RawRecord, report: &mut IngestReport) -> CandidateProfile {
        let normalized = normalize_candidate(raw, self.experience.current_year());
        if !normalized.is_clean() {
            debug!(
                post_id = raw.post_id,
                degradations = ?normalized.degradations,
                "Record normalized with fallbacks"
            );
            report.degraded_fields += normalized.degradations.len();
        }

        let mut profile = normalized.into_record();
        self.experience.score_profile(&mut profile);
        profile.seniority_level = Some(self.classifier.infer_candidate(&profile.work_experiences));
        profile
    }

    /// Enriches and indexes one window of records.
    #[instrument(skip(self, records, report), fields(records = records.len()))]
    pub async fn run_window(&self, records: &[RawRecord], report: &mut IngestReport) {
        report.fetched += records.len();

        let mut profiles = Vec::with_capacity(records.len());
        for raw in records {
            let profile = self.prepare(raw, report);
            if profile.location.is_none() {
                report.record_skip(SkipReason::MissingLocation);
                continue;
            }
            profiles.push(profile);
        }

        self.titles.apply_to_profiles(&mut profiles).await;
        self.aggregator.embed_candidates(&mut profiles).await;

        let dim = self.aggregator.dim().embedding_dim;
        let mut documents = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let post_id = profile.post_id;
            match CandidateDocument::from_profile(profile, dim) {
                Ok(document) => documents.push(document),
                Err(reason) => {
                    debug!(post_id, %reason, "Candidate not indexable");
                    report.record_skip(reason);
                }
            }
        }

        let mut outcomes = self.backend.index_candidates(documents);
        while let Some(outcome) = outcomes.next().await {
            if let IndexOutcome::Failed { post_id, reason } = &outcome {
                warn!(post_id, %reason, "Index write failed");
            }
            report.record_outcome(outcome);
        }
    }

    /// Ingests every record modified after `since`, one window at a time.
    pub async fn run<S>(&self, source: &S, since: Option<DateTime<Utc>>) -> Result<IngestReport, IngestError>
    where
        S: RecordSource + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let span = info_span!("ingest", %run_id, since = ?since, window = self.window);

        async move {
            let mut report = IngestReport::new(run_id);
            let mut offset = 0;
            loop {
                let records = source.fetch(since, offset, self.window).await?;
                if records.is_empty() {
                    break;
                }
                offset += records.len();
                let full = records.len() == self.window;
                self.run_window(&records, &mut report).await;
                if !full {
                    break;
                }
            }

            info!(
                fetched = report.fetched,
                indexed = report.indexed,
                skipped = report.skipped(),
                failed = report.failed,
                "Ingestion run complete"
            );
            Ok::<_, IngestError>(report)
        }
        .instrument(span)
        .await
    }

    /// Ingests records changed since the checkpoint and, on success, moves the
    /// checkpoint to this run's start time.
    pub async fn run_incremental<S>(
        &self,
        source: &S,
        checkpoint: &SyncCheckpoint,
    ) -> Result<IngestReport, IngestError>
    where
        S: RecordSource + ?Sized,
    {
        let started_at = Utc::now();
        let since = checkpoint.load();
        info!(since = ?since, "Starting incremental sync");

        let report = self.run(source, since).await?;
        checkpoint.save(started_at)?;
        Ok(report)
    }

    /// Normalizes job records and stores them.
    #[instrument(skip(self, source))]
    pub async fn sync_jobs<S>(
        &self,
        source: &S,
        since: Option<DateTime<Utc>>,
    ) -> Result<JobSyncReport, IngestError>
    where
        S: RecordSource + ?Sized,
    {
        let mut report = JobSyncReport::default();
        let mut offset = 0;
        loop {
            let records = source.fetch(since, offset, self.window).await?;
            if records.is_empty() {
                break;
            }
            offset += records.len();
            report.fetched += records.len();
            let full = records.len() == self.window;

            for raw in &records {
                let job = normalize_job(raw, &self.classifier).into_record();
                match self.backend.put_job(job).await {
                    Ok(()) => report.stored += 1,
                    Err(e) => {
                        warn!(post_id = raw.post_id, error = %e, "Job store failed");
                        report.failed += 1;
                    }
                }
            }
            if !full {
                break;
            }
        }

        info!(fetched = report.fetched, stored = report.stored, "Job sync complete");
        Ok(report)
    }
}
