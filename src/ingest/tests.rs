use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use super::*;
use crate::cache::{EmbeddingCache, TitleCache};
use crate::embedding::{EmbeddingAggregator, ScriptedEmbedder};
use crate::record::{RawRecord, candidate_keys};
use crate::search::{InMemorySearchBackend, SearchBackend};
use crate::seniority::SeniorityClassifier;
use crate::titles::{MockTitleMapper, TitleStandardizer, TitleVocabulary};

const DIM: usize = 8;

fn s(v: &str) -> String {
    format!("s:{}:\"{}\";", v.len(), v)
}

fn work_history(title: &str, from: &str, industry: &str) -> String {
    let pairs = [
        ("job_field_stellenbezeichnung", title),
        ("job_field_stellenbezeichnung_von", from),
        ("job_field_stellenbezeichnung_bis", "now"),
        ("job_field_most_experience_branches01", industry),
    ];
    let body: String = pairs.iter().map(|(k, v)| format!("{}{}", s(k), s(v))).collect();
    format!("a:1:{{i:0;a:{}:{{{}}}}}", pairs.len(), body)
}

fn candidate(post_id: u64, title: &str, modified: &str) -> RawRecord {
    let mut raw = RawRecord::new(post_id)
        .with_title(format!("Candidate {post_id}"))
        .with_meta(candidate_keys::WORK_HISTORY, work_history(title, "2016", "Banking"))
        .with_meta(candidate_keys::LAT, "47.3769")
        .with_meta(candidate_keys::LON, "8.5417")
        .with_meta(candidate_keys::SKILLS, "IFRS, SAP FI");
    raw.post_modified = Some(modified.to_string());
    raw
}

fn unlocated(post_id: u64, modified: &str) -> RawRecord {
    let mut raw = RawRecord::new(post_id)
        .with_meta(candidate_keys::WORK_HISTORY, work_history("Bookkeeper", "2010", "Retail"));
    raw.post_modified = Some(modified.to_string());
    raw
}

fn source(records: Vec<RawRecord>) -> JsonFileSource {
    JsonFileSource::from_records("memory.json", records)
}

struct Harness {
    pipeline: IngestPipeline<InMemorySearchBackend>,
    backend: Arc<InMemorySearchBackend>,
    embedder: Arc<ScriptedEmbedder>,
    mapper: Arc<MockTitleMapper>,
}

fn harness(window: usize) -> Harness {
    let embedder = Arc::new(ScriptedEmbedder::new(DIM));
    let mapper = Arc::new(
        MockTitleMapper::new()
            .with_answer("Leiterin Buchhaltung", "Head of Accounting")
            .with_answer("Controller", "Controller"),
    );
    let vocabulary = Arc::new(TitleVocabulary::parse("Head of Accounting\nController\n"));
    let titles = Arc::new(TitleStandardizer::new(
        mapper.clone(),
        Arc::new(TitleCache::in_memory(1_000)),
        vocabulary,
    ));
    let aggregator = Arc::new(EmbeddingAggregator::new(
        embedder.clone(),
        Arc::new(EmbeddingCache::in_memory(1_000)),
    ));
    let backend = Arc::new(InMemorySearchBackend::new(DIM));
    let pipeline = IngestPipeline::new(
        2026,
        Arc::new(SeniorityClassifier::new()),
        titles,
        aggregator,
        backend.clone(),
    )
    .with_window(window);

    Harness {
        pipeline,
        backend,
        embedder,
        mapper,
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_json_array_source() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("candidates.json");
    std::fs::write(
        &path,
        r#"[{"post_id": 2, "post_modified": "2026-03-01 10:00:00"},
            {"post_id": 1, "post_modified": "2026-01-01 10:00:00", "meta": {"k": "v"}}]"#,
    )
    .unwrap();

    let source = JsonFileSource::open(&path).unwrap();
    assert_eq!(source.len(), 2);
    let records = source.fetch(None, 0, 10).await.unwrap();
    let ids: Vec<u64> = records.iter().map(|r| r.post_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(records[0].meta("k"), Some("v"));
}

#[tokio::test]
async fn test_jsonl_source_skips_bad_lines() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("candidates.jsonl");
    std::fs::write(
        &path,
        "{\"post_id\": 1}\nnot json\n\n{\"post_id\": 3, \"post_title\": \"X\"}\n",
    )
    .unwrap();

    let source = JsonFileSource::open(&path).unwrap();
    assert_eq!(source.len(), 2);
}

#[test]
fn test_source_errors() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let missing = JsonFileSource::open(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, IngestError::SourceUnreadable { .. }));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[{\"post_id\": ").unwrap();
    let broken = JsonFileSource::open(&path).unwrap_err();
    assert!(matches!(broken, IngestError::SourceMalformed { .. }));
}

#[tokio::test]
async fn test_fetch_since_and_paging() {
    let source = source(vec![
        candidate(3, "Controller", "2026-03-01 00:00:00"),
        candidate(1, "Controller", "2026-01-01 00:00:00"),
        candidate(2, "Controller", "2026-02-01 00:00:00"),
        candidate(9, "Controller", "yesterday"),
    ]);

    let all = source.fetch(None, 0, 10).await.unwrap();
    let ids: Vec<u64> = all.iter().map(|r| r.post_id).collect();
    assert_eq!(ids, vec![9, 1, 2, 3]);

    let page = source.fetch(None, 1, 2).await.unwrap();
    let ids: Vec<u64> = page.iter().map(|r| r.post_id).collect();
    assert_eq!(ids, vec![1, 2]);

    let since = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
    let changed = source.fetch(Some(since), 0, 10).await.unwrap();
    let ids: Vec<u64> = changed.iter().map(|r| r.post_id).collect();
    assert_eq!(ids, vec![9, 2, 3]);
}

// ---------------------------------------------------------------------------
// Checkpoint
// ---------------------------------------------------------------------------

#[test]
fn test_checkpoint_round_trip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let checkpoint = SyncCheckpoint::new(dir.path().join(CHECKPOINT_FILE_NAME));
    assert!(checkpoint.load().is_none());

    let at = Utc.with_ymd_and_hms(2026, 5, 4, 3, 2, 1).unwrap();
    checkpoint.save(at).unwrap();
    assert_eq!(checkpoint.load(), Some(at));
}

#[test]
fn test_checkpoint_corrupt_file_means_full_sync() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(CHECKPOINT_FILE_NAME);
    std::fs::write(&path, "{\"last_sync\": 12").unwrap();
    assert!(SyncCheckpoint::new(path).load().is_none());
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_run_indexes_located_candidates() {
    let h = harness(10);
    let source = source(vec![
        candidate(1, "Leiterin Buchhaltung", "2026-01-01 00:00:00"),
        candidate(2, "Controller", "2026-01-02 00:00:00"),
        unlocated(3, "2026-01-03 00:00:00"),
    ]);

    let report = h.pipeline.run(&source, None).await.unwrap();
    assert_eq!(report.fetched, 3);
    assert_eq!(report.indexed, 2);
    assert_eq!(report.skipped_missing_location, 1);
    assert_eq!(report.skipped_missing_title_vector, 0);
    assert_eq!(report.failed, 0);
    assert!(!report.run_id.is_empty());
    assert_eq!(h.backend.count().await.unwrap(), 2);

    // The unlocated record never reaches the title mapper.
    let mapped: Vec<String> = h.mapper.batches().concat();
    assert!(mapped.contains(&"Leiterin Buchhaltung".to_string()));
    assert!(!mapped.contains(&"Bookkeeper".to_string()));
}

#[tokio::test]
async fn test_run_processes_every_window() {
    let h = harness(2);
    let records = (1..=5)
        .map(|id| candidate(id, "Controller", &format!("2026-01-0{id} 00:00:00")))
        .collect();

    let report = h.pipeline.run(&source(records), None).await.unwrap();
    assert_eq!(report.fetched, 5);
    assert_eq!(report.indexed, 5);
    assert_eq!(h.backend.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_run_counts_degraded_fields() {
    let h = harness(10);
    let raw = candidate(1, "Controller", "2026-01-01 00:00:00")
        .with_meta(candidate_keys::PENSUM, "full time");

    let report = h.pipeline.run(&source(vec![raw]), None).await.unwrap();
    assert_eq!(report.indexed, 1);
    assert!(report.degraded_fields >= 1);
}

#[tokio::test]
async fn test_rerun_is_idempotent_and_served_from_caches() {
    let h = harness(10);
    let source = source(vec![
        candidate(1, "Leiterin Buchhaltung", "2026-01-01 00:00:00"),
        candidate(2, "Controller", "2026-01-02 00:00:00"),
    ]);

    h.pipeline.run(&source, None).await.unwrap();
    let embed_calls = h.embedder.calls();
    let title_calls = h.mapper.calls();
    assert!(embed_calls > 0);

    let second = h.pipeline.run(&source, None).await.unwrap();
    assert_eq!(second.indexed, 2);
    assert_eq!(h.backend.count().await.unwrap(), 2);
    assert_eq!(h.embedder.calls(), embed_calls);
    assert_eq!(h.mapper.calls(), title_calls);
}

#[tokio::test]
async fn test_embedding_outage_still_indexes() {
    let h = harness(10);
    h.mapper.set_failing(true);
    let embedder = Arc::new(ScriptedEmbedder::new(DIM).failing_on("Controller"));
    let pipeline = IngestPipeline::new(
        2026,
        Arc::new(SeniorityClassifier::new()),
        Arc::new(TitleStandardizer::new(
            h.mapper.clone(),
            Arc::new(TitleCache::in_memory(10)),
            Arc::new(TitleVocabulary::parse("Controller\n")),
        )),
        Arc::new(EmbeddingAggregator::new(
            embedder,
            Arc::new(EmbeddingCache::in_memory(10)),
        )),
        h.backend.clone(),
    );

    let report = pipeline
        .run(&source(vec![candidate(1, "Controller", "2026-01-01 00:00:00")]), None)
        .await
        .unwrap();
    assert_eq!(report.indexed, 1);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn test_run_incremental_moves_checkpoint() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let checkpoint = SyncCheckpoint::new(dir.path().join(CHECKPOINT_FILE_NAME));
    let h = harness(10);
    let source = source(vec![
        candidate(1, "Controller", "2020-01-01 00:00:00"),
        candidate(2, "Controller", "2020-01-02 00:00:00"),
    ]);

    let before = Utc::now();
    let first = h.pipeline.run_incremental(&source, &checkpoint).await.unwrap();
    assert_eq!(first.fetched, 2);
    let saved = checkpoint.load().expect("checkpoint written");
    // Stored at second precision.
    assert!(saved.timestamp() >= before.timestamp());

    let second = h.pipeline.run_incremental(&source, &checkpoint).await.unwrap();
    assert_eq!(second.fetched, 0);
}

#[tokio::test]
async fn test_failed_run_leaves_checkpoint() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let checkpoint = SyncCheckpoint::new(dir.path().join(CHECKPOINT_FILE_NAME));
    let h = harness(10);

    struct Broken;

    #[async_trait::async_trait]
    impl RecordSource for Broken {
        async fn fetch(
            &self,
            _since: Option<chrono::DateTime<Utc>>,
            _offset: usize,
            _limit: usize,
        ) -> Result<Vec<RawRecord>, IngestError> {
            Err(IngestError::SourceMalformed {
                path: "upstream".into(),
                reason: "connection reset".into(),
            })
        }
    }

    let err = h.pipeline.run_incremental(&Broken, &checkpoint).await.unwrap_err();
    assert!(matches!(err, IngestError::SourceMalformed { .. }));
    assert!(checkpoint.load().is_none());
    assert!(!checkpoint.path().exists());
}

#[tokio::test]
async fn test_sync_jobs_stores_documents() {
    let h = harness(1);
    let mut job = RawRecord::new(500)
        .with_title("Head of Accounting")
        .with_meta("_noo_job_field_industry", "Real Estate");
    job.post_modified = Some("2026-02-01 00:00:00".into());
    let mut other = RawRecord::new(501).with_title("Controller");
    other.post_modified = Some("2026-02-02 00:00:00".into());

    let report = h
        .pipeline
        .sync_jobs(&source(vec![job, other]), None)
        .await
        .unwrap();
    assert_eq!(report.fetched, 2);
    assert_eq!(report.stored, 2);
    assert_eq!(report.failed, 0);

    let stored = h.backend.get_job(500).await.unwrap().expect("job stored");
    assert_eq!(stored.title, "Head of Accounting");
    assert_eq!(stored.industry, "Real Estate");
}
