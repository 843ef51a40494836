use futures_util::StreamExt;

use super::*;
use crate::embedding::JobVectors;
use crate::profile::{
    CandidateProfile, CandidateVectors, GeoPoint, JobDocument, JobRequest, WorkExperienceEntry,
};
use crate::scoring::{HardFilters, ScoringModel, Weights};
use crate::seniority::SeniorityTier;

const DIM: usize = 4;
const ZURICH: GeoPoint = GeoPoint {
    lat: 47.37,
    lon: 8.54,
};

fn axis(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[i] = 1.0;
    v
}

fn profile(post_id: u64, title: Vec<f32>) -> CandidateProfile {
    CandidateProfile {
        post_id,
        location: Some(ZURICH),
        vectors: CandidateVectors {
            title: Some(title),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn document(post_id: u64, title: Vec<f32>) -> CandidateDocument {
    CandidateDocument::from_profile(profile(post_id, title), DIM).unwrap()
}

fn request(min_score: f64, limit: usize) -> SearchRequest {
    let job = JobRequest::new("Controller", ZURICH);
    let query = JobVectors {
        title: axis(0),
        industry: vec![0.0; DIM],
        skills: vec![0.0; DIM],
        education: vec![0.0; DIM],
    };
    SearchRequest {
        filters: HardFilters::from_request(&job),
        model: ScoringModel::new(Weights::default(), SeniorityTier::Senior, query, DIM).unwrap(),
        min_score,
        limit,
        exclude_vectors: true,
    }
}

async fn index(backend: &InMemorySearchBackend, docs: Vec<CandidateDocument>) -> Vec<IndexOutcome> {
    backend.index_candidates(docs).collect().await
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[test]
fn test_document_requires_location_and_title_vector() {
    let mut p = profile(1, axis(0));
    p.location = None;
    assert_eq!(
        CandidateDocument::from_profile(p, DIM).unwrap_err(),
        SkipReason::MissingLocation
    );

    let mut p = profile(2, axis(0));
    p.vectors.title = None;
    assert_eq!(
        CandidateDocument::from_profile(p, DIM).unwrap_err(),
        SkipReason::MissingTitleVector
    );
}

#[test]
fn test_document_materializes_vectors() {
    let doc = CandidateDocument::from_profile(profile(1, vec![0.0; DIM]), DIM).unwrap();
    let v = &doc.profile().vectors;
    assert_eq!(v.title.as_deref(), Some(axis(0).as_slice()));
    assert_eq!(v.industry.as_deref(), Some(axis(0).as_slice()));
    assert_eq!(v.skills.as_deref(), Some(axis(0).as_slice()));
    assert_eq!(v.education.as_deref(), Some(axis(0).as_slice()));
    assert_eq!(doc.vector_dims(), [DIM; 4]);
}

#[test]
fn test_document_truncates_descriptions() {
    let mut p = profile(1, axis(1));
    p.work_experiences =
        vec![WorkExperienceEntry::new("Controller", 2020, 2024).with_description("x".repeat(12_000))];
    let doc = CandidateDocument::from_profile(p, DIM).unwrap();
    assert_eq!(doc.profile().work_experiences[0].description.len(), 10_000);
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_searches_on_blocking_pool() {
    let backend = InMemorySearchBackend::new(DIM);
    let docs = (0..200u64).map(|id| document(id, axis((id % 4) as usize))).collect();
    index(&backend, docs).await;

    let searches = (0..8).map(|_| {
        let backend = backend.clone();
        tokio::spawn(async move { backend.search(request(0.0, 10)).await })
    });
    let responses = futures::future::join_all(searches).await;

    for response in responses {
        let response = response.unwrap().unwrap();
        assert_eq!(response.total, 200);
        assert_eq!(response.hits.len(), 10);
        assert_eq!(response.hits[0].post_id, 0);
    }
}

#[tokio::test]
async fn test_index_reports_per_item_outcomes() {
    let backend = InMemorySearchBackend::new(DIM);
    let wrong = CandidateDocument::from_profile(
        CandidateProfile {
            post_id: 9,
            location: Some(ZURICH),
            vectors: CandidateVectors {
                title: Some(vec![1.0, 0.0]),
                ..Default::default()
            },
            ..Default::default()
        },
        2,
    )
    .unwrap();

    let outcomes = index(&backend, vec![document(1, axis(0)), wrong]).await;
    assert_eq!(outcomes[0], IndexOutcome::Indexed { post_id: 1 });
    match &outcomes[1] {
        IndexOutcome::Failed { post_id, reason } => {
            assert_eq!(*post_id, 9);
            assert_eq!(reason, &format!("dimension mismatch: expected {DIM}, got 2"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(backend.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_search_ranks_by_score_descending() {
    let backend = InMemorySearchBackend::new(DIM);
    index(
        &backend,
        vec![
            document(1, axis(1)),
            document(2, axis(0)),
            document(3, vec![1.0, 1.0, 0.0, 0.0]),
        ],
    )
    .await;

    let response = backend.search(request(0.0, 10)).await.unwrap();
    let ids: Vec<u64> = response.hits.iter().map(|h| h.post_id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert_eq!(response.total, 3);
    assert!(response.hits[0].raw_score > response.hits[1].raw_score);
}

#[tokio::test]
async fn test_search_threshold_and_limit() {
    let backend = InMemorySearchBackend::new(DIM);
    index(
        &backend,
        vec![
            document(1, axis(1)),
            document(2, axis(0)),
            document(3, vec![1.0, 1.0, 0.0, 0.0]),
        ],
    )
    .await;
    let all = backend.search(request(0.0, 10)).await.unwrap();
    let cutoff = all.hits[1].raw_score;

    let response = backend.search(request(cutoff, 1)).await.unwrap();
    assert_eq!(response.total, 2, "total counts before truncation");
    assert_eq!(response.hits.len(), 1);
    assert_eq!(response.hits[0].post_id, 2);
}

#[tokio::test]
async fn test_search_applies_hard_filters() {
    let backend = InMemorySearchBackend::new(DIM);
    let mut far = profile(5, axis(0));
    far.location = Some(GeoPoint::new(46.2044, 6.1432));
    index(
        &backend,
        vec![document(1, axis(0)), CandidateDocument::from_profile(far, DIM).unwrap()],
    )
    .await;

    let response = backend.search(request(0.0, 10)).await.unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.hits[0].post_id, 1);
}

#[tokio::test]
async fn test_search_excludes_vectors_on_request() {
    let backend = InMemorySearchBackend::new(DIM);
    index(&backend, vec![document(1, axis(0))]).await;

    let stripped = backend.search(request(0.0, 10)).await.unwrap();
    assert!(stripped.hits[0].document.vectors.title.is_none());

    let mut with_vectors = request(0.0, 10);
    with_vectors.exclude_vectors = false;
    let full = backend.search(with_vectors).await.unwrap();
    assert!(full.hits[0].document.vectors.title.is_some());
}

#[tokio::test]
async fn test_search_rejects_wrong_query_dimension() {
    let backend = InMemorySearchBackend::new(8);
    let err = backend.search(request(0.0, 10)).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidScoringParameters { .. }));
}

#[tokio::test]
async fn test_reindex_keeps_slot_and_replaces_document() {
    let backend = InMemorySearchBackend::new(DIM);
    index(&backend, vec![document(1, axis(1)), document(2, axis(1))]).await;
    index(&backend, vec![document(1, axis(0))]).await;

    assert_eq!(backend.count().await.unwrap(), 2);
    let response = backend.search(request(0.0, 10)).await.unwrap();
    assert_eq!(response.hits[0].post_id, 1);
}

#[tokio::test]
async fn test_delete_and_reset() {
    let backend = InMemorySearchBackend::new(DIM);
    index(&backend, vec![document(1, axis(0)), document(2, axis(0))]).await;

    assert_eq!(backend.delete_candidates(&[2, 3]).await.unwrap(), 1);
    assert_eq!(backend.count().await.unwrap(), 1);

    backend.reset().await.unwrap();
    assert_eq!(backend.count().await.unwrap(), 0);
    assert_eq!(backend.health().await.candidates, 0);
}

#[tokio::test]
async fn test_jobs_round_trip() {
    let backend = InMemorySearchBackend::new(DIM);
    let job = JobDocument {
        post_id: 77,
        title: "CFO".into(),
        description: String::new(),
        required_skills: String::new(),
        required_education: String::new(),
        industry: "Banking".into(),
        expected_seniority_level: SeniorityTier::Executive,
        location: Some(ZURICH),
        radius_km: 30,
        pensum_min: 60,
        pensum_max: 100,
        required_languages: Vec::new(),
        post_modified: None,
    };
    backend.put_job(job.clone()).await.unwrap();

    assert_eq!(backend.get_job(77).await.unwrap(), Some(job));
    assert_eq!(backend.get_job(78).await.unwrap(), None);
    assert_eq!(backend.health().await.jobs, 1);
}
