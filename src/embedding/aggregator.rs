use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::cache::EmbeddingCache;
use crate::constants::{
    DimConfig, EMBEDDING_BATCH_SIZE, SKILLS_FALLBACK_CHARS, TITLE_PLACEHOLDER, validate_embedding_dim,
};
use crate::profile::{CandidateProfile, CandidateVectors, JobRequest};
use crate::record::truncate_chars;

/// Texts (and weights) a candidate's four vectors are built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateTexts {
    /// Always non-empty: titles, raw titles, or the skills/placeholder fallback.
    pub title: Vec<(String, f64)>,
    pub industry: Vec<(String, f64)>,
    pub skills: Option<String>,
    pub education: Option<String>,
}

impl CandidateTexts {
    /// Applies the title fallback chain:
    /// 1. resolved (canonical or raw-if-unstandardized) titles weighted by weighted years;
    /// 2. raw titles when every resolved title is NONE;
    /// 3. the first 500 characters of the skills text, else `"Professional"`.
    pub fn from_profile(profile: &CandidateProfile) -> Self {
        let weight = |e: &crate::profile::WorkExperienceEntry| {
            e.weighted_years.unwrap_or(f64::from(e.years_in_role))
        };

        let resolved: Vec<(String, f64)> = profile
            .work_experiences
            .iter()
            .filter_map(|e| e.resolved_title().map(|t| (t.to_string(), weight(e))))
            .collect();

        let title = if has_positive_weight(&resolved) {
            resolved
        } else {
            let raw: Vec<(String, f64)> = profile
                .work_experiences
                .iter()
                .filter(|e| !e.raw_title.trim().is_empty())
                .map(|e| (e.raw_title.trim().to_string(), weight(e)))
                .collect();
            if has_positive_weight(&raw) {
                raw
            } else {
                let skills = truncate_chars(profile.skills_text.trim(), SKILLS_FALLBACK_CHARS);
                let text = if skills.trim().is_empty() {
                    TITLE_PLACEHOLDER.to_string()
                } else {
                    skills
                };
                vec![(text, 1.0)]
            }
        };

        let industry = profile
            .industry_parts
            .iter()
            .map(|p| (p.industry.clone(), p.weighted_years))
            .collect();

        Self {
            title,
            industry,
            skills: non_blank(&profile.skills_text),
            education: non_blank(&profile.education_text),
        }
    }

    fn all_texts(&self) -> impl Iterator<Item = &str> {
        self.title
            .iter()
            .chain(&self.industry)
            .map(|(t, _)| t.as_str())
            .chain(self.skills.as_deref())
            .chain(self.education.as_deref())
    }
}

/// Query vectors of a job request; absent texts are zero vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct JobVectors {
    pub title: Vec<f32>,
    pub industry: Vec<f32>,
    pub skills: Vec<f32>,
    pub education: Vec<f32>,
}

fn has_positive_weight(items: &[(String, f64)]) -> bool {
    items.iter().any(|(_, w)| *w > 0.0)
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Component-wise weighted mean. Negative weights count as zero; `None` when
/// there are no items or the weights sum to zero.
pub fn weighted_mean(items: &[(&[f32], f64)]) -> Option<Vec<f32>> {
    let total: f64 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    if items.is_empty() || total <= 0.0 {
        return None;
    }
    let dim = items[0].0.len();
    let mut acc = vec![0.0f64; dim];
    for (vector, weight) in items {
        let w = weight.max(0.0) / total;
        if w == 0.0 {
            continue;
        }
        for (a, x) in acc.iter_mut().zip(vector.iter()) {
            *a += f64::from(*x) * w;
        }
    }
    Some(acc.into_iter().map(|x| x as f32).collect())
}

/// Cache-backed embedding of text fragments and their aggregation into
/// candidate and job vectors.
pub struct EmbeddingAggregator {
    provider: Arc<dyn EmbeddingProvider>,
    cache: Arc<EmbeddingCache>,
    dim: DimConfig,
    batch_size: usize,
}

impl std::fmt::Debug for EmbeddingAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingAggregator")
            .field("model", &self.provider.model_id())
            .field("dim", &self.dim.embedding_dim)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl EmbeddingAggregator {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, cache: Arc<EmbeddingCache>) -> Self {
        let dim = DimConfig::new(provider.dimension());
        Self {
            provider,
            cache,
            dim,
            batch_size: EMBEDDING_BATCH_SIZE,
        }
    }

    /// Overrides the provider batch size (minimum 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn dim(&self) -> DimConfig {
        self.dim
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        &self.cache
    }

    /// Embeds one text. Blank text is the zero vector with no provider call and
    /// no cache write; a provider failure also yields the zero vector.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        self.embed_many(&[text.to_string()])
            .await
            .pop()
            .unwrap_or_else(|| self.dim.zero_vector())
    }

    /// Embeds many texts, degrading failed batches to zero vectors (uncached).
    pub async fn embed_many(&self, texts: &[String]) -> Vec<Vec<f32>> {
        self.resolve(texts, false)
            .await
            .unwrap_or_else(|_| texts.iter().map(|_| self.dim.zero_vector()).collect())
    }

    /// Embeds many texts; the first failed batch is returned as an error.
    pub async fn try_embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.resolve(texts, true).await
    }

    async fn resolve(&self, texts: &[String], strict: bool) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let model = self.provider.model_id().to_string();
        let mut resolved: HashMap<&str, Vec<f32>> = HashMap::new();
        let mut misses: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for text in texts {
            let key = text.trim();
            if key.is_empty() || !seen.insert(key) {
                continue;
            }
            match self.cache.get(key, &model) {
                Some(v) => {
                    resolved.insert(key, v);
                }
                None => misses.push(key.to_string()),
            }
        }

        let mut fetched: HashMap<String, Vec<f32>> = HashMap::new();
        for batch in misses.chunks(self.batch_size) {
            match self.embed_checked(batch).await {
                Ok(vectors) => {
                    for (text, vector) in batch.iter().zip(vectors) {
                        self.cache.put(text, &model, &vector);
                        fetched.insert(text.clone(), vector);
                    }
                }
                Err(e) if strict => return Err(e),
                Err(e) => {
                    warn!(batch = batch.len(), error = %e, "embedding batch failed, using zero vectors");
                }
            }
        }
        debug!(
            requested = texts.len(),
            cached = resolved.len(),
            fetched = fetched.len(),
            "resolved embeddings"
        );

        Ok(texts
            .iter()
            .map(|text| {
                let key = text.trim();
                resolved
                    .get(key)
                    .or_else(|| fetched.get(key))
                    .cloned()
                    .unwrap_or_else(|| self.dim.zero_vector())
            })
            .collect())
    }

    async fn embed_checked(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let vectors = self.provider.embed_batch(batch).await?;
        if vectors.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: vectors.len(),
            });
        }
        for vector in &vectors {
            validate_embedding_dim(vector.len(), self.dim.embedding_dim)?;
        }
        Ok(vectors)
    }

    /// Weighted mean of the embeddings of `items`.
    pub async fn weighted_mean(&self, items: &[(String, f64)]) -> Option<Vec<f32>> {
        if items.is_empty() {
            return None;
        }
        let texts: Vec<String> = items.iter().map(|(t, _)| t.clone()).collect();
        let vectors = self.embed_many(&texts).await;
        let pairs: Vec<(&[f32], f64)> = vectors
            .iter()
            .zip(items)
            .map(|(v, (_, w))| (v.as_slice(), *w))
            .collect();
        weighted_mean(&pairs)
    }

    /// Builds the four vectors for every profile in one pass, so provider
    /// batches span candidates.
    #[instrument(skip(self, profiles), fields(count = profiles.len()))]
    pub async fn embed_candidates(&self, profiles: &mut [CandidateProfile]) {
        let plans: Vec<CandidateTexts> = profiles.iter().map(CandidateTexts::from_profile).collect();

        let mut unique: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for text in plans.iter().flat_map(CandidateTexts::all_texts) {
            if seen.insert(text) {
                unique.push(text.to_string());
            }
        }

        let vectors = self.embed_many(&unique).await;
        let lookup: HashMap<&str, &[f32]> = unique
            .iter()
            .map(String::as_str)
            .zip(vectors.iter().map(Vec::as_slice))
            .collect();

        let mean = |items: &[(String, f64)]| -> Option<Vec<f32>> {
            let pairs: Vec<(&[f32], f64)> = items
                .iter()
                .filter_map(|(t, w)| lookup.get(t.as_str()).map(|v| (*v, *w)))
                .collect();
            weighted_mean(&pairs)
        };
        let direct = |text: &Option<String>| -> Option<Vec<f32>> {
            text.as_deref()
                .and_then(|t| lookup.get(t))
                .map(|v| v.to_vec())
        };

        for (profile, plan) in profiles.iter_mut().zip(&plans) {
            profile.vectors = CandidateVectors {
                title: mean(&plan.title),
                industry: mean(&plan.industry),
                skills: direct(&plan.skills),
                education: direct(&plan.education),
            };
        }
    }

    /// Builds the vectors of a single profile.
    pub async fn embed_candidate(&self, profile: &mut CandidateProfile) {
        self.embed_candidates(std::slice::from_mut(profile)).await;
    }

    /// Query vectors for a job. Any provider failure is returned.
    pub async fn job_vectors(&self, request: &JobRequest) -> Result<JobVectors, EmbeddingError> {
        let fields = [
            Some(request.title.as_str()),
            request.industry.as_deref(),
            request.required_skills.as_deref(),
            request.required_education.as_deref(),
        ];
        let texts: Vec<String> = fields
            .iter()
            .map(|t| t.map(str::trim).unwrap_or_default().to_string())
            .collect();

        let mut vectors = self.try_embed_many(&texts).await?.into_iter();
        let mut next = || vectors.next().unwrap_or_else(|| self.dim.zero_vector());
        Ok(JobVectors {
            title: next(),
            industry: next(),
            skills: next(),
            education: next(),
        })
    }
}
