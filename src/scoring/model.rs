use serde::Serialize;

use super::error::ScoringError;
use super::weights::Weights;
use crate::constants::{DimValidationError, validate_embedding_dim};
use crate::embedding::JobVectors;
use crate::embedding::vector::cosine_similarity;
use crate::profile::CandidateProfile;
use crate::seniority::SeniorityTier;

/// Per-dimension terms before weighting, each in `[0, 2]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub title: f64,
    pub industry: f64,
    pub experience: f64,
    pub skills: f64,
    /// In `[0.5, 1]`; counted twice in the raw score.
    pub seniority_fit: f64,
    pub education: f64,
    pub language: f64,
}

/// Cosine similarity shifted into `[0, 2]`; an absent candidate vector is neutral.
pub fn shifted_similarity(query: &[f32], candidate: Option<&[f32]>) -> f64 {
    match candidate {
        Some(vector) => cosine_similarity(query, vector) + 1.0,
        None => 1.0,
    }
}

/// `2 / (1 + e^(-0.2 y))` damped by title relevance `0.5 + 0.5 (titleSim - 1)`.
pub fn experience_score(weighted_years: f64, title_similarity: f64) -> f64 {
    let logistic = 2.0 / (1.0 + (-0.2 * weighted_years).exp());
    let title_relevance = 0.5 + 0.5 * (title_similarity - 1.0);
    logistic * title_relevance
}

/// `max(0.5, 1 - 0.15 |candidate - job|)`.
pub fn seniority_fit(candidate: SeniorityTier, job: SeniorityTier) -> f64 {
    (1.0 - 0.15 * f64::from(candidate.distance(job))).max(0.5)
}

/// `1 + level / 7` for the candidate's best language level.
pub fn language_score(max_level: u8) -> f64 {
    1.0 + f64::from(max_level) / 7.0
}

/// Scoring function for one job: query vectors, expected tier and weights.
#[derive(Debug, Clone)]
pub struct ScoringModel {
    weights: Weights,
    job_tier: SeniorityTier,
    query: JobVectors,
}

impl ScoringModel {
    /// Fails when the four query vectors differ in dimension from `dim`.
    pub fn new(
        weights: Weights,
        job_tier: SeniorityTier,
        query: JobVectors,
        dim: usize,
    ) -> Result<Self, ScoringError> {
        for (field, vector) in [
            ("title", &query.title),
            ("industry", &query.industry),
            ("skills", &query.skills),
            ("education", &query.education),
        ] {
            if let Err(DimValidationError::DimensionMismatch { expected, actual }) =
                validate_embedding_dim(vector.len(), dim)
            {
                return Err(ScoringError::DimensionMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(Self {
            weights,
            job_tier,
            query,
        })
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn job_tier(&self) -> SeniorityTier {
        self.job_tier
    }

    pub fn dimension(&self) -> usize {
        self.query.title.len()
    }

    pub fn components(&self, candidate: &CandidateProfile) -> ScoreComponents {
        let vectors = &candidate.vectors;
        let title = shifted_similarity(&self.query.title, vectors.title.as_deref());
        let candidate_tier = candidate.seniority_level.unwrap_or(self.job_tier);

        ScoreComponents {
            title,
            industry: shifted_similarity(&self.query.industry, vectors.industry.as_deref()),
            experience: experience_score(candidate.total_weighted_relevant_years, title),
            skills: shifted_similarity(&self.query.skills, vectors.skills.as_deref()),
            seniority_fit: seniority_fit(candidate_tier, self.job_tier),
            education: shifted_similarity(&self.query.education, vectors.education.as_deref()),
            language: language_score(candidate.language_level_max()),
        }
    }

    pub fn raw_score(&self, components: &ScoreComponents) -> f64 {
        let w = &self.weights;
        w.title * components.title
            + w.industry * components.industry
            + w.experience * components.experience
            + w.skills * components.skills
            + w.seniority * components.seniority_fit * 2.0
            + w.education * components.education
            + w.language * components.language
    }

    pub fn score(&self, candidate: &CandidateProfile) -> f64 {
        self.raw_score(&self.components(candidate))
    }
}
