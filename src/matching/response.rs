use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::explain::explain;
use crate::profile::{
    CandidateDetails, CandidateProfile, JobRequest, LanguageSkill, WorkExperienceEntry,
};
use crate::scoring::{ScoreBreakdown, Weights};
use crate::search::SearchHit;
use crate::seniority::SeniorityTier;

/// Message returned with an empty result set.
pub const NO_MATCHES_MESSAGE: &str = "No qualified candidates found above threshold.";
const MAX_TOP_INDUSTRIES: usize = 5;

/// Per-call overrides from the query string. `max_results` wins over the
/// request; `min_score` only applies when the request carries none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct MatchOverrides {
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Work-history row as shown in a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperienceItem {
    pub raw_title: String,
    /// Canonical title, `"NONE"`, or empty before standardization.
    pub standardized_title: String,
    pub industry: String,
    pub start_year: i32,
    pub end_year: i32,
    pub years_in_role: u32,
    pub weighted_years: Option<f64>,
}

impl From<&WorkExperienceEntry> for WorkExperienceItem {
    fn from(entry: &WorkExperienceEntry) -> Self {
        Self {
            raw_title: entry.raw_title.clone(),
            standardized_title: entry
                .canonical_title
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            industry: entry.industry.clone().unwrap_or_default(),
            start_year: entry.start_year,
            end_year: entry.end_year,
            years_in_role: entry.years_in_role,
            weighted_years: entry.weighted_years,
        }
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub post_id: u64,
    /// 1-based.
    pub rank: usize,
    pub score: ScoreBreakdown,
    pub rank_explanation: Vec<String>,
    pub most_relevant_role: String,
    pub total_relevant_years: f64,
    pub seniority_level: Option<SeniorityTier>,
    pub top_industries: Vec<String>,
    pub work_experiences: Vec<WorkExperienceItem>,
    pub skills_text: String,
    pub education_text: String,
    pub languages: Vec<LanguageSkill>,
    pub location_lat: Option<f64>,
    pub location_lon: Option<f64>,
    pub work_radius_km: u32,
    pub available_from: Option<NaiveDate>,
    pub pensum_desired: u32,
    pub pensum_from: u32,
    #[serde(flatten)]
    pub details: CandidateDetails,
}

impl CandidateMatch {
    pub(crate) fn from_hit(
        hit: SearchHit,
        rank: usize,
        request: &JobRequest,
        weights: &Weights,
    ) -> Self {
        let score = ScoreBreakdown::from_raw(hit.raw_score, weights);
        let profile = hit.document;
        let rank_explanation = explain(&profile, request, &score);
        Self::from_profile(hit.post_id, rank, score, rank_explanation, profile)
    }

    fn from_profile(
        post_id: u64,
        rank: usize,
        score: ScoreBreakdown,
        rank_explanation: Vec<String>,
        profile: CandidateProfile,
    ) -> Self {
        let most_relevant_role = profile
            .most_relevant_entry()
            .map(|e| e.display_title().to_string())
            .unwrap_or_default();
        let top_industries = profile
            .distinct_industries()
            .into_iter()
            .take(MAX_TOP_INDUSTRIES)
            .map(str::to_string)
            .collect();
        let work_experiences = profile
            .work_experiences
            .iter()
            .map(WorkExperienceItem::from)
            .collect();

        Self {
            post_id,
            rank,
            score,
            rank_explanation,
            most_relevant_role,
            total_relevant_years: profile.total_weighted_relevant_years,
            seniority_level: profile.seniority_level,
            top_industries,
            work_experiences,
            skills_text: profile.skills_text,
            education_text: profile.education_text,
            languages: profile.languages,
            location_lat: profile.location.map(|p| p.lat),
            location_lon: profile.location.map(|p| p.lon),
            work_radius_km: profile.work_radius_km,
            available_from: profile.available_from,
            pensum_desired: profile.workload.desired,
            pensum_from: profile.workload.minimum,
            details: profile.details,
        }
    }
}

/// Ranked shortlist. `message` is set when `matches` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<CandidateMatch>,
    pub message: Option<String>,
    /// Candidates passing the filters and the threshold, before the result cap.
    pub total_above_threshold: usize,
}

impl MatchResponse {
    pub fn failed(detail: impl std::fmt::Display) -> Self {
        Self {
            matches: Vec::new(),
            message: Some(format!("Search failed: {detail}")),
            total_above_threshold: 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|m| m.starts_with("Search failed"))
    }
}
