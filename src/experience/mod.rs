//! Experience recency weighting.
//!
//! Every work-history entry gets a recency weight in `(0, 1]` from how many
//! years ago it ended, and `weighted_years = years_in_role × recency_weight`.
//! The candidate total and the per-industry `(text, weighted_years)` pairs used
//! for the industry embedding are computed here and nowhere else.


use tracing::trace;

use crate::profile::{CandidateProfile, IndustryPart, WorkExperienceEntry};

/// Weight at the end of the linear segment (5 years ago).
const LINEAR_FLOOR: f64 = 0.80;
const LINEAR_STEP: f64 = 0.04;
const LINEAR_YEARS: i32 = 5;
const MID_DECAY: f64 = 0.93;
const MID_YEARS: i32 = 15;
/// Tail segment base. At 16 years the weight is 0.34, still below the
/// 15-year value (≈ 0.387).
const TAIL_BASE: f64 = 0.40;
const TAIL_DECAY: f64 = 0.85;

/// Recency weight of a role that ended in `end_year`.
///
/// - ended this year or later: `1.0`
/// - 1–5 years ago: `1.0 − 0.04 × years_ago`
/// - 6–15 years ago: `0.80 × 0.93^(years_ago − 5)`
/// - older: `0.40 × 0.85^(years_ago − 15)`
pub fn recency_weight(end_year: i32, current_year: i32) -> f64 {
    let years_ago = current_year.saturating_sub(end_year);
    if years_ago <= 0 {
        1.0
    } else if years_ago <= LINEAR_YEARS {
        1.0 - LINEAR_STEP * f64::from(years_ago)
    } else if years_ago <= MID_YEARS {
        LINEAR_FLOOR * MID_DECAY.powi(years_ago - LINEAR_YEARS)
    } else {
        TAIL_BASE * TAIL_DECAY.powi(years_ago - MID_YEARS)
    }
}

/// Aggregates produced by [`ExperienceScorer::score`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceSummary {
    pub total_weighted_years: f64,
    pub industry_parts: Vec<IndustryPart>,
}

/// Applies recency weighting relative to a fixed processing year.
#[derive(Debug, Clone, Copy)]
pub struct ExperienceScorer {
    current_year: i32,
}

impl ExperienceScorer {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Sets `recency_weight` and `weighted_years` on every entry and returns the
    /// aggregates. Entries already scored keep their weights.
    pub fn score(&self, entries: &mut [WorkExperienceEntry]) -> ExperienceSummary {
        let mut summary = ExperienceSummary::default();

        for entry in entries.iter_mut() {
            if entry.weighted_years.is_none() {
                let weight = recency_weight(entry.end_year, self.current_year);
                entry.recency_weight = Some(weight);
                entry.weighted_years = Some(f64::from(entry.years_in_role.max(1)) * weight);
            }
            let weighted = entry.weighted_years();
            summary.total_weighted_years += weighted;

            if let Some(industry) = entry.industry.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                summary.industry_parts.push(IndustryPart {
                    industry: industry.to_string(),
                    weighted_years: weighted,
                });
            }
        }

        trace!(
            entries = entries.len(),
            total = summary.total_weighted_years,
            "scored work history"
        );
        summary
    }

    /// Scores a profile's work history and stores the aggregates on it.
    pub fn score_profile(&self, profile: &mut CandidateProfile) -> f64 {
        let summary = self.score(&mut profile.work_experiences);
        profile.total_weighted_relevant_years = summary.total_weighted_years;
        profile.industry_parts = summary.industry_parts;
        profile.total_weighted_relevant_years
    }
}
