//! Typed domain model shared by ingestion, scoring and the API.
//!
//! A [`CandidateProfile`] is produced by the record normalizer and then enriched in
//! place: experience scoring sets the derived per-entry fields, the seniority
//! classifier sets the tier, title standardization sets canonical titles and the
//! embedding aggregator attaches [`CandidateVectors`].

mod job;
mod language;


pub use job::{DEFAULT_JOB_LOCATION, JobDocument, JobRequest, RequiredLanguage};
pub use language::{LanguageLevel, LanguageSkill, ProficiencyBucket};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::seniority::SeniorityTier;

/// Sentinel stored for titles with no reasonable canonical match.
pub const NO_MATCH: &str = "NONE";

const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Outcome of title standardization for one raw title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TitleResolution {
    /// Entry from the canonical vocabulary.
    Canonical(String),
    /// No reasonable match (`"NONE"`).
    NoMatch,
}

impl TitleResolution {
    /// Returns the canonical title, if any.
    pub fn canonical(&self) -> Option<&str> {
        match self {
            TitleResolution::Canonical(title) => Some(title),
            TitleResolution::NoMatch => None,
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, TitleResolution::NoMatch)
    }
}

impl From<String> for TitleResolution {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == NO_MATCH {
            TitleResolution::NoMatch
        } else {
            TitleResolution::Canonical(trimmed.to_string())
        }
    }
}

impl From<TitleResolution> for String {
    fn from(value: TitleResolution) -> Self {
        match value {
            TitleResolution::Canonical(title) => title,
            TitleResolution::NoMatch => NO_MATCH.to_string(),
        }
    }
}

impl std::fmt::Display for TitleResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TitleResolution::Canonical(title) => f.write_str(title),
            TitleResolution::NoMatch => f.write_str(NO_MATCH),
        }
    }
}

/// One role in a candidate's work history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperienceEntry {
    pub raw_title: String,
    /// Unset until title standardization has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_title: Option<TitleResolution>,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub start_year: i32,
    /// "Ongoing" roles carry the processing year.
    pub end_year: i32,
    /// Always at least 1.
    pub years_in_role: u32,
    /// Set once by the experience scorer, in `(0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recency_weight: Option<f64>,
    /// `years_in_role × recency_weight`, set together with `recency_weight`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_years: Option<f64>,
    #[serde(default)]
    pub description: String,
}

impl WorkExperienceEntry {
    /// Creates an unscored entry; `years_in_role` is floored at 1.
    pub fn new(raw_title: impl Into<String>, start_year: i32, end_year: i32) -> Self {
        Self {
            raw_title: raw_title.into(),
            canonical_title: None,
            company: String::new(),
            industry: None,
            start_year,
            end_year,
            years_in_role: years_in_role(start_year, end_year),
            recency_weight: None,
            weighted_years: None,
            description: String::new(),
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        let industry = industry.into();
        self.industry = (!industry.trim().is_empty()).then_some(industry);
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_canonical_title(mut self, resolution: TitleResolution) -> Self {
        self.canonical_title = Some(resolution);
        self
    }

    /// Weighted years, or `0.0` before scoring.
    #[inline]
    pub fn weighted_years(&self) -> f64 {
        self.weighted_years.unwrap_or(0.0)
    }

    /// Title used for semantic aggregation: canonical when resolved, raw when
    /// standardization has not run, `None` when standardization found no match.
    pub fn resolved_title(&self) -> Option<&str> {
        match &self.canonical_title {
            Some(TitleResolution::Canonical(title)) => Some(title),
            Some(TitleResolution::NoMatch) => None,
            None => non_empty(&self.raw_title),
        }
    }

    /// Title shown to users: canonical title if any, else the raw title.
    pub fn display_title(&self) -> &str {
        self.canonical_title
            .as_ref()
            .and_then(TitleResolution::canonical)
            .unwrap_or(&self.raw_title)
    }
}

/// `max(1, end - start)`.
#[inline]
pub fn years_in_role(start_year: i32, end_year: i32) -> u32 {
    end_year.saturating_sub(start_year).max(1) as u32
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle (haversine) distance in metres.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        self.distance_m(other) / 1000.0
    }
}

/// Workload in percent of full time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Desired workload.
    pub desired: u32,
    /// Minimum acceptable workload.
    pub minimum: u32,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            desired: crate::constants::DEFAULT_PENSUM_DESIRED,
            minimum: crate::constants::DEFAULT_PENSUM_FROM,
        }
    }
}

/// `(industry text, weighted years)` pair produced by experience scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryPart {
    pub industry: String,
    pub weighted_years: f64,
}

/// The four aggregate semantic vectors of a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateVectors {
    pub title: Option<Vec<f32>>,
    pub industry: Option<Vec<f32>>,
    pub skills: Option<Vec<f32>>,
    pub education: Option<Vec<f32>>,
}

/// Descriptive, contact and meta fields. Opaque to scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateDetails {
    pub candidate_name: String,
    pub phone: String,
    pub gender: String,
    pub linkedin_url: String,
    pub website_url: String,
    pub cv_file: String,
    pub short_description: String,
    pub job_expectations: String,
    pub highest_degree: String,
    pub ai_profile_description: String,
    pub ai_experience_description: String,
    pub ai_skills_description: String,
    pub ai_text_skill_result: String,
    pub most_experience_industries: Vec<String>,
    pub address: String,
    pub zip_code: String,
    pub work_radius_text: String,
    pub pensum_duration: String,
    pub on_contract_basis: bool,
    pub voluntary: String,
    pub birth_year: Option<i32>,
    pub retired: bool,
    pub job_categories_primary: Vec<String>,
    pub job_categories_secondary: Vec<String>,
    pub profile_status: String,
    pub registered_at: Option<String>,
    pub expires_at: Option<NaiveDate>,
    pub featured: bool,
    pub post_date: Option<String>,
    pub post_modified: Option<String>,
}

/// A normalized (and, after enrichment, scored and embedded) candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub post_id: u64,
    /// Chronological as supplied; the first entry is the most recent role.
    pub work_experiences: Vec<WorkExperienceEntry>,
    pub languages: Vec<LanguageSkill>,
    /// Absent location makes the candidate ineligible for matching.
    pub location: Option<GeoPoint>,
    pub workload: Workload,
    pub work_radius_km: u32,
    pub available_from: Option<NaiveDate>,
    pub seniority_level: Option<SeniorityTier>,
    pub skills_text: String,
    pub education_text: String,
    pub total_weighted_relevant_years: f64,
    pub industry_parts: Vec<IndustryPart>,
    pub vectors: CandidateVectors,
    pub details: CandidateDetails,
}

impl CandidateProfile {
    /// Highest language level on the `0..=7` scale (0 when none).
    pub fn language_level_max(&self) -> u8 {
        self.languages
            .iter()
            .map(|l| l.level().as_int())
            .max()
            .unwrap_or(0)
    }

    /// Entry with the largest weighted years.
    pub fn most_relevant_entry(&self) -> Option<&WorkExperienceEntry> {
        self.work_experiences.iter().fold(None, |best, entry| match best {
            Some(b) if b.weighted_years() >= entry.weighted_years() => Some(b),
            _ => Some(entry),
        })
    }

    /// Distinct non-empty work-history industries in history order.
    pub fn distinct_industries(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for industry in self
            .work_experiences
            .iter()
            .filter_map(|e| e.industry.as_deref())
            .filter_map(non_empty)
        {
            if !seen.contains(&industry) {
                seen.push(industry);
            }
        }
        seen
    }
}
