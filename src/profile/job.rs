use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::constants::{DEFAULT_PENSUM_DESIRED, DEFAULT_PENSUM_FROM, DEFAULT_RADIUS_KM};
use crate::seniority::SeniorityTier;

/// Zurich city centre, used when a stored job has no coordinates.
pub const DEFAULT_JOB_LOCATION: GeoPoint = GeoPoint {
    lat: 47.37,
    lon: 8.54,
};

fn default_seniority() -> String {
    SeniorityTier::Senior.as_str().to_string()
}

fn default_radius() -> u32 {
    DEFAULT_RADIUS_KM
}

fn default_pensum_min() -> u32 {
    DEFAULT_PENSUM_FROM
}

fn default_pensum_max() -> u32 {
    DEFAULT_PENSUM_DESIRED
}

fn default_min_level() -> String {
    "B2".to_string()
}

/// A language requirement on a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredLanguage {
    pub name: String,
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

impl RequiredLanguage {
    pub fn new(name: impl Into<String>, min_level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: min_level.into(),
        }
    }
}

/// Job match request as accepted by the API and built from stored jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required_skills: Option<String>,
    #[serde(default)]
    pub required_education: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default = "default_seniority")]
    pub expected_seniority_level: String,
    pub location_lat: f64,
    pub location_lon: f64,
    #[serde(default = "default_radius")]
    pub radius_km: u32,
    #[serde(default = "default_pensum_min")]
    pub pensum_min: u32,
    #[serde(default = "default_pensum_max")]
    pub pensum_max: u32,
    #[serde(default)]
    pub required_languages: Vec<RequiredLanguage>,
    #[serde(default)]
    pub required_available_before: Option<NaiveDate>,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

impl JobRequest {
    /// Request with the documented defaults for everything but title and location.
    pub fn new(title: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            post_id: None,
            title: title.into(),
            description: None,
            required_skills: None,
            required_education: None,
            industry: None,
            expected_seniority_level: default_seniority(),
            location_lat: location.lat,
            location_lon: location.lon,
            radius_km: DEFAULT_RADIUS_KM,
            pensum_min: DEFAULT_PENSUM_FROM,
            pensum_max: DEFAULT_PENSUM_DESIRED,
            required_languages: Vec::new(),
            required_available_before: None,
            max_results: None,
            min_score: None,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.location_lat, self.location_lon)
    }

    /// Expected tier; unknown labels fall back to senior.
    pub fn expected_tier(&self) -> SeniorityTier {
        SeniorityTier::parse(&self.expected_seniority_level).unwrap_or(SeniorityTier::Senior)
    }

    pub fn radius_m(&self) -> f64 {
        f64::from(self.radius_km) * 1000.0
    }
}

/// A job posting as stored in the search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDocument {
    pub post_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: String,
    #[serde(default)]
    pub required_education: String,
    #[serde(default)]
    pub industry: String,
    pub expected_seniority_level: SeniorityTier,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    pub radius_km: u32,
    pub pensum_min: u32,
    pub pensum_max: u32,
    #[serde(default)]
    pub required_languages: Vec<RequiredLanguage>,
    #[serde(default)]
    pub post_modified: Option<String>,
}

impl JobDocument {
    /// Converts a stored job into a match request; a missing location falls back
    /// to [`DEFAULT_JOB_LOCATION`].
    pub fn to_request(&self) -> JobRequest {
        let location = self.location.unwrap_or(DEFAULT_JOB_LOCATION);
        JobRequest {
            post_id: Some(self.post_id),
            title: self.title.clone(),
            description: non_empty(&self.description),
            required_skills: non_empty(&self.required_skills),
            required_education: non_empty(&self.required_education),
            industry: non_empty(&self.industry),
            expected_seniority_level: self.expected_seniority_level.as_str().to_string(),
            location_lat: location.lat,
            location_lon: location.lon,
            radius_km: self.radius_km,
            pensum_min: self.pensum_min,
            pensum_max: self.pensum_max,
            required_languages: self.required_languages.clone(),
            required_available_before: None,
            max_results: None,
            min_score: None,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
