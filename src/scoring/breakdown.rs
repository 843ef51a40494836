use serde::{Deserialize, Serialize};

use super::weights::{Dimension, Weights};

/// Displayed score on a 0..=100 scale.
///
/// Only `total` is measured. Each dimension is `total × weight`, an
/// apportionment of the total by configured weight rather than a
/// decomposition of the raw score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    #[serde(rename = "title_score")]
    pub title: f64,
    #[serde(rename = "industry_score")]
    pub industry: f64,
    #[serde(rename = "experience_score")]
    pub experience: f64,
    #[serde(rename = "skills_score")]
    pub skills: f64,
    #[serde(rename = "seniority_score")]
    pub seniority: f64,
    #[serde(rename = "education_score")]
    pub education: f64,
    #[serde(rename = "language_score")]
    pub language: f64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `clamp(raw / 2 × 100, 0, 100)`, unrounded.
pub fn display_total(raw_score: f64) -> f64 {
    if raw_score.is_nan() {
        return 0.0;
    }
    (raw_score / 2.0 * 100.0).clamp(0.0, 100.0)
}

impl ScoreBreakdown {
    /// All fields rounded to one decimal.
    pub fn from_raw(raw_score: f64, weights: &Weights) -> Self {
        let total = display_total(raw_score);
        let part = |d: Dimension| round1(total * weights.get(d));
        Self {
            total: round1(total),
            title: part(Dimension::Title),
            industry: part(Dimension::Industry),
            experience: part(Dimension::Experience),
            skills: part(Dimension::Skills),
            seniority: part(Dimension::Seniority),
            education: part(Dimension::Education),
            language: part(Dimension::Language),
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Title => self.title,
            Dimension::Industry => self.industry,
            Dimension::Experience => self.experience,
            Dimension::Skills => self.skills,
            Dimension::Seniority => self.seniority,
            Dimension::Education => self.education,
            Dimension::Language => self.language,
        }
    }
}
