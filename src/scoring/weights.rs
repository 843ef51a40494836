use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ScoringError;

/// The seven scored dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Title,
    Industry,
    Experience,
    Skills,
    Seniority,
    Education,
    Language,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Title,
        Dimension::Industry,
        Dimension::Experience,
        Dimension::Skills,
        Dimension::Seniority,
        Dimension::Education,
        Dimension::Language,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Title => "title",
            Dimension::Industry => "industry",
            Dimension::Experience => "experience",
            Dimension::Skills => "skills",
            Dimension::Seniority => "seniority",
            Dimension::Education => "education",
            Dimension::Language => "language",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Weight used when a stored weight map lacks this dimension.
    pub fn fallback_weight(self) -> f64 {
        match self {
            Dimension::Title => 0.38,
            Dimension::Industry => 0.19,
            Dimension::Experience => 0.14,
            Dimension::Skills => 0.10,
            Dimension::Seniority => 0.07,
            Dimension::Education => 0.07,
            Dimension::Language => 0.05,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod fallback {
    use super::Dimension;

    pub fn title() -> f64 {
        Dimension::Title.fallback_weight()
    }
    pub fn industry() -> f64 {
        Dimension::Industry.fallback_weight()
    }
    pub fn experience() -> f64 {
        Dimension::Experience.fallback_weight()
    }
    pub fn skills() -> f64 {
        Dimension::Skills.fallback_weight()
    }
    pub fn seniority() -> f64 {
        Dimension::Seniority.fallback_weight()
    }
    pub fn education() -> f64 {
        Dimension::Education.fallback_weight()
    }
    pub fn language() -> f64 {
        Dimension::Language.fallback_weight()
    }
}

/// Per-dimension weights. They need not sum to 1.
///
/// Deserializing a map that lacks some dimensions fills them with
/// [`Dimension::fallback_weight`]; unknown keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default = "fallback::title")]
    pub title: f64,
    #[serde(default = "fallback::industry")]
    pub industry: f64,
    #[serde(default = "fallback::experience")]
    pub experience: f64,
    #[serde(default = "fallback::skills")]
    pub skills: f64,
    #[serde(default = "fallback::seniority")]
    pub seniority: f64,
    #[serde(default = "fallback::education")]
    pub education: f64,
    #[serde(default = "fallback::language")]
    pub language: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            title: 0.40,
            industry: 0.20,
            experience: 0.15,
            skills: 0.10,
            seniority: 0.08,
            education: 0.07,
            language: 0.05,
        }
    }
}

impl Weights {
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

    pub fn set(&mut self, dimension: Dimension, weight: f64) {
        let slot = match dimension {
            Dimension::Title => &mut self.title,
            Dimension::Industry => &mut self.industry,
            Dimension::Experience => &mut self.experience,
            Dimension::Skills => &mut self.skills,
            Dimension::Seniority => &mut self.seniority,
            Dimension::Education => &mut self.education,
            Dimension::Language => &mut self.language,
        };
        *slot = weight;
    }

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum()
    }

    /// Rejects negative or non-finite weights.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for dimension in Dimension::ALL {
            let w = self.get(dimension);
            if !w.is_finite() || w < 0.0 {
                return Err(ScoringError::InvalidParameters {
                    reason: format!("weight for {dimension} must be a non-negative number, got {w}"),
                });
            }
        }
        Ok(())
    }

    /// Replaces only the supplied dimensions; unknown names are ignored.
    /// Returns the dimensions that changed.
    pub fn merge(&mut self, updates: &HashMap<String, f64>) -> Vec<Dimension> {
        let mut changed = Vec::new();
        for (name, weight) in updates {
            if let Some(dimension) = Dimension::parse(name) {
                self.set(dimension, *weight);
                changed.push(dimension);
            }
        }
        changed
    }
}
