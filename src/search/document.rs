use serde::{Deserialize, Serialize};

use crate::constants::MAX_DESCRIPTION_CHARS;
use crate::embedding::vector::ensure_nonzero;
use crate::profile::{CandidateProfile, CandidateVectors, GeoPoint};
use crate::record::truncate_chars;

/// Why a profile was not made searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingLocation,
    MissingTitleVector,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingLocation => f.write_str("missing location"),
            SkipReason::MissingTitleVector => f.write_str("missing title vector"),
        }
    }
}

/// An indexable candidate: located, with all four vectors materialized and
/// non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    profile: CandidateProfile,
}

impl CandidateDocument {
    /// Applies the ingestion exclusions and the storage-boundary vector rules:
    /// absent vectors become zero vectors of `dim`, zero vectors become the
    /// unit vector `[1, 0, …]`.
    pub fn from_profile(mut profile: CandidateProfile, dim: usize) -> Result<Self, SkipReason> {
        if profile.location.is_none() {
            return Err(SkipReason::MissingLocation);
        }
        let vectors = std::mem::take(&mut profile.vectors);
        let title = vectors.title.ok_or(SkipReason::MissingTitleVector)?;

        let materialize = |v: Option<Vec<f32>>| Some(ensure_nonzero(v.unwrap_or_else(|| vec![0.0; dim])));
        profile.vectors = CandidateVectors {
            title: materialize(Some(title)),
            industry: materialize(vectors.industry),
            skills: materialize(vectors.skills),
            education: materialize(vectors.education),
        };
        for entry in &mut profile.work_experiences {
            if entry.description.chars().count() > MAX_DESCRIPTION_CHARS {
                entry.description = truncate_chars(&entry.description, MAX_DESCRIPTION_CHARS);
            }
        }
        Ok(Self { profile })
    }

    pub fn post_id(&self) -> u64 {
        self.profile.post_id
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.profile.location
    }

    pub fn profile(&self) -> &CandidateProfile {
        &self.profile
    }

    pub fn into_profile(self) -> CandidateProfile {
        self.profile
    }

    /// Dimensions of the four stored vectors, in title/industry/skills/education order.
    pub fn vector_dims(&self) -> [usize; 4] {
        let v = &self.profile.vectors;
        [&v.title, &v.industry, &v.skills, &v.education]
            .map(|x| x.as_ref().map_or(0, Vec::len))
    }

    /// Profile with the four vectors stripped.
    pub fn without_vectors(&self) -> CandidateProfile {
        let mut profile = self.profile.clone();
        profile.vectors = CandidateVectors::default();
        profile
    }
}
