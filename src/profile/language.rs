//! Language proficiency labels, their integer scale and hard-filter buckets.

use serde::{Deserialize, Serialize};

/// Proficiency on a `0..=7` integer scale (CEFR A1..C2 = 1..6, native = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LanguageLevel(u8);

impl LanguageLevel {
    pub const UNKNOWN: LanguageLevel = LanguageLevel(0);

    /// Maps a CEFR code or free-text degree label (English or German) to the scale.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        let level = match normalized.as_str() {
            "a1" => 1,
            "a2" | "basic" | "grundkenntnisse" => 2,
            "b1" | "intermediate" | "gut" => 3,
            "b2" => 4,
            "c1" => 5,
            "c2" | "fluent" | "fliessend" | "fließend" => 6,
            "native" | "mother tongue" | "muttersprache" => 7,
            _ => 0,
        };
        LanguageLevel(level)
    }

    #[inline]
    pub fn as_int(self) -> u8 {
        self.0
    }
}

/// Hard-filter grouping of candidate degree labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProficiencyBucket {
    /// Mother tongue, fluent, C2, native.
    Advanced,
    /// Intermediate, B1, B2, C1.
    Intermediate,
    /// Everything else, including unknown labels.
    Basic,
}

impl ProficiencyBucket {
    pub fn of_degree(degree: &str) -> Self {
        match degree.trim().to_lowercase().as_str() {
            "mother tongue" | "muttersprache" | "native" | "fluent" | "fliessend" | "fließend"
            | "c2" => ProficiencyBucket::Advanced,
            "intermediate" | "gut" | "b1" | "b2" | "c1" => ProficiencyBucket::Intermediate,
            _ => ProficiencyBucket::Basic,
        }
    }

    /// Whether a candidate in this bucket satisfies `min_level`.
    ///
    /// Only the CEFR codes C1 and C2 and `native` restrict a minimum to the
    /// advanced bucket. Every other minimum, degree labels such as "Fluent"
    /// included, also accepts intermediate.
    pub fn satisfies(self, min_level: &str) -> bool {
        match self {
            ProficiencyBucket::Advanced => true,
            ProficiencyBucket::Intermediate => !requires_advanced(min_level),
            ProficiencyBucket::Basic => false,
        }
    }
}

fn requires_advanced(min_level: &str) -> bool {
    matches!(min_level.trim().to_lowercase().as_str(), "c1" | "c2" | "native")
}

/// A language a candidate speaks, with the degree label as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub lang: String,
    #[serde(default)]
    pub degree: String,
}

impl LanguageSkill {
    pub fn new(lang: impl Into<String>, degree: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            degree: degree.into(),
        }
    }

    pub fn level(&self) -> LanguageLevel {
        LanguageLevel::from_label(&self.degree)
    }

    pub fn bucket(&self) -> ProficiencyBucket {
        ProficiencyBucket::of_degree(&self.degree)
    }

    /// Case-insensitive language name comparison.
    pub fn is_language(&self, name: &str) -> bool {
        self.lang.trim().eq_ignore_ascii_case(name.trim())
    }
}
