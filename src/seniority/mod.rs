//! Seniority tiers and the keyword-based classifier.
//!
//! Tiers are totally ordered `junior < mid < senior < manager < director < executive`
//! and map to the integers `0..=5` used by the scoring function.

mod classifier;


pub use classifier::{DEFAULT_MEMO_CAPACITY, SeniorityClassifier};

use serde::{Deserialize, Serialize};

/// One of six ordered seniority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeniorityTier {
    Junior,
    Mid,
    Senior,
    Manager,
    Director,
    Executive,
}

impl SeniorityTier {
    /// All tiers, least senior first.
    pub const ALL: [SeniorityTier; 6] = [
        SeniorityTier::Junior,
        SeniorityTier::Mid,
        SeniorityTier::Senior,
        SeniorityTier::Manager,
        SeniorityTier::Director,
        SeniorityTier::Executive,
    ];

    /// Integer rank in `0..=5`.
    #[inline]
    pub fn as_int(self) -> u8 {
        self as u8
    }

    /// Inverse of [`as_int`](Self::as_int).
    pub fn from_int(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Lowercase label (`"junior"` … `"executive"`).
    pub fn as_str(self) -> &'static str {
        match self {
            SeniorityTier::Junior => "junior",
            SeniorityTier::Mid => "mid",
            SeniorityTier::Senior => "senior",
            SeniorityTier::Manager => "manager",
            SeniorityTier::Director => "director",
            SeniorityTier::Executive => "executive",
        }
    }

    /// Parses a label, ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|tier| tier.as_str() == label)
    }

    /// Absolute tier distance.
    #[inline]
    pub fn distance(self, other: SeniorityTier) -> u8 {
        self.as_int().abs_diff(other.as_int())
    }
}

impl std::fmt::Display for SeniorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
