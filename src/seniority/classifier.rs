use std::sync::LazyLock;

use moka::sync::Cache;
use regex::Regex;
use tracing::trace;

use super::SeniorityTier;
use crate::profile::WorkExperienceEntry;

/// Default number of memoized title classifications.
pub const DEFAULT_MEMO_CAPACITY: u64 = 512;

/// Bilingual (English/German) keywords per tier.
const KEYWORDS: [(SeniorityTier, &[&str]); 6] = [
    (
        SeniorityTier::Executive,
        &["ceo", "cfo", "cto", "coo", "geschäftsführer", "vorsitzender", "präsident", "president"],
    ),
    (
        SeniorityTier::Director,
        &["director", "vp", "vice president", "bereichsleiter"],
    ),
    (
        SeniorityTier::Manager,
        &["manager", "leiter", "head of", "abteilungsleiter", "teamleiter", "team lead"],
    ),
    (
        SeniorityTier::Senior,
        &["senior", "lead", "expert", "principal", "fachexperte", "erfahren"],
    ),
    (
        SeniorityTier::Mid,
        &["sachbearbeiter", "specialist", "coordinator", "fachmann", "fachfrau", "mitarbeiter"],
    ),
    (
        SeniorityTier::Junior,
        &["junior", "assistant", "trainee", "praktikant", "azubi", "ausbildung"],
    ),
];

/// One whole-word alternation per tier, most senior first.
static TIER_PATTERNS: LazyLock<Vec<(SeniorityTier, Regex)>> = LazyLock::new(|| {
    KEYWORDS
        .iter()
        .map(|(tier, words)| {
            let alternation = words
                .iter()
                .map(|w| regex::escape(w.trim()))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"\b(?:{})\b", alternation);
            let regex = Regex::new(&pattern).expect("escaped keyword alternation is a valid regex");
            (*tier, regex)
        })
        .collect()
});

/// Infers a [`SeniorityTier`] from free-text titles.
///
/// Scans tiers from executive down to junior and returns the first tier with a
/// whole-word keyword hit, so "Junior CFO" is an executive. Titles without a hit
/// are `mid`. Results are memoized per lowercased title in a bounded table owned
/// by the classifier.
pub struct SeniorityClassifier {
    memo: Cache<String, SeniorityTier>,
}

impl std::fmt::Debug for SeniorityClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeniorityClassifier")
            .field("memoized", &self.memo.entry_count())
            .finish()
    }
}

impl Default for SeniorityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SeniorityClassifier {
    /// Creates a classifier with [`DEFAULT_MEMO_CAPACITY`].
    pub fn new() -> Self {
        Self::with_memo_capacity(DEFAULT_MEMO_CAPACITY)
    }

    /// Creates a classifier with a custom memo bound.
    pub fn with_memo_capacity(capacity: u64) -> Self {
        Self {
            memo: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Classifies a single title. Empty titles are `mid`.
    pub fn classify_title(&self, title: &str) -> SeniorityTier {
        let normalized = title.trim().to_lowercase();
        if normalized.is_empty() {
            return SeniorityTier::Mid;
        }

        if let Some(tier) = self.memo.get(&normalized) {
            return tier;
        }

        let tier = TIER_PATTERNS
            .iter()
            .find(|(_, regex)| regex.is_match(&normalized))
            .map(|(tier, _)| *tier)
            .unwrap_or(SeniorityTier::Mid);

        trace!(title = %normalized, %tier, "classified title");
        self.memo.insert(normalized, tier);
        tier
    }

    /// Candidate tier from the first (most recent) work-history entry only.
    pub fn infer_candidate(&self, entries: &[WorkExperienceEntry]) -> SeniorityTier {
        match entries.first() {
            Some(entry) => self.classify_title(&entry.raw_title),
            None => SeniorityTier::Mid,
        }
    }

    /// Job tier: a valid explicit label wins; otherwise the title is classified.
    /// A job with neither is assumed to be `senior`.
    pub fn infer_job(&self, explicit: Option<&str>, title: &str) -> SeniorityTier {
        if let Some(tier) = explicit.and_then(SeniorityTier::parse) {
            return tier;
        }
        if title.trim().is_empty() {
            return SeniorityTier::Senior;
        }
        self.classify_title(title)
    }

    /// Number of memoized titles.
    pub fn memo_len(&self) -> u64 {
        self.memo.run_pending_tasks();
        self.memo.entry_count()
    }
}
