//! Scoring model: hard filters, the raw score function and its display form.
//!
//! Every similarity term is cosine similarity shifted into `[0, 2]`, so a
//! missing candidate vector scores a neutral 1.0. The raw score is the
//! weighted sum
//!
//! ```text
//! wT·title + wI·industry + wE·exp + wS·skills + wSen·seniorityFit·2 + wEdu·edu + wLang·lang
//! ```
//!
//! with no normalization of the weights.

mod breakdown;
mod error;
mod filters;
mod model;
mod weights;


pub use breakdown::{ScoreBreakdown, display_total};
pub use error::ScoringError;
pub use filters::{FilterRejection, HardFilters};
pub use model::{
    ScoreComponents, ScoringModel, experience_score, language_score, seniority_fit,
    shifted_similarity,
};
pub use weights::{Dimension, Weights};
