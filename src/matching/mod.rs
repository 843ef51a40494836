//! Query-time matching: effective settings, query vectors, search and the
//! ranked response with score breakdowns and explanations.
//!
//! Effective threshold and cap are resolved per call as
//! `overrides → request → stored settings`. Settings are re-read on every
//! call, so a concurrent update is visible to the next request only.

mod response;
mod service;


pub use response::{
    CandidateMatch, MatchOverrides, MatchResponse, NO_MATCHES_MESSAGE, WorkExperienceItem,
};
pub use service::MatchService;
