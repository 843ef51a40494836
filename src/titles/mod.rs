//! Title standardization: raw job titles onto a canonical vocabulary.
//!
//! [`TitleStandardizer`] consults the [`crate::cache::TitleCache`] first and
//! sends only misses to a [`TitleMapper`], in batches of
//! [`crate::constants::TITLE_BATCH_SIZE`]. Every answer, NONE included, is
//! written back, so an unchanged title is never mapped twice.

mod error;
mod mapper;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod openai;
mod standardizer;
mod vocabulary;


pub use error::TitleMappingError;
pub use mapper::{TitleMapper, VocabularyMatcher};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTitleMapper;
pub use openai::{OpenAiTitleMapper, strip_code_fence};
pub use standardizer::TitleStandardizer;
pub use vocabulary::TitleVocabulary;
