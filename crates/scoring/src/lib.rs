//! Keyword classification and scoring: relevance filters, weighted
//! sub-scores, rule ladders, composite score and dense rank.

pub mod filters;
pub mod processor;
pub mod rules;
pub mod scores;

pub use filters::KeywordFilter;
pub use processor::{KeywordProcessor, ProcessingSummary};
pub use rules::KeywordClassifier;
