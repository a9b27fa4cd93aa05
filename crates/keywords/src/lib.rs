//! Keyword synthesis: expands a seed list into a candidate keyword universe
//! and attaches simulated planner metrics.

pub mod generator;
pub mod patterns;
pub mod simulate;

pub use generator::{GenerationSummary, KeywordGenerator};
pub use simulate::MetricSimulator;
