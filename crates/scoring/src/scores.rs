//! Per-field sub-scores on a 0–10 scale and the weighted composite.

use sem_core::money::round_to;
use sem_core::types::{Competition, SearchIntent};

/// Weights of the five sub-scores in the composite. They sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub volume: f64,
    pub competition: f64,
    pub cpc_efficiency: f64,
    pub relevance: f64,
    pub intent: f64,
}

pub const COMPOSITE_WEIGHTS: ScoreWeights = ScoreWeights {
    volume: 0.25,
    competition: 0.20,
    cpc_efficiency: 0.20,
    relevance: 0.20,
    intent: 0.15,
};

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.volume + self.competition + self.cpc_efficiency + self.relevance + self.intent
    }
}

/// The five sub-scores of one keyword.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub volume: f64,
    pub competition: f64,
    pub cpc_efficiency: f64,
    pub relevance: f64,
    pub intent: f64,
}

impl SubScores {
    /// Weighted sum rounded to 2 decimals.
    pub fn composite(&self, w: &ScoreWeights) -> f64 {
        round_to(
            self.volume * w.volume
                + self.competition * w.competition
                + self.cpc_efficiency * w.cpc_efficiency
                + self.relevance * w.relevance
                + self.intent * w.intent,
            2,
        )
    }
}

/// Step function over monthly search volume.
pub fn volume_score(volume: u64) -> f64 {
    match volume {
        0..=499 => 1.0,
        500..=999 => 3.0,
        1000..=1999 => 5.0,
        2000..=4999 => 7.0,
        5000..=9999 => 9.0,
        _ => 10.0,
    }
}

/// Less competition scores higher; unknown levels are neutral.
pub fn competition_score(competition: Competition) -> f64 {
    match competition {
        Competition::Low => 9.0,
        Competition::Medium => 6.0,
        Competition::High => 3.0,
        Competition::Unknown => 5.0,
    }
}

/// Cheaper top-of-page bids score higher.
pub fn cpc_efficiency_score(cpc_high: f64) -> f64 {
    if cpc_high <= 0.5 {
        10.0
    } else if cpc_high <= 1.0 {
        8.0
    } else if cpc_high <= 1.5 {
        6.0
    } else if cpc_high <= 2.0 {
        4.0
    } else {
        2.0
    }
}

pub fn intent_score(intent: SearchIntent) -> f64 {
    match intent {
        SearchIntent::Transactional => 10.0,
        SearchIntent::Commercial => 8.0,
        SearchIntent::Navigational => 6.0,
        SearchIntent::Informational => 4.0,
    }
}
