//! Simulated search-volume, competition and CPC estimates.
//!
//! Every draw comes from the caller's generator so a fixed seed reproduces
//! the same keyword table.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use sem_core::money::round_to;
use sem_core::types::{Competition, KeywordSource};
use sem_core::{CampaignError, CampaignResult};

const COMPETITION_LEVELS: [Competition; 3] =
    [Competition::Low, Competition::Medium, Competition::High];
const COMPETITION_WEIGHTS: [f64; 3] = [0.3, 0.5, 0.2];

const HIGH_INTENT_TERMS: [&str; 3] = ["buy", "price", "best"];

/// Simulated planner metrics for one keyword.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedMetrics {
    pub volume: u64,
    pub competition: Competition,
    pub cpc_low: f64,
    pub cpc_high: f64,
}

pub struct MetricSimulator {
    brand_name: String,
    min_search_volume: u64,
    competition_dist: WeightedIndex<f64>,
}

impl MetricSimulator {
    pub fn new(brand_name: &str, min_search_volume: u64) -> CampaignResult<Self> {
        let competition_dist = WeightedIndex::new(COMPETITION_WEIGHTS)
            .map_err(|e| CampaignError::Internal(anyhow::anyhow!(e)))?;
        Ok(Self {
            brand_name: brand_name.to_lowercase(),
            min_search_volume,
            competition_dist,
        })
    }

    pub fn simulate<R: Rng>(
        &self,
        keyword: &str,
        source: KeywordSource,
        rng: &mut R,
    ) -> SimulatedMetrics {
        let volume = self.volume(keyword, source, rng);
        let competition = self.competition(keyword, source, rng);
        let (cpc_low, cpc_high) = cpc_range(competition, keyword.split_whitespace().count(), rng);
        SimulatedMetrics {
            volume,
            competition,
            cpc_low,
            cpc_high,
        }
    }

    fn volume<R: Rng>(&self, keyword: &str, source: KeywordSource, rng: &mut R) -> u64 {
        let mut base = rng.gen_range(500u64..5000) as f64;

        base *= match source {
            KeywordSource::SeedDirect => 1.5,
            // Brand searches are typically lower volume.
            KeywordSource::BrandVariant if keyword.contains(&self.brand_name) => 0.3,
            KeywordSource::LocationVariant => 0.8,
            KeywordSource::CommercialVariant if has_high_intent_term(keyword) => 1.2,
            KeywordSource::LongtailVariant => 0.6,
            _ => 1.0,
        };

        let multiplier: f64 = rng.gen_range(0.7..1.3);
        let volume = (base * multiplier) as u64;
        volume.max(self.min_search_volume)
    }

    fn competition<R: Rng>(
        &self,
        keyword: &str,
        source: KeywordSource,
        rng: &mut R,
    ) -> Competition {
        match source {
            KeywordSource::BrandVariant if keyword.contains(&self.brand_name) => Competition::Low,
            KeywordSource::CompetitorVariant => Competition::Medium,
            KeywordSource::CommercialVariant if has_high_intent_term(keyword) => {
                Competition::High
            }
            _ => COMPETITION_LEVELS[self.competition_dist.sample(rng)],
        }
    }
}

fn has_high_intent_term(keyword: &str) -> bool {
    HIGH_INTENT_TERMS.iter().any(|t| keyword.contains(t))
}

/// Base CPC band by competition, discounted for long keywords and jittered.
/// The low bid never exceeds the high bid.
fn cpc_range<R: Rng>(competition: Competition, word_count: usize, rng: &mut R) -> (f64, f64) {
    let (mut low, mut high) = match competition {
        Competition::Low => (0.25, 0.75),
        Competition::Medium => (0.50, 1.25),
        Competition::High => (0.80, 2.00),
        Competition::Unknown => (0.50, 1.00),
    };

    if word_count > 4 {
        low *= 0.8;
        high *= 0.8;
    }

    low *= rng.gen_range(0.8..1.2_f64);
    high *= rng.gen_range(0.9..1.1_f64);

    let high = round_to(high, 2);
    let low = round_to(low, 2).min(high);
    (low, high)
}
