use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sem_core::types::{normalize_keyword, KeywordRecord, KeywordSource};
use sem_core::{CampaignConfig, CampaignResult};

use crate::patterns::{
    render, Slots, BRAND_PATTERNS, COMMERCIAL_PATTERNS, COMPETITOR_PATTERNS, LOCATION_PATTERNS,
    LONGTAIL_PATTERNS,
};
use crate::simulate::MetricSimulator;

/// Letters, digits, whitespace and hyphens only.
const KEYWORD_CHARSET: &str = r"^[a-zA-Z0-9\s\-]+$";

/// Expands seed keywords into location, commercial, brand, competitor and
/// long-tail variants.
pub struct KeywordGenerator {
    brand_name: String,
    competitor_name: String,
    locations: Vec<String>,
    seed_keywords: Vec<String>,
    min_length: usize,
    max_length: usize,
    charset: Regex,
    simulator: MetricSimulator,
}

impl KeywordGenerator {
    pub fn new(config: &CampaignConfig) -> CampaignResult<Self> {
        let constraints = &config.campaign_constraints;
        let brand_name = normalize_keyword(&config.brand.name);
        Ok(Self {
            simulator: MetricSimulator::new(&brand_name, constraints.min_search_volume)?,
            brand_name,
            competitor_name: normalize_keyword(&config.competitor.name),
            locations: config
                .service_locations
                .iter()
                .map(|l| normalize_keyword(l))
                .collect(),
            seed_keywords: config
                .seed_keywords
                .iter()
                .map(|k| normalize_keyword(k))
                .collect(),
            min_length: constraints.min_keyword_length,
            max_length: constraints.max_keyword_length,
            charset: Regex::new(KEYWORD_CHARSET)?,
        })
    }

    /// Build the deduplicated raw keyword table. Output depends only on the
    /// configuration and the state of `rng`.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<KeywordRecord> {
        let candidates = self.expand();
        debug!(candidates = candidates.len(), "Expanded seed keywords");

        let records = candidates
            .into_iter()
            .map(|(keyword, source)| {
                let m = self.simulator.simulate(&keyword, source, rng);
                KeywordRecord {
                    keyword,
                    source,
                    estimated_volume: m.volume,
                    estimated_competition: m.competition,
                    estimated_cpc_low: m.cpc_low,
                    estimated_cpc_high: m.cpc_high,
                }
            })
            .collect();

        let cleaned = self.clean_and_deduplicate(records);
        info!(total = cleaned.len(), "Generated raw keywords");
        cleaned
    }

    /// All candidate strings, in source order.
    pub fn expand(&self) -> Vec<(String, KeywordSource)> {
        let mut out = Vec::new();
        let base = Slots {
            brand: &self.brand_name,
            competitor: &self.competitor_name,
            ..Slots::default()
        };

        for seed in &self.seed_keywords {
            out.push((seed.clone(), KeywordSource::SeedDirect));
        }

        for seed in &self.seed_keywords {
            for location in &self.locations {
                let slots = Slots {
                    keyword: seed,
                    location,
                    ..base
                };
                for pattern in LOCATION_PATTERNS {
                    out.push((render(pattern, &slots), KeywordSource::LocationVariant));
                }
            }
        }

        for seed in &self.seed_keywords {
            let slots = Slots { keyword: seed, ..base };
            for pattern in COMMERCIAL_PATTERNS {
                out.push((render(pattern, &slots), KeywordSource::CommercialVariant));
            }
        }

        for pattern in BRAND_PATTERNS {
            if pattern.contains("{keyword}") {
                for seed in &self.seed_keywords {
                    let slots = Slots { keyword: seed, ..base };
                    out.push((render(pattern, &slots), KeywordSource::BrandVariant));
                }
            } else {
                out.push((render(pattern, &base), KeywordSource::BrandVariant));
            }
        }

        for pattern in COMPETITOR_PATTERNS {
            out.push((render(pattern, &base), KeywordSource::CompetitorVariant));
        }

        for seed in &self.seed_keywords {
            let slots = Slots { keyword: seed, ..base };
            for pattern in LONGTAIL_PATTERNS {
                out.push((render(pattern, &slots), KeywordSource::LongtailVariant));
            }
        }

        out
    }

    /// Normalize, keep the first occurrence of each keyword, then apply the
    /// length and character-set constraints.
    fn clean_and_deduplicate(&self, records: Vec<KeywordRecord>) -> Vec<KeywordRecord> {
        let mut seen = HashSet::new();
        records
            .into_iter()
            .map(|mut r| {
                r.keyword = normalize_keyword(&r.keyword);
                r
            })
            .filter(|r| seen.insert(r.keyword.clone()))
            .filter(|r| {
                let len = r.keyword.chars().count();
                len >= self.min_length && len <= self.max_length
            })
            .filter(|r| self.charset.is_match(&r.keyword))
            .collect()
    }
}

/// Descriptive statistics over a raw keyword table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub total_keywords: usize,
    pub keywords_by_source: BTreeMap<String, usize>,
    pub avg_volume: f64,
    pub competition_distribution: BTreeMap<String, usize>,
    pub avg_cpc_low: f64,
    pub avg_cpc_high: f64,
}

impl GenerationSummary {
    pub fn from_records(records: &[KeywordRecord]) -> Self {
        let n = records.len();
        let mean = |f: &dyn Fn(&KeywordRecord) -> f64| {
            if n == 0 {
                0.0
            } else {
                records.iter().map(f).sum::<f64>() / n as f64
            }
        };

        let mut keywords_by_source: BTreeMap<String, usize> = KeywordSource::ALL
            .iter()
            .map(|s| (s.to_string(), 0))
            .collect();
        let mut competition_distribution = BTreeMap::new();
        for r in records {
            *keywords_by_source.entry(r.source.to_string()).or_insert(0) += 1;
            *competition_distribution
                .entry(r.estimated_competition.to_string())
                .or_insert(0) += 1;
        }

        Self {
            total_keywords: n,
            keywords_by_source,
            avg_volume: mean(&|r| r.estimated_volume as f64),
            competition_distribution,
            avg_cpc_low: mean(&|r| r.estimated_cpc_low),
            avg_cpc_high: mean(&|r| r.estimated_cpc_high),
        }
    }
}
