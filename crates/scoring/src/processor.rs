//! Filter → score → classify → rank pipeline over a raw keyword table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use sem_core::types::{KeywordRecord, KeywordTheme, Priority, ScoredKeyword, SearchIntent};
use sem_core::{CampaignConfig, CampaignResult};

use crate::filters::KeywordFilter;
use crate::rules::KeywordClassifier;
use crate::scores::{
    competition_score, cpc_efficiency_score, intent_score, volume_score, ScoreWeights, SubScores,
    COMPOSITE_WEIGHTS,
};

pub struct KeywordProcessor {
    filter: KeywordFilter,
    classifier: KeywordClassifier,
    weights: ScoreWeights,
}

impl KeywordProcessor {
    pub fn new(config: &CampaignConfig) -> CampaignResult<Self> {
        Ok(Self {
            filter: KeywordFilter::from_constraints(&config.campaign_constraints),
            classifier: KeywordClassifier::from_config(config)?,
            weights: COMPOSITE_WEIGHTS,
        })
    }

    /// Score and classify every keyword that passes the filters. Rows keep
    /// their input order. Fails without partial output if any row is
    /// structurally invalid.
    pub fn process(&self, records: &[KeywordRecord]) -> CampaignResult<Vec<ScoredKeyword>> {
        for record in records {
            record.validate()?;
        }

        let filtered = self.filter.apply(records, &self.classifier);
        let mut scored: Vec<ScoredKeyword> =
            filtered.into_iter().map(|r| self.score(r)).collect();

        assign_dense_ranks(&mut scored);

        info!(
            input = records.len(),
            scored = scored.len(),
            "Processed keywords"
        );
        Ok(scored)
    }

    fn score(&self, record: KeywordRecord) -> ScoredKeyword {
        let search_intent = self.classifier.classify_intent(&record.keyword);
        let theme = self.classifier.classify_theme(&record.keyword);

        let sub = SubScores {
            volume: volume_score(record.estimated_volume),
            competition: competition_score(record.estimated_competition),
            cpc_efficiency: cpc_efficiency_score(record.estimated_cpc_high),
            relevance: self.classifier.relevance_score(&record.keyword),
            intent: intent_score(search_intent),
        };
        let composite_score = sub.composite(&self.weights);

        ScoredKeyword {
            record,
            volume_score: sub.volume,
            competition_score: sub.competition,
            cpc_efficiency_score: sub.cpc_efficiency,
            relevance_score: sub.relevance,
            intent_score: sub.intent,
            search_intent,
            theme,
            composite_score,
            performance_rank: 0,
            priority: Priority::from_composite(composite_score),
        }
    }
}

/// Composite scores are 2-decimal values; compare them as integer cents.
fn score_key(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

/// Highest score gets rank 1; equal scores share a rank and the next
/// distinct score takes the following integer.
pub fn assign_dense_ranks(scored: &mut [ScoredKeyword]) {
    let distinct: BTreeSet<i64> = scored.iter().map(|k| score_key(k.composite_score)).collect();
    let ranks: BTreeMap<i64, u32> = distinct
        .into_iter()
        .rev()
        .enumerate()
        .map(|(i, key)| (key, i as u32 + 1))
        .collect();

    for k in scored.iter_mut() {
        k.performance_rank = ranks[&score_key(k.composite_score)];
    }
}

/// Distribution and average statistics over a scored table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub total_processed_keywords: usize,
    pub intent_distribution: BTreeMap<String, usize>,
    pub theme_distribution: BTreeMap<String, usize>,
    pub priority_distribution: BTreeMap<String, usize>,
    pub average_scores: BTreeMap<String, f64>,
    pub top_performing_keywords: Vec<String>,
}

impl ProcessingSummary {
    pub fn from_scored(scored: &[ScoredKeyword]) -> Self {
        let mut intent_distribution: BTreeMap<String, usize> =
            SearchIntent::ALL.iter().map(|i| (i.to_string(), 0)).collect();
        let mut theme_distribution: BTreeMap<String, usize> =
            KeywordTheme::ALL.iter().map(|t| (t.to_string(), 0)).collect();
        let mut priority_distribution = BTreeMap::new();
        for k in scored {
            *intent_distribution.entry(k.search_intent.to_string()).or_insert(0) += 1;
            *theme_distribution.entry(k.theme.to_string()).or_insert(0) += 1;
            *priority_distribution.entry(k.priority.to_string()).or_insert(0) += 1;
        }

        let n = scored.len();
        let mean = |f: fn(&ScoredKeyword) -> f64| {
            if n == 0 {
                0.0
            } else {
                scored.iter().map(f).sum::<f64>() / n as f64
            }
        };
        let average_scores = BTreeMap::from([
            ("volume".to_string(), mean(|k| k.volume_score)),
            ("competition".to_string(), mean(|k| k.competition_score)),
            ("cpc_efficiency".to_string(), mean(|k| k.cpc_efficiency_score)),
            ("relevance".to_string(), mean(|k| k.relevance_score)),
            ("intent".to_string(), mean(|k| k.intent_score)),
            ("composite".to_string(), mean(|k| k.composite_score)),
        ]);

        let mut by_score: Vec<&ScoredKeyword> = scored.iter().collect();
        by_score.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
        let top_performing_keywords = by_score
            .into_iter()
            .take(10)
            .map(|k| k.keyword().to_string())
            .collect();

        Self {
            total_processed_keywords: n,
            intent_distribution,
            theme_distribution,
            priority_distribution,
            average_scores,
            top_performing_keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sem_core::types::{Competition, KeywordSource, KeywordTheme, SearchIntent};
    use sem_core::CampaignError;
    use sem_keywords::KeywordGenerator;

    fn record(keyword: &str, volume: u64, competition: Competition, cpc_high: f64) -> KeywordRecord {
        KeywordRecord {
            keyword: keyword.to_string(),
            source: KeywordSource::CommercialVariant,
            estimated_volume: volume,
            estimated_competition: competition,
            estimated_cpc_low: (cpc_high * 0.5 * 100.0).round() / 100.0,
            estimated_cpc_high: cpc_high,
        }
    }

    fn processor() -> KeywordProcessor {
        KeywordProcessor::new(&CampaignConfig::default()).unwrap()
    }

    #[test]
    fn test_scores_single_keyword() {
        let scored = processor()
            .process(&[record("buy whey protein mumbai", 3000, Competition::High, 1.4)])
            .unwrap();
        let k = &scored[0];

        assert_eq!(k.search_intent, SearchIntent::Transactional);
        assert_eq!(k.theme, KeywordTheme::LocationQueries);
        assert_eq!(k.volume_score, 7.0);
        assert_eq!(k.competition_score, 3.0);
        assert_eq!(k.cpc_efficiency_score, 6.0);
        assert_eq!(k.relevance_score, 9.0);
        assert_eq!(k.intent_score, 10.0);
        // 1.75 + 0.6 + 1.2 + 1.8 + 1.5
        assert!((k.composite_score - 6.85).abs() < 1e-9);
        assert_eq!(k.priority, Priority::Medium);
        assert_eq!(k.performance_rank, 1);
    }

    #[test]
    fn test_dense_rank_shares_ties() {
        let records = vec![
            record("whey protein price", 3000, Competition::High, 1.4),
            record("protein powder price", 3000, Competition::High, 1.4),
            record("nutrimax official", 600, Competition::Low, 0.4),
            record("mass gainer", 600, Competition::Medium, 1.9),
        ];
        let scored = processor().process(&records).unwrap();

        assert_eq!(scored[0].composite_score, scored[1].composite_score);
        assert_eq!(scored[0].performance_rank, scored[1].performance_rank);

        let distinct: BTreeSet<i64> = scored.iter().map(|k| score_key(k.composite_score)).collect();
        let ranks: BTreeSet<u32> = scored.iter().map(|k| k.performance_rank).collect();
        assert_eq!(ranks, (1..=distinct.len() as u32).collect::<BTreeSet<u32>>());

        let best = scored.iter().max_by(|a, b| a.composite_score.total_cmp(&b.composite_score)).unwrap();
        assert_eq!(best.performance_rank, 1);
    }

    #[test]
    fn test_composite_matches_subscores() {
        let config = CampaignConfig::default();
        let raw = KeywordGenerator::new(&config)
            .unwrap()
            .generate(&mut StdRng::seed_from_u64(42));
        let scored = processor().process(&raw).unwrap();
        assert!(!scored.is_empty());

        for k in &scored {
            let expected = 0.25 * k.volume_score
                + 0.20 * k.competition_score
                + 0.20 * k.cpc_efficiency_score
                + 0.20 * k.relevance_score
                + 0.15 * k.intent_score;
            assert!((k.composite_score - expected).abs() <= 0.005 + 1e-9);
            assert!((0.0..=10.0).contains(&k.composite_score));
            assert_eq!(k.priority, Priority::from_composite(k.composite_score));
        }
    }

    #[test]
    fn test_empty_after_filtering_is_not_an_error() {
        let records = vec![record("free whey download", 3000, Competition::Low, 0.4)];
        let scored = processor().process(&records).unwrap();
        assert!(scored.is_empty());

        let summary = ProcessingSummary::from_scored(&scored);
        assert_eq!(summary.total_processed_keywords, 0);
        assert_eq!(summary.average_scores["composite"], 0.0);
    }

    #[test]
    fn test_invalid_record_aborts() {
        let mut bad = record("whey protein", 3000, Competition::Low, 0.4);
        bad.estimated_cpc_low = 0.9;
        let err = processor()
            .process(&[record("buy whey", 3000, Competition::Low, 0.4), bad])
            .unwrap_err();
        assert!(matches!(err, CampaignError::InvalidRecord(_)));
    }

    #[test]
    fn test_unknown_competition_scores_neutral() {
        let scored = processor()
            .process(&[record("whey protein", 3000, Competition::Unknown, 0.4)])
            .unwrap();
        assert_eq!(scored[0].competition_score, 5.0);
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            record("buy whey protein", 3000, Competition::High, 1.4),
            record("whey protein benefits", 3000, Competition::Low, 0.4),
            record("nutrimax official", 600, Competition::Low, 0.4),
        ];
        let scored = processor().process(&records).unwrap();
        let summary = ProcessingSummary::from_scored(&scored);

        assert_eq!(summary.total_processed_keywords, 3);
        assert_eq!(summary.intent_distribution["transactional"], 1);
        assert_eq!(summary.intent_distribution["informational"], 1);
        assert_eq!(summary.intent_distribution["navigational"], 1);
        assert_eq!(summary.intent_distribution["commercial"], 0);
        assert_eq!(summary.theme_distribution["Brand Terms"], 1);
        assert_eq!(summary.theme_distribution["Competitor Terms"], 0);
        assert_eq!(summary.theme_distribution.len(), KeywordTheme::ALL.len());
        assert_eq!(summary.top_performing_keywords.len(), 3);
    }
}
