//! Search campaign: one ad group per keyword theme.

use std::collections::BTreeMap;

use sem_core::config::{BudgetConfig, CampaignConfig, CampaignConstraints};
use sem_core::money::round_to;
use sem_core::types::{Competition, KeywordTheme, ScoredKeyword, SearchAdGroupEntry, SearchIntent};
use tracing::{debug, info};

use crate::strategy::{format_match_types, match_types, theme_strategy};

pub const MAX_KEYWORDS_PER_AD_GROUP: usize = 25;
const MIN_SUGGESTED_CPC: f64 = 0.25;
const CPC_SPREAD: f64 = 0.1;

fn impression_share(competition: Competition) -> f64 {
    match competition {
        Competition::Low => 0.8,
        Competition::High => 0.4,
        Competition::Medium | Competition::Unknown => 0.6,
    }
}

fn click_through_rate(intent: SearchIntent) -> f64 {
    match intent {
        SearchIntent::Transactional => 0.05,
        SearchIntent::Commercial => 0.03,
        SearchIntent::Navigational => 0.08,
        SearchIntent::Informational => 0.02,
    }
}

pub struct SearchCampaignBuilder {
    budgets: BudgetConfig,
    constraints: CampaignConstraints,
}

impl SearchCampaignBuilder {
    pub fn new(config: &CampaignConfig) -> Self {
        Self {
            budgets: config.budgets.clone(),
            constraints: config.campaign_constraints.clone(),
        }
    }

    /// Group scored keywords by theme and emit one row per kept keyword.
    pub fn build(&self, scored: &[ScoredKeyword]) -> Vec<SearchAdGroupEntry> {
        let mut groups: BTreeMap<KeywordTheme, Vec<&ScoredKeyword>> = BTreeMap::new();
        for kw in scored {
            groups.entry(kw.theme).or_default().push(kw);
        }

        let budgets = self.theme_budgets(groups.keys().copied());
        let mut entries = Vec::new();

        for (theme, mut keywords) in groups {
            keywords.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
            keywords.truncate(MAX_KEYWORDS_PER_AD_GROUP);
            let budget = budgets.get(&theme).copied().unwrap_or(0.0);
            debug!(ad_group = %theme, keywords = keywords.len(), budget, "Built search ad group");

            entries.extend(keywords.into_iter().map(|kw| self.entry(theme, kw, budget)));
        }

        info!(
            ad_groups = budgets.len(),
            keywords = entries.len(),
            "Search campaign structure ready"
        );
        entries
    }

    fn entry(&self, theme: KeywordTheme, kw: &ScoredKeyword, budget: f64) -> SearchAdGroupEntry {
        let (cpc_low, cpc_high) = self.suggested_cpc(theme, kw);
        let (clicks, conversions) = self.expected_performance(kw);

        SearchAdGroupEntry {
            campaign_type: "Search".to_string(),
            ad_group: theme,
            keyword: kw.record.keyword.clone(),
            match_types: format_match_types(&match_types(theme, kw.search_intent)),
            suggested_cpc_low: cpc_low,
            suggested_cpc_high: cpc_high,
            estimated_volume: kw.record.estimated_volume,
            competition: kw.record.estimated_competition,
            search_intent: kw.search_intent,
            composite_score: kw.composite_score,
            priority: theme_strategy(theme).priority,
            expected_monthly_clicks: clicks,
            expected_monthly_conversions: conversions,
            theme_monthly_budget: budget,
            source: kw.record.source,
        }
    }

    /// Theme-adjusted CPC range clamped to `[0.25, max_cpc]`, with high at
    /// least 0.10 above low.
    pub fn suggested_cpc(&self, theme: KeywordTheme, kw: &ScoredKeyword) -> (f64, f64) {
        let multiplier = theme_strategy(theme).bid_multiplier;
        let max_cpc = self.constraints.max_cpc;

        let low = round_to(kw.record.estimated_cpc_low * multiplier, 2)
            .min(max_cpc)
            .max(MIN_SUGGESTED_CPC);
        let high = round_to(kw.record.estimated_cpc_high * multiplier, 2)
            .min(max_cpc)
            .max(round_to(low + CPC_SPREAD, 2));
        (low, high)
    }

    pub fn expected_performance(&self, kw: &ScoredKeyword) -> (u64, f64) {
        let impressions =
            kw.record.estimated_volume as f64 * impression_share(kw.record.estimated_competition);
        let clicks = (impressions * click_through_rate(kw.search_intent)).round();
        let conversions = round_to(clicks * self.constraints.target_conversion_rate, 1);
        (clicks as u64, conversions)
    }

    /// Split the search budget across the themes present by theme priority.
    pub fn theme_budgets(
        &self,
        themes: impl IntoIterator<Item = KeywordTheme>,
    ) -> BTreeMap<KeywordTheme, f64> {
        let weights: BTreeMap<KeywordTheme, f64> = themes
            .into_iter()
            .map(|t| (t, theme_strategy(t).priority.budget_weight()))
            .collect();
        let total: f64 = weights.values().sum();
        if total <= 0.0 {
            return BTreeMap::new();
        }
        weights
            .into_iter()
            .map(|(t, w)| (t, round_to(w / total * self.budgets.search_ads, 0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sem_core::types::{KeywordRecord, KeywordSource, Priority};

    fn scored(
        keyword: &str,
        theme: KeywordTheme,
        intent: SearchIntent,
        composite: f64,
        cpc: (f64, f64),
    ) -> ScoredKeyword {
        ScoredKeyword {
            record: KeywordRecord {
                keyword: keyword.to_string(),
                source: KeywordSource::SeedDirect,
                estimated_volume: 1000,
                estimated_competition: Competition::Medium,
                estimated_cpc_low: cpc.0,
                estimated_cpc_high: cpc.1,
            },
            volume_score: 4.0,
            competition_score: 6.0,
            cpc_efficiency_score: 8.0,
            relevance_score: 7.0,
            intent_score: 8.0,
            search_intent: intent,
            theme,
            composite_score: composite,
            performance_rank: 1,
            priority: Priority::from_composite(composite),
        }
    }

    fn builder() -> SearchCampaignBuilder {
        SearchCampaignBuilder::new(&CampaignConfig::default())
    }

    #[test]
    fn test_theme_budgets_sum_to_search_budget() {
        let b = builder();
        let budgets = b.theme_budgets(KeywordTheme::ALL);
        let total: f64 = budgets.values().sum();
        assert!((total - 5000.0).abs() <= 2.0);
        // Brand and Location are High priority
        assert!(
            (budgets[&KeywordTheme::BrandTerms] - budgets[&KeywordTheme::LocationQueries]).abs()
                < f64::EPSILON
        );
        assert!(budgets[&KeywordTheme::BrandTerms] > budgets[&KeywordTheme::LongTailInformational]);
    }

    #[test]
    fn test_single_theme_gets_whole_budget() {
        let budgets = builder().theme_budgets([KeywordTheme::CompetitorTerms]);
        assert!((budgets[&KeywordTheme::CompetitorTerms] - 5000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_suggested_cpc_bounds() {
        let b = builder();
        // Brand multiplier 1.2: 1.0 -> 1.2, 2.0 -> 2.4
        let kw = scored("nutrimax whey", KeywordTheme::BrandTerms, SearchIntent::Navigational, 7.0, (1.0, 2.0));
        let (low, high) = b.suggested_cpc(KeywordTheme::BrandTerms, &kw);
        assert!((low - 1.2).abs() < f64::EPSILON);
        assert!((high - 2.4).abs() < f64::EPSILON);

        // floor at 0.25, high at least low + 0.1
        let cheap = scored("whey", KeywordTheme::LongTailInformational, SearchIntent::Informational, 5.0, (0.1, 0.2));
        let (low, high) = b.suggested_cpc(KeywordTheme::LongTailInformational, &cheap);
        assert!((low - 0.25).abs() < f64::EPSILON);
        assert!((high - 0.35).abs() < f64::EPSILON);

        // capped at max_cpc 2.5
        let pricey = scored("whey", KeywordTheme::BrandTerms, SearchIntent::Navigational, 5.0, (3.0, 4.0));
        let (low, high) = b.suggested_cpc(KeywordTheme::BrandTerms, &pricey);
        assert!((low - 2.5).abs() < f64::EPSILON);
        assert!((high - 2.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expected_performance() {
        let b = builder();
        // 1000 * 0.6 * 0.05 = 30 clicks, 30 * 0.02 = 0.6 conversions
        let kw = scored("buy whey", KeywordTheme::CategoryTerms, SearchIntent::Transactional, 7.0, (1.0, 2.0));
        let (clicks, conv) = b.expected_performance(&kw);
        assert_eq!(clicks, 30);
        assert!((conv - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_groups_sorts_and_caps() {
        let mut input = Vec::new();
        for i in 0..30 {
            input.push(scored(
                &format!("whey protein {i}"),
                KeywordTheme::CategoryTerms,
                SearchIntent::Commercial,
                f64::from(i) / 10.0,
                (1.0, 2.0),
            ));
        }
        input.push(scored("nutrimax", KeywordTheme::BrandTerms, SearchIntent::Navigational, 7.5, (1.0, 2.0)));

        let entries = builder().build(&input);
        assert_eq!(entries.len(), 26);
        assert_eq!(entries[0].ad_group, KeywordTheme::BrandTerms);
        assert_eq!(entries[0].priority, Priority::High);
        assert_eq!(entries[0].campaign_type, "Search");

        let category: Vec<_> = entries
            .iter()
            .filter(|e| e.ad_group == KeywordTheme::CategoryTerms)
            .collect();
        assert_eq!(category.len(), MAX_KEYWORDS_PER_AD_GROUP);
        assert_eq!(category[0].keyword, "whey protein 29");
        assert!(category
            .windows(2)
            .all(|w| w[0].composite_score >= w[1].composite_score));
        assert!(category.iter().all(|e| e.match_types == "Phrase, Broad"));
    }

    #[test]
    fn test_build_empty() {
        assert!(builder().build(&[]).is_empty());
    }
}
