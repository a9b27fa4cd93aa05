//! Generate, score and plan a full campaign from the default configuration.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sem_core::config::CampaignConfig;
use sem_core::types::KeywordTheme;
use sem_keywords::KeywordGenerator;
use sem_planner::{CampaignBuilder, CampaignPlan};
use sem_scoring::KeywordProcessor;

fn plan_for(config: &CampaignConfig) -> CampaignPlan {
    let generator = KeywordGenerator::new(config).unwrap();
    let mut rng = StdRng::seed_from_u64(config.generator.seed);
    let raw = generator.generate(&mut rng);
    let scored = KeywordProcessor::new(config).unwrap().process(&raw).unwrap();
    assert!(!scored.is_empty());
    CampaignBuilder::new(config).build(&scored)
}

#[test]
fn test_full_pipeline_budgets() {
    let config = CampaignConfig::default();
    let plan = plan_for(&config);

    let mut theme_budgets = std::collections::BTreeMap::new();
    for entry in &plan.search {
        theme_budgets.insert(entry.ad_group, entry.theme_monthly_budget);
    }
    let search_total: f64 = theme_budgets.values().sum();
    assert!((search_total - config.budgets.search_ads).abs() <= theme_budgets.len() as f64 * 0.5);

    assert_eq!(plan.pmax.len(), 4);
    let pmax_total: f64 = plan.pmax.iter().map(|t| t.monthly_budget).sum();
    assert!((pmax_total - config.budgets.pmax_ads).abs() < 1e-6);

    assert!(!plan.shopping.is_empty());
    let shopping_total: f64 = plan.shopping.iter().map(|c| c.monthly_budget).sum();
    assert!((shopping_total - config.budgets.shopping_ads).abs() <= plan.shopping.len() as f64 * 0.5);
}

#[test]
fn test_full_pipeline_ad_group_invariants() {
    let config = CampaignConfig::default();
    let plan = plan_for(&config);

    for theme in KeywordTheme::ALL {
        let group: Vec<_> = plan.search.iter().filter(|e| e.ad_group == theme).collect();
        assert!(group.len() <= 25);
        assert!(group.windows(2).all(|w| w[0].composite_score >= w[1].composite_score));
    }
    for entry in &plan.search {
        assert!(entry.suggested_cpc_low >= 0.25);
        assert!(entry.suggested_cpc_low <= config.campaign_constraints.max_cpc);
        assert!(entry.suggested_cpc_high > entry.suggested_cpc_low);
        assert!(entry.match_types.split(", ").count() <= 2);
    }
    for theme in &plan.pmax {
        assert!(theme.target_keywords.len() <= 8);
        assert!(theme.target_roas >= 3.0);
    }
}

#[test]
fn test_full_pipeline_is_deterministic() {
    let config = CampaignConfig::default();
    let a = plan_for(&config);
    let b = plan_for(&config);
    assert_eq!(a.search, b.search);
    assert_eq!(a.pmax, b.pmax);
    assert_eq!(a.shopping, b.shopping);
}
