//! Shopping campaign bid recommendations per product category.

use std::collections::BTreeMap;

use sem_core::config::{BudgetConfig, CampaignConfig, CampaignConstraints};
use sem_core::money::{calculate_cpc_from_cpa, round_to, safe_divide};
use sem_core::types::{Competition, Priority, ScoredKeyword, ShoppingCategory};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct ProductCategory {
    pub name: &'static str,
    pub description: &'static str,
    pub terms: &'static [&'static str],
    pub priority: Priority,
    pub margin_factor: f64,
    pub budget_weight: f64,
}

impl ProductCategory {
    pub fn matches(&self, keyword: &str) -> bool {
        let text = keyword.to_lowercase();
        self.terms.iter().any(|t| text.contains(t))
    }
}

pub const PRODUCT_CATEGORIES: [ProductCategory; 4] = [
    ProductCategory {
        name: "Vegan Protein Products",
        description: "Plant-based protein powders and supplements",
        terms: &["vegan", "plant", "organic"],
        priority: Priority::High,
        margin_factor: 1.2,
        budget_weight: 1.5,
    },
    ProductCategory {
        name: "Recovery Supplements",
        description: "Post-workout and muscle recovery products",
        terms: &["recovery", "post", "muscle"],
        priority: Priority::High,
        margin_factor: 1.1,
        budget_weight: 1.3,
    },
    ProductCategory {
        name: "Womens Nutrition",
        description: "Nutrition products specifically for women",
        terms: &["women", "female", "ladies"],
        priority: Priority::Medium,
        margin_factor: 1.0,
        budget_weight: 1.0,
    },
    ProductCategory {
        name: "General Protein Supplements",
        description: "Standard protein powders and supplements",
        terms: &["protein", "supplement", "powder"],
        priority: Priority::Medium,
        margin_factor: 0.9,
        budget_weight: 0.8,
    },
];

fn competition_adjustment(competition: Competition) -> f64 {
    match competition {
        Competition::Low => 0.9,
        Competition::High => 1.1,
        Competition::Medium | Competition::Unknown => 1.0,
    }
}

/// Most frequent competition label; ties go to the label that sorts first.
pub fn modal_competition<'a>(levels: impl IntoIterator<Item = &'a Competition>) -> Competition {
    let mut counts: BTreeMap<&'static str, (usize, Competition)> = BTreeMap::new();
    for level in levels {
        counts.entry(level.as_str()).or_insert((0, *level)).0 += 1;
    }
    let mut best: Option<(usize, Competition)> = None;
    for (count, level) in counts.into_values() {
        if best.map_or(true, |(c, _)| count > c) {
            best = Some((count, level));
        }
    }
    best.map_or(Competition::Medium, |(_, level)| level)
}

pub fn bidding_strategy(priority: Priority, competition: Competition) -> &'static str {
    match (priority, competition) {
        (Priority::High, Competition::Low) => "Aggressive bidding to maximize market share",
        (Priority::High, _) => "Target CPA bidding with volume focus",
        (_, Competition::High) => "Conservative Target ROAS bidding",
        _ => "Balanced Target CPA approach",
    }
}

pub struct ShoppingCampaignBuilder {
    budgets: BudgetConfig,
    constraints: CampaignConstraints,
}

impl ShoppingCampaignBuilder {
    pub fn new(config: &CampaignConfig) -> Self {
        Self {
            budgets: config.budgets.clone(),
            constraints: config.campaign_constraints.clone(),
        }
    }

    /// One row per category with at least one matching keyword.
    pub fn build(&self, scored: &[ScoredKeyword]) -> Vec<ShoppingCategory> {
        let mut rows: Vec<ShoppingCategory> = PRODUCT_CATEGORIES
            .iter()
            .filter_map(|category| self.category_row(category, scored))
            .collect();

        let total_weight: f64 = rows.iter().map(|r| r.budget_allocation).sum();
        let cr = self.constraints.target_conversion_rate;
        for row in &mut rows {
            row.monthly_budget = round_to(
                safe_divide(row.budget_allocation, total_weight, 0.0) * self.budgets.shopping_ads,
                0,
            );
            row.expected_monthly_clicks = safe_divide(row.monthly_budget, row.suggested_cpc, 0.0).round();
            row.expected_monthly_conversions = round_to(row.expected_monthly_clicks * cr, 1);
        }

        info!(categories = rows.len(), "Shopping campaign structure ready");
        rows
    }

    fn category_row(
        &self,
        category: &ProductCategory,
        scored: &[ScoredKeyword],
    ) -> Option<ShoppingCategory> {
        let matched: Vec<&ScoredKeyword> = scored
            .iter()
            .filter(|kw| category.matches(kw.keyword()))
            .collect();
        if matched.is_empty() {
            debug!(category = category.name, "No matching keywords, skipping category");
            return None;
        }

        let n = matched.len() as f64;
        let avg_volume = matched.iter().map(|kw| kw.record.estimated_volume as f64).sum::<f64>() / n;
        let avg_cpc_low = matched.iter().map(|kw| kw.record.estimated_cpc_low).sum::<f64>() / n;
        let avg_cpc_high = matched.iter().map(|kw| kw.record.estimated_cpc_high).sum::<f64>() / n;
        let competition = modal_competition(matched.iter().map(|kw| &kw.record.estimated_competition));

        let target_cpc = calculate_cpc_from_cpa(
            self.constraints.target_cpa,
            self.constraints.target_conversion_rate,
        );
        let suggested_cpc = round_to(
            target_cpc * category.margin_factor * competition_adjustment(competition),
            2,
        );
        debug!(
            category = category.name,
            keywords = matched.len(),
            %competition,
            suggested_cpc,
            "Built shopping category"
        );

        Some(ShoppingCategory {
            product_category: category.name.to_string(),
            category_description: category.description.to_string(),
            priority_level: category.priority,
            avg_monthly_volume: round_to(avg_volume, 0),
            competition_level: competition,
            top_of_page_bid_low: round_to(avg_cpc_low, 2),
            top_of_page_bid_high: round_to(avg_cpc_high, 2),
            target_cpc_formula: target_cpc,
            suggested_cpc,
            margin_factor: category.margin_factor,
            bidding_strategy: bidding_strategy(category.priority, competition).to_string(),
            budget_allocation: category.budget_weight,
            monthly_budget: 0.0,
            expected_monthly_clicks: 0.0,
            expected_monthly_conversions: 0.0,
        })
    }
}
