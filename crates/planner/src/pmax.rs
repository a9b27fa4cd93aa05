//! Performance Max asset-group themes.

use std::collections::BTreeSet;

use sem_core::config::{BudgetConfig, CampaignConfig, CampaignConstraints};
use sem_core::money::{round_to, safe_divide};
use sem_core::types::{KeywordTheme, PmaxTheme, ScoredKeyword, SearchIntent};
use tracing::{debug, info};

const REACH_MULTIPLIER: f64 = 1.5;
const PMAX_CTR: f64 = 0.02;
const MIN_TARGET_ROAS: f64 = 3.0;
const DEFAULT_AVG_CPC: f64 = 1.0;
const DEFAULT_VOLUME: f64 = 10_000.0;
const MAX_TARGET_KEYWORDS: usize = 8;

/// How a template picks its target keywords from the scored table.
#[derive(Debug, Clone, Copy)]
pub enum KeywordSelector {
    /// Category-theme or transactional keywords.
    ProductCore { limit: usize },
    /// Keywords containing any of `terms`, case-insensitive.
    Terms {
        terms: &'static [&'static str],
        limit: usize,
        fallback: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy)]
pub struct ThemeTemplate {
    pub theme_type: &'static str,
    pub theme_name: &'static str,
    pub description: &'static str,
    pub selector: KeywordSelector,
    pub primary_intent: &'static str,
    pub audience_signals: &'static str,
    pub budget_share: f64,
}

pub const THEME_TEMPLATES: [ThemeTemplate; 4] = [
    ThemeTemplate {
        theme_type: "Product Category",
        theme_name: "Premium Protein Solutions",
        description: "High-quality protein products and supplements",
        selector: KeywordSelector::ProductCore { limit: 8 },
        primary_intent: "Purchase",
        audience_signals: "Health-conscious consumers; Fitness enthusiasts; Nutrition-focused individuals",
        budget_share: 0.35,
    },
    ThemeTemplate {
        theme_type: "Use-case Based",
        theme_name: "Post-Workout Recovery",
        description: "Recovery and muscle-building focused solutions",
        selector: KeywordSelector::Terms {
            terms: &["recovery", "workout", "post", "muscle"],
            limit: 6,
            fallback: &[],
        },
        primary_intent: "Solution-seeking",
        audience_signals: "Active lifestyle; Gym members; Athletes; Fitness trainers",
        budget_share: 0.30,
    },
    ThemeTemplate {
        theme_type: "Demographic",
        theme_name: "Nutrition for Professionals",
        description: "Convenient nutrition for busy professionals",
        selector: KeywordSelector::Terms {
            terms: &["professional", "busy", "office", "work"],
            limit: 5,
            fallback: &["protein for professionals", "busy lifestyle nutrition", "office wellness"],
        },
        primary_intent: "Convenience",
        audience_signals: "Working professionals; High income; Time-conscious; Career-focused",
        budget_share: 0.20,
    },
    ThemeTemplate {
        theme_type: "Seasonal",
        theme_name: "Fitness Resolution Goals",
        description: "Supporting fitness and health goals",
        selector: KeywordSelector::Terms {
            terms: &["new year", "summer", "winter", "resolution"],
            limit: 5,
            fallback: &["fitness goals", "health resolutions", "seasonal nutrition"],
        },
        primary_intent: "Goal-achievement",
        audience_signals: "New Year resolutions; Fitness goals; Health improvement; Summer prep",
        budget_share: 0.15,
    },
];

impl KeywordSelector {
    /// Highest-scoring matches first; equal scores keep table order.
    pub fn select(&self, scored: &[ScoredKeyword]) -> Vec<String> {
        let (limit, fallback): (usize, &[&str]) = match *self {
            Self::ProductCore { limit } => (limit, &[]),
            Self::Terms { limit, fallback, .. } => (limit, fallback),
        };

        let mut matches: Vec<&ScoredKeyword> = scored.iter().filter(|kw| self.matches(kw)).collect();
        matches.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));

        let mut keywords: Vec<String> = matches
            .into_iter()
            .take(limit)
            .map(|kw| kw.record.keyword.clone())
            .collect();
        if keywords.is_empty() {
            keywords = fallback.iter().map(|s| s.to_string()).collect();
        }
        keywords.truncate(MAX_TARGET_KEYWORDS);
        keywords
    }

    fn matches(&self, kw: &ScoredKeyword) -> bool {
        match self {
            Self::ProductCore { .. } => {
                kw.theme == KeywordTheme::CategoryTerms
                    || kw.search_intent == SearchIntent::Transactional
            }
            Self::Terms { terms, .. } => {
                let text = kw.record.keyword.to_lowercase();
                terms.iter().any(|t| text.contains(t))
            }
        }
    }
}

/// Projected reach and returns for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PmaxProjection {
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub target_roas: f64,
}

pub struct PmaxCampaignBuilder {
    budgets: BudgetConfig,
    constraints: CampaignConstraints,
}

impl PmaxCampaignBuilder {
    pub fn new(config: &CampaignConfig) -> Self {
        Self {
            budgets: config.budgets.clone(),
            constraints: config.campaign_constraints.clone(),
        }
    }

    /// Always emits all four themes, in template order.
    pub fn build(&self, scored: &[ScoredKeyword]) -> Vec<PmaxTheme> {
        let themes: Vec<PmaxTheme> = THEME_TEMPLATES
            .iter()
            .map(|template| {
                let target_keywords = template.selector.select(scored);
                let monthly_budget = template.budget_share * self.budgets.pmax_ads;
                let projection = self.project(scored, &target_keywords, monthly_budget);
                debug!(
                    theme = template.theme_name,
                    keywords = target_keywords.len(),
                    monthly_budget,
                    "Built PMax theme"
                );

                PmaxTheme {
                    theme_type: template.theme_type.to_string(),
                    theme_name: template.theme_name.to_string(),
                    description: template.description.to_string(),
                    target_keywords,
                    primary_intent: template.primary_intent.to_string(),
                    audience_signals: template.audience_signals.to_string(),
                    budget_allocation: template.budget_share,
                    monthly_budget,
                    expected_impressions: projection.impressions,
                    expected_clicks: projection.clicks,
                    expected_conversions: projection.conversions,
                    target_roas: projection.target_roas,
                    asset_requirements: asset_requirements(template),
                }
            })
            .collect();

        info!(themes = themes.len(), "Performance Max themes ready");
        themes
    }

    /// Projection over the scored rows whose keyword is targeted. Falls back
    /// to a nominal CPC and volume when none of them are in the table.
    pub fn project(&self, scored: &[ScoredKeyword], keywords: &[String], budget: f64) -> PmaxProjection {
        let targets: BTreeSet<&str> = keywords.iter().map(String::as_str).collect();
        let rows: Vec<&ScoredKeyword> = scored
            .iter()
            .filter(|kw| targets.contains(kw.keyword()))
            .collect();

        let (avg_cpc, volume) = if rows.is_empty() {
            (DEFAULT_AVG_CPC, DEFAULT_VOLUME)
        } else {
            let cpc_sum: f64 = rows.iter().map(|kw| kw.record.estimated_cpc_high).sum();
            let volume: u64 = rows.iter().map(|kw| kw.record.estimated_volume).sum();
            (cpc_sum / rows.len() as f64, volume as f64)
        };

        let cr = self.constraints.target_conversion_rate;
        let reach = volume * REACH_MULTIPLIER;
        let clicks = safe_divide(budget, avg_cpc, 0.0).min(reach * PMAX_CTR);

        let cpa = self.constraints.target_cpa;
        let implied_aov = safe_divide(cpa, cr, 0.0);
        let roas = round_to(safe_divide(implied_aov, cpa, 0.0), 1);

        PmaxProjection {
            impressions: reach.round(),
            clicks: clicks.round(),
            conversions: round_to(clicks * cr, 1),
            target_roas: roas.max(MIN_TARGET_ROAS),
        }
    }
}

fn asset_requirements(template: &ThemeTemplate) -> String {
    format!(
        "Headlines: 15 (focus on {}); Descriptions: 4-5; Images: 20+ high-quality; \
         Videos: 2-3 demonstrating value; Landing pages: Optimized for {}",
        template.theme_name.to_lowercase(),
        template.primary_intent.to_lowercase()
    )
}
