pub mod pmax;
pub mod search;
pub mod shopping;
pub mod strategy;

pub use pmax::PmaxCampaignBuilder;
pub use search::SearchCampaignBuilder;
pub use shopping::ShoppingCampaignBuilder;

use sem_core::config::CampaignConfig;
use sem_core::types::{PmaxTheme, ScoredKeyword, SearchAdGroupEntry, ShoppingCategory};
use serde::Serialize;

/// All three channel structures built from one scored keyword table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignPlan {
    pub search: Vec<SearchAdGroupEntry>,
    pub pmax: Vec<PmaxTheme>,
    pub shopping: Vec<ShoppingCategory>,
}

impl CampaignPlan {
    pub fn search_clicks(&self) -> f64 {
        self.search.iter().map(|e| e.expected_monthly_clicks as f64).sum()
    }

    pub fn search_conversions(&self) -> f64 {
        self.search.iter().map(|e| e.expected_monthly_conversions).sum()
    }

    pub fn pmax_clicks(&self) -> f64 {
        self.pmax.iter().map(|t| t.expected_clicks).sum()
    }

    pub fn pmax_conversions(&self) -> f64 {
        self.pmax.iter().map(|t| t.expected_conversions).sum()
    }

    pub fn shopping_clicks(&self) -> f64 {
        self.shopping.iter().map(|c| c.expected_monthly_clicks).sum()
    }

    pub fn shopping_conversions(&self) -> f64 {
        self.shopping.iter().map(|c| c.expected_monthly_conversions).sum()
    }
}

pub struct CampaignBuilder {
    search: SearchCampaignBuilder,
    pmax: PmaxCampaignBuilder,
    shopping: ShoppingCampaignBuilder,
}

impl CampaignBuilder {
    pub fn new(config: &CampaignConfig) -> Self {
        Self {
            search: SearchCampaignBuilder::new(config),
            pmax: PmaxCampaignBuilder::new(config),
            shopping: ShoppingCampaignBuilder::new(config),
        }
    }

    pub fn build_search_campaigns(&self, scored: &[ScoredKeyword]) -> Vec<SearchAdGroupEntry> {
        self.search.build(scored)
    }

    pub fn build_pmax_campaigns(&self, scored: &[ScoredKeyword]) -> Vec<PmaxTheme> {
        self.pmax.build(scored)
    }

    pub fn build_shopping_campaigns(&self, scored: &[ScoredKeyword]) -> Vec<ShoppingCategory> {
        self.shopping.build(scored)
    }

    pub fn build(&self, scored: &[ScoredKeyword]) -> CampaignPlan {
        CampaignPlan {
            search: self.build_search_campaigns(scored),
            pmax: self.build_pmax_campaigns(scored),
            shopping: self.build_shopping_campaigns(scored),
        }
    }
}
