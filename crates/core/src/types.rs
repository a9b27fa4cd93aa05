use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CampaignError, CampaignResult};

/// How a candidate keyword was synthesized from the seed list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    SeedDirect,
    LocationVariant,
    CommercialVariant,
    BrandVariant,
    CompetitorVariant,
    LongtailVariant,
}

impl KeywordSource {
    pub const ALL: [KeywordSource; 6] = [
        Self::SeedDirect,
        Self::LocationVariant,
        Self::CommercialVariant,
        Self::BrandVariant,
        Self::CompetitorVariant,
        Self::LongtailVariant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeedDirect => "seed_direct",
            Self::LocationVariant => "location_variant",
            Self::CommercialVariant => "commercial_variant",
            Self::BrandVariant => "brand_variant",
            Self::CompetitorVariant => "competitor_variant",
            Self::LongtailVariant => "longtail_variant",
        }
    }
}

/// Advertiser competition for a keyword. Labels outside Low/Medium/High
/// deserialize to `Unknown` and score neutrally downstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Competition {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl Competition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchIntent {
    Transactional,
    Navigational,
    Commercial,
    Informational,
}

impl SearchIntent {
    pub const ALL: [SearchIntent; 4] = [
        Self::Transactional,
        Self::Navigational,
        Self::Commercial,
        Self::Informational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactional => "transactional",
            Self::Navigational => "navigational",
            Self::Commercial => "commercial",
            Self::Informational => "informational",
        }
    }
}

/// Thematic cluster a keyword belongs to. Doubles as the search ad group.
/// Declaration order is the order ad groups are emitted in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeywordTheme {
    #[serde(rename = "Brand Terms")]
    BrandTerms,
    #[serde(rename = "Category Terms")]
    CategoryTerms,
    #[serde(rename = "Competitor Terms")]
    CompetitorTerms,
    #[serde(rename = "Location-based Queries")]
    LocationQueries,
    #[serde(rename = "Long-Tail Informational")]
    LongTailInformational,
}

impl KeywordTheme {
    pub const ALL: [KeywordTheme; 5] = [
        Self::BrandTerms,
        Self::CategoryTerms,
        Self::CompetitorTerms,
        Self::LocationQueries,
        Self::LongTailInformational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrandTerms => "Brand Terms",
            Self::CategoryTerms => "Category Terms",
            Self::CompetitorTerms => "Competitor Terms",
            Self::LocationQueries => "Location-based Queries",
            Self::LongTailInformational => "Long-Tail Informational",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Relative weight used when splitting a budget across priorities.
    pub fn budget_weight(&self) -> f64 {
        match self {
            Self::High => 1.5,
            Self::Medium => 1.0,
            Self::Low => 0.7,
        }
    }

    /// Bucket a 0–10 composite score.
    pub fn from_composite(score: f64) -> Self {
        if score >= 8.0 {
            Self::High
        } else if score >= 6.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(KeywordSource, Competition, SearchIntent, KeywordTheme, Priority);

// ─── Keyword tables ─────────────────────────────────────────────────────────

/// Lowercase and collapse runs of whitespace to a single space.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A synthesized keyword with simulated planner metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub source: KeywordSource,
    pub estimated_volume: u64,
    pub estimated_competition: Competition,
    pub estimated_cpc_low: f64,
    pub estimated_cpc_high: f64,
}

impl KeywordRecord {
    /// Reject rows no stage can process.
    pub fn validate(&self) -> CampaignResult<()> {
        if self.keyword.trim().is_empty() {
            return Err(CampaignError::InvalidRecord("keyword is empty".into()));
        }
        if !self.estimated_cpc_low.is_finite() || !self.estimated_cpc_high.is_finite() {
            return Err(CampaignError::InvalidRecord(format!(
                "'{}' has a non-finite CPC estimate",
                self.keyword
            )));
        }
        if self.estimated_cpc_low > self.estimated_cpc_high {
            return Err(CampaignError::InvalidRecord(format!(
                "'{}' has cpc_low {} above cpc_high {}",
                self.keyword, self.estimated_cpc_low, self.estimated_cpc_high
            )));
        }
        Ok(())
    }
}

/// A keyword that survived filtering, with its scores and labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredKeyword {
    #[serde(flatten)]
    pub record: KeywordRecord,
    pub volume_score: f64,
    pub competition_score: f64,
    pub cpc_efficiency_score: f64,
    pub relevance_score: f64,
    pub intent_score: f64,
    pub search_intent: SearchIntent,
    pub theme: KeywordTheme,
    pub composite_score: f64,
    /// Dense descending rank on `composite_score`, starting at 1.
    pub performance_rank: u32,
    pub priority: Priority,
}

impl ScoredKeyword {
    pub fn keyword(&self) -> &str {
        &self.record.keyword
    }
}

// ─── Campaign structures ────────────────────────────────────────────────────

/// One keyword placed in a search ad group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchAdGroupEntry {
    pub campaign_type: String,
    pub ad_group: KeywordTheme,
    pub keyword: String,
    /// Comma separated, at most two entries, e.g. `Exact, Phrase`.
    pub match_types: String,
    pub suggested_cpc_low: f64,
    pub suggested_cpc_high: f64,
    pub estimated_volume: u64,
    pub competition: Competition,
    pub search_intent: SearchIntent,
    pub composite_score: f64,
    /// Priority of the ad group's theme, not of the individual keyword.
    pub priority: Priority,
    pub expected_monthly_clicks: u64,
    pub expected_monthly_conversions: f64,
    pub theme_monthly_budget: f64,
    pub source: KeywordSource,
}

/// A Performance Max asset-group theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmaxTheme {
    pub theme_type: String,
    pub theme_name: String,
    pub description: String,
    pub target_keywords: Vec<String>,
    pub primary_intent: String,
    pub audience_signals: String,
    pub budget_allocation: f64,
    pub monthly_budget: f64,
    pub expected_impressions: f64,
    pub expected_clicks: f64,
    pub expected_conversions: f64,
    pub target_roas: f64,
    pub asset_requirements: String,
}

/// Shopping bid recommendation for one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingCategory {
    pub product_category: String,
    pub category_description: String,
    pub priority_level: Priority,
    pub avg_monthly_volume: f64,
    pub competition_level: Competition,
    pub top_of_page_bid_low: f64,
    pub top_of_page_bid_high: f64,
    pub target_cpc_formula: f64,
    pub suggested_cpc: f64,
    pub margin_factor: f64,
    pub bidding_strategy: String,
    pub budget_allocation: f64,
    pub monthly_budget: f64,
    pub expected_monthly_clicks: f64,
    pub expected_monthly_conversions: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(keyword: &str, low: f64, high: f64) -> KeywordRecord {
        KeywordRecord {
            keyword: keyword.to_string(),
            source: KeywordSource::SeedDirect,
            estimated_volume: 1000,
            estimated_competition: Competition::Medium,
            estimated_cpc_low: low,
            estimated_cpc_high: high,
        }
    }

    #[test]
    fn test_normalize_keyword() {
        assert_eq!(normalize_keyword("  Whey\tProtein   POWDER "), "whey protein powder");
        assert_eq!(normalize_keyword("Nutri  Max"), "nutri max");
        assert_eq!(normalize_keyword("   "), "");
    }

    #[test]
    fn test_competition_unknown_label() {
        let c: Competition = serde_json::from_str("\"Extreme\"").unwrap();
        assert_eq!(c, Competition::Unknown);
        let c: Competition = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(c, Competition::High);
    }

    #[test]
    fn test_theme_serializes_as_label() {
        let json = serde_json::to_string(&KeywordTheme::LocationQueries).unwrap();
        assert_eq!(json, "\"Location-based Queries\"");
        for theme in KeywordTheme::ALL {
            assert_eq!(serde_json::to_string(&theme).unwrap(), format!("\"{theme}\""));
        }
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(Priority::from_composite(8.0), Priority::High);
        assert_eq!(Priority::from_composite(7.99), Priority::Medium);
        assert_eq!(Priority::from_composite(6.0), Priority::Medium);
        assert_eq!(Priority::from_composite(5.99), Priority::Low);
    }

    #[test]
    fn test_record_validation() {
        assert!(record("whey protein", 0.5, 1.0).validate().is_ok());
        assert!(record("whey protein", 1.0, 1.0).validate().is_ok());
        assert!(record("whey protein", 1.5, 1.0).validate().is_err());
        assert!(record("   ", 0.5, 1.0).validate().is_err());
        assert!(record("whey", f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_scored_keyword_flattens_record() {
        let scored = ScoredKeyword {
            record: record("whey protein", 0.5, 1.0),
            volume_score: 5.0,
            competition_score: 6.0,
            cpc_efficiency_score: 8.0,
            relevance_score: 8.0,
            intent_score: 8.0,
            search_intent: SearchIntent::Commercial,
            theme: KeywordTheme::CategoryTerms,
            composite_score: 6.85,
            performance_rank: 1,
            priority: Priority::Medium,
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["keyword"], "whey protein");
        assert_eq!(value["theme"], "Category Terms");
        assert_eq!(value["search_intent"], "commercial");
    }
}
