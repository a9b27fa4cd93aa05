//! Per-theme bidding tables for search ad groups.

use sem_core::types::{KeywordTheme, Priority, SearchIntent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "Exact",
            Self::Phrase => "Phrase",
            Self::Broad => "Broad",
        }
    }
}

/// Bidding settings shared by every keyword in a theme's ad group.
#[derive(Debug, Clone, Copy)]
pub struct ThemeStrategy {
    pub match_types: &'static [MatchType],
    pub bid_multiplier: f64,
    pub priority: Priority,
}

pub fn theme_strategy(theme: KeywordTheme) -> ThemeStrategy {
    use MatchType::*;
    match theme {
        KeywordTheme::BrandTerms => ThemeStrategy {
            match_types: &[Exact, Phrase],
            bid_multiplier: 1.2,
            priority: Priority::High,
        },
        KeywordTheme::CategoryTerms => ThemeStrategy {
            match_types: &[Phrase, Broad],
            bid_multiplier: 1.0,
            priority: Priority::Medium,
        },
        KeywordTheme::CompetitorTerms => ThemeStrategy {
            match_types: &[Phrase, Exact],
            bid_multiplier: 0.9,
            priority: Priority::Medium,
        },
        KeywordTheme::LocationQueries => ThemeStrategy {
            match_types: &[Phrase],
            bid_multiplier: 0.8,
            priority: Priority::High,
        },
        KeywordTheme::LongTailInformational => ThemeStrategy {
            match_types: &[Broad, Phrase],
            bid_multiplier: 0.7,
            priority: Priority::Low,
        },
    }
}

/// Theme match types adjusted for intent: transactional queries lead with
/// Exact, informational ones add Broad. At most two are kept.
pub fn match_types(theme: KeywordTheme, intent: SearchIntent) -> Vec<MatchType> {
    let mut types = theme_strategy(theme).match_types.to_vec();
    match intent {
        SearchIntent::Transactional if !types.contains(&MatchType::Exact) => {
            types.insert(0, MatchType::Exact);
        }
        SearchIntent::Informational if !types.contains(&MatchType::Broad) => {
            types.push(MatchType::Broad);
        }
        _ => {}
    }
    types.truncate(2);
    types
}

pub fn format_match_types(types: &[MatchType]) -> String {
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
