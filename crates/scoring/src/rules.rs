//! Ordered classification rule tables. Each table is evaluated top to
//! bottom and the first matching rule decides the label.

use regex::Regex;

use sem_core::types::{normalize_keyword, KeywordTheme, SearchIntent};
use sem_core::{CampaignConfig, CampaignResult};

/// A keyword predicate.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Whole-word, case-insensitive alternation such as `buy|price`.
    Words(&'static str),
    /// Substring containment of any of the terms.
    Contains(&'static [&'static str]),
    /// Brand name appears anywhere in the keyword.
    Brand,
    /// Competitor name appears anywhere in the keyword.
    Competitor,
    /// Any configured service location appears in the keyword.
    Location,
    /// Keyword has at least this many whitespace-separated words.
    MinWords(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule<L> {
    pub matcher: Matcher,
    pub label: L,
}

const fn rule<L>(matcher: Matcher, label: L) -> Rule<L> {
    Rule { matcher, label }
}

/// Irrelevance classes; a keyword matching any of them is dropped.
pub const IRRELEVANT_CLASSES: &[(&str, &str)] = &[
    ("piracy", "free|download|torrent|crack|pirate"),
    ("jobs", "jobs|career|hiring|salary|interview"),
    ("education", "course|training|education|class|school"),
    ("adult", "porn|sex|adult|xxx"),
    ("fraud", "illegal|fake|scam|fraud"),
];

pub const INTENT_RULES: &[Rule<SearchIntent>] = &[
    rule(Matcher::Words("buy|purchase|order|price|cost|shop|store"), SearchIntent::Transactional),
    rule(Matcher::Words("cheap|discount|deal|sale|offer"), SearchIntent::Transactional),
    rule(Matcher::Words("near me|delivery|shipping"), SearchIntent::Transactional),
    rule(Matcher::Brand, SearchIntent::Navigational),
    rule(Matcher::Words("best|top|review|compare|vs"), SearchIntent::Commercial),
    rule(Matcher::Words("alternative|option|choice"), SearchIntent::Commercial),
    rule(Matcher::Words("how to|what is|why|guide|tips"), SearchIntent::Informational),
    rule(Matcher::Words("benefits|side effects|ingredients"), SearchIntent::Informational),
    rule(Matcher::MinWords(4), SearchIntent::Informational),
];

/// Intent when no rule matches: short queries read as commercial.
pub const DEFAULT_INTENT: SearchIntent = SearchIntent::Commercial;

// Location is checked before the long-tail rules, so a long keyword naming a
// service location is always a location query.
pub const THEME_RULES: &[Rule<KeywordTheme>] = &[
    rule(Matcher::Brand, KeywordTheme::BrandTerms),
    rule(Matcher::Competitor, KeywordTheme::CompetitorTerms),
    rule(Matcher::Contains(&["alternative", "vs"]), KeywordTheme::CompetitorTerms),
    rule(Matcher::Location, KeywordTheme::LocationQueries),
    rule(Matcher::MinWords(4), KeywordTheme::LongTailInformational),
    rule(
        Matcher::Contains(&["how to", "what is", "guide", "tips"]),
        KeywordTheme::LongTailInformational,
    ),
];

pub const DEFAULT_THEME: KeywordTheme = KeywordTheme::CategoryTerms;

pub const RELEVANCE_RULES: &[Rule<f64>] = &[
    rule(Matcher::Brand, 10.0),
    rule(Matcher::Contains(&["buy", "price", "best", "review"]), 9.0),
    rule(
        Matcher::Contains(&["protein", "supplement", "shake", "powder", "nutrition"]),
        8.0,
    ),
    rule(Matcher::Location, 7.0),
    rule(
        Matcher::Contains(&["gym", "workout", "fitness", "muscle", "health", "recovery"]),
        6.0,
    ),
];

pub const DEFAULT_RELEVANCE: f64 = 5.0;

/// A `Matcher` with its word alternations compiled.
enum CompiledMatcher {
    Pattern(Regex),
    Contains(&'static [&'static str]),
    Brand,
    Competitor,
    Location,
    MinWords(usize),
}

struct CompiledRule<L> {
    matcher: CompiledMatcher,
    label: L,
}

fn compile<L: Copy>(rules: &[Rule<L>]) -> CampaignResult<Vec<CompiledRule<L>>> {
    rules
        .iter()
        .map(|r| -> CampaignResult<CompiledRule<L>> {
            let matcher = match r.matcher {
                Matcher::Words(alternation) => CompiledMatcher::Pattern(word_pattern(alternation)?),
                Matcher::Contains(terms) => CompiledMatcher::Contains(terms),
                Matcher::Brand => CompiledMatcher::Brand,
                Matcher::Competitor => CompiledMatcher::Competitor,
                Matcher::Location => CompiledMatcher::Location,
                Matcher::MinWords(n) => CompiledMatcher::MinWords(n),
            };
            Ok(CompiledRule {
                matcher,
                label: r.label,
            })
        })
        .collect()
}

fn word_pattern(alternation: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
}

/// Evaluates the rule tables against a brand/competitor/location context.
pub struct KeywordClassifier {
    brand_name: String,
    competitor_name: String,
    locations: Vec<String>,
    irrelevant: Vec<(&'static str, Regex)>,
    intent_rules: Vec<CompiledRule<SearchIntent>>,
    theme_rules: Vec<CompiledRule<KeywordTheme>>,
    relevance_rules: Vec<CompiledRule<f64>>,
}

impl KeywordClassifier {
    pub fn new(brand: &str, competitor: &str, locations: &[String]) -> CampaignResult<Self> {
        let irrelevant = IRRELEVANT_CLASSES
            .iter()
            .map(|(class, alternation)| -> CampaignResult<(&'static str, Regex)> {
                Ok((*class, word_pattern(alternation)?))
            })
            .collect::<CampaignResult<Vec<_>>>()?;

        Ok(Self {
            brand_name: normalize_keyword(brand),
            competitor_name: normalize_keyword(competitor),
            // An empty location would match every keyword.
            locations: locations
                .iter()
                .map(|l| normalize_keyword(l))
                .filter(|l| !l.is_empty())
                .collect(),
            irrelevant,
            intent_rules: compile(INTENT_RULES)?,
            theme_rules: compile(THEME_RULES)?,
            relevance_rules: compile(RELEVANCE_RULES)?,
        })
    }

    pub fn from_config(config: &CampaignConfig) -> CampaignResult<Self> {
        Self::new(
            &config.brand.name,
            &config.competitor.name,
            &config.service_locations,
        )
    }

    /// Name of the first irrelevance class the keyword falls into.
    pub fn irrelevance_class(&self, keyword: &str) -> Option<&'static str> {
        self.irrelevant
            .iter()
            .find(|(_, re)| re.is_match(keyword))
            .map(|(class, _)| *class)
    }

    pub fn classify_intent(&self, keyword: &str) -> SearchIntent {
        self.first_match(&self.intent_rules, keyword)
            .unwrap_or(DEFAULT_INTENT)
    }

    pub fn classify_theme(&self, keyword: &str) -> KeywordTheme {
        self.first_match(&self.theme_rules, keyword)
            .unwrap_or(DEFAULT_THEME)
    }

    pub fn relevance_score(&self, keyword: &str) -> f64 {
        self.first_match(&self.relevance_rules, keyword)
            .unwrap_or(DEFAULT_RELEVANCE)
    }

    fn first_match<L: Copy>(&self, rules: &[CompiledRule<L>], keyword: &str) -> Option<L> {
        let lowered = keyword.to_lowercase();
        rules
            .iter()
            .find(|r| self.matches(&r.matcher, &lowered))
            .map(|r| r.label)
    }

    fn matches(&self, matcher: &CompiledMatcher, keyword: &str) -> bool {
        match matcher {
            CompiledMatcher::Pattern(re) => re.is_match(keyword),
            CompiledMatcher::Contains(terms) => terms.iter().any(|t| keyword.contains(t)),
            CompiledMatcher::Brand => contains_name(keyword, &self.brand_name),
            CompiledMatcher::Competitor => contains_name(keyword, &self.competitor_name),
            CompiledMatcher::Location => self.locations.iter().any(|l| keyword.contains(l.as_str())),
            CompiledMatcher::MinWords(n) => keyword.split_whitespace().count() >= *n,
        }
    }
}

fn contains_name(keyword: &str, name: &str) -> bool {
    !name.is_empty() && keyword.contains(name)
}
