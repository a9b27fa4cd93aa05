//! Expansion templates. `{keyword}`, `{location}`, `{brand}` and
//! `{competitor}` are substituted literally.

pub const LOCATION_PATTERNS: &[&str] = &[
    "{keyword} {location}",
    "{keyword} in {location}",
    "best {keyword} {location}",
    "{keyword} near {location}",
    "{location} {keyword}",
    "{keyword} delivery {location}",
];

pub const COMMERCIAL_PATTERNS: &[&str] = &[
    "buy {keyword}",
    "{keyword} price",
    "{keyword} cost",
    "{keyword} online",
    "best {keyword}",
    "{keyword} review",
    "{keyword} reviews",
    "cheap {keyword}",
    "{keyword} discount",
    "{keyword} deals",
    "{keyword} offers",
    "order {keyword}",
    "{keyword} purchase",
    "where to buy {keyword}",
    "{keyword} for sale",
];

/// Patterns with `{keyword}` are expanded once per seed, the rest once.
pub const BRAND_PATTERNS: &[&str] = &[
    "{brand} {keyword}",
    "{keyword} {brand}",
    "{brand}",
    "{brand} official",
    "{brand} website",
    "{brand} store",
    "{brand} products",
    "{brand} reviews",
    "{brand} price",
    "{brand} contact",
    "{brand} support",
];

pub const COMPETITOR_PATTERNS: &[&str] = &[
    "{competitor} alternative",
    "alternative to {competitor}",
    "{competitor} vs {brand}",
    "{brand} vs {competitor}",
    "{competitor} competitor",
    "better than {competitor}",
    "{competitor} replacement",
    "like {competitor} but better",
];

pub const LONGTAIL_PATTERNS: &[&str] = &[
    "how to use {keyword}",
    "what is {keyword}",
    "{keyword} benefits",
    "{keyword} side effects",
    "{keyword} dosage",
    "best time to take {keyword}",
    "{keyword} for beginners",
    "{keyword} vs protein powder",
    "natural {keyword}",
    "organic {keyword}",
    "{keyword} guide",
    "{keyword} tips",
    "why use {keyword}",
    "{keyword} ingredients",
    "{keyword} nutrition facts",
];

/// Values substituted into a template.
#[derive(Debug, Default, Clone, Copy)]
pub struct Slots<'a> {
    pub keyword: &'a str,
    pub location: &'a str,
    pub brand: &'a str,
    pub competitor: &'a str,
}

pub fn render(pattern: &str, slots: &Slots<'_>) -> String {
    pattern
        .replace("{keyword}", slots.keyword)
        .replace("{location}", slots.location)
        .replace("{brand}", slots.brand)
        .replace("{competitor}", slots.competitor)
}
