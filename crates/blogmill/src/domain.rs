//! Core domain types for the blog migration pipeline.
//!
//! This module defines the metadata model emitted in frontmatter blocks,
//! the category taxonomy of the blog, and the ordered keyword rule tables
//! that drive category and tag inference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum slug length in characters.
pub const SLUG_MAX_LEN: usize = 80;

/// Maximum excerpt length in characters, including the truncation marker.
pub const EXCERPT_MAX_LEN: usize = 150;

/// Reading speed used for the read-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Lower clamp for the read-time estimate, in minutes.
pub const MIN_READ_TIME: usize = 5;

/// Upper clamp for the read-time estimate, in minutes.
pub const MAX_READ_TIME: usize = 15;

/// Blog category taxonomy
///
/// Categories are rendered in kebab-case in frontmatter. `News` is never
/// produced by inference; it only survives from documents that arrive with
/// curated frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Bills, tariffs, meters, and the price cap
    Energy,
    /// Heat pumps, boilers, insulation, and other installations
    HomeUpgrades,
    /// Product reviews and comparisons
    Products,
    /// General how-to content (default)
    Guides,
    /// Announcements and market news
    News,
}

impl Category {
    /// The kebab-case form used in frontmatter and output filenames.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Energy => "energy",
            Category::HomeUpgrades => "home-upgrades",
            Category::Products => "products",
            Category::Guides => "guides",
            Category::News => "news",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a frontmatter category string is not in the taxonomy.
#[derive(Debug, Error, PartialEq)]
#[error("Unknown category: {0} (expected one of energy, home-upgrades, products, guides, news)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "energy" => Ok(Category::Energy),
            "home-upgrades" => Ok(Category::HomeUpgrades),
            "products" => Ok(Category::Products),
            "guides" => Ok(Category::Guides),
            "news" => Ok(Category::News),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Frontmatter metadata for one blog post
///
/// Field order here matches the serialized frontmatter order exactly so the
/// struct doubles as documentation of the output contract. Every field is
/// non-empty in assembled output; inference substitutes fixed fallbacks
/// rather than leaving holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogMetadata {
    /// Post title, cleaned of draft labels and ordinal prefixes
    pub title: String,
    /// Publication date, `YYYY-MM-DD`
    pub date: String,
    /// Summary used in listings and meta descriptions
    pub excerpt: String,
    /// Topic tags, base set first, keyword-derived tags after
    pub tags: Vec<String>,
    /// URL-safe identifier derived from the title
    pub slug: String,
    /// Byline, fixed per site
    pub author: String,
    /// Formatted estimate, e.g. "8 min read"
    #[serde(rename = "readTime")]
    pub read_time: String,
    /// Category assigned by the keyword rules
    pub category: Category,
    /// Whether the post is pinned on the blog index
    pub featured: bool,
}

/// Ordered category classification rules.
///
/// Evaluated top to bottom against the lowercased title; the first group
/// containing any matching keyword decides the category. Order is load
/// bearing: "heat pump installation bills" must land in home-upgrades,
/// not energy. Titles matching no group default to [`Category::Guides`].
pub const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (
        &["heat pump", "boiler", "thermostat", "solar panel"],
        Category::HomeUpgrades,
    ),
    (
        &["insulation", "upgrade", "installation"],
        Category::HomeUpgrades,
    ),
    (
        &["smart meter", "bill", "tariff", "price cap"],
        Category::Energy,
    ),
    (&["product", "review", "comparison"], Category::Products),
];

/// Tags every post starts with, in this order.
pub const BASE_TAGS: &[&str] = &["energy", "uk", "savings"];

/// Keyword triggers that append a tag when present in the lowercased title.
pub const TAG_RULES: &[(&str, &str)] = &[
    ("heat pump", "heat-pumps"),
    ("solar", "solar-panels"),
    ("insulation", "insulation"),
    ("bill", "bills"),
    ("smart meter", "smart-meters"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for cat in [
            Category::Energy,
            Category::HomeUpgrades,
            Category::Products,
            Category::Guides,
            Category::News,
        ] {
            let parsed: Category = cat.as_str().parse().unwrap();
            assert_eq!(parsed, cat);
        }
    }

    #[test]
    fn test_category_rejects_unknown() {
        let err = "gardening".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("gardening".to_string()));
    }

    #[test]
    fn test_category_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Category::HomeUpgrades).unwrap();
        assert_eq!(json, "\"home-upgrades\"");
    }

    #[test]
    fn test_metadata_serializes_read_time_in_camel_case() {
        let meta = BlogMetadata {
            title: "T".to_string(),
            date: "2025-01-01".to_string(),
            excerpt: "E".to_string(),
            tags: vec!["energy".to_string()],
            slug: "t".to_string(),
            author: "Cost Saver Team".to_string(),
            read_time: "5 min read".to_string(),
            category: Category::Guides,
            featured: false,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"readTime\":\"5 min read\""));
        assert!(!json.contains("read_time"));
    }

    #[test]
    fn test_rule_tables_cover_expected_keywords() {
        let matched: Vec<&str> = CATEGORY_RULES
            .iter()
            .flat_map(|(words, _)| words.iter().copied())
            .collect();
        assert!(matched.contains(&"heat pump"));
        assert!(matched.contains(&"price cap"));
        // News is deliberately absent from inference rules.
        assert!(!CATEGORY_RULES
            .iter()
            .any(|(_, cat)| *cat == Category::News));
    }
}
