//! Validation of produced blog documents.
//!
//! Checks that a written (or about-to-be-written) document satisfies the
//! output contract: a complete frontmatter block with every field non-empty
//! and well-formed, and a body with sane heading structure. A missing
//! frontmatter block is a hard error; everything else is reported as
//! warnings so a batch can be audited in one pass.

use crate::config::InferenceConfig;
use crate::domain::Category;
use crate::frontmatter;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use regex::Regex;
use std::sync::OnceLock;

/// Scalar fields every document must carry, in output order.
const REQUIRED_FIELDS: &[&str] = &[
    "title", "date", "excerpt", "slug", "author", "readTime", "category", "featured",
];

static SLUG_SHAPE_REGEX: OnceLock<Regex> = OnceLock::new();

fn slug_shape_regex() -> &'static Regex {
    SLUG_SHAPE_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9_]+(?:-[a-z0-9_]+)*$").expect("Slug shape regex should compile")
    })
}

static READ_TIME_REGEX: OnceLock<Regex> = OnceLock::new();

fn read_time_regex() -> &'static Regex {
    READ_TIME_REGEX
        .get_or_init(|| Regex::new(r"^\d+ min read$").expect("Read time regex should compile"))
}

/// Validates produced documents against the output contract.
pub struct DocumentValidator {
    inference: InferenceConfig,
}

impl DocumentValidator {
    /// Create a validator using the configured bounds.
    pub fn new(inference: InferenceConfig) -> Self {
        Self { inference }
    }

    /// Validate one document.
    ///
    /// Returns the list of warnings, empty when the document is clean.
    ///
    /// # Errors
    ///
    /// Returns an error when the document has no frontmatter block at all;
    /// such a file cannot be loaded by the blog renderer.
    pub fn validate(&self, text: &str) -> Result<Vec<String>> {
        let (block, body) = frontmatter::split_document(text)
            .ok_or_else(|| anyhow!("Document has no frontmatter block"))?;

        let mut warnings = Vec::new();
        self.check_fields(&block, &mut warnings);
        check_headings(&body, &mut warnings);
        Ok(warnings)
    }

    fn check_fields(&self, block: &str, warnings: &mut Vec<String>) {
        for key in REQUIRED_FIELDS {
            if frontmatter::field(block, key).is_none() {
                warnings.push(format!("Missing or empty frontmatter field: {}", key));
            }
        }

        if frontmatter::tags_field(block).is_none() {
            warnings.push("Missing or empty frontmatter field: tags".to_string());
        }

        if let Some(date) = frontmatter::field(block, "date") {
            if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
                warnings.push(format!("Date is not YYYY-MM-DD: {:?}", date));
            }
        }

        if let Some(category) = frontmatter::field(block, "category") {
            if category.parse::<Category>().is_err() {
                warnings.push(format!("Unknown category: {:?}", category));
            }
        }

        if let Some(featured) = frontmatter::field(block, "featured") {
            if featured != "true" && featured != "false" {
                warnings.push(format!("Featured flag is not true/false: {:?}", featured));
            }
        }

        if let Some(excerpt) = frontmatter::field(block, "excerpt") {
            let max = self.inference.excerpt_max_len();
            if excerpt.chars().count() > max {
                warnings.push(format!(
                    "Excerpt exceeds {} characters ({})",
                    max,
                    excerpt.chars().count()
                ));
            }
        }

        if let Some(slug) = frontmatter::field(block, "slug") {
            let max = self.inference.slug_max_len();
            if slug.chars().count() > max {
                warnings.push(format!("Slug exceeds {} characters", max));
            }
            if !slug_shape_regex().is_match(&slug) {
                warnings.push(format!("Slug is not lowercase-hyphenated: {:?}", slug));
            }
        }

        if let Some(read_time) = frontmatter::field(block, "readTime") {
            if !read_time_regex().is_match(&read_time) {
                warnings.push(format!("Read time is not \"N min read\": {:?}", read_time));
            }
        }
    }
}

/// Check body heading structure: at most one H1, no skipped levels.
fn check_headings(body: &str, warnings: &mut Vec<String>) {
    let mut levels = Vec::new();
    for event in Parser::new(body) {
        if let Event::Start(Tag::Heading(level, _, _)) = event {
            levels.push(heading_rank(level));
        }
    }

    let h1_count = levels.iter().filter(|l| **l == 1).count();
    if h1_count > 1 {
        warnings.push(format!("Body has {} level-1 headings (want at most 1)", h1_count));
    }

    let mut previous: Option<u32> = None;
    for level in levels {
        if let Some(prev) = previous {
            if level > prev + 1 {
                warnings.push(format!(
                    "Heading level skips from {} to {}",
                    prev, level
                ));
            }
        }
        previous = Some(level);
    }
}

fn heading_rank(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
