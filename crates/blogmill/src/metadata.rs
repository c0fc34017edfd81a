//! Metadata inference over raw blog text.
//!
//! Every extraction step has a deterministic fallback, so inference is total:
//! malformed or empty input yields fully-populated metadata plus a list of
//! fallback notes, never an error. Category and tag assignment run through
//! the ordered rule tables in [`crate::domain`] so priority stays explicit.

use crate::config::{BatchConfig, InferenceConfig};
use crate::domain::{BlogMetadata, Category, BASE_TAGS, CATEGORY_RULES, TAG_RULES};
use chrono::Days;
use regex::Regex;
use std::sync::OnceLock;

/// Minimum length for a heuristic (non-heading) title line.
const MIN_TITLE_LINE_LEN: usize = 10;

/// How many non-empty lines the heuristic title scan inspects.
const TITLE_SCAN_WINDOW: usize = 5;

static HEADING1_REGEX: OnceLock<Regex> = OnceLock::new();

fn heading1_regex() -> &'static Regex {
    HEADING1_REGEX
        .get_or_init(|| Regex::new(r"^#\s+(.+)$").expect("Heading regex should compile"))
}

static ORDINAL_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn ordinal_prefix_regex() -> &'static Regex {
    ORDINAL_PREFIX_REGEX.get_or_init(|| {
        Regex::new(r"^\d+\s*[–-]\s*").expect("Ordinal prefix regex should compile")
    })
}

static SLUG_STRIP_REGEX: OnceLock<Regex> = OnceLock::new();

fn slug_strip_regex() -> &'static Regex {
    SLUG_STRIP_REGEX
        .get_or_init(|| Regex::new(r"[^\w\s-]").expect("Slug strip regex should compile"))
}

static SLUG_COLLAPSE_REGEX: OnceLock<Regex> = OnceLock::new();

fn slug_collapse_regex() -> &'static Regex {
    SLUG_COLLAPSE_REGEX
        .get_or_init(|| Regex::new(r"[-\s]+").expect("Slug collapse regex should compile"))
}

/// A field whose value came from a fixed fallback instead of the document.
///
/// These are soft signals for the batch report, not errors: the pipeline
/// always produces complete metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// No heading or substantive line found; fallback title used.
    Title,
    /// A title was found but cleaning removed everything; fallback title used.
    TitleCleaned,
    /// The title yielded no slug characters; positional slug used.
    Slug(String),
    /// No body text follows the title; excerpt falls back to the title.
    Excerpt,
}

impl Fallback {
    /// The frontmatter field this fallback filled.
    pub fn field(&self) -> &'static str {
        match self {
            Fallback::Title | Fallback::TitleCleaned => "title",
            Fallback::Slug(_) => "slug",
            Fallback::Excerpt => "excerpt",
        }
    }
}

impl std::fmt::Display for Fallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fallback::Title => write!(f, "no title found; using fallback title"),
            Fallback::TitleCleaned => {
                write!(f, "title cleaning left nothing; using fallback title")
            }
            Fallback::Slug(slug) => write!(f, "no slug derivable; using {}", slug),
            Fallback::Excerpt => write!(f, "no excerpt found; using title"),
        }
    }
}

/// Inference result: the metadata plus a record of every field that
/// defaulted.
#[derive(Debug, Clone)]
pub struct Inference {
    pub metadata: BlogMetadata,
    pub fallbacks: Vec<Fallback>,
}

/// Find the raw title of a document.
///
/// Prefers the first level-1 heading. Failing that, accepts the first of the
/// first five non-empty lines that is long enough to be a title and is not a
/// list item. Returns `None` when neither exists; callers substitute the
/// configured fallback title.
pub fn extract_title(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(caps) = heading1_regex().captures(line) {
            return Some(caps[1].trim().to_string());
        }
    }

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .take(TITLE_SCAN_WINDOW)
        .find(|line| line.len() > MIN_TITLE_LINE_LEN && !line.starts_with('-'))
        .map(|line| line.trim_matches('#').trim().to_string())
}

/// Strip draft labels and ordinal prefixes from a title.
///
/// Removes literal "Blog " labels and leading ordinals like "1 – " or
/// "3 - ". Runs to a fixed point, so cleaning an already-clean title is a
/// no-op and stacked prefixes ("1 - 2 - ...") do not survive a single call.
pub fn clean_title(title: &str) -> String {
    let mut current = title.trim().to_string();
    loop {
        let stripped = current.replace("Blog ", "").replace("blog ", "");
        let stripped = ordinal_prefix_regex().replace(&stripped, "").to_string();
        let stripped = stripped.trim().to_string();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

/// Derive a URL-safe slug from a cleaned title.
///
/// Lowercases, drops everything that is not a word character, whitespace, or
/// hyphen, collapses separator runs to single hyphens, trims the ends, and
/// truncates to `max_len` characters. Deterministic: equal titles always
/// yield equal slugs, and distinct titles that normalize to the same
/// characters collapse to the same slug.
pub fn derive_slug(title: &str, max_len: usize) -> String {
    let lowered = title.to_lowercase();
    let stripped = slug_strip_regex().replace_all(&lowered, "");
    let collapsed = slug_collapse_regex().replace_all(&stripped, "-");
    let trimmed = collapsed.trim_matches('-');

    trimmed
        .chars()
        .take(max_len)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}

/// Extract the excerpt: the text block immediately after the title heading.
///
/// Collects consecutive non-blank, non-heading lines following the first
/// level-1 heading, joined into a single line (frontmatter scalars must not
/// embed newlines). Returns `None` when the document has no heading or no
/// body follows it; callers fall back to the title.
pub fn extract_excerpt(text: &str, max_len: usize) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let heading_idx = lines.iter().position(|l| heading1_regex().is_match(l))?;

    let block: Vec<&str> = lines[heading_idx + 1..]
        .iter()
        .skip_while(|l| l.trim().is_empty())
        .take_while(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .map(|l| l.trim())
        .collect();

    if block.is_empty() {
        return None;
    }

    Some(truncate_excerpt(&block.join(" "), max_len))
}

/// Truncate to the excerpt bound, appending an ellipsis marker when cut.
pub fn truncate_excerpt(excerpt: &str, max_len: usize) -> String {
    if excerpt.chars().count() <= max_len {
        return excerpt.to_string();
    }
    let kept: String = excerpt.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

/// Classify the category from the lowercased title.
///
/// Single dispatch over [`CATEGORY_RULES`]; the first group with a matching
/// keyword wins, so a title mentioning both "heat pump" and "bill" lands in
/// home-upgrades. Titles matching nothing default to guides.
pub fn classify_category(title: &str) -> Category {
    let lowered = title.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Guides)
}

/// Derive the tag list: the base set plus keyword-triggered tags.
///
/// Insertion order follows [`TAG_RULES`]; duplicates are skipped.
pub fn derive_tags(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();
    let mut tags: Vec<String> = BASE_TAGS.iter().map(|t| t.to_string()).collect();

    for (keyword, tag) in TAG_RULES {
        if lowered.contains(keyword) && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    tags
}

/// Estimate reading time from the whitespace word count, clamped to
/// `[min, max]` minutes and formatted as "N min read".
pub fn estimate_read_time(text: &str, words_per_minute: usize, min: usize, max: usize) -> String {
    let words = text.split_whitespace().count();
    let minutes = (words / words_per_minute.max(1)).clamp(min, max);
    format!("{} min read", minutes)
}

/// Synthesize a publication date from the batch position.
///
/// Position 1 maps to the configured origin date; each later position
/// advances one day, so long batches roll over month ends correctly.
pub fn synthesize_date(batch: &BatchConfig, position: usize) -> String {
    let origin = batch.date_origin();
    let offset = position.saturating_sub(1) as u64;
    origin
        .checked_add_days(Days::new(offset))
        .unwrap_or(origin)
        .format("%Y-%m-%d")
        .to_string()
}

/// Infer complete metadata for one document.
///
/// `position` is the 1-based index within the batch; it drives the
/// synthesized date, the featured flag, and the slug of last resort.
/// Never fails: empty input produces all-fallback metadata.
pub fn infer_metadata(
    text: &str,
    position: usize,
    inference: &InferenceConfig,
    batch: &BatchConfig,
) -> Inference {
    let mut fallbacks = Vec::new();

    let title = match extract_title(text) {
        Some(raw) => {
            let cleaned = clean_title(&raw);
            if cleaned.is_empty() {
                fallbacks.push(Fallback::TitleCleaned);
                inference.fallback_title()
            } else {
                cleaned
            }
        }
        None => {
            fallbacks.push(Fallback::Title);
            inference.fallback_title()
        }
    };

    let mut slug = derive_slug(&title, inference.slug_max_len());
    if slug.is_empty() {
        slug = format!("blog-post-{}", position);
        fallbacks.push(Fallback::Slug(slug.clone()));
    }

    let excerpt = match extract_excerpt(text, inference.excerpt_max_len()) {
        Some(excerpt) => excerpt,
        None => {
            fallbacks.push(Fallback::Excerpt);
            truncate_excerpt(&title, inference.excerpt_max_len())
        }
    };

    let metadata = BlogMetadata {
        category: classify_category(&title),
        tags: derive_tags(&title),
        read_time: estimate_read_time(
            text,
            inference.words_per_minute(),
            inference.min_read_time(),
            inference.max_read_time(),
        ),
        date: synthesize_date(batch, position),
        featured: position <= batch.featured_count(),
        author: batch.author(),
        excerpt,
        slug,
        title,
    };

    Inference {
        metadata,
        fallbacks,
    }
}
