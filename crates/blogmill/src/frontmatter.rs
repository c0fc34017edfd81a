//! Frontmatter parsing, recovery, and assembly.
//!
//! Some migrated documents arrive with a curated `---` frontmatter block
//! already embedded; those fields win over inference. This module detects
//! and cleans such blocks, and serializes final metadata in a fixed field
//! order so output stays diffable and parseable by the blog renderer.

use crate::domain::{BlogMetadata, Category};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)---\s*\n(.*?)\n---\s*\n(.*)").expect("Frontmatter regex should compile")
    })
}

static TAGS_REGEX: OnceLock<Regex> = OnceLock::new();

fn tags_regex() -> &'static Regex {
    TAGS_REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*tags:\s*\[([^\]]*)\]").expect("Tags regex should compile")
    })
}

/// Split a document into its embedded frontmatter block and content.
///
/// Returns `None` when no delimited block exists. Text before the block
/// (draft labels, export junk) is discarded, matching how curated documents
/// are laid out.
pub fn split_document(text: &str) -> Option<(String, String)> {
    let caps = frontmatter_regex().captures(text)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Clean a recovered frontmatter block.
///
/// Trims each line, drops blank lines and `#` comment lines, and strips
/// stray bold/italic markers that word processors leave inside field values.
pub fn clean_block(block: &str) -> String {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.replace("**", "").replace('*', ""))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Look up a scalar field in a frontmatter block, unquoting the value.
pub fn field(block: &str, key: &str) -> Option<String> {
    let pattern = format!(r#"(?m)^\s*{}:\s*["']?([^"'\n]+)["']?"#, regex::escape(key));
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(block)?;
    let value = caps[1].trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Look up the bracketed tag list in a frontmatter block.
pub fn tags_field(block: &str) -> Option<Vec<String>> {
    let caps = tags_regex().captures(block)?;
    let tags: Vec<String> = caps[1]
        .split(',')
        .map(|t| t.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|t| !t.is_empty())
        .collect();
    (!tags.is_empty()).then_some(tags)
}

/// Merge a recovered frontmatter block over inferred metadata.
///
/// Each recovered field replaces its inferred counterpart when present and
/// well-formed; malformed values (bad date, unknown category) fall back to
/// the inferred value with a note. The result always re-serializes through
/// [`assemble_document`], so recovered documents get the same fixed field
/// order as inferred ones.
pub fn merge_recovered(block: &str, inferred: &BlogMetadata) -> (BlogMetadata, Vec<String>) {
    let mut merged = inferred.clone();
    let mut notes = Vec::new();

    if let Some(title) = field(block, "title") {
        merged.title = title;
    }

    if let Some(date) = field(block, "date") {
        if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok() {
            merged.date = date;
        } else {
            notes.push(format!(
                "frontmatter date {:?} is not YYYY-MM-DD; using {}",
                date, merged.date
            ));
        }
    }

    if let Some(excerpt) = field(block, "excerpt") {
        merged.excerpt = excerpt;
    }
    if let Some(tags) = tags_field(block) {
        merged.tags = tags;
    }
    if let Some(slug) = field(block, "slug") {
        merged.slug = slug;
    }
    if let Some(author) = field(block, "author") {
        merged.author = author;
    }
    if let Some(read_time) = field(block, "readTime") {
        merged.read_time = read_time;
    }

    if let Some(category) = field(block, "category") {
        match category.parse::<Category>() {
            Ok(parsed) => merged.category = parsed,
            Err(e) => notes.push(format!("{}; using {}", e, merged.category)),
        }
    }

    if let Some(featured) = field(block, "featured") {
        match featured.as_str() {
            "true" => merged.featured = true,
            "false" => merged.featured = false,
            other => notes.push(format!(
                "frontmatter featured {:?} is not true/false; using {}",
                other, merged.featured
            )),
        }
    }

    (merged, notes)
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// Serialize metadata and body into the final document.
///
/// Field order is fixed (title, date, excerpt, tags, slug, author, readTime,
/// category, featured) across all documents.
pub fn assemble_document(metadata: &BlogMetadata, body: &str) -> String {
    let tags = metadata
        .tags
        .iter()
        .map(|t| quote(t))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "---\ntitle: {}\ndate: {}\nexcerpt: {}\ntags: [{}]\nslug: {}\nauthor: {}\nreadTime: {}\ncategory: {}\nfeatured: {}\n---\n\n{}",
        quote(&metadata.title),
        quote(&metadata.date),
        quote(&metadata.excerpt),
        tags,
        quote(&metadata.slug),
        quote(&metadata.author),
        quote(&metadata.read_time),
        quote(metadata.category.as_str()),
        metadata.featured,
        body.trim()
    )
}
