//! Markdown body normalization.
//!
//! An ordered sequence of small, composable passes. Every pass is total and
//! idempotent: applying it to its own output changes nothing. That lets the
//! pipeline re-run over already-migrated documents without churning diffs,
//! which is also a tested property of the composed [`normalize_markdown`].

use regex::Regex;
use std::sync::OnceLock;

/// How many preceding non-blank lines are searched for an H2 when deciding
/// whether to promote an H3.
const HEADING_CONTEXT_WINDOW: usize = 5;

static DRAFT_LABEL_REGEX: OnceLock<Regex> = OnceLock::new();

fn draft_label_regex() -> &'static Regex {
    DRAFT_LABEL_REGEX.get_or_init(|| {
        Regex::new(r"(?m)^Blog\s+\d+\s*[–-]\s*[^\n]+\n?").expect("Draft label regex should compile")
    })
}

static BULLET_REGEX: OnceLock<Regex> = OnceLock::new();

fn bullet_regex() -> &'static Regex {
    BULLET_REGEX.get_or_init(|| Regex::new(r"(?m)^[*•]\s+").expect("Bullet regex should compile"))
}

static NUMBERED_REGEX: OnceLock<Regex> = OnceLock::new();

fn numbered_regex() -> &'static Regex {
    NUMBERED_REGEX
        .get_or_init(|| Regex::new(r"(?m)^(\d+)\.\s+").expect("Numbered regex should compile"))
}

static BLANK_RUN_REGEX: OnceLock<Regex> = OnceLock::new();

fn blank_run_regex() -> &'static Regex {
    BLANK_RUN_REGEX.get_or_init(|| Regex::new(r"\n{3,}").expect("Blank run regex should compile"))
}

/// Heading level of a line (`# x` is 1, `## x` is 2), or `None` for
/// non-heading lines. Requires the space after the hashes.
fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 {
        return None;
    }
    line[hashes..].starts_with(' ').then_some(hashes)
}

/// Drop `Blog N – Title` draft label lines left over from word-processor
/// exports.
pub fn strip_draft_labels(body: &str) -> String {
    draft_label_regex().replace_all(body, "").into_owned()
}

/// Normalize heading structure.
///
/// Demotes every level-1 heading after the first to level-2, promotes a
/// level-3 heading to level-2 when none of the last few non-blank lines is a
/// level-2 heading, and surrounds each heading with single blank lines.
/// Blank insertion and the non-blank promotion window both skip work that is
/// already done, keeping the pass idempotent.
pub fn fix_headings(body: &str) -> String {
    let lines: Vec<&str> = body.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut h1_seen = false;

    for (i, raw) in lines.iter().enumerate() {
        let Some(level) = heading_level(raw) else {
            out.push(raw.to_string());
            continue;
        };

        if let Some(prev) = out.last() {
            if !prev.trim().is_empty() {
                out.push(String::new());
            }
        }

        let line = match level {
            1 if h1_seen => format!("#{}", raw),
            1 => {
                h1_seen = true;
                raw.to_string()
            }
            3 if !recent_h2(&out) => raw[1..].to_string(),
            _ => raw.to_string(),
        };
        out.push(line);

        let next_is_blank = lines
            .get(i + 1)
            .map(|l| l.trim().is_empty())
            .unwrap_or(true);
        if !next_is_blank {
            out.push(String::new());
        }
    }

    out.join("\n")
}

/// Whether a level-2 heading appears among the last few non-blank emitted
/// lines.
fn recent_h2(out: &[String]) -> bool {
    out.iter()
        .rev()
        .filter(|l| !l.trim().is_empty())
        .take(HEADING_CONTEXT_WINDOW)
        .any(|l| heading_level(l) == Some(2))
}

/// Canonicalize list markers: `*` and `•` bullets become `-`, numbered
/// markers keep their numbers but get exactly one space after the dot.
pub fn fix_lists(body: &str) -> String {
    let body = bullet_regex().replace_all(body, "- ");
    numbered_regex().replace_all(&body, "$1. ").into_owned()
}

/// Collapse runs of three or more newlines to a single blank line.
pub fn collapse_blank_lines(body: &str) -> String {
    blank_run_regex().replace_all(body, "\n\n").into_owned()
}

/// Ensure blank lines around block elements.
///
/// A blockquote that follows non-blank, non-quote text gets a blank line
/// before it; continuation lines inside a quote are left attached. Fenced
/// code blocks get a blank line before the opening fence and after the
/// closing fence, inserted only when missing.
pub fn fix_block_spacing(body: &str) -> String {
    let lines: Vec<&str> = body.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;

    for (i, raw) in lines.iter().enumerate() {
        let is_fence = raw.starts_with("```");

        if is_fence && !in_fence {
            if let Some(prev) = out.last() {
                if !prev.trim().is_empty() {
                    out.push(String::new());
                }
            }
            out.push(raw.to_string());
            in_fence = true;
            continue;
        }

        if is_fence && in_fence {
            out.push(raw.to_string());
            in_fence = false;
            let next_is_blank = lines
                .get(i + 1)
                .map(|l| l.trim().is_empty())
                .unwrap_or(true);
            if !next_is_blank {
                out.push(String::new());
            }
            continue;
        }

        if !in_fence && raw.starts_with('>') {
            if let Some(prev) = out.last() {
                if !prev.trim().is_empty() && !prev.starts_with('>') {
                    out.push(String::new());
                }
            }
        }

        out.push(raw.to_string());
    }

    out.join("\n")
}

/// Drop a title line duplicated at the top of the body.
///
/// Word-processor exports often carry the title both as a heading and as a
/// repeated plain line. While the first two lines are identical after
/// trimming, the first is dropped; the loop handles three-fold repeats
/// without breaking idempotence. Fence lines are never dropped: removing
/// one would flip fence parity for the spacing pass.
pub fn drop_duplicate_title(body: &str) -> String {
    let mut lines: Vec<&str> = body.split('\n').collect();
    while lines.len() > 1 {
        let first = lines[0].trim();
        if first.starts_with("```") || first != lines[1].trim() {
            break;
        }
        lines.remove(0);
    }
    lines.join("\n")
}

/// Apply all normalization passes in order and trim the result.
pub fn normalize_markdown(body: &str) -> String {
    let body = strip_draft_labels(body);
    let body = fix_headings(&body);
    let body = fix_lists(&body);
    let body = collapse_blank_lines(&body);
    let body = fix_block_spacing(&body);
    let body = drop_duplicate_title(&body);
    body.trim().to_string()
}
