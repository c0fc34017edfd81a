//! Integration tests for the blogmill CLI.
//!
//! These spawn the real binary and check stdout/stderr, exit codes, and the
//! files left on disk.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn blogmill() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("blogmill"))
}

fn write_source(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).unwrap();
}

const DRAFT: &str = "# Smart Meter Reading Guide\n\nHow to read your smart meter display.\n\n## Display Basics\n\nPress the button.\n";

#[test]
fn test_process_batch_writes_files_and_summary() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_source(src.path(), "blog1.txt", DRAFT);
    write_source(src.path(), "blog2.txt", "# Loft Insulation Payback\n\nInsulation pays back fast.\n");

    blogmill()
        .args(["process", "blog1", "blog2"])
        .args(["--source-dir", src.path().to_str().unwrap()])
        .args(["--output-dir", out.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2/2 documents"))
        .stdout(predicate::str::contains("Created: 2025-01-01-smart-meter-reading-guide.md"));

    assert!(out.path().join("2025-01-01-smart-meter-reading-guide.md").exists());
    assert!(out.path().join("2025-01-02-loft-insulation-payback.md").exists());
}

#[test]
fn test_process_skips_missing_sources() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_source(src.path(), "blog1.txt", DRAFT);

    blogmill()
        .args(["process", "blog1", "blog9"])
        .args(["--source-dir", src.path().to_str().unwrap()])
        .args(["--output-dir", out.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1/2 documents (1 skipped, 0 failed)"))
        .stderr(predicate::str::contains("skipping: blog9"));
}

#[test]
fn test_process_without_ids_is_usage_error() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    blogmill()
        .args(["process"])
        .args(["--source-dir", src.path().to_str().unwrap()])
        .args(["--output-dir", out.path().to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No source identifiers given"));
}

#[test]
fn test_process_all_uses_sorted_listing() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_source(src.path(), "b.txt", "# Second Post Title Here\n\nBody two.\n");
    write_source(src.path(), "a.txt", "# First Post Title Here\n\nBody one.\n");

    blogmill()
        .args(["process", "--all"])
        .args(["--source-dir", src.path().to_str().unwrap()])
        .args(["--output-dir", out.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2/2 documents"));

    // Sorted order: "a" gets position 1 and the origin date.
    assert!(out.path().join("2025-01-01-first-post-title-here.md").exists());
    assert!(out.path().join("2025-01-02-second-post-title-here.md").exists());
}

#[test]
fn test_process_json_output() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_source(src.path(), "blog1.txt", DRAFT);

    let output = blogmill()
        .args(["process", "blog1", "--json"])
        .args(["--source-dir", src.path().to_str().unwrap()])
        .args(["--output-dir", out.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["attempted"], 1);
    assert_eq!(json["data"]["succeeded"], 1);
    assert_eq!(json["data"]["outcomes"][0]["status"], "written");
    assert_eq!(json["metadata"]["command"], "process");
}

#[test]
fn test_quiet_suppresses_per_file_chatter() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_source(src.path(), "blog1.txt", DRAFT);

    blogmill()
        .args(["--quiet", "process", "blog1"])
        .args(["--source-dir", src.path().to_str().unwrap()])
        .args(["--output-dir", out.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created:").not())
        .stdout(predicate::str::contains("Processed 1/1 documents"));
}

#[test]
fn test_infer_prints_metadata() {
    let src = TempDir::new().unwrap();
    write_source(src.path(), "blog1.txt", DRAFT);

    blogmill()
        .args(["infer", "blog1"])
        .args(["--source-dir", src.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Smart Meter Reading Guide"))
        .stdout(predicate::str::contains("Slug: smart-meter-reading-guide"))
        .stdout(predicate::str::contains("Category: energy"))
        .stdout(predicate::str::contains("smart-meters"));
}

#[test]
fn test_infer_missing_source_exits_not_found() {
    let src = TempDir::new().unwrap();

    blogmill()
        .args(["infer", "ghost"])
        .args(["--source-dir", src.path().to_str().unwrap()])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Source not found: ghost"));
}

#[test]
fn test_normalize_prints_canonical_body() {
    let src = TempDir::new().unwrap();
    let file = src.path().join("draft.md");
    std::fs::write(&file, "# Title\n* one\n• two\n\n\n\ntail").unwrap();

    blogmill()
        .args(["normalize", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("- one\n- two"))
        .stdout(predicate::str::contains("\n\n\n").not());
}

#[test]
fn test_normalize_write_rewrites_in_place() {
    let src = TempDir::new().unwrap();
    let file = src.path().join("draft.md");
    std::fs::write(&file, "* one\n* two").unwrap();

    blogmill()
        .args(["normalize", file.to_str().unwrap(), "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Normalized:"));

    let rewritten = std::fs::read_to_string(&file).unwrap();
    assert_eq!(rewritten, "- one\n- two");
}

#[test]
fn test_validate_clean_output_succeeds() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_source(src.path(), "blog1.txt", DRAFT);

    blogmill()
        .args(["process", "blog1"])
        .args(["--source-dir", src.path().to_str().unwrap()])
        .args(["--output-dir", out.path().to_str().unwrap()])
        .assert()
        .success();

    let written = out.path().join("2025-01-01-smart-meter-reading-guide.md");
    blogmill()
        .args(["validate", written.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn test_validate_flags_incomplete_document() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("bad.md");
    std::fs::write(&file, "---\ntitle: \"T\"\n---\n\n# One\n\n# Two\n").unwrap();

    blogmill()
        .args(["validate", file.to_str().unwrap()])
        .assert()
        .code(4)
        .stdout(predicate::str::contains("Missing or empty frontmatter field: date"))
        .stdout(predicate::str::contains("level-1 headings"))
        .stderr(predicate::str::contains("Validation failed"));
}
