//! Blogmill content migration pipeline
//!
//! A batch CLI that turns raw blog drafts into frontmatter markdown posts.
//! Designed for deterministic, re-runnable migrations with per-document
//! fallbacks instead of failures.
//!
//! # Features
//!
//! - Metadata inference (title, slug, excerpt, category, tags, read time)
//! - Idempotent markdown body normalization
//! - Recovery of curated frontmatter embedded in drafts
//! - Skip-and-continue batch processing with a summary report

use anyhow::{anyhow, Result};
use blogmill::cli::{Cli, Commands};
use blogmill::commands::{normalize_file, validate_files, CommandExecutor};
use blogmill::config::BlogmillConfig;
use blogmill::errors;
use blogmill::output::{ExitCode, JsonOutput, OutputContext};
use blogmill::source::{DirSource, SourceStore};
use blogmill::validation::DocumentValidator;
use clap::Parser;
use std::path::PathBuf;

/// Helper to determine exit code from error message
fn error_to_exit_code(error: &anyhow::Error) -> ExitCode {
    // Check root cause for IO errors
    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => ExitCode::NotFound,
            std::io::ErrorKind::PermissionDenied => ExitCode::ExternalError,
            _ => ExitCode::ExternalError,
        };
    }

    let error_msg = error.to_string().to_lowercase();

    // Check error message patterns
    if error_msg.contains("not found") || error_msg.contains("no such file") {
        ExitCode::NotFound
    } else if error_msg.contains("validation failed") || error_msg.contains("no frontmatter") {
        ExitCode::ValidationFailed
    } else if error_msg.contains("no source identifiers") || error_msg.contains("invalid") {
        ExitCode::InvalidArgument
    } else if error_msg.contains("failed to write") || error_msg.contains("failed to create") {
        ExitCode::ExternalError
    } else {
        ExitCode::GenericError
    }
}

fn main() {
    let exit_code = match run() {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let quiet = cli.quiet;
    let config = BlogmillConfig::load(&cli.config)?;

    match cli.command {
        Commands::Process {
            ids,
            source_dir,
            output_dir,
            all,
            json,
        } => {
            let ctx = OutputContext::new(quiet, json);
            let source = DirSource::new(&source_dir);

            let ids = if ids.is_empty() && all {
                source.list_documents()?
            } else {
                ids
            };
            if ids.is_empty() {
                return Err(anyhow::Error::new(errors::no_sources_requested()));
            }

            let executor = CommandExecutor::new(source, config);
            let report = executor.process_batch(&ids, &output_dir, &ctx)?;

            if json {
                let output = JsonOutput::success(&report, "process");
                println!("{}", output.to_json_string()?);
            } else {
                ctx.print_data(format!(
                    "Processed {}/{} documents ({} skipped, {} failed)",
                    report.succeeded, report.attempted, report.skipped, report.failed
                ))?;
            }
        }

        Commands::Infer {
            id,
            source_dir,
            json,
        } => {
            let source = DirSource::new(&source_dir);
            if !source.contains(&id) {
                return Err(anyhow::Error::new(errors::source_not_found(&id, &source_dir)));
            }
            let executor = CommandExecutor::new(source, config);
            let post = executor.infer_document(&id)?;

            if json {
                let output = JsonOutput::success(
                    serde_json::json!({
                        "id": id,
                        "filename": post.filename,
                        "metadata": post.metadata,
                        "notes": post.notes,
                    }),
                    "infer",
                );
                println!("{}", output.to_json_string()?);
            } else {
                println!("Inferred metadata for {}", id);
                println!("  Title: {}", post.metadata.title);
                println!("  Slug: {}", post.metadata.slug);
                println!("  Category: {}", post.metadata.category);
                println!("  Tags: {}", post.metadata.tags.join(", "));
                println!("  Date: {}", post.metadata.date);
                println!("  Read time: {}", post.metadata.read_time);
                println!("  Featured: {}", post.metadata.featured);
                println!("  Excerpt: {}", post.metadata.excerpt);
                println!("  Output file: {}", post.filename);
                for note in &post.notes {
                    println!("  Note: {}", note);
                }
            }
        }

        Commands::Normalize { file, write } => {
            let ctx = OutputContext::new(quiet, false);
            let normalized = normalize_file(&file, write)?;
            if write {
                ctx.print_success(format!("Normalized: {}", file.display()))?;
            } else {
                ctx.print_data(normalized)?;
            }
        }

        Commands::Validate { files, json } => {
            if files.is_empty() {
                return Err(anyhow!("Invalid arguments: no files to validate"));
            }
            run_validate(&files, &config, quiet, json)?;
        }
    }

    Ok(())
}

fn run_validate(files: &[PathBuf], config: &BlogmillConfig, quiet: bool, json: bool) -> Result<()> {
    let ctx = OutputContext::new(quiet, json);
    let validator = DocumentValidator::new(config.inference());

    let reports = validate_files(files, &validator, &ctx)?;
    let total_warnings: usize = reports.iter().map(|r| r.warnings.len()).sum();

    if json {
        let output = JsonOutput::success(
            serde_json::json!({
                "files": reports,
                "total_warnings": total_warnings,
            }),
            "validate",
        );
        println!("{}", output.to_json_string()?);
    }

    if total_warnings > 0 {
        return Err(anyhow!(
            "Validation failed: {} warning(s) across {} file(s)",
            total_warnings,
            files.len()
        ));
    }

    Ok(())
}
