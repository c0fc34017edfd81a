//! Command execution logic for all CLI operations.
//!
//! The `CommandExecutor` holds the source provider and configuration and
//! implements the pipeline commands: batch processing, single-document
//! inference, and body normalization. Batch processing is strictly
//! sequential with no shared state between documents; the report is a pure
//! fold over per-document outcomes.

use crate::config::BlogmillConfig;
use crate::domain::BlogMetadata;
use crate::frontmatter;
use crate::markdown;
use crate::metadata::{self, Inference};
use crate::output::OutputContext;
use crate::source::SourceStore;
use crate::validation::DocumentValidator;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A fully rendered post, ready to write.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    /// Output filename, `<date>-<slug>.md`
    pub filename: String,
    /// Complete document text: frontmatter block plus normalized body
    pub document: String,
    /// The metadata serialized into the document
    pub metadata: BlogMetadata,
    /// Soft signals: fallbacks used and recovered fields rejected
    pub notes: Vec<String>,
}

/// Outcome of one document within a batch.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    /// Source identifier as given by the caller
    pub id: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
    /// Soft signals recorded while rendering
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Terminal status of one batch item.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Output file written (silently replacing any previous file with the
    /// same date and slug)
    Written { filename: String },
    /// Source document absent; item skipped, batch continued
    Skipped { reason: String },
    /// Rendering or writing failed; item dropped, batch continued
    Failed { reason: String },
}

/// Summary of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Number of identifiers attempted
    pub attempted: usize,
    /// Number of output files written
    pub succeeded: usize,
    /// Number of identifiers skipped (source missing)
    pub skipped: usize,
    /// Number of identifiers that failed to render or write
    pub failed: usize,
    /// Per-identifier outcomes, in batch order
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    /// Fold the outcome list into counts.
    fn from_outcomes(outcomes: Vec<DocumentOutcome>) -> Self {
        let succeeded = outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Written { .. }))
            .count();
        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Skipped { .. }))
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Failed { .. }))
            .count();
        Self {
            attempted: outcomes.len(),
            succeeded,
            skipped,
            failed,
            outcomes,
        }
    }
}

/// Executes pipeline commands against a source provider.
pub struct CommandExecutor<S: SourceStore> {
    source: S,
    config: BlogmillConfig,
}

impl<S: SourceStore> CommandExecutor<S> {
    /// Create an executor over the given provider and configuration.
    pub fn new(source: S, config: BlogmillConfig) -> Self {
        Self { source, config }
    }

    /// Render one document into its final form.
    ///
    /// `position` is the 1-based batch index, used for the synthesized date,
    /// the featured flag, and the slug of last resort. Documents that arrive
    /// with an embedded frontmatter block keep their curated fields;
    /// inference fills whatever the block lacks. Rendering never fails for
    /// malformed content, only for unreadable sources.
    pub fn render_document(&self, id: &str, position: usize) -> Result<RenderedPost> {
        let text = self.source.read_document(id)?;
        let inference_config = self.config.inference();
        let batch_config = self.config.batch();

        let (metadata, body, notes) = match frontmatter::split_document(&text) {
            Some((block, content)) => {
                let block = frontmatter::clean_block(&block);
                let inferred =
                    metadata::infer_metadata(&content, position, &inference_config, &batch_config);
                let (merged, mut notes) = frontmatter::merge_recovered(&block, &inferred.metadata);

                // A fallback only matters if the block did not supply the field.
                notes.extend(
                    inferred
                        .fallbacks
                        .iter()
                        .filter(|f| frontmatter::field(&block, f.field()).is_none())
                        .map(|f| f.to_string()),
                );
                (merged, content, notes)
            }
            None => {
                let Inference {
                    metadata,
                    fallbacks,
                } = metadata::infer_metadata(&text, position, &inference_config, &batch_config);
                let notes = fallbacks.iter().map(|f| f.to_string()).collect();
                (metadata, text, notes)
            }
        };

        let body = markdown::normalize_markdown(&body);
        let document = frontmatter::assemble_document(&metadata, &body);
        let filename = format!("{}-{}.md", metadata.date, metadata.slug);

        Ok(RenderedPost {
            filename,
            document,
            metadata,
            notes,
        })
    }

    /// Render one document without writing it (the `infer` command).
    pub fn infer_document(&self, id: &str) -> Result<RenderedPost> {
        self.render_document(id, 1)
    }

    /// Process an ordered batch of source identifiers.
    ///
    /// Strictly sequential: each document is read, transformed, and written
    /// before the next begins. Missing sources are skipped with a warning
    /// and render/write failures drop only that item; the sole batch-fatal
    /// error is an output directory that cannot be created. Filename
    /// collisions within a batch overwrite silently.
    pub fn process_batch(
        &self,
        ids: &[String],
        output_dir: &Path,
        ctx: &OutputContext,
    ) -> Result<BatchReport> {
        if ids.is_empty() {
            bail!("No source identifiers given");
        }

        fs::create_dir_all(output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_dir.display()
            )
        })?;

        let mut outcomes = Vec::new();
        for (index, id) in ids.iter().enumerate() {
            let position = index + 1;
            outcomes.push(self.process_one(id, position, output_dir, ctx)?);
        }

        Ok(BatchReport::from_outcomes(outcomes))
    }

    fn process_one(
        &self,
        id: &str,
        position: usize,
        output_dir: &Path,
        ctx: &OutputContext,
    ) -> Result<DocumentOutcome> {
        if !self.source.contains(id) {
            ctx.print_warning(format!("Source not found, skipping: {}", id))?;
            return Ok(DocumentOutcome {
                id: id.to_string(),
                status: OutcomeStatus::Skipped {
                    reason: "source not found".to_string(),
                },
                notes: Vec::new(),
            });
        }

        let post = match self.render_document(id, position) {
            Ok(post) => post,
            Err(e) => {
                ctx.print_error(format!("Failed to process {}: {:#}", id, e))?;
                return Ok(DocumentOutcome {
                    id: id.to_string(),
                    status: OutcomeStatus::Failed {
                        reason: format!("{:#}", e),
                    },
                    notes: Vec::new(),
                });
            }
        };

        let path = output_dir.join(&post.filename);
        if let Err(e) = fs::write(&path, &post.document)
            .with_context(|| format!("Failed to write output file: {}", path.display()))
        {
            ctx.print_error(format!("{:#}", e))?;
            return Ok(DocumentOutcome {
                id: id.to_string(),
                status: OutcomeStatus::Failed {
                    reason: format!("{:#}", e),
                },
                notes: post.notes,
            });
        }

        ctx.print_success(format!("Created: {}", post.filename))?;
        for note in &post.notes {
            ctx.print_info(format!("  note: {}", note))?;
        }

        Ok(DocumentOutcome {
            id: id.to_string(),
            status: OutcomeStatus::Written {
                filename: post.filename,
            },
            notes: post.notes,
        })
    }
}

/// Normalize a markdown file in place or to stdout (the `normalize` command).
///
/// Frontmatter, when present, is preserved untouched; only the body is
/// rewritten.
pub fn normalize_file(path: &Path, write: bool) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let normalized = match frontmatter::split_document(&text) {
        Some((block, body)) => format!(
            "---\n{}\n---\n\n{}",
            block.trim(),
            markdown::normalize_markdown(&body)
        ),
        None => markdown::normalize_markdown(&text),
    };

    if write {
        fs::write(path, &normalized)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
    }

    Ok(normalized)
}

/// Validation result for one file (the `validate` command).
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Path as given by the caller
    pub file: String,
    /// Contract violations found, empty when clean
    pub warnings: Vec<String>,
}

/// Validate written documents against the output contract.
///
/// Unreadable files and files with no frontmatter block at all are hard
/// errors; everything else is collected as per-file warnings for the caller
/// to report.
pub fn validate_files(
    files: &[PathBuf],
    validator: &DocumentValidator,
    ctx: &OutputContext,
) -> Result<Vec<FileReport>> {
    let mut reports = Vec::new();

    for file in files {
        let text = fs::read_to_string(file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;
        let warnings = validator
            .validate(&text)
            .with_context(|| format!("Validation failed for {}", file.display()))?;

        if warnings.is_empty() {
            ctx.print_info(format!("ok: {}", file.display()))?;
        } else {
            ctx.print_data(format!("{}:", file.display()))?;
            for warning in &warnings {
                ctx.print_data(format!("  {}", warning))?;
            }
        }

        reports.push(FileReport {
            file: file.display().to_string(),
            warnings,
        });
    }

    Ok(reports)
}
