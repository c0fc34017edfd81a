//! Command-line interface definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blogmill content migration pipeline
///
/// Turns raw blog drafts (text extracted from word-processor documents) into
/// well-formed markdown posts with frontmatter, ready for the blog renderer.
/// Designed for deterministic, re-runnable batch migrations.
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments or usage error
///   3  - Resource not found (source document, config file, etc.)
///   4  - Validation failed (missing fields, bad structure)
///  10  - External dependency failed (file system, etc.)
#[derive(Parser)]
#[command(name = "blogmill")]
#[command(about = "Blog content migration pipeline", long_about = None)]
pub struct Cli {
    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, default_value = "blogmill.toml", value_name = "FILE")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Migrate a batch of source documents into frontmatter markdown
    ///
    /// Identifiers are processed strictly in the order given; the 1-based
    /// position drives the synthesized date and the featured flag. Missing
    /// sources are skipped with a warning rather than aborting the batch.
    /// Output files are named `<date>-<slug>.md`; a collision overwrites
    /// the existing file silently.
    Process {
        /// Ordered source identifiers (filename stems in the source directory)
        ids: Vec<String>,

        /// Directory containing raw source documents
        #[arg(long, value_name = "DIR")]
        source_dir: PathBuf,

        /// Directory the markdown files are written into (created if absent)
        #[arg(long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Process every document in the source directory, in sorted order
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the metadata the pipeline would infer for one document
    Infer {
        /// Source identifier (filename stem in the source directory)
        id: String,

        /// Directory containing raw source documents
        #[arg(long, value_name = "DIR")]
        source_dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize the markdown body of a file
    ///
    /// An existing frontmatter block is preserved untouched; only the body
    /// is rewritten. Normalization is idempotent, so re-running over
    /// already-normalized files changes nothing.
    Normalize {
        /// File to normalize
        file: PathBuf,

        /// Rewrite the file in place instead of printing to stdout
        #[arg(long)]
        write: bool,
    },

    /// Validate written blog documents against the output contract
    Validate {
        /// Documents to check
        files: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
