//! Actionable error formatting for improved user experience.
//!
//! This module provides utilities for creating error messages with:
//! - Clear error description
//! - Possible causes (diagnostics)
//! - Remediation steps (actionable fixes)
//!
//! Designed to help users understand what went wrong and how to fix it.

use std::fmt;
use std::path::Path;

/// An error with diagnostic context and remediation steps.
///
/// This struct wraps an error message with additional context to help users
/// diagnose and fix the problem.
///
/// # Example
///
/// ```
/// use blogmill::errors::ActionableError;
///
/// let error = ActionableError::new("Source not found: blog9")
///     .with_cause("The file may use a different extension")
///     .with_remedy("List available sources: ls <source-dir>");
///
/// eprintln!("{}", error);
/// ```
#[derive(Debug, Clone)]
pub struct ActionableError {
    /// The main error message
    error: String,
    /// Possible causes (diagnostic hints)
    causes: Vec<String>,
    /// Remediation steps (how to fix)
    remediation: Vec<String>,
}

impl ActionableError {
    /// Create a new actionable error with the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            causes: Vec::new(),
            remediation: Vec::new(),
        }
    }

    /// Add a possible cause (diagnostic hint).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a remediation step (actionable fix).
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remediation.push(remedy.into());
        self
    }

    /// Convert to a formatted error message suitable for display.
    pub fn to_error_message(&self) -> String {
        let mut msg = format!("Error: {}\n", self.error);

        if !self.causes.is_empty() {
            msg.push_str("\nPossible causes:\n");
            for cause in &self.causes {
                msg.push_str(&format!("  • {}\n", cause));
            }
        }

        if !self.remediation.is_empty() {
            msg.push_str("\nTo fix:\n");
            for remedy in &self.remediation {
                msg.push_str(&format!("  • {}\n", remedy));
            }
        }

        msg
    }
}

impl fmt::Display for ActionableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error_message())
    }
}

impl std::error::Error for ActionableError {}

/// Helper to create source-not-found errors with standard remediation.
pub fn source_not_found(id: &str, source_dir: &Path) -> ActionableError {
    ActionableError::new(format!("Source not found: {}", id))
        .with_cause("The document may not have been exported yet")
        .with_cause("The identifier may not match the filename stem")
        .with_remedy(format!(
            "List available sources: blogmill process --all --source-dir {} --output-dir <dir>",
            source_dir.display()
        ))
        .with_remedy(format!(
            "Check the directory contents: ls {}",
            source_dir.display()
        ))
}

/// Helper to create output-directory errors with standard remediation.
pub fn output_dir_unavailable(path: &Path) -> ActionableError {
    ActionableError::new(format!("Cannot create output directory: {}", path.display()))
        .with_cause("A parent directory may be missing or read-only")
        .with_cause("A file may already exist at this path")
        .with_remedy(format!("Create the parents manually: mkdir -p {}", path.display()))
        .with_remedy("Check permissions on the parent directory")
}

/// Helper for a process invocation that names no sources.
pub fn no_sources_requested() -> ActionableError {
    ActionableError::new("No source identifiers given")
        .with_cause("process was invoked without ids and without --all")
        .with_remedy("Name the documents to migrate: blogmill process blog1 blog2 ...")
        .with_remedy("Or migrate everything in the source directory: blogmill process --all")
}
