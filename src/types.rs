//! Domain types for scaffold-ai.
//!
//! Plain data shared by the catalog, the gateway and the TUI.

use serde::Serialize;

// ============================================================================
// TEMPLATES
// ============================================================================

/// One selectable template, identified by its directory name.
///
/// Names are non-empty and unique within a run (they come from a
/// single directory listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    pub name: String,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Template { name: name.into() }
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Result of one dispatched generation request.
///
/// Produced exactly once per dispatch and consumed exactly once by the
/// state machine. Failures are already rendered to text: the TUI never
/// needs the typed error, only something to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Generated text from the backend.
    Text(String),
    /// Human-readable failure reason.
    Failure(String),
}

impl<E: std::fmt::Display> From<Result<String, E>> for GenerationOutcome {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(text) => GenerationOutcome::Text(text),
            Err(e) => GenerationOutcome::Failure(e.to_string()),
        }
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable pretty output.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// TESTS
// ============================================================================
