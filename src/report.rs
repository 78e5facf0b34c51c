//! Catalog listing for the `list` command.
//!
//! `catalog_entries` does the prompt reads. Formatting is pure:
//! (entries, OutputFormat) → String.

use humansize::{BINARY, format_size};
use serde::Serialize;

use crate::prompt::PromptSource;
use crate::types::{OutputFormat, Template};

/// One template and whether its prompt is usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Prompt size in bytes, when the prompt could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_bytes: Option<usize>,
    /// Why the prompt cannot be used, when it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_error: Option<String>,
}

/// Probe every template's prompt.
pub fn catalog_entries(templates: &[Template], prompts: &dyn PromptSource) -> Vec<CatalogEntry> {
    templates
        .iter()
        .map(|template| match prompts.read_prompt(template) {
            Ok(prompt) => CatalogEntry {
                name: template.name.clone(),
                prompt_bytes: Some(prompt.len()),
                prompt_error: None,
            },
            Err(e) => CatalogEntry {
                name: template.name.clone(),
                prompt_bytes: None,
                prompt_error: Some(e.to_string()),
            },
        })
        .collect()
}

/// Format catalog entries for output.
pub fn format_catalog(entries: &[CatalogEntry], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Human => Ok(format_human(entries)),
        OutputFormat::Json => serde_json::to_string_pretty(entries),
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_human(entries: &[CatalogEntry]) -> String {
    if entries.is_empty() {
        return "No templates found.\n".to_string();
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = String::new();

    out.push_str("=== Templates ===\n");
    for entry in entries {
        let status = match (&entry.prompt_bytes, &entry.prompt_error) {
            (Some(bytes), _) => format!("prompt {}", format_size(*bytes, BINARY)),
            (None, Some(error)) => format!("unusable: {}", error),
            (None, None) => "unknown".to_string(),
        };
        out.push_str(&format!("  {:<width$}  {}\n", entry.name, status, width = width));
    }

    let usable = entries.iter().filter(|e| e.prompt_bytes.is_some()).count();
    out.push('\n');
    out.push_str(&format!("Usable: {}/{}\n", usable, entries.len()));

    out
}

// ============================================================================
// TESTS
// ============================================================================
