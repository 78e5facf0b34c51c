//! Template discovery.
//!
//! A template is a sub-directory of the templates root. The catalog is
//! read once at startup and never changes afterwards.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::types::Template;

/// Default templates root, relative to the working directory.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Anything that can provide the ordered list of templates.
pub trait TemplateSource {
    fn templates(&self) -> Result<Vec<Template>, CatalogError>;
}

/// Error while listing templates.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("templates root is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot read templates root {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Templates backed by the immediate sub-directories of `root`.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    pub root: PathBuf,
    /// Include directories whose name starts with a dot.
    pub include_hidden: bool,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryCatalog {
            root: root.into(),
            include_hidden: false,
        }
    }
}

impl TemplateSource for DirectoryCatalog {
    fn templates(&self) -> Result<Vec<Template>, CatalogError> {
        list_templates(&self.root, self.include_hidden)
    }
}

/// List template directories under `root`, sorted by name.
///
/// A missing root is an empty catalog, not an error.
///
/// # Errors
/// Returns an error if `root` exists but is not a readable directory.
pub fn list_templates(root: &Path, include_hidden: bool) -> Result<Vec<Template>, CatalogError> {
    if !root.exists() {
        warn!(root = %root.display(), "templates root not found, catalog is empty");
        return Ok(Vec::new());
    }
    if !root.is_dir() {
        return Err(CatalogError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut templates = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| CatalogError::Unreadable {
            path: root.to_path_buf(),
            source: e.into(),
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping template with non UTF-8 name");
            continue;
        };

        if !include_hidden && name.starts_with('.') {
            continue;
        }

        templates.push(Template::new(name));
    }

    debug!(root = %root.display(), count = templates.len(), "templates listed");
    Ok(templates)
}

// ============================================================================
// TESTS
// ============================================================================
