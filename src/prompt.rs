//! Prompt loading for a selected template.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::types::Template;

/// File holding the prompt inside each template directory.
pub const PROMPT_FILE_NAME: &str = "prompt.txt";

/// Anything that can turn a template into prompt text.
pub trait PromptSource {
    fn read_prompt(&self, template: &Template) -> Result<String, PromptError>;
}

/// Error while reading a template's prompt.
///
/// Always local and recoverable: the TUI shows it inline and keeps
/// browsing.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is empty", path.display())]
    Empty { path: PathBuf },
}

/// Reads `<root>/<template>/<file_name>` from disk.
#[derive(Debug, Clone)]
pub struct FilePromptSource {
    pub root: PathBuf,
    pub file_name: String,
}

impl FilePromptSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FilePromptSource {
            root: root.into(),
            file_name: PROMPT_FILE_NAME.to_string(),
        }
    }

    /// Path of the prompt file for a template. Pure, no I/O.
    pub fn prompt_path(&self, template: &Template) -> PathBuf {
        self.root.join(&template.name).join(&self.file_name)
    }
}

impl PromptSource for FilePromptSource {
    fn read_prompt(&self, template: &Template) -> Result<String, PromptError> {
        let path = self.prompt_path(template);
        info!(template = %template.name, prompt_file = %path.display(), "reading prompt");

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PromptError::NotFound { path });
            }
            Err(source) => return Err(PromptError::Read { path, source }),
        };

        if content.trim().is_empty() {
            return Err(PromptError::Empty { path });
        }

        debug!(template = %template.name, bytes = content.len(), "prompt read");
        Ok(content)
    }
}

// ============================================================================
// TESTS
// ============================================================================
