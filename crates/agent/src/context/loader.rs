//! Plain-text document loader.
//!
//! Reads a UTF-8 export of the knowledge base. Pages are separated by
//! form-feed characters (`\x0c`), the convention used by most PDF-to-text
//! tools, so each page becomes one text unit.

use std::io::ErrorKind;
use std::path::Path;

use ragify_core::{ContextError, DocumentLoader};
use tracing::debug;

const PAGE_BREAK: char = '\x0c';

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextLoader;

impl DocumentLoader for PlainTextLoader {
    fn load(&self, path: &Path) -> Result<Vec<String>, ContextError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ContextError::Missing {
                path: path.to_path_buf(),
            },
            _ => ContextError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        let pages: Vec<String> = content.split(PAGE_BREAK).map(str::to_string).collect();
        debug!(file = %path.display(), pages = pages.len(), "Extracted document text");
        Ok(pages)
    }
}
