//! PDF document loader: one text unit per page, in page order.

use std::path::Path;

use lopdf::Document;
use ragify_core::{ContextError, DocumentLoader};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<String>, ContextError> {
        if !path.exists() {
            return Err(ContextError::Missing {
                path: path.to_path_buf(),
            });
        }

        let unreadable = |reason: String| ContextError::Unreadable {
            path: path.to_path_buf(),
            reason,
        };

        let document = Document::load(path).map_err(|e| unreadable(e.to_string()))?;
        let pages = document.get_pages();

        let mut units = Vec::with_capacity(pages.len());
        for number in pages.keys() {
            let text = document
                .extract_text(&[*number])
                .map_err(|e| unreadable(format!("page {number}: {e}")))?;
            units.push(text);
        }

        debug!(file = %path.display(), pages = units.len(), "Extracted PDF text");
        Ok(units)
    }
}
