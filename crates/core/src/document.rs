//! Document extraction seam.
//!
//! A loader maps a document path to its extracted text units (pages), in
//! source order. The context store joins and caches them.

use std::path::Path;

use crate::error::ContextError;

pub trait DocumentLoader: Send + Sync {
    /// Extract the text units of the document at `path`.
    fn load(&self, path: &Path) -> std::result::Result<Vec<String>, ContextError>;
}
