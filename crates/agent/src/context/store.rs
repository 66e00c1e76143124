//! Context store: the grounding document, extracted once.
//!
//! Every pass asks for the grounding text, so extraction is memoized in a
//! `tokio::sync::OnceCell`: concurrent first callers wait on a single load,
//! later callers get the cached `Arc<str>`. Failures are not cached, so a
//! document that appears later is picked up on the next pass.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ragify_core::{ContextError, DocumentLoader};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::context::loader::PlainTextLoader;
use crate::context::pdf::PdfLoader;

const UNIT_SEPARATOR: &str = "\n\n";

/// Holds the grounding document text for the lifetime of the process.
pub struct ContextStore {
    path: PathBuf,
    loader: Arc<dyn DocumentLoader>,
    cached: OnceCell<Arc<str>>,
}

impl ContextStore {
    /// Create a store for `path` using a custom extractor.
    pub fn new(path: impl Into<PathBuf>, loader: Arc<dyn DocumentLoader>) -> Self {
        Self {
            path: path.into(),
            loader,
            cached: OnceCell::new(),
        }
    }

    /// Create a store reading a plain-text export of the document.
    pub fn plain_text(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Arc::new(PlainTextLoader))
    }

    /// Create a store whose extractor matches the file extension: PDF for
    /// `.pdf`, plain text for everything else.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            Self::new(path, Arc::new(PdfLoader))
        } else {
            Self::plain_text(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used when introducing the document to the model.
    pub fn document_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// The grounding text: all extracted units in source order, joined by a
    /// blank line and trimmed.
    ///
    /// The document's presence is checked on every call, even when cached.
    pub async fn grounding_context(&self) -> Result<Arc<str>, ContextError> {
        if !self.path.exists() {
            warn!(file = %self.path.display(), "Knowledge base document is missing");
            return Err(ContextError::Missing {
                path: self.path.clone(),
            });
        }

        let text = self
            .cached
            .get_or_try_init(|| async {
                let units = self.loader.load(&self.path)?;
                let text = join_units(&units);
                info!(
                    file = %self.path.display(),
                    units = units.len(),
                    chars = text.len(),
                    "Loaded knowledge base"
                );
                Ok::<_, ContextError>(Arc::from(text))
            })
            .await?;

        Ok(Arc::clone(text))
    }
}

fn join_units(units: &[String]) -> String {
    units.join(UNIT_SEPARATOR).trim().to_string()
}
