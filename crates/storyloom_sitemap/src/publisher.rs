//! File-level sitemap publication.

use crate::document::{parse_document, render_document};
use crate::merge::merge_entries;
use std::path::PathBuf;
use storyloom_error::{SitemapError, SitemapErrorKind, StoryloomResult};
use tracing::{debug, info, instrument};

/// Reads the published document, merges in the store's dates, and writes the
/// result back.
#[derive(Debug, Clone)]
pub struct SitemapPublisher {
    path: PathBuf,
    base_url: String,
}

impl SitemapPublisher {
    /// Create a publisher from sitemap configuration values.
    pub fn new(path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            base_url: base_url.into(),
        }
    }

    /// Merge `db_dates` into the published document and rewrite it.
    ///
    /// A missing or malformed existing document starts fresh; entries only
    /// the existing document knows about are carried forward unchanged.
    #[instrument(skip(self, db_dates), fields(path = %self.path.display()))]
    pub fn publish(&self, db_dates: &[String], today: &str) -> StoryloomResult<()> {
        let existing = match std::fs::read_to_string(&self.path) {
            Ok(content) => parse_document(&content),
            Err(_) => {
                debug!("No existing sitemap, starting fresh");
                Default::default()
            }
        };

        let entries = merge_entries(&existing, db_dates, &self.base_url, today);
        let xml = render_document(&entries)?;

        std::fs::write(&self.path, xml).map_err(|e| {
            SitemapError::new(SitemapErrorKind::Write(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;

        info!(entries = entries.len(), "Published sitemap");
        Ok(())
    }
}
