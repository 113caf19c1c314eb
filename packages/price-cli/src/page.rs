use price_intel::{PageSnapshot, PageSource};
use std::path::PathBuf;
use tracing::warn;

/// A saved page that is re-read on every snapshot, so edits to the file
/// show up as page changes.
pub struct FilePage {
    url: String,
    path: PathBuf,
}

impl FilePage {
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }
}

impl PageSource for FilePage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn snapshot(&self) -> PageSnapshot {
        // An unreadable file looks like a page that has not rendered yet.
        let html = std::fs::read_to_string(&self.path).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to read page file");
            String::new()
        });
        PageSnapshot::new(self.url.clone(), html)
    }
}
