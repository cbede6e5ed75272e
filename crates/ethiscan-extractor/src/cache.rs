//! Single-slot store for the most recent successful extraction.
//!
//! Writes overwrite wholesale (last writer wins). Storage failures are
//! logged and swallowed; the cache never fails an extraction.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use ethiscan_core::CachedExtraction;

/// Fixed storage key for the last extraction.
pub const LAST_EXTRACTION_KEY: &str = "lastProductData";

pub trait ExtractionCache: Send + Sync {
    fn store(&self, entry: CachedExtraction);

    fn last(&self) -> Option<CachedExtraction>;
}

/// In-process slot, used by the server.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: RwLock<Option<CachedExtraction>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtractionCache for MemoryCache {
    fn store(&self, entry: CachedExtraction) {
        match self.slot.write() {
            Ok(mut slot) => *slot = Some(entry),
            Err(poisoned) => {
                tracing::warn!("extraction cache lock poisoned; overwriting");
                *poisoned.into_inner() = Some(entry);
            }
        }
    }

    fn last(&self) -> Option<CachedExtraction> {
        match self.slot.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// One JSON file named after [`LAST_EXTRACTION_KEY`] inside a directory,
/// so the CLI sees the previous invocation's result.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{LAST_EXTRACTION_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, entry: &CachedExtraction) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_vec_pretty(entry)?;
        std::fs::write(&self.path, json)
    }
}

impl ExtractionCache for FileCache {
    fn store(&self, entry: CachedExtraction) {
        if let Err(e) = self.write(&entry) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist last extraction");
        }
    }

    fn last(&self) -> Option<CachedExtraction> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read last extraction");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding unreadable last extraction");
                None
            }
        }
    }
}
