use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// BLAKE3 hashes of file contents, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct Fingerprints {
    seen: HashMap<PathBuf, blake3::Hash>,
}

impl Fingerprints {
    pub fn record(&mut self, path: impl Into<PathBuf>, content: &[u8]) {
        self.seen.insert(path.into(), blake3::hash(content));
    }

    /// Whether `current` (the file content now on disk, `None` if absent)
    /// is what this process last saw at `path`.
    #[must_use]
    pub fn matches(&self, path: &Path, current: Option<&[u8]>) -> bool {
        match (self.seen.get(path), current) {
            (Some(hash), Some(content)) => *hash == blake3::hash(content),
            (None, None) => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
