//! Content-hash based response cache.
//!
//! Caches analysis results so re-running the same kind over unchanged code
//! skips the backend round trip entirely.

pub mod store;

use sha2::{Digest, Sha256};

use crate::i18n::Language;
use crate::models::{AnalysisKind, ResultEnvelope};

/// Compute a cache key from everything that influences a backend answer:
/// the code itself, the analysis kind, the output language, the Urdu
/// toggle, and which server was asked.
pub fn response_key(
    code: &str,
    kind: AnalysisKind,
    language: Language,
    include_urdu: bool,
    server: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.update(kind.endpoint().as_bytes());
    hasher.update(language.as_str().as_bytes());
    hasher.update([include_urdu as u8]);
    hasher.update(server.as_bytes());
    hex::encode(hasher.finalize())
}

/// The cache engine for analysis responses.
pub struct CacheEngine {
    enabled: bool,
    store: store::FileStore,
}

impl CacheEngine {
    /// Create a new cache engine using the default cache directory.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            store: store::FileStore::new(),
        }
    }

    /// Create a cache engine rooted at a specific directory (useful for testing).
    pub fn with_dir(enabled: bool, dir: std::path::PathBuf) -> Self {
        Self {
            enabled,
            store: store::FileStore::new_with_dir(dir),
        }
    }

    /// Look up a cached result.
    pub fn get(&self, key: &str) -> Option<ResultEnvelope> {
        if !self.enabled {
            return None;
        }
        self.store.get(key)
    }

    /// Store a result in the cache.
    pub fn put(&self, key: &str, envelope: &ResultEnvelope) {
        if !self.enabled {
            return;
        }
        self.store.put(key, envelope);
    }

    /// Remove all cached entries.
    pub fn clear(&self) -> Result<store::CacheStats, std::io::Error> {
        self.store.clear()
    }

    /// Compute statistics about the cache.
    pub fn stats(&self) -> Result<store::CacheStats, std::io::Error> {
        self.store.stats()
    }

    /// Return the cache directory path.
    pub fn path(&self) -> Option<&std::path::PathBuf> {
        self.store.path()
    }
}
