//! Per-kind result storage.
//!
//! Keeps the latest result for each analysis kind, in memory and on disk
//! under `~/.config/janch/results/`. Storing a result replaces only the
//! entry for the same kind; entries for other kinds and their position in
//! the display order are untouched. First arrival decides the position,
//! like panels appearing on a dashboard as their results come in.
//!
//! Loading is lenient (a corrupt file on disk behaves like an absent
//! result), writing is strict (a result that cannot be persisted is an
//! error, and the in-memory entry keeps its previous value).

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use crate::models::{AnalysisKind, ResultEnvelope};

/// Errors while persisting results.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write result file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Latest result per analysis kind.
pub struct ResultStore {
    dir: Option<PathBuf>,
    entries: IndexMap<AnalysisKind, ResultEnvelope>,
}

impl ResultStore {
    /// Open the store at the default results directory, loading any
    /// persisted results.
    pub fn open() -> Self {
        let dir = dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("results"));
        Self::load_from(dir)
    }

    /// Open a store rooted at a specific directory (useful for testing).
    pub fn with_dir(dir: PathBuf) -> Self {
        Self::load_from(Some(dir))
    }

    /// A store that keeps results only in memory. Nothing is persisted.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            entries: IndexMap::new(),
        }
    }

    fn load_from(dir: Option<PathBuf>) -> Self {
        let mut entries = IndexMap::new();
        if let Some(dir) = &dir {
            for kind in AnalysisKind::ALL {
                let path = dir.join(format!("{kind}.json"));
                if let Some(envelope) = read_envelope(&path) {
                    // A file holding a payload of the wrong kind is ignored
                    if envelope.kind() == kind {
                        entries.insert(kind, envelope);
                    }
                }
            }
        }
        Self { dir, entries }
    }

    /// Store a result, replacing only the entry for the same kind.
    ///
    /// Persists before updating memory, so a failed write leaves the
    /// previous result in place.
    pub fn upsert(&mut self, envelope: ResultEnvelope) -> Result<(), StoreError> {
        let kind = envelope.kind();
        if let Some(dir) = &self.dir {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Write {
                path: dir.clone(),
                source,
            })?;
            let path = dir.join(format!("{kind}.json"));
            let content = serde_json::to_string_pretty(&envelope)?;
            std::fs::write(&path, content)
                .map_err(|source| StoreError::Write { path, source })?;
        }
        self.entries.insert(kind, envelope);
        Ok(())
    }

    pub fn get(&self, kind: AnalysisKind) -> Option<&ResultEnvelope> {
        self.entries.get(&kind)
    }

    /// Kinds with a stored result, in display order.
    pub fn kinds(&self) -> Vec<AnalysisKind> {
        self.entries.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnalysisKind, &ResultEnvelope)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_envelope(path: &Path) -> Option<ResultEnvelope> {
    if !path.exists() {
        return None;
    }
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}
