//! JSON output renderer.
//!
//! Emits the stored results as a JSON array of envelopes, each shaped
//! `{"kind": ..., "results": {...}, "filename": ..., "language": ...,
//! "received_at": ...}`. Panel state and language do not apply here; the
//! output is for scripts, not eyes.

use crate::i18n::Language;
use crate::models::ResultEnvelope;
use crate::output::{OutputRenderer, PanelSet};
use crate::store::ResultStore;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, store: &ResultStore, _panels: &PanelSet, _lang: Language) -> String {
        let entries: Vec<&ResultEnvelope> = store.iter().map(|(_, envelope)| envelope).collect();
        serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
    }
}
