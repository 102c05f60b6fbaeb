//! Progress reporting for terminal output.
//!
//! Provides a live-updating per-kind status display with colored checkmarks
//! and failure indicators, in the configured language. Designed for
//! interactive terminals; silenced with `--no-progress`.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Mutex;

use colored::Colorize;

use crate::i18n::{self, Language};
use crate::models::AnalysisKind;

/// Status of a single analysis kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Queued, waiting to start.
    Pending,
    /// Request in flight.
    InProgress,
    /// Completed successfully.
    Done,
    /// Served from the response cache without a request.
    DoneCached,
    /// Failed; the reason is already user-facing text.
    Failed(String),
}

/// Tracks and renders live progress for analysis runs.
///
/// Thread-safe — meant to be shared across async tasks via `Arc`.
pub struct ProgressTracker {
    inner: Mutex<ProgressState>,
    lang: Language,
    /// If false, all output is suppressed.
    enabled: bool,
}

struct ProgressState {
    /// kind → status (sorted for stable rendering).
    kinds: BTreeMap<AnalysisKind, TaskStatus>,
    /// Number of lines we last printed (for clearing).
    rendered_lines: usize,
    /// Header line, e.g. "Analyzing main.py (40 lines)".
    title: String,
}

impl ProgressTracker {
    /// Create a new progress tracker for the given kinds.
    pub fn new(kinds: &[AnalysisKind], title: String, lang: Language, enabled: bool) -> Self {
        let mut kind_map = BTreeMap::new();
        for kind in kinds {
            kind_map.insert(*kind, TaskStatus::Pending);
        }
        Self {
            inner: Mutex::new(ProgressState {
                kinds: kind_map,
                rendered_lines: 0,
                title,
            }),
            lang,
            enabled,
        }
    }

    /// Update the status of a kind and re-render.
    pub fn update(&self, kind: AnalysisKind, status: TaskStatus) {
        let mut state = self.inner.lock().unwrap();
        state.kinds.insert(kind, status);
        if self.enabled {
            self.render(&mut state);
        }
    }

    /// Print the initial header and kind listing.
    pub fn start(&self) {
        if !self.enabled {
            return;
        }

        let mut state = self.inner.lock().unwrap();
        self.render(&mut state);
    }

    /// Clear progress lines and print the final status per kind.
    pub fn finish(&self) {
        if !self.enabled {
            return;
        }
        let mut state = self.inner.lock().unwrap();
        Self::clear_lines(state.rendered_lines);
        state.rendered_lines = 0;

        let stderr = io::stderr();
        let mut handle = stderr.lock();
        for (kind, status) in &state.kinds {
            let icon = match status {
                TaskStatus::Failed(_) => "✖".red().bold().to_string(),
                _ => "✔".green().bold().to_string(),
            };
            let label = i18n::tr(self.lang, kind.label_key());
            let status_text = match status {
                TaskStatus::Failed(reason) => reason.red().to_string(),
                TaskStatus::DoneCached => format!(
                    "{} ({})",
                    i18n::tr(self.lang, "status.done").green(),
                    i18n::tr(self.lang, "analyze.cached").dimmed()
                ),
                _ => i18n::tr(self.lang, "status.done").green().to_string(),
            };
            let _ = writeln!(handle, "  {icon} {} {status_text}", label.dimmed());
        }
        let _ = writeln!(handle);
    }

    /// Render the current state to stderr, clearing previous output.
    fn render(&self, state: &mut ProgressState) {
        let stderr = io::stderr();
        let mut handle = stderr.lock();

        // Clear previous lines
        Self::clear_lines(state.rendered_lines);

        let mut lines = 0;

        let _ = writeln!(handle, "  {} {}", "▸".cyan().bold(), state.title);
        lines += 1;

        for (kind, status) in &state.kinds {
            let (icon, status_text) = match status {
                TaskStatus::Pending => (
                    "○".dimmed().to_string(),
                    i18n::tr(self.lang, "status.pending").dimmed().to_string(),
                ),
                TaskStatus::InProgress => (
                    "◌".cyan().bold().to_string(),
                    format!("{}…", i18n::tr(self.lang, "status.running").cyan()),
                ),
                TaskStatus::Done => (
                    "✔".green().bold().to_string(),
                    i18n::tr(self.lang, "status.done").green().to_string(),
                ),
                TaskStatus::DoneCached => (
                    "✔".green().bold().to_string(),
                    format!(
                        "{} ({})",
                        i18n::tr(self.lang, "status.done").green(),
                        i18n::tr(self.lang, "analyze.cached").dimmed()
                    ),
                ),
                TaskStatus::Failed(reason) => {
                    ("✖".red().bold().to_string(), reason.red().to_string())
                }
            };
            let label = i18n::tr(self.lang, kind.label_key());
            let _ = writeln!(handle, "    {icon} {} {status_text}", label.dimmed());
            lines += 1;
        }

        let _ = handle.flush();
        state.rendered_lines = lines;
    }

    /// Move cursor up and clear `n` lines.
    fn clear_lines(n: usize) {
        if n == 0 {
            return;
        }
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        for _ in 0..n {
            // Move up one line and clear it
            let _ = write!(handle, "\x1b[1A\x1b[2K");
        }
        let _ = handle.flush();
    }
}
