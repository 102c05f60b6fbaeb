//! Shared types used across all modules.
//!
//! This module defines the analysis kinds, the report payloads returned by
//! the backend, and the persisted session identity. Other modules import
//! from here rather than reaching into each other's internals.

pub mod report;
pub mod session;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use report::{
    AnalysisPayload, BugReport, DocsReport, FullReport, QualityReport, ResultEnvelope,
    SecurityReport, Severity,
};
pub use session::{Identity, SessionState};

/// Seconds since the Unix epoch; 0 if the clock reads before 1970.
pub fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Where the code under analysis comes from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Read code from a file on disk.
    File(PathBuf),
    /// Read code from stdin.
    Stdin,
}

/// The analysis kinds the backend can run on a piece of code.
///
/// Each kind maps to its own endpoint and produces its own payload shape;
/// results are stored per kind, with a newer result replacing only the
/// entry for the same kind.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Quality,
    Bugs,
    #[value(alias = "documentation")]
    Docs,
    Security,
}

impl AnalysisKind {
    /// All kinds, in display order.
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Quality,
        AnalysisKind::Bugs,
        AnalysisKind::Docs,
        AnalysisKind::Security,
    ];

    /// Backend endpoint path for this kind.
    pub fn endpoint(&self) -> &'static str {
        match self {
            AnalysisKind::Quality => "/api/analyze/quality",
            AnalysisKind::Bugs => "/api/analyze/bugs",
            AnalysisKind::Docs => "/api/analyze/documentation",
            AnalysisKind::Security => "/api/analyze/security",
        }
    }

    /// Translation key for the human-readable kind name.
    pub fn label_key(&self) -> &'static str {
        match self {
            AnalysisKind::Quality => "kind.quality",
            AnalysisKind::Bugs => "kind.bugs",
            AnalysisKind::Docs => "kind.docs",
            AnalysisKind::Security => "kind.security",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::Quality => write!(f, "quality"),
            AnalysisKind::Bugs => write!(f, "bugs"),
            AnalysisKind::Docs => write!(f, "docs"),
            AnalysisKind::Security => write!(f, "security"),
        }
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quality" => Ok(AnalysisKind::Quality),
            "bugs" => Ok(AnalysisKind::Bugs),
            "docs" | "documentation" => Ok(AnalysisKind::Docs),
            "security" => Ok(AnalysisKind::Security),
            other => Err(format!(
                "unsupported analysis kind: '{other}'. Supported: quality, bugs, docs, security"
            )),
        }
    }
}
