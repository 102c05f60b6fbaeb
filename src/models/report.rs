//! Report payloads returned by the analysis endpoints.
//!
//! The backend forwards LLM output with light post-processing, so every field
//! here is defaulted: a missing score or list must not sink the whole result.
//! Numeric scores are `f64` because the model is free to answer `82` or
//! `82.5` for the same prompt.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::AnalysisKind;
use crate::i18n::Language;

/// Severity level of a reported issue, bug, or finding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic or stylistic.
    Low,
    /// Worth fixing, not urgent.
    #[default]
    Medium,
    /// Likely to cause incorrect behavior.
    High,
    /// Must be fixed before the code ships.
    Critical,
}

/// Custom deserializer for Severity that accepts common LLM variations.
///
/// The model sometimes answers "Major", "Warning", "Blocker" or similar
/// instead of the expected low/medium/high/critical. This normalizes them.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_lowercase().as_str() {
            "low" | "info" | "note" | "suggestion" | "minor" | "trivial" | "style" => {
                Ok(Severity::Low)
            }
            "medium" | "moderate" | "warning" | "warn" | "major" => Ok(Severity::Medium),
            "high" | "error" | "severe" => Ok(Severity::High),
            "critical" | "blocker" | "fatal" => Ok(Severity::Critical),
            _ => {
                // Fall back to medium for unrecognised severities rather than failing
                Ok(Severity::Medium)
            }
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// A single issue flagged by the quality analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityIssue {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
}

/// A structural smell (long method, deep nesting, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeSmell {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BestPracticeViolation {
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    #[serde(default)]
    pub cyclomatic_complexity: u32,
    #[serde(default)]
    pub cognitive_complexity: u32,
    #[serde(default)]
    pub nesting_depth: u32,
    #[serde(default)]
    pub complexity_rating: String,
}

/// Payload of a quality analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub maintainability_score: f64,
    #[serde(default)]
    pub reliability_score: f64,
    #[serde(default)]
    pub security_score: f64,
    #[serde(default)]
    pub readability_score: f64,
    #[serde(default)]
    pub complexity_analysis: ComplexityAnalysis,
    #[serde(default)]
    pub issues: Vec<QualityIssue>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub code_smells: Vec<CodeSmell>,
    #[serde(default)]
    pub best_practices_violations: Vec<BestPracticeViolation>,
}

/// A single detected bug.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bug {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub fix_suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestDescription {
    #[serde(default)]
    pub test_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub importance: String,
}

/// Payload of a bug-detection analysis: bugs plus generated unit tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BugReport {
    #[serde(default)]
    pub bugs_found: u32,
    #[serde(default)]
    pub bugs: Vec<Bug>,
    #[serde(default)]
    pub tests_generated: u32,
    #[serde(default)]
    pub test_code: String,
    #[serde(default)]
    pub coverage_estimate: f64,
    #[serde(default)]
    pub test_descriptions: Vec<TestDescription>,
    #[serde(default)]
    pub coverage_areas: Vec<String>,
    #[serde(default)]
    pub critical_issues: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiParameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiReturn {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

/// One documented function, class, or module in the API reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEntry {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ApiParameter>,
    #[serde(default)]
    pub returns: Option<ApiReturn>,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageExample {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Payload of a documentation-generation analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocsReport {
    #[serde(default)]
    pub documentation_english: String,
    #[serde(default)]
    pub documentation_urdu: Option<String>,
    #[serde(default)]
    pub api_reference: Vec<ApiEntry>,
    #[serde(default)]
    pub usage_examples: Vec<UsageExample>,
    #[serde(default)]
    pub completeness_score: f64,
    #[serde(default)]
    pub sections_generated: Vec<String>,
}

/// A single security finding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityFinding {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// Payload of a security scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityReport {
    #[serde(default)]
    pub security_score: f64,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub findings: Vec<SecurityFinding>,
    #[serde(default)]
    pub scanned_lines: u32,
}

/// A parsed analysis result, tagged by kind.
///
/// Serializes as `{"kind": "quality", "results": {...}}`, mirroring the
/// `results` object the backend wraps each payload in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "results", rename_all = "lowercase")]
pub enum AnalysisPayload {
    Quality(QualityReport),
    Bugs(BugReport),
    Docs(DocsReport),
    Security(SecurityReport),
}

impl AnalysisPayload {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisPayload::Quality(_) => AnalysisKind::Quality,
            AnalysisPayload::Bugs(_) => AnalysisKind::Bugs,
            AnalysisPayload::Docs(_) => AnalysisKind::Docs,
            AnalysisPayload::Security(_) => AnalysisKind::Security,
        }
    }
}

/// One stored analysis result: the payload plus where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub language: Language,
    /// Unix timestamp (seconds) when the result was received.
    #[serde(default)]
    pub received_at: u64,
    #[serde(flatten)]
    pub payload: AnalysisPayload,
}

impl ResultEnvelope {
    /// Wrap a payload received just now.
    pub fn new(payload: AnalysisPayload, filename: Option<String>, language: Language) -> Self {
        Self {
            filename,
            language,
            received_at: super::now_unix(),
            payload,
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        self.payload.kind()
    }

    /// Seconds since this result was received.
    pub fn age_secs(&self) -> u64 {
        super::now_unix().saturating_sub(self.received_at)
    }
}

/// Combined report returned by the one-shot full-analysis endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FullReport {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub scores: ReportScores,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub tests: String,
    #[serde(default)]
    pub docs: String,
    #[serde(default)]
    pub docs_urdu: String,
    #[serde(default)]
    pub bug_report: String,
    #[serde(default)]
    pub bug_report_urdu: String,
    #[serde(default)]
    pub corrected_code: String,
    /// Integer for SQL backends, hex object id for document stores.
    #[serde(default)]
    pub submission_id: Option<serde_json::Value>,
}

/// Score block of a [`FullReport`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportScores {
    #[serde(default)]
    pub lines: u32,
    #[serde(default)]
    pub complexity: f64,
    #[serde(default)]
    pub overall: f64,
    #[serde(default)]
    pub review_score: f64,
    #[serde(default)]
    pub test_score: f64,
    #[serde(default)]
    pub doc_score: f64,
    #[serde(default)]
    pub ux_score: f64,
    #[serde(default)]
    pub estimated_coverage: f64,
    #[serde(default)]
    pub quality_level: String,
    #[serde(default)]
    pub gemini_quality_score: Option<f64>,
    #[serde(default)]
    pub maintainability_score: Option<f64>,
    #[serde(default)]
    pub readability_score: Option<f64>,
    #[serde(default)]
    pub best_practices_score: Option<f64>,
    #[serde(default)]
    pub time_complexity: Option<serde_json::Value>,
    #[serde(default)]
    pub bug_analysis: Option<serde_json::Value>,
}
