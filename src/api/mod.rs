//! Backend API abstraction.
//!
//! Provides a trait over the analysis service so the dispatcher and the
//! command layer never talk to reqwest directly. The real implementation
//! lives in [`http::HttpBackend`]; tests substitute their own.

pub mod http;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::i18n::{self, Language};
use crate::models::report::Severity;
use crate::models::{AnalysisKind, AnalysisPayload, FullReport, Identity};

pub use http::HttpBackend;

/// Errors from the analysis backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response: refused connection, DNS
    /// failure, timeout.
    #[error("network error: {0}")]
    Transport(String),

    /// Non-2xx response without a structured error body.
    #[error("server returned HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    /// The endpoint wants a login session we do not have.
    #[error("authentication required")]
    NotAuthenticated,

    /// The backend rejected the request and said why.
    #[error("{}", .messages.join("; "))]
    Rejected { messages: Vec<String> },

    #[error("malformed response from server: {0}")]
    MalformedResponse(String),

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The localized message shown to the user.
    ///
    /// Backend rejections surface their own text. Everything
    /// transport-shaped collapses to a fixed retry prompt so raw HTTP
    /// noise never reaches the user; the full error stays available via
    /// `Display` for verbose output.
    pub fn user_message(&self, lang: Language) -> String {
        match self {
            ApiError::Rejected { messages } => messages.join("; "),
            ApiError::NotAuthenticated => i18n::tr(lang, "error.not_authenticated").to_string(),
            ApiError::Transport(_)
            | ApiError::Http { .. }
            | ApiError::MalformedResponse(_)
            | ApiError::InvalidUrl(_) => i18n::tr(lang, "error.try_again").to_string(),
        }
    }
}

/// Successful login: who we are and where the web UI would send us.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub identity: Identity,
    /// `/admin` for admin accounts, `/` otherwise.
    pub redirect: String,
    /// Session cookie captured from the response, if any.
    pub cookie: Option<String>,
}

/// Successful registration.
#[derive(Debug, Clone)]
pub struct RegisterSuccess {
    /// Row id or document id, normalized to a string.
    pub user_id: String,
}

/// Answer from the session-check endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCheck {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<Identity>,
}

/// Response of the one-shot full-analysis endpoint: the report itself plus
/// the server-side artifact names it can be downloaded under.
#[derive(Debug, Clone, Deserialize)]
pub struct FullReportResponse {
    pub report: FullReport,
    #[serde(default)]
    pub report_file: String,
    #[serde(default)]
    pub pdf_file: Option<String>,
}

/// Filters for the admin statistics endpoint. All optional; unset fields are
/// omitted from the query string.
#[derive(Debug, Clone, Default)]
pub struct StatsFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub language: Option<String>,
    pub severity: Option<Severity>,
    pub user: Option<String>,
}

impl StatsFilter {
    /// Query-string pairs for the set fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.start_date {
            pairs.push(("start_date", v.clone()));
        }
        if let Some(v) = &self.end_date {
            pairs.push(("end_date", v.clone()));
        }
        if let Some(v) = &self.language {
            pairs.push(("language", v.clone()));
        }
        if let Some(v) = &self.severity {
            pairs.push(("severity", v.to_string()));
        }
        if let Some(v) = &self.user {
            pairs.push(("user", v.clone()));
        }
        pairs
    }
}

/// Aggregated usage statistics for admin accounts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub submission_stats: serde_json::Value,
    #[serde(default)]
    pub bug_stats: serde_json::Value,
    #[serde(default)]
    pub recent_submissions: Vec<serde_json::Value>,
}

/// Trait for the analysis service.
///
/// One method per endpoint. Implementations own transport, cookies, and
/// response parsing; callers only see domain types and [`ApiError`].
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, ApiError>;

    async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<RegisterSuccess, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn check_session(&self) -> Result<SessionCheck, ApiError>;

    /// Run one analysis kind over a piece of code.
    ///
    /// `upload_name` is the filename the code is submitted under; the
    /// backend infers the source language from its extension.
    async fn analyze(
        &self,
        kind: AnalysisKind,
        code: &str,
        upload_name: &str,
        language: Language,
        include_urdu: bool,
    ) -> Result<AnalysisPayload, ApiError>;

    /// Run the combined review/tests/docs/bugs pipeline in one call.
    async fn full_report(
        &self,
        code: &str,
        upload_name: &str,
        language: Language,
    ) -> Result<FullReportResponse, ApiError>;

    /// Fetch a previously generated JSON report by server-side name.
    async fn download_report(&self, name: &str) -> Result<Vec<u8>, ApiError>;

    /// Fetch a previously generated PDF report by server-side name.
    async fn download_pdf(&self, name: &str) -> Result<Vec<u8>, ApiError>;

    async fn translate_to_urdu(&self, text: &str) -> Result<String, ApiError>;

    async fn admin_stats(&self, filter: &StatsFilter) -> Result<AdminStats, ApiError>;

    /// Export all submissions as a JSON file.
    async fn admin_export(&self) -> Result<Vec<u8>, ApiError>;
}
