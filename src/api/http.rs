//! reqwest-backed implementation of [`AnalysisBackend`].
//!
//! All requests carry the crate's User-Agent and a fresh `X-Request-Id`.
//! The session cookie lives in a reqwest cookie jar: seeded from the saved
//! session on construction, read back out after login so the auth flow can
//! persist it. Response parsing is done by pure functions so the wire
//! formats are testable without a server.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};

use crate::constants::USER_AGENT;
use crate::i18n::Language;
use crate::models::{AnalysisKind, AnalysisPayload, Identity};

use super::{
    AdminStats, AnalysisBackend, ApiError, FullReportResponse, LoginSuccess, RegisterSuccess,
    SessionCheck, StatsFilter,
};

/// Maximum length of a response body quoted in error messages.
const ERROR_BODY_PREVIEW_LEN: usize = 200;

const HEADER_REQUEST_ID: &str = "X-Request-Id";

/// HTTP client for the analysis service.
#[derive(Debug)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpBackend {
    /// Build a client for `base_url`, optionally seeding the cookie jar with
    /// a saved session cookie.
    pub fn new(base_url: &str, cookie: Option<&str>) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let url = Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = cookie {
            jar.add_cookie_str(cookie, &url);
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            jar,
        })
    }

    /// Current session cookie as a `Cookie` header value, if the jar holds one.
    pub fn session_cookie(&self) -> Option<String> {
        let url = Url::parse(&self.base_url).ok()?;
        self.jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(String::from))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and collect status plus body text.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let resp = req
            .header(HEADER_REQUEST_ID, uuid::Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
        Ok((status, body))
    }

    /// Fetch a URL and return the raw bytes, mapping non-2xx to errors.
    async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self
            .client
            .get(self.url(path))
            .header(HEADER_REQUEST_ID, uuid::Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_vec();
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(error_for(status, &body));
        }
        Ok(bytes)
    }

    /// Build the multipart form the analysis endpoints expect: the code as a
    /// named file part plus the output language.
    fn analysis_form(
        code: &str,
        upload_name: &str,
        language: Language,
        include_urdu: bool,
    ) -> Result<Form, ApiError> {
        let part = Part::text(code.to_string())
            .file_name(upload_name.to_string())
            .mime_str("text/plain")
            .map_err(|e| ApiError::Transport(format!("invalid upload part: {e}")))?;
        let mut form = Form::new()
            .part("file", part)
            .text("language", language.as_str());
        if include_urdu {
            form = form.text("include_urdu", "true");
        }
        Ok(form)
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, ApiError> {
        let req = self.client.post(self.url("/api/login")).json(&serde_json::json!({
            "username": username,
            "password": password,
        }));
        let (status, body) = self.send(req).await?;
        let (identity, redirect) = parse_login_response(status, &body, username)?;
        Ok(LoginSuccess {
            identity,
            redirect,
            cookie: self.session_cookie(),
        })
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<RegisterSuccess, ApiError> {
        let req = self
            .client
            .post(self.url("/api/register"))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "role": role.unwrap_or("user"),
            }));
        let (status, body) = self.send(req).await?;
        parse_register_response(status, &body)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let req = self.client.post(self.url("/api/logout"));
        let (status, body) = self.send(req).await?;
        if !status.is_success() {
            return Err(error_for(status, &body));
        }
        Ok(())
    }

    async fn check_session(&self) -> Result<SessionCheck, ApiError> {
        let req = self.client.get(self.url("/api/check-session"));
        let (status, body) = self.send(req).await?;
        parse_session_check(status, &body)
    }

    async fn analyze(
        &self,
        kind: AnalysisKind,
        code: &str,
        upload_name: &str,
        language: Language,
        include_urdu: bool,
    ) -> Result<AnalysisPayload, ApiError> {
        let form = Self::analysis_form(code, upload_name, language, include_urdu)?;
        let req = self.client.post(self.url(kind.endpoint())).multipart(form);
        let (status, body) = self.send(req).await?;
        parse_analysis_response(kind, status, &body)
    }

    async fn full_report(
        &self,
        code: &str,
        upload_name: &str,
        language: Language,
    ) -> Result<FullReportResponse, ApiError> {
        let form = Self::analysis_form(code, upload_name, language, false)?;
        let req = self.client.post(self.url("/analyze")).multipart(form);
        let (status, body) = self.send(req).await?;
        parse_full_report_response(status, &body)
    }

    async fn download_report(&self, name: &str) -> Result<Vec<u8>, ApiError> {
        self.download(&format!("/download/{name}")).await
    }

    async fn download_pdf(&self, name: &str) -> Result<Vec<u8>, ApiError> {
        self.download(&format!("/download_pdf/{name}")).await
    }

    async fn translate_to_urdu(&self, text: &str) -> Result<String, ApiError> {
        let req = self
            .client
            .post(self.url("/translate_to_urdu"))
            .json(&serde_json::json!({ "text": text }));
        let (status, body) = self.send(req).await?;
        parse_translation_response(status, &body)
    }

    async fn admin_stats(&self, filter: &StatsFilter) -> Result<AdminStats, ApiError> {
        let req = self
            .client
            .get(self.url("/api/admin/stats"))
            .query(&filter.query_pairs());
        let (status, body) = self.send(req).await?;
        if !status.is_success() {
            return Err(error_for(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::MalformedResponse(format!("stats response: {e}")))
    }

    async fn admin_export(&self) -> Result<Vec<u8>, ApiError> {
        self.download("/api/admin/export?format=json").await
    }
}

/// Trim and bound a body for inclusion in an error message.
fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<no body>".to_string();
    }
    let mut end = ERROR_BODY_PREVIEW_LEN.min(trimmed.len());
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

/// Pull structured error messages out of a JSON error body.
///
/// The backend answers either `{"error": "..."}` or `{"errors": [...]}`.
/// Returns `None` for anything else (HTML error pages, empty bodies).
fn parse_error_messages(body: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if let Some(msg) = value.get("error").and_then(|v| v.as_str()) {
        return Some(vec![msg.to_string()]);
    }
    let arr = value.get("errors")?.as_array()?;
    let messages: Vec<String> = arr
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect();
    if messages.is_empty() { None } else { Some(messages) }
}

/// Map a non-2xx response to an [`ApiError`].
fn error_for(status: StatusCode, body: &str) -> ApiError {
    match parse_error_messages(body) {
        Some(messages) => {
            // Session-protected endpoints answer 401 with this exact text
            if status == StatusCode::UNAUTHORIZED
                && messages.iter().any(|m| m == "Authentication required")
            {
                ApiError::NotAuthenticated
            } else {
                ApiError::Rejected { messages }
            }
        }
        None => ApiError::Http {
            status: status.as_u16(),
            detail: excerpt(body),
        },
    }
}

/// Parse a success body into JSON, or a failure status into an error.
fn success_json(
    label: &str,
    status: StatusCode,
    body: &str,
) -> Result<serde_json::Value, ApiError> {
    if !status.is_success() {
        return Err(error_for(status, body));
    }
    serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("{label} response is not JSON: {e}")))
}

fn parse_login_response(
    status: StatusCode,
    body: &str,
    username: &str,
) -> Result<(Identity, String), ApiError> {
    let value = success_json("login", status, body)?;
    if !value.get("success").and_then(|v| v.as_bool()).unwrap_or(false) {
        return Err(ApiError::MalformedResponse(
            "login response missing success flag".to_string(),
        ));
    }
    let role = value
        .get("role")
        .and_then(|v| v.as_str())
        .unwrap_or("user")
        .to_string();
    let redirect = value
        .get("redirect")
        .and_then(|v| v.as_str())
        .unwrap_or("/")
        .to_string();
    Ok((
        Identity {
            username: username.to_string(),
            role,
        },
        redirect,
    ))
}

fn parse_register_response(status: StatusCode, body: &str) -> Result<RegisterSuccess, ApiError> {
    let value = success_json("register", status, body)?;
    let user_id = match value.get("user_id") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(ApiError::MalformedResponse(
                "register response missing user_id".to_string(),
            ));
        }
    };
    Ok(RegisterSuccess { user_id })
}

fn parse_session_check(status: StatusCode, body: &str) -> Result<SessionCheck, ApiError> {
    let value = success_json("session check", status, body)?;
    serde_json::from_value(value)
        .map_err(|e| ApiError::MalformedResponse(format!("session check response: {e}")))
}

fn parse_analysis_response(
    kind: AnalysisKind,
    status: StatusCode,
    body: &str,
) -> Result<AnalysisPayload, ApiError> {
    let value = success_json(kind.endpoint(), status, body)?;
    // The endpoints wrap the payload in {"success": ..., "results": {...}};
    // accept a bare payload too.
    let results = match value.get("results") {
        Some(results) => results.clone(),
        None => value,
    };
    let bad = |e: serde_json::Error| {
        ApiError::MalformedResponse(format!("could not parse {kind} results: {e}"))
    };
    let payload = match kind {
        AnalysisKind::Quality => {
            AnalysisPayload::Quality(serde_json::from_value(results).map_err(bad)?)
        }
        AnalysisKind::Bugs => AnalysisPayload::Bugs(serde_json::from_value(results).map_err(bad)?),
        AnalysisKind::Docs => AnalysisPayload::Docs(serde_json::from_value(results).map_err(bad)?),
        AnalysisKind::Security => {
            AnalysisPayload::Security(serde_json::from_value(results).map_err(bad)?)
        }
    };
    Ok(payload)
}

fn parse_full_report_response(
    status: StatusCode,
    body: &str,
) -> Result<FullReportResponse, ApiError> {
    if !status.is_success() {
        return Err(error_for(status, body));
    }
    serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("report response: {e}")))
}

fn parse_translation_response(status: StatusCode, body: &str) -> Result<String, ApiError> {
    let value = success_json("translation", status, body)?;
    value
        .get("translated_text")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| {
            ApiError::MalformedResponse("translation response missing translated_text".to_string())
        })
}
