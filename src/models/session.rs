//! Persisted login session state.

use serde::{Deserialize, Serialize};

/// The authenticated user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(default)]
    pub role: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// A login session: who is logged in, against which server, with which cookie.
///
/// Written to `session.json` under the config directory after a successful
/// login and replayed on later invocations until logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub server: String,
    pub identity: Identity,
    /// Raw `Cookie` header value captured at login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    /// Unix timestamp (seconds) when the session was created.
    #[serde(default)]
    pub created_at: u64,
}

impl SessionState {
    pub fn new(server: impl Into<String>, identity: Identity, cookie: Option<String>) -> Self {
        Self {
            server: server.into(),
            identity,
            cookie,
            created_at: super::now_unix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn admin_role_detected() {
        let admin = Identity {
            username: "root@example.com".into(),
            role: "admin".into(),
        };
        let user = Identity {
            username: "a@b.com".into(),
            role: "user".into(),
        };
        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }

    #[test]
    fn session_serde_roundtrip() {
        let session = SessionState::new(
            "http://localhost:5001",
            Identity {
                username: "a@b.com".into(),
                role: "user".into(),
            },
            Some("session=abc123".into()),
        );
        let json = serde_json::to_string(&session).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.identity, session.identity);
        assert_eq!(back.cookie.as_deref(), Some("session=abc123"));
        assert_eq!(back.server, "http://localhost:5001");
    }

    #[test]
    fn session_without_cookie_omits_field() {
        let session = SessionState::new(
            "http://localhost:5001",
            Identity {
                username: "a@b.com".into(),
                role: "user".into(),
            },
            None,
        );
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("cookie"));
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert!(back.cookie.is_none());
    }

    #[test]
    fn identity_defaults_missing_role() {
        let identity: Identity = serde_json::from_str(r#"{"username": "a@b.com"}"#).unwrap();
        assert_eq!(identity.role, "");
        assert!(!identity.is_admin());
    }
}
