//! Login sessions against the backend.
//!
//! A successful login writes `session.json` under the config directory with
//! the username, role, server, and session cookie; later invocations seed
//! their HTTP client from it. Logout drops the local file even when the
//! server cannot be reached.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::{AnalysisBackend, ApiError, RegisterSuccess, SessionCheck};
use crate::models::SessionState;

/// Errors from the auth flows.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("username required (pass --username or set {})", crate::constants::ENV_USERNAME)]
    MissingUsername,

    #[error(
        "password required (pass --password, set {}, or use --password-stdin)",
        crate::constants::ENV_PASSWORD
    )]
    MissingPassword,

    #[error("no config directory available to store the session")]
    NoConfigDir,

    #[error("failed to write session file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Client-side credential validation; nothing is sent for empty fields.
fn validate_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    if username.trim().is_empty() {
        return Err(AuthError::MissingUsername);
    }
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(())
}

/// Log in and persist the session.
pub async fn login(
    backend: &dyn AnalysisBackend,
    sessions: &SessionStore,
    server: &str,
    username: &str,
    password: &str,
) -> Result<SessionState, AuthError> {
    validate_credentials(username, password)?;
    let ok = backend.login(username, password).await?;
    let session = SessionState::new(server, ok.identity, ok.cookie);
    sessions.save(&session)?;
    Ok(session)
}

/// Create an account. Does not log in.
pub async fn register(
    backend: &dyn AnalysisBackend,
    username: &str,
    password: &str,
    role: Option<&str>,
) -> Result<RegisterSuccess, AuthError> {
    validate_credentials(username, password)?;
    Ok(backend.register(username, password, role).await?)
}

/// Log out: tell the server, then drop the local session either way.
pub async fn logout(
    backend: &dyn AnalysisBackend,
    sessions: &SessionStore,
) -> Result<(), AuthError> {
    // Local logout must succeed even when the server is unreachable
    let _ = backend.logout().await;
    sessions.clear()
}

/// What `auth status` reports: the saved session plus the server's view.
#[derive(Debug)]
pub struct SessionStatus {
    pub saved: Option<SessionState>,
    /// `None` when the server could not be asked.
    pub server: Option<SessionCheck>,
}

/// Read the saved session and ask the server whether it still counts.
pub async fn status(backend: &dyn AnalysisBackend, sessions: &SessionStore) -> SessionStatus {
    let saved = sessions.load();
    let server = backend.check_session().await.ok();
    SessionStatus { saved, server }
}

/// Reads and writes the `session.json` file.
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store at the default location under the config directory.
    pub fn open() -> Self {
        let path = dirs::config_dir().map(|d| {
            d.join(crate::constants::CONFIG_DIR)
                .join(crate::constants::SESSION_FILENAME)
        });
        Self { path }
    }

    /// Store at a specific path (useful for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Load the saved session. A missing or unreadable file means logged out.
    pub fn load(&self) -> Option<SessionState> {
        let path = self.path.as_ref()?;
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Persist the session.
    pub fn save(&self, session: &SessionState) -> Result<(), AuthError> {
        let Some(path) = &self.path else {
            return Err(AuthError::NoConfigDir);
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| AuthError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(path, content).map_err(|source| AuthError::Write {
            path: path.clone(),
            source,
        })?;

        // The file holds a live session cookie; keep it owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
        }

        Ok(())
    }

    /// Remove the saved session. A missing file is fine.
    pub fn clear(&self) -> Result<(), AuthError> {
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(AuthError::Write {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}
