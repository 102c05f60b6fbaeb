//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and rendering budgets so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "janch";

/// Crate version, injected by cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent header sent with every backend request.
pub const USER_AGENT: &str = concat!("janch/", env!("CARGO_PKG_VERSION"));

/// Local config filename (e.g. `.janch.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".janch.toml";

/// Directory name under `~/.config/` for global config, session and cache.
pub const CONFIG_DIR: &str = "janch";

/// Session filename under the config directory.
pub const SESSION_FILENAME: &str = "session.json";

/// Default analysis service URL when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5001";

/// Upload filename used when code arrives via stdin without `--name`.
///
/// The backend infers the source language from the extension, so the
/// fallback has to carry one it accepts.
pub const DEFAULT_UPLOAD_NAME: &str = "snippet.py";

/// Character budget for generated-text previews (test code, documentation).
pub const PREVIEW_CHAR_BUDGET: usize = 1200;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_SERVER_URL: &str = "JANCH_SERVER_URL";
pub const ENV_LANGUAGE: &str = "JANCH_LANGUAGE";
pub const ENV_COLOR: &str = "JANCH_COLOR";
pub const ENV_CACHE: &str = "JANCH_CACHE";
pub const ENV_USERNAME: &str = "JANCH_USERNAME";
pub const ENV_PASSWORD: &str = "JANCH_PASSWORD";
