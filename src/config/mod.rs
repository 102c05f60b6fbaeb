//! Configuration loading and layering.
//!
//! Handles `.janch.toml` loading, environment variable resolution,
//! and CLI flag merging with proper priority ordering.

pub mod loader;

pub use loader::{ColorMode, Config};
