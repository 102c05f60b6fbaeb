//! janch — bilingual AI code analysis CLI (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod env;
pub mod i18n;
pub mod input;
pub mod models;
pub mod output;
pub mod progress;
pub mod report;
pub mod store;
