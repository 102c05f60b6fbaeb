//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use janch::constants;
use janch::i18n::{self, Language};

/// Styled one-line banner for clap help output.
/// Bold "janch", dimmed tagline. (Static — used for --help only, so it
/// stays English; runtime output goes through [`print_banner`].)
pub const ABOUT_STYLED: &str =
    "\x1b[1mjanch\x1b[0m \x1b[2m· AI code analysis in English and Urdu\x1b[0m";

/// Print the banner to stderr in the configured language.
pub fn print_banner(lang: Language) {
    use std::io::Write;

    use colored::Colorize;

    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = writeln!(handle);
    let _ = writeln!(
        handle,
        "  {} {}",
        constants::APP_NAME.bold(),
        format!("· {}", i18n::tr(lang, "app.tagline")).dimmed(),
    );
    let _ = writeln!(handle);
    let _ = handle.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_banner_english() {
        // Should not panic.
        print_banner(Language::En);
    }

    #[test]
    fn print_banner_urdu() {
        print_banner(Language::Ur);
    }

    #[test]
    fn about_styled_is_non_empty() {
        assert!(!ABOUT_STYLED.is_empty());
        assert!(ABOUT_STYLED.contains("janch"));
    }
}
