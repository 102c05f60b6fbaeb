//! Clap argument types and input validation.

use std::path::PathBuf;

use clap::Parser;

use janch::api::StatsFilter;
use janch::constants::{ENV_PASSWORD, ENV_USERNAME};
use janch::i18n::Language;
use janch::models::{AnalysisKind, InputSource, Severity};
use janch::output::OutputFormat;

/// Bilingual AI code analysis client.
#[derive(Parser, Debug)]
#[command(
    name = "janch",
    version = janch::constants::VERSION,
    about = super::ABOUT_STYLED,
)]
pub struct Cli {
    /// Disable colored output.
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Show underlying error details alongside user-facing messages.
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Analysis service URL (overrides config and JANCH_SERVER_URL).
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// UI and report language.
    #[arg(long, global = true, value_enum)]
    pub lang: Option<Language>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Log in, register, or inspect the stored session.
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Analyze code: quality, bugs & tests, documentation, security.
    Analyze(Box<AnalyzeArgs>),

    /// Show stored analysis results.
    Results(ResultsArgs),

    /// Generate the combined report (JSON, optionally PDF).
    Report(ReportArgs),

    /// Translate text to Urdu via the backend.
    Translate(TranslateArgs),

    /// Usage statistics and data export (admin accounts).
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Manage the response cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Print version and build information.
    Version,
}

/// Authentication subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Log in and store the session locally.
    Login(LoginArgs),
    /// Create an account.
    Register(RegisterArgs),
    /// Log out and clear the stored session.
    Logout,
    /// Show session status, locally and against the server.
    Status,
}

/// Arguments for `auth login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Username (usually an email address).
    #[arg(long, env = ENV_USERNAME)]
    pub username: Option<String>,

    /// Password.
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Read the password from stdin (first line), e.g. from a secret store.
    #[arg(long, default_value_t = false, conflicts_with = "password")]
    pub password_stdin: bool,
}

/// Arguments for `auth register`.
#[derive(Parser, Debug)]
pub struct RegisterArgs {
    /// Username (usually an email address).
    #[arg(long, env = ENV_USERNAME)]
    pub username: Option<String>,

    /// Password.
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Read the password from stdin (first line).
    #[arg(long, default_value_t = false, conflicts_with = "password")]
    pub password_stdin: bool,

    /// Account role.
    #[arg(long, default_value = "user")]
    pub role: String,
}

/// Arguments for the `analyze` subcommand.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    // --- Input (one required) ---
    /// Source file to analyze.
    pub file: Option<PathBuf>,

    /// Read code from stdin instead of a file.
    #[arg(long, default_value_t = false)]
    pub stdin: bool,

    /// Filename to submit when reading from stdin; its extension drives
    /// the backend's language detection.
    #[arg(long, value_name = "FILENAME")]
    pub name: Option<String>,

    // --- What to run ---
    /// Comma-separated analysis kinds: quality, bugs, docs, security.
    #[arg(long, value_delimiter = ',', default_value = "quality")]
    pub kind: Vec<AnalysisKind>,

    /// Request Urdu renditions of generated documentation alongside English.
    #[arg(long, default_value_t = false)]
    pub include_urdu: bool,

    // --- Output ---
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Expand every result panel, not just the fresh ones.
    #[arg(long, default_value_t = false)]
    pub expand_all: bool,

    /// Write generated artifacts (test code, documentation) to this directory.
    #[arg(long, value_name = "DIR")]
    pub save_artifacts: Option<PathBuf>,

    /// Suppress banner and progress; only results and errors are shown.
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,

    /// Hide the live progress display.
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    // --- Performance ---
    /// Bypass the response cache.
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,
}

impl AnalyzeArgs {
    /// Validate that exactly one input source is provided.
    pub fn validate_input(&self) -> Result<InputSource, String> {
        match (&self.file, self.stdin) {
            (Some(_), true) => {
                Err("only one input source allowed: a file argument or --stdin".to_string())
            }
            (Some(path), false) => Ok(InputSource::File(path.clone())),
            (None, true) => Ok(InputSource::Stdin),
            (None, false) => {
                Err("one input source is required: a file argument or --stdin".to_string())
            }
        }
    }
}

/// Arguments for the `results` subcommand.
#[derive(Parser, Debug)]
pub struct ResultsArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Show only the one-line panel headers.
    #[arg(long, default_value_t = false)]
    pub collapsed: bool,
}

/// Arguments for the `report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Source file to run the combined pipeline on.
    pub file: PathBuf,

    /// Directory to write the report files into.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Also download the PDF rendering.
    #[arg(long, default_value_t = false)]
    pub pdf: bool,
}

/// Arguments for the `translate` subcommand.
#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// Text to translate.
    pub text: Option<String>,

    /// Read the text from stdin.
    #[arg(long, default_value_t = false)]
    pub stdin: bool,
}

/// Admin subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum AdminAction {
    /// Show aggregated usage statistics.
    Stats(StatsArgs),
    /// Export all submissions as a JSON file.
    Export(ExportArgs),
}

/// Filters for `admin stats`. All optional.
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Only submissions on or after this date (YYYY-MM-DD).
    #[arg(long)]
    pub start_date: Option<String>,

    /// Only submissions on or before this date (YYYY-MM-DD).
    #[arg(long)]
    pub end_date: Option<String>,

    /// Filter by source language (Python, Java).
    #[arg(long)]
    pub language: Option<String>,

    /// Filter bug statistics by severity.
    #[arg(long, value_enum)]
    pub severity: Option<Severity>,

    /// Filter by username.
    #[arg(long)]
    pub user: Option<String>,
}

impl StatsArgs {
    pub fn to_filter(&self) -> StatsFilter {
        StatsFilter {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            language: self.language.clone(),
            severity: self.severity,
            user: self.user.clone(),
        }
    }
}

/// Arguments for `admin export`.
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Output file.
    #[arg(long, default_value = "export.json")]
    pub out: PathBuf,
}

/// Cache management subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum CacheAction {
    /// Remove all cached analysis responses.
    Clear,
    /// Show cache statistics (entry count and size).
    Stats,
    /// Print the cache directory path.
    Path,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(argv).unwrap()
    }

    fn analyze_args(cli: Cli) -> Box<AnalyzeArgs> {
        match cli.command {
            Command::Analyze(args) => args,
            other => panic!("expected Analyze command, got {other:?}"),
        }
    }

    #[test]
    fn analyze_defaults() {
        let args = analyze_args(parse(&["janch", "analyze", "main.py"]));
        assert_eq!(args.kind, vec![AnalysisKind::Quality]);
        assert_eq!(args.format, OutputFormat::Terminal);
        assert!(!args.include_urdu);
        assert!(!args.no_cache);
        assert!(!args.quiet);
    }

    #[test]
    fn analyze_parses_comma_separated_kinds() {
        let args = analyze_args(parse(&[
            "janch", "analyze", "main.py", "--kind", "quality,bugs,security",
        ]));
        assert_eq!(
            args.kind,
            vec![
                AnalysisKind::Quality,
                AnalysisKind::Bugs,
                AnalysisKind::Security
            ]
        );
    }

    #[test]
    fn analyze_accepts_documentation_alias() {
        let args = analyze_args(parse(&[
            "janch", "analyze", "main.py", "--kind", "documentation",
        ]));
        assert_eq!(args.kind, vec![AnalysisKind::Docs]);
    }

    #[test]
    fn analyze_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["janch", "analyze", "main.py", "--kind", "style"]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_file_input() {
        let args = analyze_args(parse(&["janch", "analyze", "main.py"]));
        let source = args.validate_input().unwrap();
        assert!(matches!(source, InputSource::File(_)));
    }

    #[test]
    fn validate_stdin_input() {
        let args = analyze_args(parse(&["janch", "analyze", "--stdin"]));
        let source = args.validate_input().unwrap();
        assert!(matches!(source, InputSource::Stdin));
    }

    #[test]
    fn validate_no_input() {
        let args = analyze_args(parse(&["janch", "analyze"]));
        let result = args.validate_input();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("one input source is required"));
    }

    #[test]
    fn validate_both_inputs() {
        let args = analyze_args(parse(&["janch", "analyze", "main.py", "--stdin"]));
        let result = args.validate_input();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("only one input source allowed"));
    }

    #[test]
    fn quiet_flag_parsed_short() {
        let args = analyze_args(parse(&["janch", "analyze", "main.py", "-q"]));
        assert!(args.quiet);
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = parse(&[
            "janch",
            "analyze",
            "main.py",
            "--server",
            "http://reviews.example.net",
            "--lang",
            "ur",
        ]);
        assert_eq!(cli.server.as_deref(), Some("http://reviews.example.net"));
        assert_eq!(cli.lang, Some(Language::Ur));
    }

    #[test]
    fn auth_login_parses_flags() {
        let cli = parse(&[
            "janch", "auth", "login", "--username", "a@b.com", "--password", "x",
        ]);
        match cli.command {
            Command::Auth {
                action: AuthAction::Login(args),
            } => {
                assert_eq!(args.username.as_deref(), Some("a@b.com"));
                assert_eq!(args.password.as_deref(), Some("x"));
                assert!(!args.password_stdin);
            }
            other => panic!("expected Auth Login, got {other:?}"),
        }
    }

    #[test]
    fn password_stdin_conflicts_with_password() {
        let result = Cli::try_parse_from([
            "janch",
            "auth",
            "login",
            "--username",
            "a@b.com",
            "--password",
            "x",
            "--password-stdin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn register_defaults_to_user_role() {
        let cli = parse(&["janch", "auth", "register", "--username", "amna@example.com"]);
        match cli.command {
            Command::Auth {
                action: AuthAction::Register(args),
            } => assert_eq!(args.role, "user"),
            other => panic!("expected Auth Register, got {other:?}"),
        }
    }

    #[test]
    fn results_collapsed_flag() {
        let cli = parse(&["janch", "results", "--collapsed"]);
        match cli.command {
            Command::Results(args) => {
                assert!(args.collapsed);
                assert_eq!(args.format, OutputFormat::Terminal);
            }
            other => panic!("expected Results, got {other:?}"),
        }
    }

    #[test]
    fn report_defaults_out_to_cwd() {
        let cli = parse(&["janch", "report", "main.py"]);
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.out, PathBuf::from("."));
                assert!(!args.pdf);
            }
            other => panic!("expected Report, got {other:?}"),
        }
    }

    #[test]
    fn translate_takes_positional_text() {
        let cli = parse(&["janch", "translate", "hello world"]);
        match cli.command {
            Command::Translate(args) => {
                assert_eq!(args.text.as_deref(), Some("hello world"));
                assert!(!args.stdin);
            }
            other => panic!("expected Translate, got {other:?}"),
        }
    }

    #[test]
    fn admin_stats_filters_parse() {
        let cli = parse(&[
            "janch",
            "admin",
            "stats",
            "--start-date",
            "2026-01-01",
            "--severity",
            "high",
            "--user",
            "amna@example.com",
        ]);
        match cli.command {
            Command::Admin {
                action: AdminAction::Stats(args),
            } => {
                let filter = args.to_filter();
                assert_eq!(filter.start_date.as_deref(), Some("2026-01-01"));
                assert_eq!(filter.severity, Some(Severity::High));
                assert_eq!(filter.user.as_deref(), Some("amna@example.com"));
                assert!(filter.end_date.is_none());
            }
            other => panic!("expected Admin Stats, got {other:?}"),
        }
    }

    #[test]
    fn cache_subcommands_parse() {
        for (argv, expected) in [
            (["janch", "cache", "clear"], CacheAction::Clear),
            (["janch", "cache", "stats"], CacheAction::Stats),
            (["janch", "cache", "path"], CacheAction::Path),
        ] {
            let cli = parse(&argv);
            match cli.command {
                Command::Cache { action } => {
                    assert_eq!(
                        std::mem::discriminant(&action),
                        std::mem::discriminant(&expected)
                    );
                }
                other => panic!("expected Cache, got {other:?}"),
            }
        }
    }

    #[test]
    fn version_command_parses() {
        let cli = parse(&["janch", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }
}
