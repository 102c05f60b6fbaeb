//! janch — bilingual AI code analysis CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation; user-facing strings go through the
//! i18n table so the whole surface works in English and Urdu, while
//! technical detail stays behind `--verbose`.

mod cli;

use std::io::IsTerminal;
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;

use janch::api::{AnalysisBackend, HttpBackend};
use janch::auth::{self, AuthError, SessionStore};
use janch::cache::CacheEngine;
use janch::config::Config;
use janch::constants;
use janch::dispatch::{DispatchError, Dispatcher};
use janch::env::Env;
use janch::i18n::{Language, tr, trf};
use janch::input::CodeInput;
use janch::models::AnalysisKind;
use janch::output::{OutputFormat, PanelSet};
use janch::progress::ProgressTracker;
use janch::report::{self, ReportError};
use janch::store::ResultStore;

use cli::args::{
    AdminAction, AnalyzeArgs, AuthAction, CacheAction, Cli, Command, ReportArgs, ResultsArgs,
    TranslateArgs,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Settings shared by every subcommand, resolved from flags, environment
/// variables, and config files.
struct App {
    config: Config,
    lang: Language,
    server: String,
    verbose: bool,
}

impl App {
    /// HTTP backend seeded with the saved session cookie, when the saved
    /// session belongs to the target server.
    fn backend(&self) -> Result<(Arc<dyn AnalysisBackend>, SessionStore)> {
        let sessions = SessionStore::open();
        let cookie = sessions
            .load()
            .filter(|s| s.server == self.server)
            .and_then(|s| s.cookie);
        let backend = HttpBackend::new(&self.server, cookie.as_deref())?;
        Ok((Arc::new(backend), sessions))
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config =
        Config::load(Some(Path::new(".")), &Env::real()).context("failed to load configuration")?;

    if cli.no_color {
        colored::control::set_override(false);
    } else {
        config.ui.color.apply();
    }

    let app = App {
        lang: cli.lang.unwrap_or(config.ui.language),
        server: cli
            .server
            .clone()
            .unwrap_or_else(|| config.server.url.clone()),
        verbose: cli.verbose,
        config,
    };

    match cli.command {
        Command::Auth { action } => run_auth(action, &app).await,
        Command::Analyze(args) => run_analyze(*args, &app).await,
        Command::Results(args) => run_results(args, &app),
        Command::Report(args) => run_report(args, &app).await,
        Command::Translate(args) => run_translate(args, &app).await,
        Command::Admin { action } => run_admin(action, &app).await,
        Command::Cache { action } => run_cache(action, &app),
        Command::Version => run_version(),
    }
}

/// Log in, register, log out, or show session state.
async fn run_auth(action: AuthAction, app: &App) -> Result<()> {
    let (backend, sessions) = app.backend()?;

    match action {
        AuthAction::Login(args) => {
            let username = args.username.unwrap_or_default();
            let password = resolve_password(args.password, args.password_stdin)?;
            let session =
                auth::login(backend.as_ref(), &sessions, &app.server, &username, &password)
                    .await
                    .map_err(|err| auth_error(err, app.lang))?;
            println!(
                "{}",
                trf(app.lang, "auth.logged_in", &session.identity.username)
            );
            println!("{}: {}", tr(app.lang, "auth.role"), session.identity.role);
            Ok(())
        }
        AuthAction::Register(args) => {
            let username = args.username.unwrap_or_default();
            let password = resolve_password(args.password, args.password_stdin)?;
            let created = auth::register(backend.as_ref(), &username, &password, Some(&args.role))
                .await
                .map_err(|err| auth_error(err, app.lang))?;
            println!("{}", trf(app.lang, "auth.registered", created.user_id));
            Ok(())
        }
        AuthAction::Logout => {
            auth::logout(backend.as_ref(), &sessions)
                .await
                .map_err(|err| auth_error(err, app.lang))?;
            println!("{}", tr(app.lang, "auth.logged_out"));
            Ok(())
        }
        AuthAction::Status => {
            let status = auth::status(backend.as_ref(), &sessions).await;
            match &status.saved {
                Some(session) => {
                    println!(
                        "{}",
                        trf(app.lang, "auth.logged_in", &session.identity.username)
                    );
                    println!("{}: {}", tr(app.lang, "auth.role"), session.identity.role);
                    println!("{}: {}", tr(app.lang, "auth.server"), session.server);
                    // The server's verdict can lag behind the local file.
                    if let Some(check) = &status.server {
                        if !check.authenticated {
                            println!("{}", tr(app.lang, "error.not_authenticated"));
                        }
                    }
                }
                None => println!("{}", tr(app.lang, "auth.session_none")),
            }
            Ok(())
        }
    }
}

/// Run the requested analysis kinds sequentially and render the stored
/// results.
async fn run_analyze(args: AnalyzeArgs, app: &App) -> Result<()> {
    let source = args.validate_input().map_err(|msg| anyhow!(msg))?;
    let mut input = CodeInput::from_source(&source).await?;
    if let Some(name) = &args.name {
        input.filename = Some(name.clone());
    }

    // De-duplicate while keeping the order given on the command line.
    let mut kinds: Vec<AnalysisKind> = Vec::new();
    for kind in args.kind.iter().copied() {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    let (backend, _sessions) = app.backend()?;

    // No live display for machine formats, quiet runs, or piped stderr.
    let show_progress = !args.no_progress
        && !args.quiet
        && args.format == OutputFormat::Terminal
        && std::io::stderr().is_terminal();

    if show_progress {
        cli::print_banner(app.lang);
    }

    let progress = Arc::new(ProgressTracker::new(
        &kinds,
        input.upload_name().to_string(),
        app.lang,
        show_progress,
    ));
    progress.start();

    let cache = CacheEngine::new(!args.no_cache && app.config.analysis.cache);
    let include_urdu = args.include_urdu || app.config.analysis.include_urdu;
    let dispatcher = Dispatcher::new(
        backend,
        cache,
        Arc::clone(&progress),
        app.server.clone(),
        app.lang,
        include_urdu,
    );

    let mut store = ResultStore::open();
    let mut panels = PanelSet::new();
    let mut failures: Vec<(AnalysisKind, String)> = Vec::new();

    for kind in kinds.iter().copied() {
        match dispatcher.run(kind, &input).await {
            Ok(outcome) => {
                store.upsert(outcome.envelope)?;
                panels.expand(kind);
            }
            Err(err @ DispatchError::Failed { .. }) => {
                if app.verbose {
                    eprintln!("{kind}: {err}");
                }
                failures.push((kind, err.user_message(app.lang)));
            }
            // Empty input, a busy dispatcher, or a missing login stop the
            // whole run; the remaining kinds would hit the same wall.
            Err(fatal) => {
                progress.finish();
                bail!(fatal.user_message(app.lang));
            }
        }
    }

    progress.finish();

    if args.expand_all || app.config.ui.expand_all {
        panels = PanelSet::all_expanded();
    }
    print!(
        "{}",
        args.format.renderer().render(&store, &panels, app.lang)
    );

    if let Some(dir) = &args.save_artifacts {
        for path in report::save_artifacts(&store, dir)? {
            if !args.quiet {
                println!("{}", trf(app.lang, "artifact.saved", path.display()));
            }
        }
    }

    if !failures.is_empty() {
        let lines: Vec<String> = failures
            .iter()
            .map(|(kind, msg)| format!("{kind}: {msg}"))
            .collect();
        bail!(lines.join("\n"));
    }
    Ok(())
}

/// Render what previous analyze runs stored, expanded unless `--collapsed`
/// asks for headers only.
fn run_results(args: ResultsArgs, app: &App) -> Result<()> {
    let store = ResultStore::open();
    let panels = if args.collapsed {
        PanelSet::new()
    } else {
        PanelSet::all_expanded()
    };
    print!(
        "{}",
        args.format.renderer().render(&store, &panels, app.lang)
    );
    Ok(())
}

/// Run the combined pipeline and save the report files.
async fn run_report(args: ReportArgs, app: &App) -> Result<()> {
    let input = CodeInput::from_file(&args.file).await?;
    let (backend, _sessions) = app.backend()?;

    let saved = report::generate(backend.as_ref(), &input, app.lang, &args.out, args.pdf)
        .await
        .map_err(|err| match err {
            ReportError::NoCode => anyhow!("{}", tr(app.lang, "error.empty_code")),
            ReportError::Api(api) => anyhow!(api.user_message(app.lang)),
            other => anyhow::Error::new(other),
        })?;

    println!(
        "{}",
        trf(app.lang, "report.saved", saved.report_path.display())
    );
    if let Some(pdf) = &saved.pdf_path {
        println!("{}", trf(app.lang, "report.pdf_saved", pdf.display()));
    }
    Ok(())
}

/// Send text through the backend's Urdu translation endpoint.
async fn run_translate(args: TranslateArgs, app: &App) -> Result<()> {
    let text = if args.stdin {
        use tokio::io::AsyncReadExt;
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read stdin")?;
        buf
    } else {
        args.text.unwrap_or_default()
    };
    if text.trim().is_empty() {
        bail!("{}", tr(app.lang, "translate.empty"));
    }

    let (backend, _sessions) = app.backend()?;
    let translated = backend
        .translate_to_urdu(&text)
        .await
        .map_err(|err| anyhow!(err.user_message(app.lang)))?;
    println!("{translated}");
    Ok(())
}

/// Usage statistics and data export, for admin accounts.
async fn run_admin(action: AdminAction, app: &App) -> Result<()> {
    let (backend, _sessions) = app.backend()?;

    match action {
        AdminAction::Stats(args) => {
            let stats = backend
                .admin_stats(&args.to_filter())
                .await
                .map_err(|err| anyhow!(err.user_message(app.lang)))?;
            println!("{}", tr(app.lang, "admin.submissions").bold());
            println!("{}", serde_json::to_string_pretty(&stats.submission_stats)?);
            println!();
            println!("{}", tr(app.lang, "admin.bugs").bold());
            println!("{}", serde_json::to_string_pretty(&stats.bug_stats)?);
            if !stats.recent_submissions.is_empty() {
                println!();
                println!("{}", tr(app.lang, "admin.recent").bold());
                for row in &stats.recent_submissions {
                    println!("  {}", serde_json::to_string(row)?);
                }
            }
            Ok(())
        }
        AdminAction::Export(args) => {
            let bytes = backend
                .admin_export()
                .await
                .map_err(|err| anyhow!(err.user_message(app.lang)))?;
            std::fs::write(&args.out, &bytes)
                .with_context(|| format!("failed to write {}", args.out.display()))?;
            println!("{}", trf(app.lang, "admin.exported", args.out.display()));
            Ok(())
        }
    }
}

/// Manage the response cache.
fn run_cache(action: CacheAction, app: &App) -> Result<()> {
    let engine = CacheEngine::new(true);

    match action {
        CacheAction::Clear => {
            engine.clear().context("failed to clear cache")?;
            println!("{}", tr(app.lang, "cache.cleared"));
        }
        CacheAction::Stats => {
            let stats = engine.stats().context("failed to read cache stats")?;
            println!("{}: {}", tr(app.lang, "cache.entries"), stats.entries);
            println!("{}: {}", tr(app.lang, "cache.size"), stats.human_size());
            if let Some(path) = engine.path() {
                println!("{}: {}", tr(app.lang, "cache.location"), path.display());
            }
        }
        CacheAction::Path => match engine.path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("cache directory could not be determined"),
        },
    }

    Ok(())
}

/// Print version information.
fn run_version() -> Result<()> {
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    Ok(())
}

/// Resolve the password from the flag, its environment fallback, or stdin.
/// An absent password stays empty so credential validation can report it
/// with the right hint.
fn resolve_password(password: Option<String>, password_stdin: bool) -> Result<String> {
    if password_stdin {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .context("failed to read password from stdin")?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }
    Ok(password.unwrap_or_default())
}

/// API rejections surface their server text, transport problems collapse to
/// the fixed localized message, and validation errors keep their flag hints.
fn auth_error(err: AuthError, lang: Language) -> anyhow::Error {
    match err {
        AuthError::Api(api) => anyhow!(api.user_message(lang)),
        other => anyhow::Error::new(other),
    }
}
