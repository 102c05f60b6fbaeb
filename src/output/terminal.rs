//! Terminal renderer: one collapsible panel per analysis kind.
//!
//! Styled flowing text, no tables. A collapsed panel is a single header
//! line with a headline metric; an expanded panel shows the full result.
//! Long generated text (test code, documentation) is previewed up to a
//! character budget. Lists keep the order the backend returned them in.

use colored::Colorize;

use crate::constants::PREVIEW_CHAR_BUDGET;
use crate::i18n::{tr, trf, Language};
use crate::models::report::{BugReport, DocsReport, QualityReport, SecurityReport};
use crate::models::{AnalysisPayload, ResultEnvelope, Severity};
use crate::output::{OutputRenderer, PanelSet};
use crate::store::ResultStore;

/// How many entries of a list to show before eliding the rest.
const MAX_LIST_ITEMS: usize = 10;

/// Terminal output renderer with colored, collapsible panels.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, store: &ResultStore, panels: &PanelSet, lang: Language) -> String {
        if store.is_empty() {
            return format!("  {}\n", tr(lang, "results.empty").dimmed());
        }

        let mut out = String::new();
        for (kind, envelope) in store.iter() {
            let expanded = panels.is_expanded(kind);
            out.push_str(&panel_header(envelope, expanded, lang));
            if expanded {
                match &envelope.payload {
                    AnalysisPayload::Quality(report) => render_quality(&mut out, report, lang),
                    AnalysisPayload::Bugs(report) => render_bugs(&mut out, report, lang),
                    AnalysisPayload::Docs(report) => render_docs(&mut out, report, lang),
                    AnalysisPayload::Security(report) => render_security(&mut out, report, lang),
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Header line: `▸` collapsed / `▾` expanded, kind label, filename, age.
/// Collapsed panels also get the headline metric so the line stands alone.
fn panel_header(envelope: &ResultEnvelope, expanded: bool, lang: Language) -> String {
    let marker = if expanded { "▾" } else { "▸" };
    let label = tr(lang, envelope.kind().label_key());

    let mut line = format!(" {} {}", marker.cyan().bold(), label.bold());
    if let Some(name) = &envelope.filename {
        line.push_str(&format!(" — {}", name));
    }
    line.push_str(&format!(" {}", format!("· {}", age_label(envelope.age_secs())).dimmed()));
    if !expanded {
        line.push_str(&format!(" {}", format!("· {}", headline(envelope, lang)).dimmed()));
    }
    line.push('\n');
    line
}

/// One-line summary metric for a collapsed panel.
fn headline(envelope: &ResultEnvelope, lang: Language) -> String {
    match &envelope.payload {
        AnalysisPayload::Quality(r) => {
            format!("{} {:.0}/100", tr(lang, "panel.score"), r.overall_score)
        }
        AnalysisPayload::Bugs(r) => format!("{}: {}", tr(lang, "panel.bugs_found"), r.bugs_found),
        AnalysisPayload::Docs(r) => {
            format!("{} {:.0}/100", tr(lang, "panel.completeness"), r.completeness_score)
        }
        AnalysisPayload::Security(r) => {
            if r.risk_level.is_empty() {
                format!("{} {:.0}/100", tr(lang, "panel.score"), r.security_score)
            } else {
                format!("{}: {}", tr(lang, "panel.risk"), r.risk_level)
            }
        }
    }
}

fn render_quality(out: &mut String, report: &QualityReport, lang: Language) {
    score_line(out, tr(lang, "panel.score"), report.overall_score);
    score_line(out, tr(lang, "panel.maintainability"), report.maintainability_score);
    score_line(out, tr(lang, "panel.reliability"), report.reliability_score);
    score_line(out, tr(lang, "panel.security"), report.security_score);
    score_line(out, tr(lang, "panel.readability"), report.readability_score);

    let cx = &report.complexity_analysis;
    if !cx.complexity_rating.is_empty() || cx.cyclomatic_complexity > 0 {
        out.push_str(&format!(
            "   {}: {} {}\n",
            tr(lang, "panel.complexity"),
            cx.complexity_rating,
            format!(
                "(cyclomatic {}, cognitive {}, nesting {})",
                cx.cyclomatic_complexity, cx.cognitive_complexity, cx.nesting_depth
            )
            .dimmed()
        ));
    }

    if !report.issues.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.issues").bold()));
        capped(out, &report.issues, lang, |issue| {
            let mut line = format!("     {} {}", severity_mark(issue.severity), issue.message);
            if let Some(n) = issue.line {
                line.push_str(&format!(" {}", line_ref(lang, n).dimmed()));
            }
            if let Some(category) = &issue.category {
                line.push_str(&format!(" {}", format!("[{category}]").dimmed()));
            }
            line.push('\n');
            line
        });
    }

    if !report.suggestions.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.suggestions").bold()));
        capped(out, &report.suggestions, lang, |s| {
            format!("     {} {}\n", "→".cyan(), s)
        });
    }

    if !report.code_smells.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.code_smells").bold()));
        capped(out, &report.code_smells, lang, |smell| {
            let mut line = format!("     • {}: {}", smell.kind.bold(), smell.description);
            if let Some(n) = smell.line {
                line.push_str(&format!(" {}", line_ref(lang, n).dimmed()));
            }
            line.push('\n');
            line
        });
    }

    if !report.best_practices_violations.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.best_practices").bold()));
        capped(out, &report.best_practices_violations, lang, |v| {
            format!("     • {}: {}\n", v.rule.bold(), v.description)
        });
    }
}

fn render_bugs(out: &mut String, report: &BugReport, lang: Language) {
    let count = if report.bugs_found > 0 {
        report.bugs_found.to_string().red().bold().to_string()
    } else {
        report.bugs_found.to_string().green().bold().to_string()
    };
    out.push_str(&format!("   {}: {}\n", tr(lang, "panel.bugs_found"), count));

    capped(out, &report.bugs, lang, |bug| {
        let mut line = format!(
            "     {} {}: {}",
            severity_mark(bug.severity),
            bug.kind.bold(),
            bug.description
        );
        if let Some(n) = bug.line {
            line.push_str(&format!(" {}", line_ref(lang, n).dimmed()));
        }
        line.push('\n');
        if let Some(impact) = &bug.impact {
            line.push_str(&format!("       {}\n", impact.dimmed()));
        }
        if let Some(fix) = &bug.fix_suggestion {
            line.push_str(&format!("       {} {}\n", "→".cyan(), fix));
        }
        line
    });

    out.push_str(&format!(
        "   {}: {}\n",
        tr(lang, "panel.tests_generated"),
        report.tests_generated
    ));
    score_line(out, tr(lang, "panel.coverage"), report.coverage_estimate);

    if !report.test_code.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.test_code").bold()));
        preview_block(out, &report.test_code, lang);
    }

    if !report.test_descriptions.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.test_descriptions").bold()));
        capped(out, &report.test_descriptions, lang, |t| {
            format!("     • {} — {}\n", t.test_name.bold(), t.description)
        });
    }

    if !report.coverage_areas.is_empty() {
        out.push_str(&format!(
            "   {}: {}\n",
            tr(lang, "panel.coverage_areas"),
            report.coverage_areas.join(", ")
        ));
    }

    if !report.critical_issues.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.critical").red().bold()));
        capped(out, &report.critical_issues, lang, |issue| {
            format!("     {} {}\n", "‼".red().bold(), issue)
        });
    }
}

fn render_docs(out: &mut String, report: &DocsReport, lang: Language) {
    score_line(out, tr(lang, "panel.completeness"), report.completeness_score);

    if !report.documentation_english.is_empty() {
        out.push_str(&format!("   {}:\n", "English".bold()));
        preview_block(out, &report.documentation_english, lang);
    }
    if let Some(urdu) = &report.documentation_urdu {
        if !urdu.is_empty() {
            out.push_str(&format!("   {}:\n", Language::Ur.native_name().bold()));
            preview_block(out, urdu, lang);
        }
    }

    if !report.api_reference.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.api_reference").bold()));
        capped(out, &report.api_reference, lang, |entry| {
            let mut line = format!(
                "     • {} {} — {}\n",
                entry.name.bold(),
                format!("({})", entry.kind).dimmed(),
                entry.description
            );
            if !entry.parameters.is_empty() {
                let params: Vec<String> = entry
                    .parameters
                    .iter()
                    .map(|p| {
                        if p.required {
                            format!("{} ({})", p.name, p.kind)
                        } else {
                            format!("[{} ({})]", p.name, p.kind)
                        }
                    })
                    .collect();
                line.push_str(&format!(
                    "       {}: {}\n",
                    tr(lang, "panel.parameters").dimmed(),
                    params.join(", ")
                ));
            }
            if let Some(ret) = &entry.returns {
                line.push_str(&format!(
                    "       {}: {} — {}\n",
                    tr(lang, "panel.returns").dimmed(),
                    ret.kind,
                    ret.description
                ));
            }
            line
        });
    }

    if !report.usage_examples.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.usage_examples").bold()));
        capped(out, &report.usage_examples, lang, |example| {
            let mut line = format!("     • {}\n", example.title.bold());
            for code_line in example.code.lines() {
                line.push_str(&format!("       {}\n", code_line.dimmed()));
            }
            line
        });
    }

    if !report.sections_generated.is_empty() {
        out.push_str(&format!(
            "   {}: {}\n",
            tr(lang, "panel.sections"),
            report.sections_generated.join(", ")
        ));
    }
}

fn render_security(out: &mut String, report: &SecurityReport, lang: Language) {
    score_line(out, tr(lang, "panel.score"), report.security_score);
    if !report.risk_level.is_empty() {
        out.push_str(&format!(
            "   {}: {}\n",
            tr(lang, "panel.risk"),
            risk_colored(&report.risk_level)
        ));
    }
    if report.scanned_lines > 0 {
        out.push_str(&format!(
            "   {}: {}\n",
            tr(lang, "panel.scanned_lines"),
            report.scanned_lines
        ));
    }

    if !report.findings.is_empty() {
        out.push_str(&format!("   {}:\n", tr(lang, "panel.findings").bold()));
        capped(out, &report.findings, lang, |finding| {
            let mut line = format!(
                "     {} {} {}",
                severity_mark(finding.severity),
                format!("[{}]", finding.category).bold(),
                finding.description
            );
            if let Some(n) = finding.line {
                line.push_str(&format!(" {}", line_ref(lang, n).dimmed()));
            }
            line.push('\n');
            if let Some(rec) = &finding.recommendation {
                line.push_str(&format!("       {} {}\n", "→".cyan(), rec));
            }
            line
        });
    }
}

/// `   {label}: {bar} {score}/100` with the bar colored by band.
fn score_line(out: &mut String, label: &str, score: f64) {
    out.push_str(&format!("   {}: {}\n", label, gauge(score)));
}

/// Ten-block gauge: green at 80+, yellow at 60+, red below.
fn gauge(score: f64) -> String {
    let clamped = score.clamp(0.0, 100.0);
    let filled = (clamped / 10.0).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled));
    let bar = if clamped >= 80.0 {
        bar.green()
    } else if clamped >= 60.0 {
        bar.yellow()
    } else {
        bar.red()
    };
    format!("{bar} {clamped:.0}/100")
}

fn severity_mark(severity: Severity) -> String {
    match severity {
        Severity::Critical => "‼".red().bold().to_string(),
        Severity::High => "✖".red().to_string(),
        Severity::Medium => "⚠".yellow().to_string(),
        Severity::Low => "ℹ".blue().to_string(),
    }
}

fn risk_colored(risk: &str) -> String {
    match risk.to_lowercase().as_str() {
        "critical" | "high" => risk.red().bold().to_string(),
        "medium" | "moderate" => risk.yellow().bold().to_string(),
        _ => risk.green().bold().to_string(),
    }
}

fn line_ref(lang: Language, n: u32) -> String {
    format!("({} {})", tr(lang, "panel.line"), n)
}

/// Compact age: seconds under a minute, then minutes, then hours.
fn age_label(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{}h", secs / 3600)
    }
}

/// Push up to [`MAX_LIST_ITEMS`] rendered entries, then an elision line.
/// Entries keep their incoming order.
fn capped<T>(
    out: &mut String,
    items: &[T],
    lang: Language,
    mut render_item: impl FnMut(&T) -> String,
) {
    for item in items.iter().take(MAX_LIST_ITEMS) {
        out.push_str(&render_item(item));
    }
    if items.len() > MAX_LIST_ITEMS {
        out.push_str(&format!(
            "     {}\n",
            trf(lang, "list.more", items.len() - MAX_LIST_ITEMS).dimmed()
        ));
    }
}

/// Indented preview of a long text, cut at the character budget.
fn preview_block(out: &mut String, text: &str, lang: Language) {
    let (shown, omitted) = split_preview(text, PREVIEW_CHAR_BUDGET);
    for line in shown.lines() {
        out.push_str("     ");
        out.push_str(line);
        out.push('\n');
    }
    if omitted > 0 {
        out.push_str(&format!(
            "     {}\n     {}\n",
            trf(lang, "preview.omitted", omitted).dimmed(),
            format!("({})", tr(lang, "preview.full_hint")).dimmed()
        ));
    }
}

/// Split `text` after `max_chars` characters, on a char boundary.
/// Returns the visible prefix and the number of characters cut off.
fn split_preview(text: &str, max_chars: usize) -> (&str, usize) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], text.chars().count() - max_chars),
        None => (text, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{QualityIssue, SecurityFinding};
    use crate::models::AnalysisKind;

    fn store_with(payload: AnalysisPayload) -> ResultStore {
        let mut store = ResultStore::in_memory();
        store
            .upsert(ResultEnvelope::new(
                payload,
                Some("main.py".to_string()),
                Language::En,
            ))
            .unwrap();
        store
    }

    fn quality_with_issues(issues: Vec<QualityIssue>) -> AnalysisPayload {
        AnalysisPayload::Quality(QualityReport {
            overall_score: 82.0,
            issues,
            ..Default::default()
        })
    }

    #[test]
    fn empty_store_renders_hint() {
        let store = ResultStore::in_memory();
        let output = TerminalRenderer.render(&store, &PanelSet::new(), Language::En);
        assert!(output.contains("No results yet"));
    }

    #[test]
    fn collapsed_panel_is_a_single_header_line() {
        let store = store_with(quality_with_issues(vec![QualityIssue {
            message: "shadowed variable".into(),
            ..Default::default()
        }]));
        let output = TerminalRenderer.render(&store, &PanelSet::new(), Language::En);

        assert!(output.contains("Code quality"));
        assert!(output.contains("main.py"));
        assert!(output.contains("82"));
        // Body stays hidden while collapsed.
        assert!(!output.contains("shadowed variable"));
    }

    #[test]
    fn expanded_panel_shows_issues_in_backend_order() {
        let store = store_with(quality_with_issues(vec![
            QualityIssue {
                severity: Severity::Low,
                message: "first issue".into(),
                line: Some(3),
                ..Default::default()
            },
            QualityIssue {
                severity: Severity::Critical,
                message: "second issue".into(),
                line: Some(1),
                ..Default::default()
            },
        ]));
        let mut panels = PanelSet::new();
        panels.expand(AnalysisKind::Quality);
        let output = TerminalRenderer.render(&store, &panels, Language::En);

        let first = output.find("first issue").unwrap();
        let second = output.find("second issue").unwrap();
        // No client-side re-sorting, even when severities differ.
        assert!(first < second);
    }

    #[test]
    fn clean_quality_report_lists_no_issues() {
        let store = store_with(quality_with_issues(vec![]));
        let mut panels = PanelSet::new();
        panels.expand(AnalysisKind::Quality);
        let output = TerminalRenderer.render(&store, &panels, Language::En);

        assert!(output.contains("82"));
        assert!(!output.contains("Issues:"));
    }

    #[test]
    fn long_test_code_is_previewed() {
        let store = store_with(AnalysisPayload::Bugs(BugReport {
            test_code: "x".repeat(PREVIEW_CHAR_BUDGET + 800),
            ..Default::default()
        }));
        let mut panels = PanelSet::new();
        panels.expand(AnalysisKind::Bugs);
        let output = TerminalRenderer.render(&store, &panels, Language::En);

        assert!(output.contains("800 characters omitted"));
        assert!(output.contains("--save-artifacts"));
    }

    #[test]
    fn security_panel_shows_findings_and_risk() {
        let store = store_with(AnalysisPayload::Security(SecurityReport {
            security_score: 45.0,
            risk_level: "high".into(),
            findings: vec![SecurityFinding {
                severity: Severity::Critical,
                category: "injection".into(),
                description: "unsanitized input reaches eval".into(),
                line: Some(12),
                recommendation: Some("validate before evaluating".into()),
            }],
            scanned_lines: 40,
        }));
        let mut panels = PanelSet::new();
        panels.expand(AnalysisKind::Security);
        let output = TerminalRenderer.render(&store, &panels, Language::En);

        assert!(output.contains("injection"));
        assert!(output.contains("unsanitized input reaches eval"));
        assert!(output.contains("validate before evaluating"));
        assert!(output.contains("high"));
    }

    #[test]
    fn urdu_labels_are_used_when_selected() {
        let store = store_with(quality_with_issues(vec![]));
        let mut panels = PanelSet::new();
        panels.expand(AnalysisKind::Quality);
        let output = TerminalRenderer.render(&store, &panels, Language::Ur);

        assert!(output.contains("کوڈ کا معیار"));
        assert!(output.contains("سکور"));
    }

    #[test]
    fn long_lists_are_elided() {
        let issues: Vec<QualityIssue> = (0..15)
            .map(|i| QualityIssue {
                message: format!("issue number {i}"),
                ..Default::default()
            })
            .collect();
        let store = store_with(quality_with_issues(issues));
        let mut panels = PanelSet::new();
        panels.expand(AnalysisKind::Quality);
        let output = TerminalRenderer.render(&store, &panels, Language::En);

        assert!(output.contains("issue number 9"));
        assert!(!output.contains("issue number 10"));
        assert!(output.contains("and 5 more"));
    }

    #[test]
    fn gauge_respects_bounds() {
        assert!(gauge(100.0).contains("██████████"));
        assert!(!gauge(100.0).contains('░'));
        assert!(gauge(0.0).contains("░░░░░░░░░░"));
        assert!(gauge(82.0).contains("82/100"));
        assert!(gauge(150.0).contains("100/100"));
    }

    #[test]
    fn split_preview_respects_char_boundaries() {
        let text = "کوڈ".repeat(10); // multi-byte characters
        let (shown, omitted) = split_preview(&text, 7);
        assert_eq!(shown.chars().count(), 7);
        assert_eq!(omitted, 23);

        let (all, none) = split_preview("short", 100);
        assert_eq!(all, "short");
        assert_eq!(none, 0);
    }
}
