//! Bilingual (English/Urdu) user-facing strings.
//!
//! All text shown to the user goes through [`tr`] with a string key, looked up
//! in a static per-language table loaded once at startup. Missing keys fall
//! back to English, then to the key itself, so a typo never panics at render
//! time. Urdu output relies on the terminal for RTL shaping; the strings here
//! are stored in logical order.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Output language for reports and UI text.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ur,
}

impl Language {
    /// Two-letter code sent to the backend (`language` form field).
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ur => "ur",
        }
    }

    /// Name of the language in that language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ur => "اردو",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ur" | "urdu" => Ok(Language::Ur),
            other => Err(format!("unknown language: {other} (expected 'en' or 'ur')")),
        }
    }
}

/// Returns `true` if the text contains Arabic-script characters (U+0600..U+06FF),
/// the block Urdu is written in. Used to pick a sensible default direction for
/// translated text and to sanity-check backend Urdu fields.
pub fn contains_urdu(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// Translate a key for the given language.
///
/// Falls back to English when the key is missing from the Urdu table, and to
/// the key itself when it is unknown entirely.
pub fn tr<'a>(lang: Language, key: &'a str) -> &'a str {
    let table = match lang {
        Language::En => &*EN_MAP,
        Language::Ur => &*UR_MAP,
    };
    if let Some(text) = table.get(key) {
        return text;
    }
    if let Some(text) = EN_MAP.get(key) {
        return text;
    }
    key
}

/// Translate a key and substitute the first `{}` placeholder.
pub fn trf(lang: Language, key: &str, value: impl fmt::Display) -> String {
    tr(lang, key).replacen("{}", &value.to_string(), 1)
}

static EN_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| EN.iter().copied().collect());

static UR_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| UR.iter().copied().collect());

static EN: &[(&str, &str)] = &[
    ("app.tagline", "AI code analysis in English and Urdu"),
    ("error.try_again", "Something went wrong. Please try again."),
    (
        "error.empty_code",
        "No code to analyze. Provide a file or pipe some code on stdin.",
    ),
    ("error.busy", "An analysis is already in progress."),
    (
        "error.not_authenticated",
        "Not logged in. Run `janch auth login` first.",
    ),
    ("kind.quality", "Code quality"),
    ("kind.bugs", "Bugs & tests"),
    ("kind.docs", "Documentation"),
    ("kind.security", "Security scan"),
    ("status.pending", "waiting"),
    ("status.running", "analyzing"),
    ("status.done", "done"),
    ("panel.score", "Score"),
    ("panel.maintainability", "Maintainability"),
    ("panel.reliability", "Reliability"),
    ("panel.readability", "Readability"),
    ("panel.security", "Security"),
    ("panel.issues", "Issues"),
    ("panel.suggestions", "Suggestions"),
    ("panel.code_smells", "Code smells"),
    ("panel.best_practices", "Best practice violations"),
    ("panel.complexity", "Complexity"),
    ("panel.bugs_found", "Bugs found"),
    ("panel.tests_generated", "Tests generated"),
    ("panel.test_code", "Generated tests"),
    ("panel.coverage", "Estimated coverage"),
    ("panel.test_descriptions", "Test descriptions"),
    ("panel.coverage_areas", "Coverage areas"),
    ("panel.critical", "Critical issues"),
    ("panel.api_reference", "API reference"),
    ("panel.parameters", "Parameters"),
    ("panel.returns", "Returns"),
    ("panel.usage_examples", "Usage examples"),
    ("panel.completeness", "Completeness"),
    ("panel.findings", "Findings"),
    ("panel.risk", "Risk level"),
    ("panel.scanned_lines", "Lines scanned"),
    ("panel.sections", "Sections"),
    ("panel.line", "line"),
    ("preview.omitted", "… {} characters omitted …"),
    ("preview.full_hint", "full text available via --save-artifacts"),
    ("list.more", "… and {} more"),
    ("auth.logged_in", "Logged in as {}"),
    ("auth.logged_out", "Logged out."),
    ("auth.registered", "Account created with id {}."),
    ("auth.session_none", "No active session."),
    ("auth.role", "Role"),
    ("auth.server", "Server"),
    ("analyze.cached", "cached"),
    ("results.empty", "No results yet. Run `janch analyze` first."),
    ("report.saved", "Report written to {}"),
    ("report.pdf_saved", "PDF written to {}"),
    ("artifact.saved", "Saved {}"),
    ("translate.empty", "Nothing to translate."),
    ("cache.cleared", "Cache cleared."),
    ("cache.entries", "Entries"),
    ("cache.size", "Size"),
    ("cache.location", "Location"),
    ("admin.submissions", "Submissions"),
    ("admin.bugs", "Bug statistics"),
    ("admin.recent", "Recent submissions"),
    ("admin.exported", "Export written to {}"),
];

static UR: &[(&str, &str)] = &[
    ("app.tagline", "انگریزی اور اردو میں اے آئی کوڈ تجزیہ"),
    ("error.try_again", "کچھ غلط ہو گیا۔ براہ کرم دوبارہ کوشش کریں۔"),
    (
        "error.empty_code",
        "تجزیے کے لیے کوئی کوڈ نہیں۔ فائل دیں یا stdin پر کوڈ فراہم کریں۔",
    ),
    ("error.busy", "ایک تجزیہ پہلے سے جاری ہے۔"),
    (
        "error.not_authenticated",
        "لاگ ان نہیں ہیں۔ پہلے `janch auth login` چلائیں۔",
    ),
    ("kind.quality", "کوڈ کا معیار"),
    ("kind.bugs", "خرابیاں اور ٹیسٹ"),
    ("kind.docs", "دستاویزات"),
    ("kind.security", "سیکیورٹی جائزہ"),
    ("status.pending", "انتظار میں"),
    ("status.running", "تجزیہ جاری ہے"),
    ("status.done", "مکمل"),
    ("panel.score", "سکور"),
    ("panel.maintainability", "دیکھ بھال کی صلاحیت"),
    ("panel.reliability", "اعتبار"),
    ("panel.readability", "پڑھنے میں آسانی"),
    ("panel.security", "سیکیورٹی"),
    ("panel.issues", "مسائل"),
    ("panel.suggestions", "تجاویز"),
    ("panel.code_smells", "کوڈ کی خامیاں"),
    ("panel.best_practices", "بہترین طریقوں کی خلاف ورزیاں"),
    ("panel.complexity", "پیچیدگی"),
    ("panel.bugs_found", "خرابیاں ملیں"),
    ("panel.tests_generated", "ٹیسٹ تیار ہوئے"),
    ("panel.test_code", "تیار کردہ ٹیسٹ"),
    ("panel.coverage", "تخمینی کوریج"),
    ("panel.test_descriptions", "ٹیسٹ کی تفصیلات"),
    ("panel.coverage_areas", "کوریج کے شعبے"),
    ("panel.critical", "سنگین مسائل"),
    ("panel.api_reference", "اے پی آئی حوالہ"),
    ("panel.parameters", "پیرامیٹرز"),
    ("panel.returns", "واپس کرتا ہے"),
    ("panel.usage_examples", "استعمال کی مثالیں"),
    ("panel.completeness", "تکمیل"),
    ("panel.findings", "نشاندہیاں"),
    ("panel.risk", "خطرے کی سطح"),
    ("panel.scanned_lines", "جانچی گئی لائنیں"),
    ("panel.sections", "حصے"),
    ("panel.line", "لائن"),
    ("preview.omitted", "… {} حروف حذف …"),
    ("preview.full_hint", "مکمل متن --save-artifacts سے دستیاب ہے"),
    ("list.more", "… اور {} مزید"),
    ("auth.logged_in", "{} کے طور پر لاگ ان"),
    ("auth.logged_out", "لاگ آؤٹ ہو گئے۔"),
    ("auth.registered", "اکاؤنٹ بن گیا، شناخت {}۔"),
    ("auth.session_none", "کوئی فعال سیشن نہیں۔"),
    ("auth.role", "کردار"),
    ("auth.server", "سرور"),
    ("analyze.cached", "کیشے سے"),
    ("results.empty", "ابھی کوئی نتائج نہیں۔ پہلے `janch analyze` چلائیں۔"),
    ("report.saved", "رپورٹ {} میں محفوظ ہو گئی"),
    ("report.pdf_saved", "پی ڈی ایف {} میں محفوظ ہو گئی"),
    ("artifact.saved", "{} محفوظ ہو گیا"),
    ("translate.empty", "ترجمے کے لیے کچھ نہیں۔"),
    ("cache.cleared", "کیشے صاف ہو گیا۔"),
    ("cache.entries", "اندراجات"),
    ("cache.size", "حجم"),
    ("cache.location", "مقام"),
    ("admin.submissions", "جمع شدہ فائلیں"),
    ("admin.bugs", "خرابیوں کے اعداد و شمار"),
    ("admin.recent", "حالیہ جمع شدہ"),
    ("admin.exported", "ایکسپورٹ {} میں محفوظ ہو گیا"),
];
