//! Output renderers: styled terminal panels and machine-readable JSON.

pub mod json;
pub mod panels;
pub mod terminal;

use clap::ValueEnum;

pub use panels::PanelSet;

use crate::i18n::Language;
use crate::store::ResultStore;

/// Output format selected on the command line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl OutputFormat {
    pub fn renderer(&self) -> Box<dyn OutputRenderer> {
        match self {
            OutputFormat::Terminal => Box::new(terminal::TerminalRenderer),
            OutputFormat::Json => Box::new(json::JsonRenderer),
        }
    }
}

/// Trait for rendering stored analysis results to an output format.
pub trait OutputRenderer {
    /// Render the store to a string. `panels` decides which panels are
    /// expanded (terminal only); `lang` selects the UI language.
    fn render(&self, store: &ResultStore, panels: &PanelSet, lang: Language) -> String;
}
