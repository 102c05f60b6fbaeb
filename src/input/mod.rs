//! Code input handling.
//!
//! Wraps the code under analysis together with the name it will be uploaded
//! under. Reading happens before anything touches the network, so an
//! unreadable file fails here with its path in the error.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::DEFAULT_UPLOAD_NAME;
use crate::models::InputSource;

/// Errors while collecting code input.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(std::io::Error),
}

/// Source language inferred from the upload name's extension.
///
/// Mirrors the mapping the backend applies; anything else is analyzed as
/// plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Python,
    Java,
    Unknown,
}

impl SourceLanguage {
    pub fn from_name(name: &str) -> Self {
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("py") => SourceLanguage::Python,
            Some(ext) if ext.eq_ignore_ascii_case("java") => SourceLanguage::Java,
            _ => SourceLanguage::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "Python",
            SourceLanguage::Java => "Java",
            SourceLanguage::Unknown => "Unknown",
        }
    }
}

/// The code to analyze, plus the filename it came from (if any).
#[derive(Debug, Clone)]
pub struct CodeInput {
    pub text: String,
    pub filename: Option<String>,
}

impl CodeInput {
    /// Wrap already-collected text.
    pub fn from_text(text: impl Into<String>, filename: Option<String>) -> Self {
        Self {
            text: text.into(),
            filename,
        }
    }

    /// Read code from a file.
    pub async fn from_file(path: &Path) -> Result<Self, InputError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| InputError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let filename = path.file_name().and_then(|n| n.to_str()).map(String::from);
        Ok(Self { text, filename })
    }

    /// Read code from stdin until EOF.
    pub async fn from_stdin() -> Result<Self, InputError> {
        use tokio::io::AsyncReadExt;
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(InputError::Stdin)?;
        Ok(Self {
            text,
            filename: None,
        })
    }

    /// Resolve a CLI input source into code.
    pub async fn from_source(source: &InputSource) -> Result<Self, InputError> {
        match source {
            InputSource::File(path) => Self::from_file(path).await,
            InputSource::Stdin => Self::from_stdin().await,
        }
    }

    /// Whitespace-only input counts as empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Name the code is uploaded under. Pasted snippets default to a `.py`
    /// name so the backend has an extension to infer the language from.
    pub fn upload_name(&self) -> &str {
        self.filename.as_deref().unwrap_or(DEFAULT_UPLOAD_NAME)
    }

    pub fn source_language(&self) -> SourceLanguage {
        SourceLanguage::from_name(self.upload_name())
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn upload_name_defaults_for_pasted_code() {
        let input = CodeInput::from_text("print('hi')", None);
        assert_eq!(input.upload_name(), "snippet.py");
        assert_eq!(input.source_language(), SourceLanguage::Python);
    }

    #[test]
    fn upload_name_uses_filename() {
        let input = CodeInput::from_text("class A {}", Some("Main.java".into()));
        assert_eq!(input.upload_name(), "Main.java");
        assert_eq!(input.source_language(), SourceLanguage::Java);
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(CodeInput::from_text("", None).is_empty());
        assert!(CodeInput::from_text("   \n\t\n", None).is_empty());
        assert!(!CodeInput::from_text("x = 1", None).is_empty());
    }

    #[test]
    fn source_language_from_extension() {
        assert_eq!(SourceLanguage::from_name("main.py"), SourceLanguage::Python);
        assert_eq!(SourceLanguage::from_name("Main.JAVA"), SourceLanguage::Java);
        assert_eq!(SourceLanguage::from_name("script.sh"), SourceLanguage::Unknown);
        assert_eq!(SourceLanguage::from_name("no_extension"), SourceLanguage::Unknown);
    }

    #[test]
    fn line_count_counts_lines() {
        let input = CodeInput::from_text("a = 1\nb = 2\n", None);
        assert_eq!(input.line_count(), 2);
    }

    #[tokio::test]
    async fn from_file_reads_contents_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("算法.py");
        tokio::fs::write(&path, "def f():\n    pass\n").await.unwrap();

        let input = CodeInput::from_file(&path).await.unwrap();
        assert_eq!(input.filename.as_deref(), Some("算法.py"));
        assert!(input.text.contains("def f()"));
        assert_eq!(input.source_language(), SourceLanguage::Python);
    }

    #[tokio::test]
    async fn from_file_missing_reports_path() {
        let err = CodeInput::from_file(Path::new("/tmp/janch_missing_input.py"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("janch_missing_input.py"));
    }

    #[tokio::test]
    async fn from_source_resolves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.py");
        tokio::fs::write(&path, "x = 1\n").await.unwrap();

        let input = CodeInput::from_source(&InputSource::File(path)).await.unwrap();
        assert_eq!(input.filename.as_deref(), Some("app.py"));
    }
}
