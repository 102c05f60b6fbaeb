//! Combined report generation and artifact export.
//!
//! The full report runs the backend's combined pipeline (review, generated
//! tests, docs, bug analysis) over one file and saves the resulting JSON,
//! and optionally the PDF rendering, locally. Artifact export writes the
//! long text fields of stored results (generated test code, documentation)
//! out as standalone files.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::api::{AnalysisBackend, ApiError};
use crate::i18n::Language;
use crate::input::{CodeInput, SourceLanguage};
use crate::models::{AnalysisPayload, FullReport};
use crate::store::ResultStore;

/// Errors while generating or saving reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The input contained no code.
    #[error("no code provided")]
    NoCode,

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Api(#[from] ApiError),
}

/// A generated report and where it was saved.
#[derive(Debug)]
pub struct SavedReport {
    pub report: FullReport,
    pub report_path: PathBuf,
    pub pdf_path: Option<PathBuf>,
}

/// Run the combined pipeline and save the report files under `out_dir`.
pub async fn generate(
    backend: &dyn AnalysisBackend,
    input: &CodeInput,
    language: Language,
    out_dir: &Path,
    with_pdf: bool,
) -> Result<SavedReport, ReportError> {
    if input.is_empty() {
        return Err(ReportError::NoCode);
    }

    let response = backend
        .full_report(&input.text, input.upload_name(), language)
        .await?;

    create_dir(out_dir)?;

    // Prefer the server's rendition of the report file; fall back to our
    // own serialization when the response carries no file name.
    let report_path = if response.report_file.is_empty() {
        let path = out_dir.join("report.json");
        write_file(&path, serde_json::to_string_pretty(&response.report)?.as_bytes())?;
        path
    } else {
        let path = out_dir.join(&response.report_file);
        let bytes = backend.download_report(&response.report_file).await?;
        write_file(&path, &bytes)?;
        path
    };

    let mut pdf_path = None;
    if with_pdf {
        if let Some(name) = &response.pdf_file {
            let path = out_dir.join(name);
            let bytes = backend.download_pdf(name).await?;
            write_file(&path, &bytes)?;
            pdf_path = Some(path);
        }
    }

    Ok(SavedReport {
        report: response.report,
        report_path,
        pdf_path,
    })
}

/// Write the long-form artifacts of stored results to `dir`.
///
/// Each stored kind gets its raw envelope as `<kind>.json`; generated test
/// code and documentation additionally land in files of their own, ready
/// to open in an editor.
pub fn save_artifacts(store: &ResultStore, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    create_dir(dir)?;

    let mut saved = Vec::new();
    for (kind, envelope) in store.iter() {
        let json_path = dir.join(format!("{kind}.json"));
        write_file(&json_path, serde_json::to_string_pretty(envelope)?.as_bytes())?;
        saved.push(json_path);

        match &envelope.payload {
            AnalysisPayload::Bugs(report) if !report.test_code.is_empty() => {
                let name = format!(
                    "generated_tests.{}",
                    test_extension(envelope.filename.as_deref())
                );
                let path = dir.join(name);
                write_file(&path, report.test_code.as_bytes())?;
                saved.push(path);
            }
            AnalysisPayload::Docs(report) => {
                if !report.documentation_english.is_empty() {
                    let path = dir.join("documentation.en.md");
                    write_file(&path, report.documentation_english.as_bytes())?;
                    saved.push(path);
                }
                if let Some(urdu) = &report.documentation_urdu {
                    if !urdu.is_empty() {
                        let path = dir.join("documentation.ur.md");
                        write_file(&path, urdu.as_bytes())?;
                        saved.push(path);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(saved)
}

/// Extension for generated test files, matching the analyzed source.
fn test_extension(filename: Option<&str>) -> &'static str {
    match filename.map(SourceLanguage::from_name) {
        Some(SourceLanguage::Java) => "java",
        _ => "py",
    }
}

fn create_dir(dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    std::fs::write(path, bytes).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{BugReport, DocsReport, QualityReport};
    use crate::models::ResultEnvelope;

    fn artifact_store() -> ResultStore {
        let mut store = ResultStore::in_memory();
        store
            .upsert(ResultEnvelope::new(
                AnalysisPayload::Quality(QualityReport {
                    overall_score: 70.0,
                    ..Default::default()
                }),
                Some("main.py".into()),
                Language::En,
            ))
            .unwrap();
        store
            .upsert(ResultEnvelope::new(
                AnalysisPayload::Bugs(BugReport {
                    test_code: "def test_f():\n    assert f() is None\n".into(),
                    ..Default::default()
                }),
                Some("main.py".into()),
                Language::En,
            ))
            .unwrap();
        store
            .upsert(ResultEnvelope::new(
                AnalysisPayload::Docs(DocsReport {
                    documentation_english: "# main.py\n\nDoes nothing.".into(),
                    documentation_urdu: Some("# main.py\n\nکچھ نہیں کرتا۔".into()),
                    ..Default::default()
                }),
                Some("main.py".into()),
                Language::En,
            ))
            .unwrap();
        store
    }

    #[test]
    fn artifacts_cover_tests_and_docs() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_artifacts(&artifact_store(), dir.path()).unwrap();

        let names: Vec<String> = saved
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"quality.json".to_string()));
        assert!(names.contains(&"bugs.json".to_string()));
        assert!(names.contains(&"docs.json".to_string()));
        assert!(names.contains(&"generated_tests.py".to_string()));
        assert!(names.contains(&"documentation.en.md".to_string()));
        assert!(names.contains(&"documentation.ur.md".to_string()));

        let tests = std::fs::read_to_string(dir.path().join("generated_tests.py")).unwrap();
        assert!(tests.contains("def test_f()"));
    }

    #[test]
    fn java_source_gets_java_test_file() {
        let mut store = ResultStore::in_memory();
        store
            .upsert(ResultEnvelope::new(
                AnalysisPayload::Bugs(BugReport {
                    test_code: "@Test\npublic void testsSomething() {}\n".into(),
                    ..Default::default()
                }),
                Some("Main.java".into()),
                Language::En,
            ))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        save_artifacts(&store, dir.path()).unwrap();
        assert!(dir.path().join("generated_tests.java").exists());
    }

    #[test]
    fn empty_test_code_writes_no_test_file() {
        let mut store = ResultStore::in_memory();
        store
            .upsert(ResultEnvelope::new(
                AnalysisPayload::Bugs(BugReport::default()),
                Some("main.py".into()),
                Language::En,
            ))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let saved = save_artifacts(&store, dir.path()).unwrap();
        assert_eq!(saved.len(), 1); // just bugs.json
        assert!(!dir.path().join("generated_tests.py").exists());
    }

    #[test]
    fn test_extension_follows_source() {
        assert_eq!(test_extension(Some("Main.java")), "java");
        assert_eq!(test_extension(Some("main.py")), "py");
        assert_eq!(test_extension(None), "py");
    }
}
