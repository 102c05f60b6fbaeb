//! Serialized dispatch of analysis requests.
//!
//! The dispatcher owns the "one request at a time" rule: a dispatch that
//! arrives while another is in flight is rejected, not queued. Empty input
//! is rejected before the busy slot is taken and before any network
//! traffic. Successful responses are stored in the response cache so that
//! re-analyzing unchanged code skips the backend entirely.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::api::{AnalysisBackend, ApiError};
use crate::cache::{self, CacheEngine};
use crate::i18n::{self, Language};
use crate::input::CodeInput;
use crate::models::{AnalysisKind, ResultEnvelope};
use crate::progress::{ProgressTracker, TaskStatus};

/// Reasons a dispatch did not produce a result.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The input contained no code (empty or whitespace only).
    #[error("no code provided")]
    NoCode,

    /// Another analysis is already in flight.
    #[error("another analysis is already running")]
    Busy,

    /// The backend requires a login before analyzing.
    #[error("authentication required")]
    NotAuthenticated,

    /// The request was sent but failed.
    #[error("analysis failed: {source}")]
    Failed { source: ApiError },
}

impl DispatchError {
    /// Localized text suitable for end users.
    pub fn user_message(&self, lang: Language) -> String {
        match self {
            DispatchError::NoCode => i18n::tr(lang, "error.empty_code").to_string(),
            DispatchError::Busy => i18n::tr(lang, "error.busy").to_string(),
            DispatchError::NotAuthenticated => {
                i18n::tr(lang, "error.not_authenticated").to_string()
            }
            DispatchError::Failed { source } => source.user_message(lang),
        }
    }
}

/// The result of one dispatch.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub envelope: ResultEnvelope,
    /// True when the envelope came from the response cache.
    pub cached: bool,
}

/// Runs analyses against a backend, one at a time.
pub struct Dispatcher {
    backend: Arc<dyn AnalysisBackend>,
    cache: CacheEngine,
    progress: Arc<ProgressTracker>,
    /// Server URL, part of the cache key so results never leak across servers.
    server: String,
    language: Language,
    include_urdu: bool,
    busy: AtomicBool,
}

/// Clears the busy flag when a dispatch ends, on every exit path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Dispatcher {
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        cache: CacheEngine,
        progress: Arc<ProgressTracker>,
        server: String,
        language: Language,
        include_urdu: bool,
    ) -> Self {
        Self {
            backend,
            cache,
            progress,
            server,
            language,
            include_urdu,
            busy: AtomicBool::new(false),
        }
    }

    /// Dispatch one analysis kind over the given input.
    ///
    /// Checks, in order: non-empty input, the busy slot, the response
    /// cache. Only then does a request go out. The busy slot is released
    /// when this call returns, whatever the outcome.
    pub async fn run(
        &self,
        kind: AnalysisKind,
        input: &CodeInput,
    ) -> Result<DispatchOutcome, DispatchError> {
        if input.is_empty() {
            return Err(DispatchError::NoCode);
        }

        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(DispatchError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let key = cache::response_key(
            &input.text,
            kind,
            self.language,
            self.include_urdu,
            &self.server,
        );
        if let Some(envelope) = self.cache.get(&key) {
            self.progress.update(kind, TaskStatus::DoneCached);
            return Ok(DispatchOutcome {
                envelope,
                cached: true,
            });
        }

        self.progress.update(kind, TaskStatus::InProgress);

        match self
            .backend
            .analyze(
                kind,
                &input.text,
                input.upload_name(),
                self.language,
                self.include_urdu,
            )
            .await
        {
            Ok(payload) => {
                let envelope = ResultEnvelope::new(payload, input.filename.clone(), self.language);
                self.cache.put(&key, &envelope);
                self.progress.update(kind, TaskStatus::Done);
                Ok(DispatchOutcome {
                    envelope,
                    cached: false,
                })
            }
            Err(err) => {
                self.progress
                    .update(kind, TaskStatus::Failed(err.user_message(self.language)));
                Err(match err {
                    ApiError::NotAuthenticated => DispatchError::NotAuthenticated,
                    other => DispatchError::Failed { source: other },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::{
        AdminStats, FullReportResponse, LoginSuccess, RegisterSuccess, SessionCheck, StatsFilter,
    };
    use crate::models::{AnalysisPayload, QualityReport};

    enum Behavior {
        Succeed,
        FailHttp,
        Unauthenticated,
    }

    struct StubBackend {
        behavior: Behavior,
        /// Simulated request duration in milliseconds.
        delay_ms: u64,
        calls: AtomicUsize,
    }

    impl StubBackend {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                delay_ms: 0,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(behavior: Behavior, delay_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                delay_ms,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisBackend for StubBackend {
        async fn login(&self, _: &str, _: &str) -> Result<LoginSuccess, ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }

        async fn register(
            &self,
            _: &str,
            _: &str,
            _: Option<&str>,
        ) -> Result<RegisterSuccess, ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }

        async fn logout(&self) -> Result<(), ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }

        async fn check_session(&self) -> Result<SessionCheck, ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }

        async fn analyze(
            &self,
            _kind: AnalysisKind,
            _code: &str,
            _upload_name: &str,
            _language: Language,
            _include_urdu: bool,
        ) -> Result<AnalysisPayload, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            match self.behavior {
                Behavior::Succeed => Ok(AnalysisPayload::Quality(QualityReport {
                    overall_score: 82.0,
                    ..Default::default()
                })),
                Behavior::FailHttp => Err(ApiError::Http {
                    status: 500,
                    detail: "internal server error".into(),
                }),
                Behavior::Unauthenticated => Err(ApiError::NotAuthenticated),
            }
        }

        async fn full_report(
            &self,
            _: &str,
            _: &str,
            _: Language,
        ) -> Result<FullReportResponse, ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }

        async fn download_report(&self, _: &str) -> Result<Vec<u8>, ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }

        async fn download_pdf(&self, _: &str) -> Result<Vec<u8>, ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }

        async fn translate_to_urdu(&self, _: &str) -> Result<String, ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }

        async fn admin_stats(&self, _: &StatsFilter) -> Result<AdminStats, ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }

        async fn admin_export(&self) -> Result<Vec<u8>, ApiError> {
            Err(ApiError::Transport("not wired".into()))
        }
    }

    fn dispatcher_for(backend: Arc<StubBackend>, cache: CacheEngine) -> Dispatcher {
        let progress = Arc::new(ProgressTracker::new(
            &AnalysisKind::ALL,
            "test".to_string(),
            Language::En,
            false,
        ));
        Dispatcher::new(
            backend,
            cache,
            progress,
            "http://localhost:5001".to_string(),
            Language::En,
            false,
        )
    }

    fn disabled_cache() -> CacheEngine {
        CacheEngine::with_dir(false, std::env::temp_dir())
    }

    #[tokio::test]
    async fn empty_input_never_reaches_backend() {
        let backend = StubBackend::new(Behavior::Succeed);
        let dispatcher = dispatcher_for(backend.clone(), disabled_cache());

        for kind in AnalysisKind::ALL {
            let result = dispatcher
                .run(kind, &CodeInput::from_text("   \n\t  ", None))
                .await;
            assert!(matches!(result, Err(DispatchError::NoCode)));
        }
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn concurrent_second_dispatch_is_rejected() {
        let backend = StubBackend::slow(Behavior::Succeed, 50);
        let dispatcher = dispatcher_for(backend.clone(), disabled_cache());
        let input = CodeInput::from_text("def f(): pass", None);

        let (first, second) = tokio::join!(
            dispatcher.run(AnalysisKind::Quality, &input),
            dispatcher.run(AnalysisKind::Bugs, &input),
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(DispatchError::Busy)));
        // The rejected dispatch never produced a request.
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn busy_slot_is_released_after_each_run() {
        let backend = StubBackend::new(Behavior::Succeed);
        let dispatcher = dispatcher_for(backend.clone(), disabled_cache());
        let input = CodeInput::from_text("def f(): pass", None);

        dispatcher.run(AnalysisKind::Quality, &input).await.unwrap();
        dispatcher.run(AnalysisKind::Bugs, &input).await.unwrap();
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn failure_releases_busy_slot() {
        let backend = StubBackend::new(Behavior::FailHttp);
        let dispatcher = dispatcher_for(backend.clone(), disabled_cache());
        let input = CodeInput::from_text("def f(): pass", None);

        let first = dispatcher.run(AnalysisKind::Quality, &input).await;
        assert!(matches!(first, Err(DispatchError::Failed { .. })));

        // A later dispatch must not see a stale busy flag.
        let second = dispatcher.run(AnalysisKind::Quality, &input).await;
        assert!(matches!(second, Err(DispatchError::Failed { .. })));
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn cache_hit_skips_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend = StubBackend::new(Behavior::Succeed);
        let dispatcher = dispatcher_for(
            backend.clone(),
            CacheEngine::with_dir(true, dir.path().to_path_buf()),
        );
        let input = CodeInput::from_text("def f(): pass", None);

        let first = dispatcher.run(AnalysisKind::Quality, &input).await.unwrap();
        assert!(!first.cached);

        let second = dispatcher.run(AnalysisKind::Quality, &input).await.unwrap();
        assert!(second.cached);
        assert_eq!(backend.calls(), 1);
        assert_eq!(second.envelope.kind(), AnalysisKind::Quality);
    }

    #[tokio::test]
    async fn unauthenticated_backend_maps_to_dispatch_variant() {
        let backend = StubBackend::new(Behavior::Unauthenticated);
        let dispatcher = dispatcher_for(backend.clone(), disabled_cache());
        let input = CodeInput::from_text("def f(): pass", None);

        let result = dispatcher.run(AnalysisKind::Security, &input).await;
        assert!(matches!(result, Err(DispatchError::NotAuthenticated)));
    }

    #[test]
    fn user_messages_are_localized() {
        assert_eq!(
            DispatchError::NoCode.user_message(Language::En),
            i18n::tr(Language::En, "error.empty_code")
        );
        assert_eq!(
            DispatchError::Busy.user_message(Language::Ur),
            i18n::tr(Language::Ur, "error.busy")
        );
        let failed = DispatchError::Failed {
            source: ApiError::Transport("connection refused".into()),
        };
        assert_eq!(
            failed.user_message(Language::En),
            i18n::tr(Language::En, "error.try_again")
        );
    }
}
