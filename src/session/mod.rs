//! Client-side scan session
//!
//! Gates the camera feed, debounces repeated decodes, bounds each resolution
//! with a watchdog and re-arms automatically after a few failures. State lives
//! behind a mutex that is never held across an await; every continuation
//! re-checks the cancellation flag and the generation it started in before
//! touching state.

pub mod state;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_stream::{Stream, StreamExt};

use crate::{
    config::ScannerConfig,
    error::AppError,
    models::{scan_code, ResolvedVisitorView, VisitorCategory},
    services::resolver::Resolve,
};

pub use state::{
    AppLifecycle, CameraFacing, CaptureOutcome, DecodeEvent, FailureCategory, Rejection,
    SessionError, SessionSnapshot, SessionState,
};

struct Inner {
    state: SessionState,
    paused: bool,
    suspended: bool,
    cancelled: bool,
    /// Bumped by reset, retry and cancel; stale continuations compare against it
    generation: u64,
    cooldown_until: Option<Instant>,
    last_payload: Option<String>,
    failed_attempts: u32,
    facing: CameraFacing,
    selected_category: VisitorCategory,
}

impl Inner {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            scanning: self.state == SessionState::Idle
                && !self.paused
                && !self.suspended
                && !self.cancelled,
            paused: self.paused,
            suspended: self.suspended,
            facing: self.facing,
            selected_category: self.selected_category,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.cancelled && self.generation == generation
    }

    /// Back to `Idle`; a running cooldown keeps running
    fn rearm(&mut self) {
        self.state = SessionState::Idle;
        self.last_payload = None;
        self.generation += 1;
    }
}

/// Handle on a scan session; clones share the same state
pub struct ScanSession<R> {
    inner: Arc<Mutex<Inner>>,
    resolver: Arc<R>,
    config: ScannerConfig,
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl<R> Clone for ScanSession<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            resolver: self.resolver.clone(),
            config: self.config.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<R: Resolve + 'static> ScanSession<R> {
    pub fn new(resolver: Arc<R>, config: ScannerConfig) -> Self {
        let inner = Inner {
            state: SessionState::Idle,
            paused: false,
            suspended: false,
            cancelled: false,
            generation: 0,
            cooldown_until: None,
            last_payload: None,
            failed_attempts: 0,
            facing: CameraFacing::Back,
            selected_category: VisitorCategory::General,
        };
        let (tx, _rx) = watch::channel(inner.snapshot());

        Self {
            inner: Arc::new(Mutex::new(inner)),
            resolver,
            config,
            tx: Arc::new(tx),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State stays consistent across a panicking holder: every mutation is
        // a plain field assignment.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, inner: &Inner) {
        self.tx.send_replace(inner.snapshot());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Feed one decode event through the gates and, if accepted, resolve it.
    pub async fn handle_decode(&self, payload: impl Into<String>) -> CaptureOutcome {
        let payload = payload.into();

        let (code, generation) = {
            let mut inner = self.lock();
            if let Err(rejection) = self.gate(&inner, &payload) {
                tracing::debug!("Decode event rejected: {:?}", rejection);
                return CaptureOutcome::Rejected(rejection);
            }
            let validated = scan_code::validate(&payload).map(str::to_string);
            let code = match validated {
                Ok(code) => code,
                Err(e) => {
                    tracing::debug!("Invalid scan code: {}", e);
                    // Remembered so the same unreadable code is not re-validated
                    // on every frame
                    inner.last_payload = Some(payload);
                    return CaptureOutcome::Rejected(Rejection::Invalid);
                }
            };

            inner.last_payload = Some(payload);
            inner.state = SessionState::Captured { code: code.clone() };
            self.publish(&inner);

            inner.cooldown_until = Some(Instant::now() + self.config.cooldown());
            inner.state = SessionState::Processing { code: code.clone() };
            self.publish(&inner);
            (code, inner.generation)
        };

        let timeout = self.config.processing_timeout();
        let result = match tokio::time::timeout(timeout, self.resolver.resolve(&code)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::ProcessingTimeout(timeout.as_millis() as u64)),
        };

        let error = {
            let mut inner = self.lock();
            if !inner.is_current(generation) {
                return CaptureOutcome::Discarded;
            }

            match result {
                Ok(found) => {
                    let view = found.unwrap_or_else(|| {
                        ResolvedVisitorView::unregistered(&code, inner.selected_category)
                    });
                    let view = Box::new(view);
                    inner.failed_attempts = 0;
                    inner.state = SessionState::Resolved { view: view.clone() };
                    self.publish(&inner);
                    return CaptureOutcome::Resolved(view);
                }
                Err(AppError::Validation(msg)) => {
                    tracing::debug!("Resolver rejected code: {}", msg);
                    inner.state = SessionState::Idle;
                    inner.generation += 1;
                    self.publish(&inner);
                    return CaptureOutcome::Rejected(Rejection::Invalid);
                }
                Err(e) => {
                    inner.failed_attempts += 1;
                    let terminal = inner.failed_attempts > self.config.auto_retry_limit;
                    tracing::warn!(
                        "Scan processing failed (attempt {}): {}",
                        inner.failed_attempts,
                        e
                    );
                    let error = SessionError {
                        category: FailureCategory::from(&e),
                        message: e.to_string(),
                        attempts: inner.failed_attempts,
                        terminal,
                    };
                    inner.state = SessionState::Error {
                        error: error.clone(),
                    };
                    self.publish(&inner);
                    error
                }
            }
        };

        if !error.terminal {
            self.rearm_after(self.config.auto_retry_delay(), generation)
                .await;
        }
        CaptureOutcome::Failed(error)
    }

    fn gate(&self, inner: &Inner, payload: &str) -> Result<(), Rejection> {
        if inner.cancelled {
            return Err(Rejection::Cancelled);
        }
        if inner.state.is_in_flight() {
            return Err(Rejection::Busy);
        }
        if inner.state.is_terminal() {
            return Err(Rejection::NotScanning);
        }
        if inner.paused || inner.suspended {
            return Err(Rejection::Paused);
        }
        if inner.cooldown_until.is_some_and(|until| Instant::now() < until) {
            return Err(Rejection::CoolingDown);
        }
        if inner.last_payload.as_deref() == Some(payload) {
            return Err(Rejection::Duplicate);
        }
        Ok(())
    }

    /// Return to `Idle` after `delay` unless the session moved on meanwhile
    async fn rearm_after(&self, delay: Duration, generation: u64) {
        tokio::time::sleep(delay).await;

        let mut inner = self.lock();
        if !inner.is_current(generation) || !inner.state.is_terminal() {
            return;
        }
        tracing::info!("Re-arming scanner after failure");
        inner.rearm();
        self.publish(&inner);
    }

    /// Dismiss the visitor view or error screen and scan again
    pub fn reset(&self) {
        let mut inner = self.lock();
        if inner.cancelled {
            return;
        }
        inner.rearm();
        inner.cooldown_until = None;
        inner.failed_attempts = 0;
        self.publish(&inner);
    }

    /// Manual retry from a terminal error screen. Returns whether it re-armed.
    pub fn retry(&self) -> bool {
        let mut inner = self.lock();
        if inner.cancelled || !matches!(inner.state, SessionState::Error { .. }) {
            return false;
        }
        inner.rearm();
        inner.cooldown_until = None;
        inner.failed_attempts = 0;
        self.publish(&inner);
        true
    }

    /// End the session. Work still in flight completes without effect.
    pub fn cancel(&self) {
        let mut inner = self.lock();
        if inner.cancelled {
            return;
        }
        inner.cancelled = true;
        inner.generation += 1;
        tracing::debug!("Scan session cancelled");
    }

    /// Explicit pause of the scanner by the operator
    pub fn set_paused(&self, paused: bool) {
        let mut inner = self.lock();
        if inner.cancelled || inner.paused == paused {
            return;
        }
        inner.paused = paused;
        self.publish(&inner);
    }

    /// Backgrounding suspends scanning without touching the session state;
    /// coming back resumes it, leaving a visitor view or error screen in place.
    pub fn on_app_state(&self, lifecycle: AppLifecycle) {
        let mut inner = self.lock();
        if inner.cancelled {
            return;
        }
        inner.suspended = lifecycle == AppLifecycle::Background;
        self.publish(&inner);
    }

    /// A failure reported by the camera itself (permission revoked, device lost)
    pub fn report_camera_error(&self, message: impl Into<String>) {
        let mut inner = self.lock();
        if inner.cancelled {
            return;
        }
        inner.state = SessionState::Error {
            error: SessionError {
                category: FailureCategory::Camera,
                message: message.into(),
                attempts: inner.failed_attempts,
                terminal: true,
            },
        };
        inner.generation += 1;
        self.publish(&inner);
    }

    pub fn toggle_facing(&self) -> CameraFacing {
        let mut inner = self.lock();
        inner.facing = inner.facing.toggled();
        self.publish(&inner);
        inner.facing
    }

    /// Category attached to the view of an unregistered code
    pub fn select_category(&self, category: VisitorCategory) {
        let mut inner = self.lock();
        if inner.cancelled {
            return;
        }
        inner.selected_category = category;
        self.publish(&inner);
    }

    /// Drive the session from a camera feed until it ends or the session is
    /// cancelled. Each event is handled on its own task so bursts of decodes
    /// meet the gates while a capture is still processing.
    pub async fn run<S>(&self, feed: S)
    where
        S: Stream<Item = DecodeEvent>,
    {
        tokio::pin!(feed);
        while let Some(event) = feed.next().await {
            if self.is_cancelled() {
                break;
            }
            let session = self.clone();
            tokio::spawn(async move {
                session.handle_decode(event.data).await;
            });
        }
    }
}
