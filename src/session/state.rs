//! Scan session states and observable outcomes

use serde::Serialize;

use crate::{
    error::AppError,
    models::{ResolvedVisitorView, VisitorCategory},
};

/// Lifecycle of one capture
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for a decode event
    Idle,
    Captured { code: String },
    Processing { code: String },
    /// Visitor view on screen until reset
    Resolved { view: Box<ResolvedVisitorView> },
    Error { error: SessionError },
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Resolved { .. } | SessionState::Error { .. })
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionState::Captured { .. } | SessionState::Processing { .. })
    }
}

/// User-facing failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    Camera,
    Network,
    Store,
    Scanning,
}

impl From<&AppError> for FailureCategory {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::TransientStore(_) | AppError::ProcessingTimeout(_) => FailureCategory::Network,
            AppError::Validation(_) => FailureCategory::Scanning,
            AppError::NonRetryableStore(_)
            | AppError::Indeterminate(_)
            | AppError::NotFound(_)
            | AppError::Config(_)
            | AppError::Internal(_) => FailureCategory::Store,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionError {
    pub category: FailureCategory,
    pub message: String,
    /// Failed attempts so far for the current capture
    pub attempts: u32,
    /// No automatic re-arm follows; manual retry or reset is required
    pub terminal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    Back,
    Front,
}

impl CameraFacing {
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }
}

/// Host application lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycle {
    Active,
    Background,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Camera feed should be enabled
    pub scanning: bool,
    pub paused: bool,
    pub suspended: bool,
    pub facing: CameraFacing,
    pub selected_category: VisitorCategory,
}

/// Why a decode event did not start a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Cancelled,
    /// A capture is already being processed
    Busy,
    /// A visitor view or error screen is showing
    NotScanning,
    Paused,
    CoolingDown,
    /// Same payload as the previous capture
    Duplicate,
    Invalid,
}

/// Result of feeding one decode event to the session
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Rejected(Rejection),
    Resolved(Box<ResolvedVisitorView>),
    Failed(SessionError),
    /// Finished after cancellation or reset; state left untouched
    Discarded,
}

/// A camera decode event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeEvent {
    pub data: String,
}

impl From<&str> for DecodeEvent {
    fn from(data: &str) -> Self {
        Self {
            data: data.to_string(),
        }
    }
}
