use crate::analysis::AnalysisResult;
use crate::inference::{AnalysisError, ErrorKind, ImageError, UploadedImage};
use tokio_util::sync::CancellationToken;

/// Identifies one analysis. Outcomes carrying an older ticket are stale.
pub type Ticket = u64;

/// Error retained in the upload prompt after a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    /// Text shown to the user.
    pub message: String,
    /// Preserved for logging only.
    pub kind: ErrorKind,
}

impl From<&AnalysisError> for SessionFailure {
    fn from(error: &AnalysisError) -> Self {
        Self {
            message: error.user_message(),
            kind: error.kind(),
        }
    }
}

impl From<&ImageError> for SessionFailure {
    fn from(error: &ImageError) -> Self {
        Self {
            message: error.to_string(),
            kind: ErrorKind::Validation,
        }
    }
}

/// The user-visible lifecycle of an analysis.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// Waiting for an image, possibly showing the previous failure.
    Idle { error: Option<SessionFailure> },
    /// One provider call is in flight for `image`.
    Analyzing {
        image: UploadedImage,
        ticket: Ticket,
        cancel: CancellationToken,
    },
    /// A validated result is on screen.
    Displaying {
        image: UploadedImage,
        result: AnalysisResult,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle { .. } => "idle",
            SessionState::Analyzing { .. } => "analyzing",
            SessionState::Displaying { .. } => "displaying",
        }
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        match self {
            SessionState::Idle { .. } => None,
            SessionState::Analyzing { image, .. } | SessionState::Displaying { image, .. } => {
                Some(image)
            }
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            SessionState::Displaying { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SessionFailure> {
        match self {
            SessionState::Idle { error } => error.as_ref(),
            _ => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle { error: None }
    }
}
