//! Single-writer driver of the session state machine.
//!
//! `select` hands out a [`PendingAnalysis`] which performs the provider call
//! without borrowing the session; its [`AnalysisOutcome`] is fed back through
//! `complete`. This keeps the session renderable while the call is pending.

use super::state::{SessionFailure, SessionState, Ticket};
use crate::analysis::AnalysisResult;
use crate::inference::{
    AnalysisError, ImageError, ImageInput, InferenceClient, PromptTemplate, UploadedImage,
};
use crate::view::{render, View};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("An analysis is already running")]
    Busy,

    #[error("A result is displayed, reset before selecting a new image")]
    ResultDisplayed,

    #[error("{0}")]
    Validation(#[from] ImageError),
}

/// Result of one provider call, tagged with the analysis it belongs to.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Finished {
        ticket: Ticket,
        result: Result<AnalysisResult, AnalysisError>,
    },
    Cancelled {
        ticket: Ticket,
    },
}

impl AnalysisOutcome {
    pub fn ticket(&self) -> Ticket {
        match self {
            AnalysisOutcome::Finished { ticket, .. } | AnalysisOutcome::Cancelled { ticket } => {
                *ticket
            }
        }
    }
}

/// What `complete` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The outcome belonged to an analysis that was reset.
    Discarded,
}

/// The in-flight half of an analysis. Owns everything the call needs.
pub struct PendingAnalysis {
    ticket: Ticket,
    client: InferenceClient,
    prompt: Arc<PromptTemplate>,
    image: UploadedImage,
    cancel: CancellationToken,
}

impl fmt::Debug for PendingAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAnalysis")
            .field("ticket", &self.ticket)
            .field("image", &self.image)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl PendingAnalysis {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Performs the provider call. Resolves early with `Cancelled` if the
    /// session is reset meanwhile.
    pub async fn run(self) -> AnalysisOutcome {
        let ticket = self.ticket;
        tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!(ticket, "Analysis cancelled");
                AnalysisOutcome::Cancelled { ticket }
            }
            result = self.client.analyze(&self.image, &self.prompt) => {
                AnalysisOutcome::Finished { ticket, result }
            }
        }
    }
}

/// Owns the current [`SessionState`]. All transitions go through `&mut self`.
pub struct AnalysisSession {
    client: InferenceClient,
    prompt: Arc<PromptTemplate>,
    state: SessionState,
    next_ticket: Ticket,
}

impl AnalysisSession {
    pub fn new(client: InferenceClient) -> Self {
        Self::with_prompt(client, PromptTemplate::seasonal())
    }

    pub fn with_prompt(client: InferenceClient, prompt: PromptTemplate) -> Self {
        Self {
            client,
            prompt: Arc::new(prompt),
            state: SessionState::default(),
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn client(&self) -> &InferenceClient {
        &self.client
    }

    pub fn view(&self) -> View<'_> {
        render(&self.state)
    }

    /// `Idle -> Analyzing`. Missing or invalid input keeps the session idle
    /// with the validation error retained for display.
    pub fn select(&mut self, input: Option<ImageInput>) -> Result<PendingAnalysis, SessionError> {
        match &self.state {
            SessionState::Analyzing { ticket, .. } => {
                debug!(ticket, "Selection rejected while analyzing");
                return Err(SessionError::Busy);
            }
            SessionState::Displaying { .. } => return Err(SessionError::ResultDisplayed),
            SessionState::Idle { .. } => {}
        }

        let image = input
            .ok_or(ImageError::Missing)
            .and_then(UploadedImage::decode)
            .inspect_err(|e| {
                warn!(error = %e, "Rejected image selection");
                self.state = SessionState::Idle {
                    error: Some(SessionFailure::from(e)),
                };
            })?;

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let cancel = CancellationToken::new();

        info!(
            ticket,
            format = %image.format(),
            size = image.size(),
            "Starting analysis"
        );

        self.state = SessionState::Analyzing {
            image: image.clone(),
            ticket,
            cancel: cancel.clone(),
        };

        Ok(PendingAnalysis {
            ticket,
            client: self.client.clone(),
            prompt: self.prompt.clone(),
            image,
            cancel,
        })
    }

    /// Applies the outcome of the current analysis. Outcomes of an analysis
    /// that was reset are discarded.
    pub fn complete(&mut self, outcome: AnalysisOutcome) -> Completion {
        let current = match &self.state {
            SessionState::Analyzing { ticket, .. } => Some(*ticket),
            _ => None,
        };
        if current != Some(outcome.ticket()) {
            debug!(
                ticket = outcome.ticket(),
                state = self.state.name(),
                "Discarding stale analysis outcome"
            );
            return Completion::Discarded;
        }

        let previous = std::mem::take(&mut self.state);
        self.state = match (previous, outcome) {
            (SessionState::Analyzing { image, .. }, AnalysisOutcome::Finished { result, .. }) => {
                match result {
                    Ok(result) => SessionState::Displaying { image, result },
                    // The image is dropped with the failed analysis.
                    Err(e) => SessionState::Idle {
                        error: Some(SessionFailure::from(&e)),
                    },
                }
            }
            (_, AnalysisOutcome::Cancelled { .. }) | (_, AnalysisOutcome::Finished { .. }) => {
                SessionState::Idle { error: None }
            }
        };

        debug!(state = self.state.name(), "Analysis outcome applied");
        Completion::Applied
    }

    /// Returns to a clean `Idle` from any state, cancelling an in-flight call
    /// and dropping any retained error.
    pub fn reset(&mut self) {
        match &self.state {
            SessionState::Idle { error } => {
                if error.is_some() {
                    debug!("Clearing retained error");
                }
            }
            SessionState::Analyzing { ticket, cancel, .. } => {
                info!(ticket, "Cancelling in-flight analysis");
                cancel.cancel();
            }
            SessionState::Displaying { .. } => {
                debug!("Discarding displayed result");
            }
        }
        self.state = SessionState::Idle { error: None };
    }

    /// Runs one analysis to completion and applies its outcome.
    pub async fn analyze(&mut self, input: Option<ImageInput>) -> Result<(), SessionError> {
        let pending = self.select(input)?;
        let outcome = pending.run().await;
        self.complete(outcome);
        Ok(())
    }
}
