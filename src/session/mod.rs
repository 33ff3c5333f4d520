//! Application state machine: idle, analyzing, displaying.

mod driver;
mod state;

pub use driver::{AnalysisOutcome, AnalysisSession, Completion, PendingAnalysis, SessionError};
pub use state::{SessionFailure, SessionState, Ticket};
