//! Types for the transfer coordinator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collection_client::{CollectionClientError, MoveSelection};

use super::poller::PollError;

/// Errors that can occur while coordinating a bulk transfer.
///
/// Apart from [`TransferError::Busy`], none of these reach a consumer as a
/// raised error; the coordinator absorbs them into
/// [`TransferState::Failed`].
#[derive(Debug, Error)]
pub enum TransferError {
    /// Bad caller input, rejected before any network call.
    #[error("invalid move request: {0}")]
    Validation(String),

    /// Transport failure or service contract violation.
    #[error(transparent)]
    Client(#[from] CollectionClientError),

    /// The service reported the job as failed.
    #[error("{0}")]
    JobFailed(String),

    /// The attempt budget ran out before the job reached a terminal state.
    #[error("bulk move timed out after {attempts} status checks")]
    TimedOut { attempts: u32 },

    /// A new invocation was attempted while one is unsettled. The in-flight
    /// invocation is not disturbed.
    #[error("a bulk move is already in flight")]
    Busy,
}

impl From<PollError> for TransferError {
    fn from(e: PollError) -> Self {
        match e {
            PollError::Client(inner) => TransferError::Client(inner),
            PollError::JobFailed(message) => TransferError::JobFailed(message),
            PollError::TimedOut { attempts } => TransferError::TimedOut { attempts },
        }
    }
}

/// A bulk move request: which members of `source_id` to move into
/// `target_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub source_id: String,
    pub target_id: String,
    pub selection: MoveSelection,
}

impl MoveRequest {
    /// Move the entire source collection.
    pub fn all(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            selection: MoveSelection::All,
        }
    }

    /// Move an explicit subset of members.
    pub fn subset(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        ids: Vec<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            selection: MoveSelection::Subset(ids),
        }
    }

    /// Reject requests that must never reach the service: missing ids, a
    /// self-move, or a subset that selects nothing. "Move nothing" is not a
    /// submit; callers wanting the whole collection use
    /// [`MoveSelection::All`].
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.source_id.trim().is_empty() || self.target_id.trim().is_empty() {
            return Err(TransferError::Validation(
                "source and target collection ids are required".to_string(),
            ));
        }
        if self.source_id == self.target_id {
            return Err(TransferError::Validation(
                "source and target collections must differ".to_string(),
            ));
        }
        if self.selection.is_empty() {
            return Err(TransferError::Validation(
                "company id subset is empty; use MoveSelection::All to move everything"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Observable state of one coordinator invocation.
///
/// A tagged enum instead of loose `loading`/`progress`/`error`/`success`
/// flags, so contradictory combinations cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TransferState {
    /// No invocation yet, or ready for the next one.
    Idle,
    /// The move request is being submitted.
    Submitting,
    /// The job is being tracked; `progress` is the latest reported
    /// percentage, not necessarily monotonic.
    Polling { progress: u8 },
    /// The job reached `completed`.
    Succeeded,
    /// The invocation failed; `error` keeps the most specific message
    /// available (server-supplied text over generic fallbacks).
    Failed { error: String },
    /// Tracking was abandoned by the caller. The job may still be running
    /// server-side.
    Cancelled,
}

impl TransferState {
    /// A settled state will not change without a new `start` call.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            TransferState::Succeeded | TransferState::Failed { .. } | TransferState::Cancelled
        )
    }

    /// Whether an invocation is currently in flight.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TransferState::Submitting | TransferState::Polling { .. }
        )
    }

    /// Progress percentage to render: the latest reported value while
    /// polling, 100 once succeeded.
    pub fn progress(&self) -> u8 {
        match self {
            TransferState::Polling { progress } => *progress,
            TransferState::Succeeded => 100,
            _ => 0,
        }
    }

    /// The failure message, if settled in failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            TransferState::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Short phase name for logs and metrics labels.
    pub fn phase_name(&self) -> &'static str {
        match self {
            TransferState::Idle => "idle",
            TransferState::Submitting => "submitting",
            TransferState::Polling { .. } => "polling",
            TransferState::Succeeded => "succeeded",
            TransferState::Failed { .. } => "failed",
            TransferState::Cancelled => "cancelled",
        }
    }
}

impl Default for TransferState {
    fn default() -> Self {
        TransferState::Idle
    }
}
