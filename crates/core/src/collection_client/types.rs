//! Types for collection service operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during collection service operations.
#[derive(Debug, Error)]
pub enum CollectionClientError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request timeout")]
    Timeout,

    /// Non-success HTTP status. The response body is preserved verbatim for
    /// diagnosability.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A well-formed success response that violates the API contract, e.g. a
    /// submit response without a job id.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl CollectionClientError {
    /// Whether this is an infrastructure-level failure as opposed to a
    /// contract violation by the service.
    pub fn is_transport(&self) -> bool {
        !matches!(self, CollectionClientError::MalformedResponse(_))
    }
}

/// A company record as held by the remote service.
///
/// Immutable from the client's perspective; bulk moves change collection
/// membership, not the record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub company_name: String,
    pub liked: bool,
}

/// Collection metadata without member records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub id: String,
    pub collection_name: String,
    /// Server-authoritative member count, independent of any fetched page.
    pub total: u64,
}

/// One fetched page of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPage {
    pub id: String,
    pub collection_name: String,
    pub companies: Vec<Company>,
    /// Server-authoritative member count, independent of this page.
    pub total: u64,
}

/// Status of a bulk move job as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    Pending,
    InProgress,
    Completed,
    Error,
}

impl MoveStatus {
    /// Returns the string representation for API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveStatus::Pending => "pending",
            MoveStatus::InProgress => "in_progress",
            MoveStatus::Completed => "completed",
            MoveStatus::Error => "error",
        }
    }

    /// `completed` and `error` are terminal: no further progress changes
    /// occur once a job reaches either.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MoveStatus::Completed | MoveStatus::Error)
    }
}

/// One progress snapshot of a bulk move job.
///
/// `progress` is an integer percentage. The service may report a corrected
/// lower value on a later snapshot; consumers must not assume monotonicity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveProgress {
    pub status: MoveStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which members of the source collection a bulk move covers.
///
/// The wire format expresses "everything" as an empty `company_ids` array;
/// this enum keeps that sentinel out of the rest of the codebase. A caller
/// that wants to move nothing must not submit at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveSelection {
    /// Move the entire source collection.
    All,
    /// Move the given member ids, in order.
    Subset(Vec<String>),
}

impl MoveSelection {
    /// The ids as they appear on the wire: an empty slice means "all".
    pub fn wire_ids(&self) -> &[String] {
        match self {
            MoveSelection::All => &[],
            MoveSelection::Subset(ids) => ids,
        }
    }

    /// Number of explicitly selected ids (0 for `All`).
    pub fn len(&self) -> usize {
        self.wire_ids().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MoveSelection::Subset(ids) if ids.is_empty())
    }
}

/// Trait for collection service backends.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// List all collections (metadata only).
    async fn list_collections(&self) -> Result<Vec<CollectionMetadata>, CollectionClientError>;

    /// Fetch one page of a collection's members.
    async fn collection_page(
        &self,
        id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<CollectionPage, CollectionClientError>;

    /// Submit a bulk move and return the opaque job id assigned by the
    /// service. No local state is touched here; tracking is the
    /// coordinator's job.
    async fn submit_move(
        &self,
        source_id: &str,
        target_id: &str,
        selection: &MoveSelection,
    ) -> Result<String, CollectionClientError>;

    /// Fetch the current progress snapshot of a job.
    async fn move_progress(&self, job_id: &str) -> Result<MoveProgress, CollectionClientError>;
}
