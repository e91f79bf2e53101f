//! Server-side persistence for collections, companies and move jobs.
//!
//! The [`CollectionStore`] trait abstracts storage; [`SqliteCollectionStore`]
//! is the shipped implementation (file-backed, or in-memory for tests).

mod seed;
mod sqlite;
mod types;

pub use seed::{seed_if_needed, SeedSummary};
pub use sqlite::SqliteCollectionStore;
pub use types::*;

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(Uuid),

    #[error("job not found: {0}")]
    JobNotFound(Uuid),
}

/// Trait for collection storage backends.
pub trait CollectionStore: Send + Sync {
    /// All collections with their authoritative member counts.
    fn list_collections(&self) -> Result<Vec<CollectionSummary>, StoreError>;

    /// One page of a collection's members, liked markers included.
    fn collection_page(
        &self,
        id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<CollectionPageRecord, StoreError>;

    /// Every member id of a collection, in insertion order.
    fn collection_company_ids(&self, id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    /// Create a collection and return its record.
    fn create_collection(&self, name: &str) -> Result<CollectionRecord, StoreError>;

    /// Look a collection up by id.
    fn collection(&self, id: Uuid) -> Result<CollectionRecord, StoreError>;

    /// Create `names.len()` companies and return their ids, in order.
    fn create_companies(&self, names: &[String]) -> Result<Vec<Uuid>, StoreError>;

    /// Add members to a collection, skipping ids already present.
    /// Returns how many rows were actually inserted.
    fn insert_members(&self, collection_id: Uuid, company_ids: &[Uuid])
        -> Result<u64, StoreError>;

    /// Persist a new move job row.
    fn create_job(&self, job: &MoveJobRecord) -> Result<(), StoreError>;

    /// Update the processed counter of a running job.
    fn set_job_progress(&self, id: Uuid, processed: u64) -> Result<(), StoreError>;

    /// Settle or advance a job's status.
    fn set_job_status(
        &self,
        id: Uuid,
        status: crate::collection_client::MoveStatus,
        error: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Fetch a job row.
    fn job(&self, id: Uuid) -> Result<MoveJobRecord, StoreError>;

    /// Whether first-start seeding already ran.
    fn is_seeded(&self) -> Result<bool, StoreError>;

    /// Record that seeding ran.
    fn mark_seeded(&self) -> Result<(), StoreError>;
}
