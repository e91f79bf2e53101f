//! Record types held by the collection store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collection_client::MoveStatus;

/// A stored company row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: Uuid,
    pub company_name: String,
    /// Whether the company is a member of the liked collection.
    pub liked: bool,
}

/// A stored collection row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub id: Uuid,
    pub collection_name: String,
}

/// Collection metadata with its authoritative member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: Uuid,
    pub collection_name: String,
    pub total: u64,
}

/// One fetched page of a collection's members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPageRecord {
    pub id: Uuid,
    pub collection_name: String,
    pub companies: Vec<CompanyRecord>,
    /// Member count of the whole collection, not of this page.
    pub total: u64,
}

/// A bulk move job row. Created `pending`, advanced by the executor, and
/// kept after settlement so progress reads stay idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveJobRecord {
    pub id: Uuid,
    pub source_collection_id: Uuid,
    pub target_collection_id: Uuid,
    pub total: u64,
    pub processed: u64,
    pub status: MoveStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MoveJobRecord {
    /// Fresh `pending` job row.
    pub fn pending(
        id: Uuid,
        source_collection_id: Uuid,
        target_collection_id: Uuid,
        total: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            source_collection_id,
            target_collection_id,
            total,
            processed: 0,
            status: MoveStatus::Pending,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Integer progress percentage. An empty job reads as complete once it
    /// settles, never as a division by zero.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return if self.status == MoveStatus::Completed {
                100
            } else {
                0
            };
        }
        ((self.processed * 100) / self.total).min(100) as u8
    }
}
