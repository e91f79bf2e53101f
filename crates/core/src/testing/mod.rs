//! Testing utilities and mock implementations.
//!
//! This module provides a mock collection service client so transfer
//! behavior can be tested end to end without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use corral_core::testing::{fixtures, MockCollectionClient};
//!
//! let client = MockCollectionClient::new();
//! client.set_progress_script(vec![
//!     fixtures::pending(0),
//!     fixtures::in_progress(50),
//!     fixtures::completed(),
//! ]).await;
//!
//! // Use in a TransferCoordinator...
//! ```

mod mock_collection_client;

pub use mock_collection_client::{MockCollectionClient, RecordedSubmission};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::collection_client::{
        CollectionPage, Company, MoveProgress, MoveStatus,
    };

    /// A `pending` snapshot with the given progress.
    pub fn pending(progress: u8) -> MoveProgress {
        MoveProgress {
            status: MoveStatus::Pending,
            progress,
            error: None,
        }
    }

    /// An `in_progress` snapshot with the given progress.
    pub fn in_progress(progress: u8) -> MoveProgress {
        MoveProgress {
            status: MoveStatus::InProgress,
            progress,
            error: None,
        }
    }

    /// A terminal `completed` snapshot.
    pub fn completed() -> MoveProgress {
        MoveProgress {
            status: MoveStatus::Completed,
            progress: 100,
            error: None,
        }
    }

    /// A terminal `error` snapshot with a server-supplied message.
    pub fn errored(message: &str) -> MoveProgress {
        MoveProgress {
            status: MoveStatus::Error,
            progress: 0,
            error: Some(message.to_string()),
        }
    }

    /// A terminal `error` snapshot without a message, exercising the generic
    /// fallback path.
    pub fn errored_bare() -> MoveProgress {
        MoveProgress {
            status: MoveStatus::Error,
            progress: 0,
            error: None,
        }
    }

    /// A company record with reasonable defaults.
    pub fn company(id: &str, name: &str) -> Company {
        Company {
            id: id.to_string(),
            company_name: name.to_string(),
            liked: false,
        }
    }

    /// A one-page collection holding the given companies.
    pub fn collection_page(id: &str, name: &str, companies: Vec<Company>) -> CollectionPage {
        let total = companies.len() as u64;
        CollectionPage {
            id: id.to_string(),
            collection_name: name.to_string(),
            companies,
            total,
        }
    }
}
