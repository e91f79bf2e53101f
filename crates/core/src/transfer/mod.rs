//! Bulk transfer job coordination.
//!
//! Submits a bulk move to the collection service, polls the job at a fixed
//! cadence until it settles, and publishes a single observable state that
//! consumers (a table view, a CLI, a test) re-render from:
//!
//! `idle → submitting → polling → {succeeded | failed | cancelled}`

mod config;
mod coordinator;
mod poller;
mod types;

pub use config::TransferConfig;
pub use coordinator::TransferCoordinator;
pub use poller::{poll_job, PollError};
pub use types::{MoveRequest, TransferError, TransferState};
