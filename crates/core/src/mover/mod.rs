//! Bulk move job execution.
//!
//! The mover owns the server side of a bulk move: it resolves the request
//! into a concrete set of company ids, persists a job row, and copies
//! membership into the target collection in the background while the row's
//! progress advances. Clients observe the row through the progress endpoint.

mod config;
mod executor;

pub use config::MoverConfig;
pub use executor::{BulkMover, MoveScope, MoverError};
