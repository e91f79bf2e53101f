//! Collection service client abstraction.
//!
//! This module provides a `CollectionClient` trait for talking to the remote
//! collection service (listing collections, fetching pages, submitting bulk
//! moves and polling their progress) plus the HTTP implementation.

mod http;
mod types;

pub use http::HttpCollectionClient;
pub use types::*;
