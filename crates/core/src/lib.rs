//! Core library for corral: company collection curation with asynchronous
//! bulk transfers.
//!
//! The client side lives in [`collection_client`] (service API) and
//! [`transfer`] (the coordinator that submits a bulk move and tracks it to
//! settlement). The server side lives in [`store`] (persistence) and
//! [`mover`] (the background job executor). [`testing`] provides mock
//! implementations for both sides.

pub mod collection_client;
pub mod config;
pub mod metrics;
pub mod mover;
pub mod store;
pub mod testing;
pub mod transfer;

pub use collection_client::{
    CollectionClient, CollectionClientError, CollectionMetadata, CollectionPage, Company,
    HttpCollectionClient, MoveProgress, MoveSelection, MoveStatus,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CollectionServiceConfig, Config,
    ConfigError, DatabaseConfig, SeedConfig, ServerConfig,
};
pub use mover::{BulkMover, MoveScope, MoverConfig, MoverError};
pub use store::{
    seed_if_needed, CollectionPageRecord, CollectionRecord, CollectionStore, CollectionSummary,
    CompanyRecord, MoveJobRecord, SeedSummary, SqliteCollectionStore, StoreError,
};
pub use transfer::{
    MoveRequest, PollError, TransferConfig, TransferCoordinator, TransferError, TransferState,
};
