use std::sync::Arc;

use corral_core::{BulkMover, CollectionStore, Config};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<dyn CollectionStore>,
    mover: BulkMover,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn CollectionStore>, mover: BulkMover) -> Self {
        Self {
            config,
            store,
            mover,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &dyn CollectionStore {
        self.store.as_ref()
    }

    pub fn mover(&self) -> &BulkMover {
        &self.mover
    }
}
