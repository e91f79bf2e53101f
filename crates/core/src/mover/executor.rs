//! Bulk move executor implementation.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::collection_client::MoveStatus;
use crate::metrics;
use crate::store::{CollectionStore, MoveJobRecord, StoreError};

use super::config::MoverConfig;

/// Error type for mover operations.
#[derive(Debug, Error)]
pub enum MoverError {
    /// Store error (including unknown source/target collections).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which members of the source collection a job covers, with ids already
/// parsed. The wire's empty-array sentinel is decoded at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveScope {
    /// Every current member of the source collection.
    All,
    /// The given member ids.
    Subset(Vec<Uuid>),
}

/// Executes bulk moves as background jobs.
///
/// `submit` returns as soon as the job row exists; copying happens in a
/// spawned task that advances the row batch by batch. Duplicates already in
/// the target are skipped by the insert but still count as processed, and
/// the job row outlives completion so progress reads stay idempotent.
pub struct BulkMover {
    store: Arc<dyn CollectionStore>,
    config: MoverConfig,
}

impl BulkMover {
    /// Create a new mover on top of a store.
    pub fn new(store: Arc<dyn CollectionStore>, config: MoverConfig) -> Self {
        Self { store, config }
    }

    /// Accept a bulk move and return its job id.
    ///
    /// Both collections must exist. An `All` scope over an empty source is
    /// accepted and completes immediately with nothing to do.
    pub fn submit(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        scope: MoveScope,
    ) -> Result<Uuid, MoverError> {
        self.store.collection(source_id)?;
        self.store.collection(target_id)?;

        let company_ids = match scope {
            MoveScope::All => self.store.collection_company_ids(source_id)?,
            MoveScope::Subset(ids) => ids,
        };

        let job = MoveJobRecord::pending(
            Uuid::new_v4(),
            source_id,
            target_id,
            company_ids.len() as u64,
        );
        self.store.create_job(&job)?;
        metrics::MOVE_JOBS_STARTED.inc();

        info!(
            job_id = %job.id,
            source = %source_id,
            target = %target_id,
            companies = company_ids.len(),
            "bulk move job accepted"
        );

        let store = Arc::clone(&self.store);
        let config = self.config.clone();
        let job_id = job.id;
        tokio::spawn(async move {
            run_job(store, config, job_id, target_id, company_ids).await;
        });

        Ok(job_id)
    }
}

/// Copy memberships into the target, advancing the job row as batches land.
async fn run_job(
    store: Arc<dyn CollectionStore>,
    config: MoverConfig,
    job_id: Uuid,
    target_id: Uuid,
    company_ids: Vec<Uuid>,
) {
    if let Err(e) = store.set_job_status(job_id, MoveStatus::InProgress, None) {
        warn!(job_id = %job_id, error = %e, "failed to start job");
        return;
    }

    let batch_size = config.batch_size.max(1);
    let mut processed = 0u64;

    for batch in company_ids.chunks(batch_size) {
        if config.insert_throttle_ms > 0 {
            let delay = config.insert_throttle_ms * batch.len() as u64;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        match store.insert_members(target_id, batch) {
            Ok(inserted) => {
                metrics::COMPANIES_COPIED.inc_by(inserted);
                processed += batch.len() as u64;
                debug!(job_id = %job_id, processed, "bulk move batch copied");
                if let Err(e) = store.set_job_progress(job_id, processed) {
                    warn!(job_id = %job_id, error = %e, "failed to record progress");
                }
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "bulk move job failed");
                settle(&store, job_id, MoveStatus::Error, Some(&e.to_string()));
                return;
            }
        }
    }

    info!(job_id = %job_id, processed, "bulk move job completed");
    settle(&store, job_id, MoveStatus::Completed, None);
}

fn settle(store: &Arc<dyn CollectionStore>, job_id: Uuid, status: MoveStatus, error: Option<&str>) {
    metrics::MOVE_JOBS_SETTLED
        .with_label_values(&[status.as_str()])
        .inc();
    if let Err(e) = store.set_job_status(job_id, status, error) {
        warn!(job_id = %job_id, error = %e, "failed to settle job");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteCollectionStore;

    fn harness() -> (Arc<SqliteCollectionStore>, BulkMover) {
        let store = Arc::new(SqliteCollectionStore::in_memory("Liked Companies List").unwrap());
        let mover = BulkMover::new(
            Arc::clone(&store) as Arc<dyn CollectionStore>,
            MoverConfig {
                batch_size: 2,
                insert_throttle_ms: 0,
            },
        );
        (store, mover)
    }

    async fn wait_for_terminal(store: &SqliteCollectionStore, job_id: Uuid) -> MoveJobRecord {
        for _ in 0..200 {
            let job = store.job(job_id).unwrap();
            if job.status.is_terminal() {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {job_id} never settled");
    }

    #[tokio::test]
    async fn test_move_all_completes() {
        let (store, mover) = harness();
        let source = store.create_collection("Source").unwrap();
        let target = store.create_collection("Target").unwrap();
        let ids = store
            .create_companies(&(0..5).map(|i| format!("Company {i}")).collect::<Vec<_>>())
            .unwrap();
        store.insert_members(source.id, &ids).unwrap();

        let job_id = mover.submit(source.id, target.id, MoveScope::All).unwrap();
        let job = wait_for_terminal(&store, job_id).await;

        assert_eq!(job.status, MoveStatus::Completed);
        assert_eq!(job.total, 5);
        assert_eq!(job.processed, 5);
        assert_eq!(job.percent(), 100);
        assert_eq!(store.collection_company_ids(target.id).unwrap().len(), 5);
        // The source keeps its members; a move copies membership in.
        assert_eq!(store.collection_company_ids(source.id).unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_move_subset_skips_existing_target_members() {
        let (store, mover) = harness();
        let source = store.create_collection("Source").unwrap();
        let target = store.create_collection("Target").unwrap();
        let ids = store
            .create_companies(&(0..4).map(|i| format!("Company {i}")).collect::<Vec<_>>())
            .unwrap();
        store.insert_members(source.id, &ids).unwrap();
        store.insert_members(target.id, &ids[..1]).unwrap();

        let job_id = mover
            .submit(source.id, target.id, MoveScope::Subset(ids[..3].to_vec()))
            .unwrap();
        let job = wait_for_terminal(&store, job_id).await;

        assert_eq!(job.status, MoveStatus::Completed);
        // Already-present members still count as processed.
        assert_eq!(job.processed, 3);
        assert_eq!(store.collection_company_ids(target.id).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_move_empty_source_completes_immediately() {
        let (store, mover) = harness();
        let source = store.create_collection("Source").unwrap();
        let target = store.create_collection("Target").unwrap();

        let job_id = mover.submit(source.id, target.id, MoveScope::All).unwrap();
        let job = wait_for_terminal(&store, job_id).await;

        assert_eq!(job.status, MoveStatus::Completed);
        assert_eq!(job.total, 0);
        assert_eq!(job.percent(), 100);
    }

    #[tokio::test]
    async fn test_submit_unknown_collection_is_rejected() {
        let (store, mover) = harness();
        let target = store.create_collection("Target").unwrap();

        let result = mover.submit(Uuid::new_v4(), target.id, MoveScope::All);
        assert!(matches!(
            result,
            Err(MoverError::Store(StoreError::CollectionNotFound(_)))
        ));
    }
}
