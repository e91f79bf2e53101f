//! Transfer coordinator implementation.
//!
//! Owns the observable [`TransferState`] for one invocation at a time,
//! sequences submit → poll, and absorbs every failure into the published
//! state. Consumers never receive a raised error (apart from `Busy`); they
//! read or watch the state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::collection_client::CollectionClient;
use crate::metrics;

use super::poller::poll_job;
use super::types::{MoveRequest, TransferError, TransferState};
use super::TransferConfig;

/// Drives one bulk move at a time against the collection service.
///
/// Single-owner execution model: between `.await` points nothing else
/// belonging to an invocation runs, so the published state needs no lock.
/// What must be guarded against is a *second* `start` while one is
/// unsettled; the in-flight latch rejects it with [`TransferError::Busy`]
/// before it can interleave a second polling loop over the same state.
pub struct TransferCoordinator {
    client: Arc<dyn CollectionClient>,
    config: TransferConfig,
    state_tx: watch::Sender<TransferState>,
    in_flight: AtomicBool,
    cancel_tx: broadcast::Sender<()>,
}

impl TransferCoordinator {
    /// Create a coordinator in the `Idle` state.
    pub fn new(client: Arc<dyn CollectionClient>, config: TransferConfig) -> Self {
        let (state_tx, _) = watch::channel(TransferState::Idle);
        let (cancel_tx, _) = broadcast::channel(1);

        Self {
            client,
            config,
            state_tx,
            in_flight: AtomicBool::new(false),
            cancel_tx,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TransferState {
        self.state_tx.borrow().clone()
    }

    /// Watch the state; every transition is published here.
    pub fn subscribe(&self) -> watch::Receiver<TransferState> {
        self.state_tx.subscribe()
    }

    /// Whether an invocation is currently unsettled.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Abandon tracking of the in-flight invocation.
    ///
    /// Observed at the next suspension point (submit await, status query, or
    /// inter-poll sleep); the invocation then settles in
    /// [`TransferState::Cancelled`]. A no-op when nothing is in flight.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(());
    }

    /// Run a bulk move to settlement.
    ///
    /// Returns `Err` only for [`TransferError::Busy`]; every other failure is
    /// absorbed into the returned (and published) [`TransferState::Failed`].
    /// A settled coordinator is re-entrant: the next `start` begins a fresh
    /// invocation.
    pub async fn start(&self, request: MoveRequest) -> Result<TransferState, TransferError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("rejecting start: a bulk move is already in flight");
            return Err(TransferError::Busy);
        }

        metrics::TRANSFERS_STARTED.inc();
        let settled = self.run(request).await;
        metrics::TRANSFERS_SETTLED
            .with_label_values(&[settled.phase_name()])
            .inc();

        self.in_flight.store(false, Ordering::SeqCst);
        Ok(settled)
    }

    async fn run(&self, request: MoveRequest) -> TransferState {
        // Subscribing before the first suspension point means only cancels
        // issued during this invocation are observed.
        let mut cancel_rx = self.cancel_tx.subscribe();

        self.publish(TransferState::Submitting);

        if let Err(e) = request.validate() {
            return self.fail(e);
        }

        let job_id = tokio::select! {
            _ = cancel_rx.recv() => {
                return self.settle_cancelled("before submission completed");
            }
            result = self.client.submit_move(
                &request.source_id,
                &request.target_id,
                &request.selection,
            ) => match result {
                Ok(job_id) => job_id,
                Err(e) => return self.fail(e.into()),
            }
        };

        info!(
            %job_id,
            source = %request.source_id,
            target = %request.target_id,
            companies = request.selection.len(),
            "bulk move submitted"
        );

        self.publish(TransferState::Polling { progress: 0 });

        let snapshots = poll_job(self.client.as_ref(), &job_id, &self.config);
        tokio::pin!(snapshots);

        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    return self.settle_cancelled(&job_id);
                }
                item = snapshots.next() => match item {
                    Some(Ok(snapshot)) => {
                        self.publish(TransferState::Polling {
                            progress: snapshot.progress,
                        });
                    }
                    Some(Err(e)) => return self.fail(e.into()),
                    None => {
                        info!(%job_id, "bulk move completed");
                        return self.settle(TransferState::Succeeded);
                    }
                }
            }
        }
    }

    fn publish(&self, state: TransferState) {
        self.state_tx.send_replace(state);
    }

    fn settle(&self, state: TransferState) -> TransferState {
        self.publish(state.clone());
        state
    }

    fn fail(&self, error: TransferError) -> TransferState {
        warn!(error = %error, "bulk move failed");
        self.settle(TransferState::Failed {
            error: error.to_string(),
        })
    }

    fn settle_cancelled(&self, context: &str) -> TransferState {
        info!(context, "bulk move tracking cancelled");
        self.settle(TransferState::Cancelled)
    }
}
