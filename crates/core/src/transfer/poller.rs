//! Job progress polling.
//!
//! [`poll_job`] turns the service's pull-based progress endpoint into a lazy,
//! finite stream of snapshots. Status queries are strictly sequential: query
//! N+1 is never issued before query N's response and the inter-poll delay
//! have resolved, so observed progress values form a total order matching
//! issue order.

use std::time::Duration;

use futures::{stream, Stream};
use thiserror::Error;
use tracing::debug;

use crate::collection_client::{CollectionClient, CollectionClientError, MoveProgress, MoveStatus};

use super::TransferConfig;

/// Fallback message when the service reports `error` without a message.
pub(crate) const GENERIC_FAILURE: &str = "bulk move failed";

/// Errors that terminate a polling sequence.
#[derive(Debug, Error)]
pub enum PollError {
    /// Status query failed at the transport or contract level.
    #[error(transparent)]
    Client(#[from] CollectionClientError),

    /// The service reported `status: "error"`. Carries the server-supplied
    /// message, or a generic fallback when the service sent none.
    #[error("{0}")]
    JobFailed(String),

    /// The attempt budget was exhausted without a terminal status. The job
    /// may still be running server-side; the client's view is stale from
    /// here on, not authoritative.
    #[error("bulk move timed out after {attempts} status checks")]
    TimedOut { attempts: u32 },
}

#[derive(Debug, Clone, Copy, Default)]
struct PollState {
    attempts: u32,
    finished: bool,
}

/// Poll a job until it settles.
///
/// Produces each non-terminal snapshot (so consumers can render progress),
/// then the `completed` snapshot before ending, or terminates with
/// [`PollError`]. Exactly one status query is issued per emitted item, with
/// a fixed `poll_interval_ms` sleep between consecutive queries; after
/// `max_poll_attempts` queries without a terminal status the stream ends in
/// [`PollError::TimedOut`].
///
/// The stream is finite and not restartable. It does nothing until polled,
/// and dropping it between items abandons the in-flight query; cancellation
/// is therefore a consumer-side `select` at each item boundary.
pub fn poll_job<'a, C>(
    client: &'a C,
    job_id: &'a str,
    config: &TransferConfig,
) -> impl Stream<Item = Result<MoveProgress, PollError>> + 'a
where
    C: CollectionClient + ?Sized,
{
    let interval = Duration::from_millis(config.poll_interval_ms);
    let max_attempts = config.max_poll_attempts;

    stream::try_unfold(PollState::default(), move |mut state| async move {
        if state.finished {
            return Ok(None);
        }

        // The delay sits between queries, never before the first one.
        if state.attempts > 0 {
            tokio::time::sleep(interval).await;
        }

        if state.attempts >= max_attempts {
            return Err(PollError::TimedOut {
                attempts: state.attempts,
            });
        }

        let snapshot = client.move_progress(job_id).await?;
        state.attempts += 1;

        debug!(
            job_id,
            attempt = state.attempts,
            status = snapshot.status.as_str(),
            progress = snapshot.progress,
            "job status"
        );

        match snapshot.status {
            MoveStatus::Error => Err(PollError::JobFailed(
                snapshot
                    .error
                    .clone()
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            )),
            MoveStatus::Completed => {
                state.finished = true;
                Ok(Some((snapshot, state)))
            }
            MoveStatus::Pending | MoveStatus::InProgress => Ok(Some((snapshot, state))),
        }
    })
}
