//! Mock collection service client for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::collection_client::{
    CollectionClient, CollectionClientError, CollectionMetadata, CollectionPage, MoveProgress,
    MoveSelection, MoveStatus,
};

/// A recorded bulk move submission for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    pub source_id: String,
    pub target_id: String,
    /// Ids exactly as they would appear on the wire (empty = all).
    pub company_ids: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Mock implementation of the [`CollectionClient`] trait.
///
/// Provides controllable behavior for testing:
/// - Track submissions for assertions
/// - Script the progress snapshots a job reports
/// - Simulate transport and contract failures
///
/// A progress script is consumed snapshot by snapshot; the final snapshot
/// repeats on every further query, mirroring the service's idempotent
/// progress endpoint for settled jobs.
pub struct MockCollectionClient {
    collections: Arc<RwLock<Vec<CollectionPage>>>,
    submissions: Arc<RwLock<Vec<RecordedSubmission>>>,
    progress_script: Arc<RwLock<Vec<MoveProgress>>>,
    progress_counts: Arc<RwLock<HashMap<String, u32>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CollectionClientError>>>,
    /// Artificial latency before submit resolves (for Busy-window tests).
    submit_delay: Arc<RwLock<Option<Duration>>>,
    job_id: Arc<RwLock<String>>,
}

impl Default for MockCollectionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCollectionClient {
    /// Create a new mock client that reports any job as immediately
    /// completed until a script is installed.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(Vec::new())),
            submissions: Arc::new(RwLock::new(Vec::new())),
            progress_script: Arc::new(RwLock::new(Vec::new())),
            progress_counts: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            submit_delay: Arc::new(RwLock::new(None)),
            job_id: Arc::new(RwLock::new("mock-job-1".to_string())),
        }
    }

    /// Pre-populate a collection (for list/page operations).
    pub async fn add_collection(&self, page: CollectionPage) {
        self.collections.write().await.push(page);
    }

    /// Get all recorded submissions.
    pub async fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.read().await.clone()
    }

    /// Install the sequence of snapshots the next job reports. The last
    /// entry repeats once the script is exhausted.
    pub async fn set_progress_script(&self, script: Vec<MoveProgress>) {
        let mut guard = self.progress_script.write().await;
        *guard = script;
        guard.reverse(); // consumed by pop()
    }

    /// Number of progress queries issued for a job so far.
    pub async fn progress_queries(&self, job_id: &str) -> u32 {
        self.progress_counts
            .read()
            .await
            .get(job_id)
            .copied()
            .unwrap_or(0)
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CollectionClientError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay submit responses, widening the window in which a second
    /// `start` can be attempted.
    pub async fn set_submit_delay(&self, delay: Duration) {
        *self.submit_delay.write().await = Some(delay);
    }

    /// Override the job id handed out at submission.
    pub async fn set_job_id(&self, job_id: impl Into<String>) {
        *self.job_id.write().await = job_id.into();
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<CollectionClientError> {
        self.next_error.write().await.take()
    }

    fn next_snapshot(script: &mut Vec<MoveProgress>) -> MoveProgress {
        match script.len() {
            0 => MoveProgress {
                status: MoveStatus::Completed,
                progress: 100,
                error: None,
            },
            1 => script[0].clone(),
            _ => script.pop().expect("script is non-empty"),
        }
    }
}

#[async_trait]
impl CollectionClient for MockCollectionClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_collections(&self) -> Result<Vec<CollectionMetadata>, CollectionClientError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .collections
            .read()
            .await
            .iter()
            .map(|page| CollectionMetadata {
                id: page.id.clone(),
                collection_name: page.collection_name.clone(),
                total: page.total,
            })
            .collect())
    }

    async fn collection_page(
        &self,
        id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<CollectionPage, CollectionClientError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let collections = self.collections.read().await;
        let page = collections
            .iter()
            .find(|page| page.id == id)
            .ok_or_else(|| CollectionClientError::Http {
                status: 404,
                body: format!("collection {} not found", id),
            })?;

        let companies: Vec<_> = page
            .companies
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(CollectionPage {
            id: page.id.clone(),
            collection_name: page.collection_name.clone(),
            companies,
            total: page.total,
        })
    }

    async fn submit_move(
        &self,
        source_id: &str,
        target_id: &str,
        selection: &MoveSelection,
    ) -> Result<String, CollectionClientError> {
        let delay = *self.submit_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.submissions.write().await.push(RecordedSubmission {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            company_ids: selection.wire_ids().to_vec(),
            timestamp: Utc::now(),
        });

        Ok(self.job_id.read().await.clone())
    }

    async fn move_progress(&self, job_id: &str) -> Result<MoveProgress, CollectionClientError> {
        {
            let mut counts = self.progress_counts.write().await;
            *counts.entry(job_id.to_string()).or_insert(0) += 1;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let mut script = self.progress_script.write().await;
        Ok(Self::next_snapshot(&mut script))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_records_submissions() {
        let client = MockCollectionClient::new();

        client
            .submit_move("src", "dst", &MoveSelection::All)
            .await
            .unwrap();
        client
            .submit_move(
                "src",
                "dst",
                &MoveSelection::Subset(vec!["a".into(), "b".into()]),
            )
            .await
            .unwrap();

        let submissions = client.submissions().await;
        assert_eq!(submissions.len(), 2);
        assert!(submissions[0].company_ids.is_empty());
        assert_eq!(submissions[1].company_ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_progress_script_consumed_in_order() {
        let client = MockCollectionClient::new();
        client
            .set_progress_script(vec![
                fixtures::pending(0),
                fixtures::in_progress(60),
                fixtures::completed(),
            ])
            .await;

        assert_eq!(
            client.move_progress("j").await.unwrap().status,
            MoveStatus::Pending
        );
        assert_eq!(client.move_progress("j").await.unwrap().progress, 60);
        assert_eq!(
            client.move_progress("j").await.unwrap().status,
            MoveStatus::Completed
        );
        assert_eq!(client.progress_queries("j").await, 3);
    }

    #[tokio::test]
    async fn test_last_snapshot_repeats() {
        let client = MockCollectionClient::new();
        client
            .set_progress_script(vec![fixtures::completed()])
            .await;

        for _ in 0..3 {
            let snapshot = client.move_progress("j").await.unwrap();
            assert_eq!(snapshot.status, MoveStatus::Completed);
        }
        assert_eq!(client.progress_queries("j").await, 3);
    }

    #[tokio::test]
    async fn test_error_injection_is_consumed() {
        let client = MockCollectionClient::new();
        client
            .set_next_error(CollectionClientError::Timeout)
            .await;

        assert!(client.move_progress("j").await.is_err());
        assert!(client.move_progress("j").await.is_ok());
    }

    #[tokio::test]
    async fn test_collection_paging() {
        let client = MockCollectionClient::new();
        client
            .add_collection(fixtures::collection_page(
                "c-1",
                "My List",
                vec![
                    fixtures::company("a", "Acme Anvils"),
                    fixtures::company("b", "Barn Owl Books"),
                    fixtures::company("c", "Cobalt Cargo"),
                ],
            ))
            .await;

        let page = client.collection_page("c-1", 1, 1).await.unwrap();
        assert_eq!(page.companies.len(), 1);
        assert_eq!(page.companies[0].id, "b");
        assert_eq!(page.total, 3);

        let missing = client.collection_page("nope", 0, 10).await;
        assert!(matches!(
            missing,
            Err(CollectionClientError::Http { status: 404, .. })
        ));
    }
}
