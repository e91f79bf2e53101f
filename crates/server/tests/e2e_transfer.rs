//! End-to-end tests: the real server on a TCP socket, driven by the real
//! HTTP client and transfer coordinator from the core crate.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use uuid::Uuid;

use corral_core::{
    BulkMover, CollectionClient, CollectionServiceConfig, CollectionStore, Config,
    HttpCollectionClient, MoveRequest, MoverConfig, SqliteCollectionStore, TransferConfig,
    TransferCoordinator, TransferState,
};
use corral_server::api::create_router;
use corral_server::state::AppState;

struct LiveServer {
    url: String,
    store: Arc<SqliteCollectionStore>,
    _temp_dir: TempDir,
}

/// Boot the full server stack on an ephemeral port.
async fn start_server(insert_throttle_ms: u64) -> LiveServer {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("e2e.db");

    let store = Arc::new(
        SqliteCollectionStore::new(&db_path, "Liked Companies List")
            .expect("Failed to create store"),
    );

    let mover = BulkMover::new(
        Arc::clone(&store) as Arc<dyn CollectionStore>,
        MoverConfig {
            batch_size: 2,
            insert_throttle_ms,
        },
    );

    let state = Arc::new(AppState::new(
        Config::default(),
        Arc::clone(&store) as Arc<dyn CollectionStore>,
        mover,
    ));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server error");
    });

    LiveServer {
        url: format!("http://{addr}"),
        store,
        _temp_dir: temp_dir,
    }
}

fn http_client(server: &LiveServer) -> Arc<HttpCollectionClient> {
    Arc::new(HttpCollectionClient::new(CollectionServiceConfig {
        url: server.url.clone(),
        timeout_secs: 5,
    }))
}

fn coordinator(client: Arc<HttpCollectionClient>) -> TransferCoordinator {
    TransferCoordinator::new(
        client,
        TransferConfig {
            poll_interval_ms: 20,
            max_poll_attempts: 200,
        },
    )
}

#[tokio::test]
async fn test_full_transfer_roundtrip() {
    let server = start_server(2).await;
    let source = server.store.create_collection("My List").unwrap().id;
    let target = server.store.create_collection("Liked Companies List").unwrap().id;
    let names: Vec<String> = (0..8).map(|i| format!("Company {i}")).collect();
    let ids = server.store.create_companies(&names).unwrap();
    server.store.insert_members(source, &ids).unwrap();

    let client = http_client(&server);

    // The caller's data source: collection listing with totals.
    let collections = client.list_collections().await.unwrap();
    assert_eq!(collections.len(), 2);
    assert_eq!(collections[0].total, 8);

    let coordinator = coordinator(Arc::clone(&client));
    let settled = coordinator
        .start(MoveRequest::all(source.to_string(), target.to_string()))
        .await
        .unwrap();

    assert_eq!(settled, TransferState::Succeeded);
    assert_eq!(settled.progress(), 100);

    // Membership arrived; the page now reports every company as liked.
    let page = client
        .collection_page(&source.to_string(), 0, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 8);
    assert!(page.companies.iter().all(|c| c.liked));

    let target_page = client
        .collection_page(&target.to_string(), 0, 20)
        .await
        .unwrap();
    assert_eq!(target_page.total, 8);
}

#[tokio::test]
async fn test_subset_transfer_moves_only_selected() {
    let server = start_server(0).await;
    let source = server.store.create_collection("My List").unwrap().id;
    let target = server.store.create_collection("Shortlist").unwrap().id;
    let names: Vec<String> = (0..4).map(|i| format!("Company {i}")).collect();
    let ids = server.store.create_companies(&names).unwrap();
    server.store.insert_members(source, &ids).unwrap();

    let client = http_client(&server);
    let coordinator = coordinator(Arc::clone(&client));

    let subset = vec![ids[1].to_string(), ids[3].to_string()];
    let settled = coordinator
        .start(MoveRequest::subset(
            source.to_string(),
            target.to_string(),
            subset.clone(),
        ))
        .await
        .unwrap();

    assert_eq!(settled, TransferState::Succeeded);
    let members = server.store.collection_company_ids(target).unwrap();
    assert_eq!(members, vec![ids[1], ids[3]]);
}

#[tokio::test]
async fn test_unknown_source_surfaces_server_error_body() {
    let server = start_server(0).await;
    let target = server.store.create_collection("Target").unwrap().id;

    let client = http_client(&server);
    let coordinator = coordinator(Arc::clone(&client));

    let settled = coordinator
        .start(MoveRequest::all(
            Uuid::new_v4().to_string(),
            target.to_string(),
        ))
        .await
        .unwrap();

    let error = settled.error().expect("should settle failed");
    assert!(error.contains("HTTP 404"));
    assert!(error.contains("collection not found"));
}

#[tokio::test]
async fn test_progress_endpoint_is_idempotent_after_settlement() {
    let server = start_server(0).await;
    let source = server.store.create_collection("My List").unwrap().id;
    let target = server.store.create_collection("Target").unwrap().id;
    let ids = server
        .store
        .create_companies(&["Solo Company".to_string()])
        .unwrap();
    server.store.insert_members(source, &ids).unwrap();

    let client = http_client(&server);
    let job_id = client
        .submit_move(
            &source.to_string(),
            &target.to_string(),
            &corral_core::MoveSelection::All,
        )
        .await
        .unwrap();

    // Wait out the job, then keep re-reading it.
    let mut settled = None;
    for _ in 0..200 {
        let snapshot = client.move_progress(&job_id).await.unwrap();
        if snapshot.status.is_terminal() {
            settled = Some(snapshot);
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let settled = settled.expect("job never settled");
    assert_eq!(settled.status, corral_core::MoveStatus::Completed);

    for _ in 0..3 {
        let again = client.move_progress(&job_id).await.unwrap();
        assert_eq!(again.status, corral_core::MoveStatus::Completed);
        assert_eq!(again.progress, 100);
    }
}
