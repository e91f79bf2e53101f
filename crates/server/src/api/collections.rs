//! Collection API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use corral_core::{MoveScope, MoveStatus, MoverError, StoreError};

use crate::state::AppState;

/// Default page size when the query omits `limit`.
const DEFAULT_LIMIT: u64 = 10;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for fetching a collection page
#[derive(Debug, Deserialize)]
pub struct PageParams {
    /// The number of items to skip from the beginning
    pub offset: Option<u64>,
    /// The number of items to fetch
    pub limit: Option<u64>,
}

/// Collection metadata response
#[derive(Debug, Serialize)]
pub struct CollectionMetadataResponse {
    pub id: Uuid,
    pub collection_name: String,
    pub total: u64,
}

/// Company in a collection page response
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub company_name: String,
    pub liked: bool,
}

/// One page of a collection
#[derive(Debug, Serialize)]
pub struct CollectionPageResponse {
    pub id: Uuid,
    pub collection_name: String,
    pub companies: Vec<CompanyResponse>,
    pub total: u64,
}

/// Request body for submitting a bulk move.
/// An empty or omitted `company_ids` means the entire source collection.
#[derive(Debug, Deserialize)]
pub struct AddCompaniesBody {
    pub source_collection_id: Uuid,
    pub target_collection_id: Uuid,
    #[serde(default)]
    pub company_ids: Vec<Uuid>,
}

/// Response for a submitted bulk move
#[derive(Debug, Serialize)]
pub struct AddCompaniesResponse {
    pub job_id: Uuid,
}

/// Progress snapshot of a bulk move job
#[derive(Debug, Serialize)]
pub struct MoveProgressResponse {
    pub status: MoveStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn store_error(e: StoreError) -> ApiError {
    let status = match e {
        StoreError::CollectionNotFound(_) | StoreError::JobNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn mover_error(e: MoverError) -> ApiError {
    match e {
        MoverError::Store(inner) => store_error(inner),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List all collections (metadata only)
pub async fn list_collections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CollectionMetadataResponse>>, ApiError> {
    let collections = state.store().list_collections().map_err(store_error)?;

    Ok(Json(
        collections
            .into_iter()
            .map(|summary| CollectionMetadataResponse {
                id: summary.id,
                collection_name: summary.collection_name,
                total: summary.total,
            })
            .collect(),
    ))
}

/// Fetch one page of a collection's members
pub async fn get_collection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<CollectionPageResponse>, ApiError> {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    let page = state
        .store()
        .collection_page(id, offset, limit)
        .map_err(store_error)?;

    Ok(Json(CollectionPageResponse {
        id: page.id,
        collection_name: page.collection_name,
        companies: page
            .companies
            .into_iter()
            .map(|company| CompanyResponse {
                id: company.id,
                company_name: company.company_name,
                liked: company.liked,
            })
            .collect(),
        total: page.total,
    }))
}

/// Submit a bulk move of companies into a target collection
pub async fn add_companies(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddCompaniesBody>,
) -> Result<Json<AddCompaniesResponse>, ApiError> {
    // Empty array = move the whole source collection.
    let scope = if body.company_ids.is_empty() {
        MoveScope::All
    } else {
        MoveScope::Subset(body.company_ids)
    };

    let job_id = state
        .mover()
        .submit(body.source_collection_id, body.target_collection_id, scope)
        .map_err(mover_error)?;

    Ok(Json(AddCompaniesResponse { job_id }))
}

/// Fetch the progress of a bulk move job
pub async fn move_progress(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<MoveProgressResponse>, ApiError> {
    let job = state.store().job(job_id).map_err(store_error)?;

    Ok(Json(MoveProgressResponse {
        status: job.status,
        progress: job.percent(),
        error: job.error,
    }))
}
