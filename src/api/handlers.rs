//! API Handlers
//!
//! HTTP request handlers for each cache daemon endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::cache::{MemoryCache, TypePolicy, TypeTag};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, Document, HealthResponse, MinAgeRequest, MinAgeResponse, PoliciesResponse,
    PolicyView, PutEntryRequest, PutEntryResponse, RegisterTypeRequest, StatsResponse,
    SweepResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe document cache
    pub cache: Arc<MemoryCache<Document>>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: Arc<MemoryCache<Document>>) -> Self {
        Self { cache }
    }

    /// Creates a new AppState around the process-wide cache.
    pub fn current() -> Self {
        Self::new(crate::cache::current())
    }
}

/// Handler for PUT /entries
///
/// Adds a document or replaces the one stored under the same key.
pub async fn put_entry_handler(
    State(state): State<AppState>,
    Json(req): Json<PutEntryRequest>,
) -> Result<Json<PutEntryResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = req.key;
    state.cache.add_update_entry(req.into_document())?;

    Ok(Json(PutEntryResponse::new(key)))
}

/// Handler for GET /entries/:key
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Document>> {
    let id = Uuid::parse_str(&key).map_err(|_| CacheError::InvalidKey(key.clone()))?;

    match state.cache.try_get_entry(&id) {
        Some(doc) => Ok(Json((*doc).clone())),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /entries
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear();
    Json(ClearResponse::new(state.cache.size()))
}

/// Handler for GET /types
pub async fn list_types_handler(State(state): State<AppState>) -> Json<PoliciesResponse> {
    let policies = state
        .cache
        .policies()
        .iter()
        .map(|(tag, policy)| PolicyView::new(tag, policy))
        .collect();

    Json(PoliciesResponse { policies })
}

/// Handler for PUT /types/:type
///
/// Registers a cache type or replaces its policy.
pub async fn register_type_handler(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    Json(req): Json<RegisterTypeRequest>,
) -> Result<Json<PolicyView>> {
    if type_name.trim().is_empty() {
        return Err(CacheError::InvalidRequest("Type cannot be empty".to_string()));
    }

    let policy = TypePolicy::new(req.max_size, req.max_age_secs.map(Duration::from_secs));
    let tag = TypeTag::from(type_name);
    state.cache.register_policy(tag.clone(), policy);

    Ok(Json(PolicyView::new(&tag, &policy)))
}

/// Handler for PUT /min-age
pub async fn set_min_age_handler(
    State(state): State<AppState>,
    Json(req): Json<MinAgeRequest>,
) -> Json<MinAgeResponse> {
    let min_age = Duration::from_millis(req.millis);
    state.cache.set_min_age(min_age);
    info!(millis = req.millis, "Minimum age updated");

    Json(MinAgeResponse::new(min_age))
}

/// Handler for POST /maintenance/reduce-pressure
pub async fn reduce_pressure_handler(State(state): State<AppState>) -> Json<SweepResponse> {
    let removed = state.cache.reduce_pressure();

    Json(SweepResponse {
        removed,
        total_entries: state.cache.size(),
    })
}

/// Handler for POST /maintenance/clean
pub async fn clean_handler(State(state): State<AppState>) -> Json<SweepResponse> {
    let removed = state.cache.clean();

    Json(SweepResponse {
        removed,
        total_entries: state.cache.size(),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.cache.stats(), state.cache.min_age()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
