//! HTTP handlers for the web inspector

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::StorageError;
use crate::pattern::KeyPattern;
use crate::storage::StorageAdapter;
use crate::{bulk, primitives, ttl};

/// Shared application state
pub type AppState = Arc<dyn StorageAdapter>;

/// `?pattern=` query, defaults to every key
#[derive(Debug, Default, Deserialize)]
pub struct PatternQuery {
    pub pattern: Option<String>,
}

impl PatternQuery {
    fn key_pattern(&self) -> KeyPattern {
        self.pattern
            .as_deref()
            .map(KeyPattern::parse)
            .unwrap_or_default()
    }
}

/// Request body for storing an item
#[derive(Debug, Deserialize)]
pub struct PutItemRequest {
    pub value: String,
    /// When present, store as a TTL value expiring after this many milliseconds
    pub ttl_ms: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ItemResponse {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RemovedResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StatsResponse {
    pub keys: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Handler failure
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Storage(StorageError),
    /// The blocking storage task panicked or was cancelled
    Task(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::NotFound(key) => (StatusCode::NOT_FOUND, format!("no value for key '{}'", key)),
            ApiError::Storage(e) if e.is_quota_exceeded() => (StatusCode::INSUFFICIENT_STORAGE, e.to_string()),
            ApiError::Storage(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Task(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Run a storage call on the blocking pool
///
/// File-backed adapters write and may fsync on every mutation.
async fn with_storage<T, F>(storage: AppState, op: F) -> ApiResult<T>
where
    F: FnOnce(&dyn StorageAdapter) -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&*storage))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
        .map_err(ApiError::from)
}

/// List keys matching a pattern
pub async fn list_keys(
    State(storage): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> ApiResult<Json<KeysResponse>> {
    let pattern = query.key_pattern();
    let keys = with_storage(storage, move |s| bulk::filter_keys(pattern.predicate(), Some(s))).await?;
    Ok(Json(KeysResponse { keys }))
}

/// Key -> value map of every matching item
pub async fn list_items(
    State(storage): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> ApiResult<Json<HashMap<String, String>>> {
    let pattern = query.key_pattern();
    let items = with_storage(storage, move |s| bulk::get_items(pattern.predicate(), Some(s))).await?;
    Ok(Json(items))
}

/// Bulk removal by pattern
pub async fn remove_items(
    State(storage): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> ApiResult<Json<RemovedResponse>> {
    let pattern = query.key_pattern();
    debug!("Removing keys matching {}", pattern);
    let removed = with_storage(storage, move |s| bulk::remove_keys(pattern.predicate(), Some(s))).await?;
    Ok(Json(RemovedResponse { removed }))
}

pub async fn get_item(
    State(storage): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<ItemResponse>> {
    let lookup = key.clone();
    match with_storage(storage, move |s| primitives::get_item(&lookup, Some(s))).await? {
        Some(value) => Ok(Json(ItemResponse { key, value })),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Read through the TTL layer, evicting the key if it has expired
pub async fn get_ttl_item(
    State(storage): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<ItemResponse>> {
    let lookup = key.clone();
    match with_storage(storage, move |s| ttl::get_with_ttl(&lookup, Some(s))).await? {
        Some(value) => Ok(Json(ItemResponse { key, value })),
        None => Err(ApiError::NotFound(key)),
    }
}

pub async fn put_item(
    State(storage): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutItemRequest>,
) -> ApiResult<StatusCode> {
    with_storage(storage, move |s| match req.ttl_ms {
        Some(ttl_ms) => ttl::set_with_ttl(&key, &req.value, ttl_ms, Some(s)),
        None => primitives::set_item(&key, &req.value, Some(s)),
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_item(
    State(storage): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    with_storage(storage, move |s| primitives::remove_item(&key, Some(s))).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats(State(storage): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        keys: storage.len(),
    })
}
