use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    BoardError, BoardManager, BoardSnapshot, Item, ItemDraft, ItemId, ItemPatch, LayoutConfig,
    Lane, Status, TimelineBounds, TimelineLayout, Zoom, layout_timeline,
};

#[derive(Clone)]
pub struct AppState {
    board: Arc<RwLock<BoardManager>>,
    layout: LayoutConfig,
}

impl AppState {
    pub fn new(board: BoardManager) -> Self {
        Self::with_shared(Arc::new(RwLock::new(board)))
    }

    pub fn with_shared(board: Arc<RwLock<BoardManager>>) -> Self {
        Self {
            board,
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Runs `mutate` under the write lock on the blocking pool, since a
    /// commit writes the attached store synchronously.
    async fn mutate<T, F>(&self, mutate: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut BoardManager) -> T + Send + 'static,
        T: Send + 'static,
    {
        let board = self.board.clone();
        tokio::task::spawn_blocking(move || mutate(&mut *board.write()))
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))
    }

    fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.board.read().snapshot()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<BoardError> for ApiError {
    fn from(value: BoardError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ShiftPayload {
    delta_days: i64,
}

#[derive(Debug, Deserialize)]
struct ReclassifyPayload {
    status: Status,
}

#[derive(Debug, Deserialize)]
struct LayoutQuery {
    zoom: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ColumnBody {
    status: Status,
    label: &'static str,
    items: Vec<Item>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route("/items/:id/shift", post(shift_item))
        .route("/items/:id/reclassify", post(reclassify_item))
        .route("/lanes", get(list_lanes))
        .route("/bounds", get(get_bounds))
        .route("/columns", get(list_columns))
        .route("/layout", get(get_layout))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.snapshot().items().to_vec())
}

async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<Item>, ApiError> {
    match state.snapshot().find(item_id) {
        Some(item) => Ok(Json(item.clone())),
        None => Err(ApiError::not_found(format!("item {item_id} not found"))),
    }
}

async fn create_item(
    State(state): State<AppState>,
    Json(draft): Json<ItemDraft>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let snapshot = state.mutate(move |board| board.create(draft)).await??;
    // create appends, so the new item is last
    let created = snapshot
        .items()
        .last()
        .cloned()
        .ok_or_else(|| ApiError::invalid("item missing after creation"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
    Json(patch): Json<ItemPatch>,
) -> Result<Json<Arc<BoardSnapshot>>, ApiError> {
    let snapshot = state
        .mutate(move |board| board.update(item_id, &patch))
        .await??;
    Ok(Json(snapshot))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<Arc<BoardSnapshot>>, ApiError> {
    let snapshot = state.mutate(move |board| board.delete(item_id)).await?;
    Ok(Json(snapshot))
}

async fn shift_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
    Json(payload): Json<ShiftPayload>,
) -> Result<Json<Arc<BoardSnapshot>>, ApiError> {
    let snapshot = state
        .mutate(move |board| board.shift(item_id, payload.delta_days))
        .await??;
    Ok(Json(snapshot))
}

async fn reclassify_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
    Json(payload): Json<ReclassifyPayload>,
) -> Result<Json<Arc<BoardSnapshot>>, ApiError> {
    let snapshot = state
        .mutate(move |board| board.reclassify(item_id, payload.status))
        .await?;
    Ok(Json(snapshot))
}

async fn list_lanes(State(state): State<AppState>) -> Json<Vec<Lane>> {
    Json(state.snapshot().lanes().to_vec())
}

async fn get_bounds(State(state): State<AppState>) -> Json<TimelineBounds> {
    Json(state.snapshot().bounds())
}

async fn list_columns(State(state): State<AppState>) -> Json<Vec<ColumnBody>> {
    let snapshot = state.snapshot();
    let columns = snapshot
        .columns()
        .into_iter()
        .map(|column| ColumnBody {
            status: column.status,
            label: column.label,
            items: column.items.into_iter().cloned().collect(),
        })
        .collect();
    Json(columns)
}

async fn get_layout(
    State(state): State<AppState>,
    Query(query): Query<LayoutQuery>,
) -> Result<Json<TimelineLayout>, ApiError> {
    let zoom = match query.zoom {
        Some(value) => Zoom::new(value).map_err(|err| ApiError::invalid(err.to_string()))?,
        None => Zoom::default(),
    };
    let snapshot = state.snapshot();
    let layout = layout_timeline(snapshot.lanes(), &snapshot.bounds(), zoom, &state.layout);
    Ok(Json(layout))
}
