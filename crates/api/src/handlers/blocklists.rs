use crate::{
    dto::{BlocklistResponse, CreateBlocklistRequest, UpdateBlocklistRequest},
    errors::{api_error, ApiError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{debug, instrument};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blocklists", get(get_blocklists).post(create_blocklist))
        .route("/blocklists/refresh", post(refresh_blocklists))
        .route(
            "/blocklists/{id}",
            put(update_blocklist).delete(delete_blocklist),
        )
}

#[instrument(skip(state), name = "api_get_blocklists")]
async fn get_blocklists(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlocklistResponse>>, ApiError> {
    let sources = state
        .get_blocklists
        .execute()
        .await
        .map_err(|e| api_error(e, "Failed to retrieve blocklists"))?;
    debug!(count = sources.len(), "Blocklists retrieved");
    Ok(Json(sources.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, req), name = "api_create_blocklist")]
async fn create_blocklist(
    State(state): State<AppState>,
    Json(req): Json<CreateBlocklistRequest>,
) -> Result<(StatusCode, Json<BlocklistResponse>), ApiError> {
    let source = state
        .create_blocklist
        .execute(req.name, req.url, req.format, req.enabled)
        .await
        .map_err(|e| api_error(e, "Failed to create blocklist"))?;

    if source.enabled {
        state.spawn_refresh("blocklist created");
    }
    Ok((StatusCode::CREATED, Json(source.into())))
}

#[instrument(skip(state, req), name = "api_update_blocklist")]
async fn update_blocklist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBlocklistRequest>,
) -> Result<Json<BlocklistResponse>, ApiError> {
    let source = state
        .update_blocklist
        .execute(id, req.name, req.url, req.format, req.enabled)
        .await
        .map_err(|e| api_error(e, "Failed to update blocklist"))?;

    state.spawn_reload("blocklist updated");
    Ok(Json(source.into()))
}

#[instrument(skip(state), name = "api_delete_blocklist")]
async fn delete_blocklist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_blocklist
        .execute(id)
        .await
        .map_err(|e| api_error(e, "Failed to delete blocklist"))?;

    state.spawn_reload("blocklist deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Starts a refresh of every enabled source and returns immediately.
#[instrument(skip(state), name = "api_refresh_blocklists")]
async fn refresh_blocklists(State(state): State<AppState>) -> StatusCode {
    state.spawn_refresh("refresh requested");
    StatusCode::ACCEPTED
}
