use crate::{
    dto::{CreateRewriteRequest, RewriteResponse, UpdateRewriteRequest},
    errors::{api_error, ApiError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rewrites", get(get_rewrites).post(create_rewrite))
        .route("/rewrites/{id}", put(update_rewrite).delete(delete_rewrite))
}

#[instrument(skip(state), name = "api_get_rewrites")]
async fn get_rewrites(
    State(state): State<AppState>,
) -> Result<Json<Vec<RewriteResponse>>, ApiError> {
    let rewrites = state
        .get_rewrites
        .execute()
        .await
        .map_err(|e| api_error(e, "Failed to retrieve rewrites"))?;
    Ok(Json(rewrites.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, req), name = "api_create_rewrite")]
async fn create_rewrite(
    State(state): State<AppState>,
    Json(req): Json<CreateRewriteRequest>,
) -> Result<(StatusCode, Json<RewriteResponse>), ApiError> {
    let rewrite = state
        .create_rewrite
        .execute(
            &req.domain,
            &req.record_type,
            &req.answer,
            req.enabled,
            req.comment,
        )
        .await
        .map_err(|e| api_error(e, "Failed to create rewrite"))?;

    state.spawn_reload("rewrite created");
    Ok((StatusCode::CREATED, Json(rewrite.into())))
}

#[instrument(skip(state, req), name = "api_update_rewrite")]
async fn update_rewrite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRewriteRequest>,
) -> Result<Json<RewriteResponse>, ApiError> {
    let rewrite = state
        .update_rewrite
        .execute(id, req.into())
        .await
        .map_err(|e| api_error(e, "Failed to update rewrite"))?;

    state.spawn_reload("rewrite updated");
    Ok(Json(rewrite.into()))
}

#[instrument(skip(state), name = "api_delete_rewrite")]
async fn delete_rewrite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_rewrite
        .execute(id)
        .await
        .map_err(|e| api_error(e, "Failed to delete rewrite"))?;

    state.spawn_reload("rewrite deleted");
    Ok(StatusCode::NO_CONTENT)
}
