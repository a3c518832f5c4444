use crate::{
    dto::{
        CreateFilterRequest, DeleteFilterRequest, DeletedCountResponse, FilterQuery,
        FilterResponse,
    },
    errors::{api_error, ApiError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use bastion_dns_domain::{DomainError, FilterKind};
use tracing::instrument;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/filters",
            get(get_filters).post(create_filter).delete(delete_filter_by_domain),
        )
        .route("/filters/{id}", delete(delete_filter))
}

#[instrument(skip(state), name = "api_get_filters")]
async fn get_filters(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<FilterResponse>>, ApiError> {
    let kind = query
        .kind
        .as_deref()
        .map(str::parse::<FilterKind>)
        .transpose()
        .map_err(|e| api_error(DomainError::InvalidInput(e), "Invalid filter kind"))?;

    let filters = state
        .get_filters
        .execute(kind)
        .await
        .map_err(|e| api_error(e, "Failed to retrieve filters"))?;
    Ok(Json(filters.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, req), name = "api_create_filter")]
async fn create_filter(
    State(state): State<AppState>,
    Json(req): Json<CreateFilterRequest>,
) -> Result<(StatusCode, Json<FilterResponse>), ApiError> {
    let filter = state
        .create_filter
        .execute(&req.domain, &req.kind, req.comment)
        .await
        .map_err(|e| api_error(e, "Failed to create filter"))?;

    state.spawn_reload("filter created");
    Ok((StatusCode::CREATED, Json(filter.into())))
}

#[instrument(skip(state), name = "api_delete_filter")]
async fn delete_filter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .delete_filter
        .execute(id)
        .await
        .map_err(|e| api_error(e, "Failed to delete filter"))?;

    state.spawn_reload("filter deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, req), name = "api_delete_filter_by_domain")]
async fn delete_filter_by_domain(
    State(state): State<AppState>,
    Json(req): Json<DeleteFilterRequest>,
) -> Result<Json<DeletedCountResponse>, ApiError> {
    let deleted_count = state
        .delete_filter
        .execute_by_domain(&req.domain, &req.kind)
        .await
        .map_err(|e| api_error(e, "Failed to delete filter"))?;

    if deleted_count > 0 {
        state.spawn_reload("filter deleted");
    }
    Ok(Json(DeletedCountResponse { deleted_count }))
}
