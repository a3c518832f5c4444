use super::clients::invalidate;
use crate::{
    dto::{
        ClientRuleQuery, ClientRuleResponse, CreateClientRuleRequest, DeleteClientRuleRequest,
        DeletedCountResponse,
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
use tracing::instrument;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/client-rules",
            get(get_client_rules)
                .post(create_client_rule)
                .delete(delete_client_rule_by_details),
        )
        .route("/client-rules/{id}", delete(delete_client_rule))
}

#[instrument(skip(state), name = "api_get_client_rules")]
async fn get_client_rules(
    State(state): State<AppState>,
    Query(query): Query<ClientRuleQuery>,
) -> Result<Json<Vec<ClientRuleResponse>>, ApiError> {
    let rules = state
        .get_client_rules
        .execute(query.client_ip.as_deref())
        .await
        .map_err(|e| api_error(e, "Failed to retrieve client rules"))?;
    Ok(Json(rules.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, req), name = "api_create_client_rule")]
async fn create_client_rule(
    State(state): State<AppState>,
    Json(req): Json<CreateClientRuleRequest>,
) -> Result<(StatusCode, Json<ClientRuleResponse>), ApiError> {
    let rule = state
        .create_client_rule
        .execute(&req.client_ip, &req.domain, &req.kind, req.comment)
        .await
        .map_err(|e| api_error(e, "Failed to create client rule"))?;

    invalidate(&state, rule.client_ip).await;
    state.spawn_reload("client rule created");
    Ok((StatusCode::CREATED, Json(rule.into())))
}

#[instrument(skip(state), name = "api_delete_client_rule")]
async fn delete_client_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let client_ip = state
        .delete_client_rule
        .execute(id)
        .await
        .map_err(|e| api_error(e, "Failed to delete client rule"))?;

    invalidate(&state, client_ip).await;
    state.spawn_reload("client rule deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, req), name = "api_delete_client_rule_by_details")]
async fn delete_client_rule_by_details(
    State(state): State<AppState>,
    Json(req): Json<DeleteClientRuleRequest>,
) -> Result<Json<DeletedCountResponse>, ApiError> {
    let (client_ip, deleted_count) = state
        .delete_client_rule
        .execute_by_details(&req.client_ip, &req.domain, &req.kind)
        .await
        .map_err(|e| api_error(e, "Failed to delete client rule"))?;

    if deleted_count > 0 {
        invalidate(&state, client_ip).await;
        state.spawn_reload("client rule deleted");
    }
    Ok(Json(DeletedCountResponse { deleted_count }))
}
