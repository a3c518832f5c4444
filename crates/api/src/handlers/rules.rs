use crate::{
    dto::{CheckDomainQuery, CustomRulesResponse, DomainStatusResponse},
    errors::{api_error, ApiError},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/custom-rules", get(get_custom_rules))
        .route("/check-domain-status", get(check_domain_status))
}

#[instrument(skip(state), name = "api_get_custom_rules")]
async fn get_custom_rules(
    State(state): State<AppState>,
) -> Result<Json<CustomRulesResponse>, ApiError> {
    let view = state
        .get_custom_rules
        .execute()
        .await
        .map_err(|e| api_error(e, "Failed to retrieve custom rules"))?;
    Ok(Json(view.into()))
}

#[instrument(skip(state), name = "api_check_domain_status")]
async fn check_domain_status(
    State(state): State<AppState>,
    Query(query): Query<CheckDomainQuery>,
) -> Result<Json<DomainStatusResponse>, ApiError> {
    let status = state
        .check_domain
        .execute(&query.domain, &query.client_ip)
        .map_err(|e| api_error(e, "Failed to check domain status"))?;
    Ok(Json(status.into()))
}
