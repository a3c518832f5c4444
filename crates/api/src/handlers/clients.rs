use crate::{
    dto::{BanClientRequest, ClientResponse, ClientSettingsResponse},
    errors::{api_error, ApiError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(get_clients))
        .route("/clients/block", post(ban_client))
        .route("/clients/{ip}/unblock", post(unban_client))
}

#[instrument(skip(state), name = "api_get_clients")]
async fn get_clients(State(state): State<AppState>) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    let clients = state
        .get_clients
        .execute()
        .await
        .map_err(|e| api_error(e, "Failed to retrieve clients"))?;
    Ok(Json(clients.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, req), name = "api_ban_client")]
async fn ban_client(
    State(state): State<AppState>,
    Json(req): Json<BanClientRequest>,
) -> Result<Json<ClientSettingsResponse>, ApiError> {
    let settings = state
        .ban_client
        .execute(&req.client_ip, req.reason, req.client_name)
        .await
        .map_err(|e| api_error(e, "Failed to ban client"))?;

    invalidate(&state, settings.client_ip).await;
    Ok(Json(settings.into()))
}

#[instrument(skip(state), name = "api_unban_client")]
async fn unban_client(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> Result<Json<ClientSettingsResponse>, ApiError> {
    let settings = state
        .unban_client
        .execute(&ip)
        .await
        .map_err(|e| api_error(e, "Failed to unban client"))?;

    invalidate(&state, settings.client_ip).await;
    Ok(Json(settings.into()))
}

/// The change is already persisted; a failed invalidation is picked up by
/// the next full reload.
pub(crate) async fn invalidate(state: &AppState, client_ip: std::net::IpAddr) {
    if let Err(e) = state.engine.invalidate_client(client_ip).await {
        warn!(client_ip = %client_ip, error = %e, "Client cache invalidation failed");
    }
}
