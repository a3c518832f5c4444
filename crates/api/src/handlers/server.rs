use crate::{
    dto::{RefreshResponse, ReloadResponse, ServerStatusResponse},
    errors::{api_error, ApiError},
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_server))
        .route("/stop", post(stop_server))
        .route("/status", get(get_status))
        .route("/reload", post(reload))
}

#[instrument(skip(state), name = "api_start_server")]
async fn start_server(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state
        .dns_server
        .start()
        .await
        .map_err(|e| api_error(e, "Failed to start DNS server"))?;
    info!("DNS server started via API");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state), name = "api_stop_server")]
async fn stop_server(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state
        .dns_server
        .stop()
        .await
        .map_err(|e| api_error(e, "Failed to stop DNS server"))?;
    info!("DNS server stopped via API");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state), name = "api_get_status")]
async fn get_status(State(state): State<AppState>) -> Result<Json<ServerStatusResponse>, ApiError> {
    let config = state
        .get_config
        .execute()
        .await
        .map_err(|e| api_error(e, "Failed to read configuration"))?;

    Ok(Json(ServerStatusResponse::new(
        state.dns_server.status(),
        state.engine.snapshot_info(),
        config.blocking.enabled,
    )))
}

/// Refreshes every blocklist and recompiles the filters before answering.
#[instrument(skip(state), name = "api_reload")]
async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let summary = state
        .refresh_blocklists
        .execute()
        .await
        .map_err(|e| api_error(e, "Reload failed"))?;

    Ok(Json(ReloadResponse {
        refresh: RefreshResponse::from(summary),
        snapshot: state.engine.snapshot_info(),
    }))
}
