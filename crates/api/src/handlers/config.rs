use crate::{
    dto::{DnsConfigResponse, UpdateDnsConfigRequest},
    errors::{api_error, ApiError},
    state::AppState,
};
use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

pub fn routes() -> Router<AppState> {
    Router::new().route("/config", get(get_config).put(update_config))
}

#[instrument(skip(state), name = "api_get_config")]
async fn get_config(State(state): State<AppState>) -> Result<Json<DnsConfigResponse>, ApiError> {
    let config = state
        .get_config
        .execute()
        .await
        .map_err(|e| api_error(e, "Failed to read configuration"))?;
    Ok(Json(DnsConfigResponse::from(&config)))
}

/// Persists the merged configuration and applies the live settings.
#[instrument(skip(state, req), name = "api_update_config")]
async fn update_config(
    State(state): State<AppState>,
    Json(req): Json<UpdateDnsConfigRequest>,
) -> Result<Json<DnsConfigResponse>, ApiError> {
    let mut config = state
        .get_config
        .execute()
        .await
        .map_err(|e| api_error(e, "Failed to read configuration"))?;
    req.apply_to(&mut config);

    let saved = state
        .update_config
        .execute(config)
        .await
        .map_err(|e| api_error(e, "Failed to update configuration"))?;

    info!(
        blocking_enabled = saved.blocking.enabled,
        upstreams = saved.dns.upstream_servers.len(),
        "DNS configuration updated"
    );
    Ok(Json(DnsConfigResponse::from(&saved)))
}
