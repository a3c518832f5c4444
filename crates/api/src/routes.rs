use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

/// The admin API, nested under `/api/dns`, plus `/health`.
pub fn create_api_routes(state: AppState) -> Router {
    let dns = Router::new()
        .merge(handlers::config::routes())
        .merge(handlers::server::routes())
        .merge(handlers::blocklists::routes())
        .merge(handlers::filters::routes())
        .merge(handlers::rewrites::routes())
        .merge(handlers::queries::routes())
        .merge(handlers::clients::routes())
        .merge(handlers::client_rules::routes())
        .merge(handlers::rules::routes());

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/dns", dns)
        .with_state(state)
}
