use crate::{
    dto::{HistoryQuery, HistoryResponse, LogsQuery, QueryLogPageResponse, StatsResponse},
    errors::{api_error, ApiError},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use bastion_dns_application::use_cases::GetQueryHistoryUseCase;
use tracing::{debug, instrument};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/logs", get(get_logs))
        .route("/stats", get(get_stats))
        .route("/history", get(get_history))
}

#[instrument(skip(state), name = "api_get_logs")]
async fn get_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<QueryLogPageResponse>, ApiError> {
    let page = state
        .get_query_log
        .execute(query.page(), query.limit())
        .await
        .map_err(|e| api_error(e, "Failed to retrieve query log"))?;
    debug!(entries = page.entries.len(), total = page.total, "Query log page retrieved");
    Ok(Json(page.into()))
}

#[instrument(skip(state), name = "api_get_stats")]
async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state
        .get_stats
        .execute()
        .await
        .map_err(|e| api_error(e, "Failed to retrieve statistics"))?;
    Ok(Json(stats.into()))
}

#[instrument(skip(state), name = "api_get_history")]
async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let hours = GetQueryHistoryUseCase::clamp(query.hours());
    Json(HistoryResponse {
        hours,
        buckets: state.get_history.execute(hours),
    })
}
