use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use roastify_app::domain::{LeaderboardEntry, LeaderboardWindow};
use roastify_app::AppContext;
use roastify_errors::AppError;
use serde::Deserialize;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    limit: Option<usize>,
    window: Option<String>,
}

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/leaderboard", get(leaderboard))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(ctx)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn leaderboard(
    State(ctx): State<AppContext>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let window: LeaderboardWindow = query
        .window
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(AppError::BadRequest)?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let entries = ctx
        .leaderboard
        .top_roasted(limit, window, chrono::Utc::now())
        .await?;
    Ok(Json(entries))
}
