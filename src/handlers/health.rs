//! Health and readiness endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::database;
use crate::state::AppState;

/// GET /api/health
///
/// Reports database and Redis connectivity. Postgres being down makes the
/// service unhealthy; a Redis outage is reported but degrades to 200 since
/// every cache read falls back to the database.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database_healthy = database::health_check(&state.pool).await.is_ok();
    let services = state.services.health_check().await;

    let status = if database_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "database": database_healthy,
            "redis": services.redis_healthy,
            "issues": services.get_issues(),
        })),
    )
}
