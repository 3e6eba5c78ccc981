//! Liveness endpoints and the service banner.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

const SERVICE_NAME: &str = "styler-backend";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `GET /health`. Always 200; the database flag says whether queries work.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = if state.db().health_check().await {
        "Connected"
    } else {
        "Disconnected"
    };

    Json(json!({
        "status": "UP",
        "message": "Styler Backend is running successfully",
        "timestamp": Utc::now().timestamp_millis(),
        "database": database,
    }))
}

/// `GET /api/health`. 503 when the database does not answer.
pub async fn api_health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if !state.db().health_check().await {
        warn!("Health check failed: database is not reachable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "DOWN",
                "message": "Database is not reachable",
                "timestamp": Utc::now().timestamp_millis(),
                "service": SERVICE_NAME,
            })),
        );
    }

    (StatusCode::OK, Json(json!({
        "status": "UP",
        "message": "Styler Backend API is healthy",
        "timestamp": Utc::now().timestamp_millis(),
        "service": SERVICE_NAME,
        "version": VERSION,
        "environment": state.config().environment,
    })))
}

/// `GET /`.
pub async fn root() -> Json<Value> {
    Json(json!({
        "application": "Styler E-commerce Backend",
        "version": VERSION,
        "status": "Running",
        "endpoints": [
            "/health",
            "/api/health",
            "/api/users",
            "/api/cart",
            "/api/orders",
        ],
    }))
}
