use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

pub async fn health_check(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let client = state.flow().client();
    let frame = state.field().latest();
    Json(serde_json::json!({
        "status": "ok",
        "uptimeSecs": state.uptime_secs(),
        "generator": {
            "enabled": client.is_enabled(),
            "mock": client.is_mock(),
        },
        "field": {
            "frame": frame.frame,
            "width": frame.width,
            "height": frame.height,
        },
        "moodColor": state.mood().current().as_str(),
        "pendingImages": state.flow().pending_images().await,
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Ready once the particle field has published a frame.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.field().latest().frame > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
