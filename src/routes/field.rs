use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::extractors::JsonBody;
use crate::field::Viewport;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/frame", get(latest_frame))
        .route("/resize", post(resize))
}

async fn latest_frame(State(state): State<AppState>) -> impl IntoResponse {
    let frame = state.field().latest();
    ok(frame.as_ref().clone())
}

async fn resize(
    State(state): State<AppState>,
    JsonBody(viewport): JsonBody<Viewport>,
) -> Result<impl IntoResponse, AppError> {
    if !viewport.is_valid() {
        return Err(AppError::bad_request(
            "INVALID_VIEWPORT",
            "width and height must be positive",
        ));
    }
    state.field().resize(viewport);
    Ok(ok(viewport))
}
