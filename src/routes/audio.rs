use axum::extract::Path;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::audio::{ambiance, SoundCue};
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ambiance", get(get_ambiance))
        .route("/:cue", get(get_cue))
}

async fn get_ambiance() -> impl IntoResponse {
    ok(ambiance())
}

async fn get_cue(Path(cue): Path<String>) -> Result<impl IntoResponse, AppError> {
    let cue = SoundCue::from_name(&cue)
        .ok_or_else(|| AppError::not_found(&format!("Unknown sound cue '{cue}'")))?;
    Ok(ok(cue.patch()))
}
