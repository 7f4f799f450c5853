pub mod audio;
pub mod field;
pub mod flow;
pub mod health;
pub mod realtime;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// Maximum request body size: 2 MiB.
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/flow", flow::router())
        .nest("/field", field::router())
        .nest("/realtime", realtime::router())
        .nest("/audio", audio::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    let static_dir = state.config().static_dir.clone();
    let spa_fallback = ServeDir::new(&static_dir)
        .not_found_service(ServeFile::new(format!("{static_dir}/index.html")));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback_service(spa_fallback)
        .with_state(state)
}
