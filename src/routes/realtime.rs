use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::{extract::State, Router};
use futures::Stream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::response::AppError;
use crate::state::AppState;

struct SseGuard(Arc<AtomicUsize>);

impl Drop for SseGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(sse_handler))
}

/// Streams flow events (`phase`, `mood`, `sound`, `image`) as they happen.
pub async fn sse_handler(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let max_sse = state.config().limits.max_sse_connections;
    let counter = state.sse_connections().clone();
    let current = counter.fetch_add(1, Ordering::SeqCst);
    if current >= max_sse {
        counter.fetch_sub(1, Ordering::SeqCst);
        return Err(AppError::too_many_requests("Too many SSE connections"));
    }
    let guard = SseGuard(counter);

    let mut shutdown_rx = state.shutdown_rx();
    let mut events = BroadcastStream::new(state.flow().subscribe().await);
    let hello = state.flow().snapshot().await;

    let stream = async_stream::stream! {
        let _guard = guard;

        if let Ok(json) = serde_json::to_string(&hello) {
            yield Ok(Event::default().event("snapshot").data(json));
        }

        loop {
            tokio::select! {
                next = events.next() => {
                    match next {
                        Some(Ok(event)) => {
                            if let Ok(json) = serde_json::to_string(&event) {
                                yield Ok(Event::default().event(event.name()).data(json));
                            }
                        }
                        Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                            tracing::warn!(skipped, "SSE client lagged behind flow events");
                        }
                        None => break,
                    }
                }
                _ = shutdown_rx.recv() => {
                    break;
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    ))
}
