use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::extractors::JsonBody;
use crate::flow::assessment::AnswerOutcome;
use crate::flow::snapshot::FlowSnapshot;
use crate::flow::{FlowController, FlowError, InputMode, Submitted};
use crate::response::{accepted, ok, AppError};
use crate::session::manual::export_payload;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_flow))
        .route("/mode", post(set_mode))
        .route("/submit", post(submit))
        .route("/selection/edit", post(edit_selection))
        .route("/selection/lock", post(lock_selection))
        .route("/selection/unlock", post(unlock_selection))
        .route("/selection/toggle", post(toggle_word))
        .route("/selection/analyze", post(analyze_selection))
        .route("/selection/back", post(leave_selection))
        .route("/continue", post(begin_sequence))
        .route("/advance", post(advance))
        .route("/retreat", post(retreat))
        .route("/next-word", post(next_word))
        .route("/previous-word", post(previous_word))
        .route("/page", post(set_page))
        .route("/review/acknowledge", post(acknowledge_review))
        .route("/review/complete", post(complete_review))
        .route("/assessment/answer", post(answer))
        .route("/assessment/next", post(next_question))
        .route("/replay", post(replay))
        .route("/new-session", post(new_session))
        .route("/session", get(export_session))
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: InputMode,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub option: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub outcome: AnswerOutcome,
    pub flow: FlowSnapshot,
}

/// Applies `action` under the controller lock and returns the resulting
/// snapshot.
async fn apply<T>(
    state: &AppState,
    action: impl FnOnce(&mut FlowController) -> Result<T, FlowError>,
) -> Result<FlowSnapshot, AppError> {
    let mut flow = state.flow().lock().await;
    action(&mut flow)?;
    Ok(flow.snapshot())
}

fn check_length(state: &AppState, text: &str) -> Result<(), AppError> {
    let limit = state.config().limits.max_input_chars;
    if text.chars().count() > limit {
        return Err(AppError::payload_too_large(&format!(
            "input exceeds {limit} characters"
        )));
    }
    Ok(())
}

async fn get_flow(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.flow().snapshot().await)
}

async fn set_mode(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ModeRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, |flow| flow.set_mode(req.mode)).await?))
}

async fn submit(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SubmitRequest>,
) -> Result<Response, AppError> {
    check_length(&state, &req.input)?;
    let submitted = state.flow().submit(&req.input).await?;
    let snapshot = state.flow().snapshot().await;
    match submitted {
        Submitted::Generate(_) => Ok(accepted(snapshot).into_response()),
        Submitted::Failed(failure) => Err(AppError::unprocessable(
            "MALFORMED_PAYLOAD",
            failure.message(),
        )),
        Submitted::Selecting | Submitted::Installed(_) => Ok(ok(snapshot).into_response()),
    }
}

async fn edit_selection(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<EditRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_length(&state, &req.text)?;
    Ok(ok(apply(&state, |flow| flow.edit_selection(&req.text)).await?))
}

async fn lock_selection(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::lock_selection).await?))
}

async fn unlock_selection(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::unlock_selection).await?))
}

async fn toggle_word(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ToggleRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, |flow| flow.toggle_word(&req.token)).await?))
}

async fn analyze_selection(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.flow().analyze_selection().await?;
    Ok(accepted(state.flow().snapshot().await))
}

async fn leave_selection(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::leave_selection).await?))
}

async fn begin_sequence(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::begin_sequence).await?))
}

async fn advance(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::advance).await?))
}

async fn retreat(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::retreat).await?))
}

async fn next_word(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::next_word).await?))
}

async fn previous_word(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::previous_word).await?))
}

async fn set_page(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PageRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, |flow| flow.set_page(req.page)).await?))
}

async fn acknowledge_review(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::acknowledge_review).await?))
}

async fn complete_review(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::complete_review).await?))
}

async fn answer(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut flow = state.flow().lock().await;
    let outcome = flow.answer(&req.option)?;
    Ok(ok(AnswerResponse {
        outcome,
        flow: flow.snapshot(),
    }))
}

async fn next_question(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::next_question).await?))
}

async fn replay(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::replay).await?))
}

async fn new_session(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(apply(&state, FlowController::new_session).await?))
}

/// The current session as a payload FORGE mode accepts back unchanged.
async fn export_session(State(state): State<AppState>) -> Result<Response, AppError> {
    let session = state
        .flow()
        .lock()
        .await
        .session()
        .cloned()
        .ok_or_else(|| AppError::not_found("No session is loaded"))?;
    let payload = export_payload(&session).map_err(|e| AppError::internal(&e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response())
}
