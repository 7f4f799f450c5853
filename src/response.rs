use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::flow::FlowError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub is_operational: bool,
}

impl AppError {
    fn operational(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::CONFLICT, code, message)
    }

    pub fn unprocessable(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::UNPROCESSABLE_ENTITY, code, message)
    }

    pub fn too_many_requests(message: &str) -> Self {
        Self::operational(StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", message)
    }

    pub fn payload_too_large(message: &str) -> Self {
        Self::operational(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", message)
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
            is_operational: false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let exposed_message = if self.is_operational {
            self.message.clone()
        } else {
            "Internal server error".to_string()
        };

        if self.is_operational {
            tracing::warn!(status = %self.status, code = %self.code, error = %self.message, "API error");
        } else {
            tracing::error!(status = %self.status, code = %self.code, error = %self.message, "Internal API error");
        }

        (
            self.status,
            Json(ErrorBody {
                success: false,
                code: self.code,
                message: exposed_message,
            }),
        )
            .into_response()
    }
}

// Input problems are 400; requests that do not fit the current phase are 409.
impl From<FlowError> for AppError {
    fn from(value: FlowError) -> Self {
        let message = value.to_string();
        match &value {
            FlowError::EmptyInput => AppError::bad_request("EMPTY_INPUT", &message),
            FlowError::SelectionEmpty => AppError::bad_request("SELECTION_EMPTY", &message),
            FlowError::PageOutOfRange(_) => AppError::bad_request("PAGE_OUT_OF_RANGE", &message),
            FlowError::UnknownOption(_) => AppError::bad_request("UNKNOWN_OPTION", &message),
            FlowError::InvalidTransition { .. } => AppError::conflict("INVALID_TRANSITION", &message),
            FlowError::AlreadyAnswered => AppError::conflict("ALREADY_ANSWERED", &message),
            FlowError::NotAnswered => AppError::conflict("NOT_ANSWERED", &message),
            FlowError::SelectionLocked => AppError::conflict("SELECTION_LOCKED", &message),
            FlowError::SelectionUnlocked => AppError::conflict("SELECTION_UNLOCKED", &message),
            FlowError::NoSession => AppError::conflict("NO_SESSION", &message),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}

pub fn accepted<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    use super::*;
    use crate::flow::PhaseKind;

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn internal_error_is_redacted() {
        let resp = AppError::internal("task join failed").into_response();
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn bad_request_keeps_message() {
        let resp = AppError::bad_request("BAD_INPUT", "width must be positive").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["code"], "BAD_INPUT");
        assert_eq!(json["message"], "width must be positive");
    }

    #[test]
    fn flow_errors_map_to_status() {
        let cases = [
            (FlowError::EmptyInput, StatusCode::BAD_REQUEST),
            (FlowError::PageOutOfRange(9), StatusCode::BAD_REQUEST),
            (FlowError::AlreadyAnswered, StatusCode::CONFLICT),
            (
                FlowError::InvalidTransition {
                    phase: PhaseKind::Idle,
                    action: "advance",
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(AppError::from(error).status, status);
        }
    }
}
