use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::response::AppError;

/// `axum::Json<T>` that rejects with the standard error envelope instead of
/// axum's plain-text body.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_app_error(rejection)),
        }
    }
}

fn rejection_to_app_error(rejection: JsonRejection) -> AppError {
    let reason = match &rejection {
        JsonRejection::JsonDataError(_) => "body does not match the expected shape",
        JsonRejection::JsonSyntaxError(_) => "body is not valid JSON",
        JsonRejection::MissingJsonContentType(_) => "expected an application/json body",
        JsonRejection::BytesRejection(_) => "failed to read request body",
        _ => "invalid request body",
    };
    tracing::warn!(error = %rejection, "JSON body rejected");
    AppError::bad_request("INVALID_REQUEST_BODY", reason)
}

impl<T> std::ops::Deref for JsonBody<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
