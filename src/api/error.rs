use crate::error::AlertError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Engine error on its way out as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub AlertError);

impl From<AlertError> for ApiError {
    fn from(err: AlertError) -> Self {
        ApiError(err)
    }
}

/// Undecodable request bodies are reported like any other invalid input.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AlertError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            AlertError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AlertError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", self.0.to_string())
            }
            AlertError::Store(err) => {
                error!("Store error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}
