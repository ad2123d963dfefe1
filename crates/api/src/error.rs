use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fastlane_pipeline::error::{ErrorKind, PipelineError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// The status tells the event-delivery side whether a redelivery can
/// help: `4xx` for events that will never succeed, `5xx` for failed
/// collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request body is not a storage-object event.
    #[error("Invalid event payload: {0}")]
    InvalidPayload(#[from] JsonRejection),

    /// The pipeline ran and failed at some stage.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, stage) = match &self {
            AppError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_EVENT", None),
            AppError::Pipeline(err) => match err.kind() {
                ErrorKind::Input => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_EVENT",
                    Some(err.stage.label()),
                ),
                ErrorKind::Dependency => (
                    StatusCode::BAD_GATEWAY,
                    "DEPENDENCY_FAILURE",
                    Some(err.stage.label()),
                ),
            },
        };

        let body = json!({
            "error": self.to_string(),
            "code": code,
            "stage": stage,
        });

        (status, axum::Json(body)).into_response()
    }
}
