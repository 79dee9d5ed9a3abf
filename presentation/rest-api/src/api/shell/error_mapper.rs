use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::execution::errors::ExecutionError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for ExecutionError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name, message) = match &self {
            ExecutionError::EmptyInput => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "execution.empty_input",
            ),
            ExecutionError::InvalidTimeout { .. } => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "execution.invalid_timeout",
            ),
            ExecutionError::Launch { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                "execution.launch_failed",
            ),
            ExecutionError::Timeout { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                "execution.timeout",
            ),
            ExecutionError::CommandFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                "execution.command_failed",
            ),
            ExecutionError::RemoteFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                "execution.remote_failed",
            ),
            ExecutionError::Transport { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                "execution.transport_failed",
            ),
            ExecutionError::Repository(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                "repository.persistence",
            ),
        };

        (
            status,
            Json(ErrorResponse {
                name: name.to_string(),
                message: message.to_string(),
            }),
        )
    }
}
