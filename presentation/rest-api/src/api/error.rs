use poem::http::StatusCode;
use poem_openapi::{Object, payload::Json};

/// Error body shared by every endpoint: a stable error name plus an
/// i18n-ready message code.
#[derive(Object, Debug)]
pub struct ErrorResponse {
    pub name: String,
    pub message: String,
}

pub trait IntoErrorResponse {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>);
}

impl ErrorResponse {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            name: "ValidationError".to_string(),
            message: message.into(),
        }
    }
}
