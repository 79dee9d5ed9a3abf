use std::any::Any;

use poem::middleware::{CatchPanic, PanicHandler};
use poem::{Response, http::StatusCode};

/// Turns handler panics into the structured 500 body the rest of the API
/// uses, instead of poem's plain-text default.
#[derive(Clone)]
pub struct JsonPanicHandler;

impl PanicHandler for JsonPanicHandler {
    type Response = Response;

    fn get_response(&self, err: Box<dyn Any + Send + 'static>) -> Self::Response {
        tracing::error!("Handler panicked: {}", panic_message(err.as_ref()));

        let body = serde_json::json!({
            "name": "InternalError",
            "message": "server.panic",
        });

        Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .content_type("application/json")
            .body(body.to_string())
    }
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(message) = err.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub fn catch_panic() -> CatchPanic<JsonPanicHandler> {
    CatchPanic::new().with_handler(JsonPanicHandler)
}
