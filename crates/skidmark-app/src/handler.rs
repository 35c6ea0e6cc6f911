// Request envelope: JSON body in, status code and JSON body out.

use serde_json::{json, Value};
use tracing::{error, info, warn};

use skidmark_core::{BatchCoordinator, RoastError, RoastRequest, TextGenerator};

/// Transport-neutral response for one roast request.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeResponse {
    pub status: u16,
    pub body: Value,
}

impl EnvelopeResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

/// Decode a request body. An empty body is treated as `{}`.
pub fn parse_request(body: &str) -> Result<RoastRequest, RoastError> {
    let body = body.trim();
    let body = if body.is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(RoastError::MalformedEnvelope)
}

/// Decode, generate and encode one roast request.
pub async fn handle_roast_request<G>(
    body: &str,
    coordinator: &BatchCoordinator<G>,
) -> EnvelopeResponse
where
    G: TextGenerator + ?Sized + 'static,
{
    let result = match parse_request(body) {
        Ok(request) => coordinator.generate_roasts(&request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(roasts) => {
            info!(roasts = roasts.len(), "roast request complete");
            EnvelopeResponse::ok(json!({ "roasts": roasts }))
        }
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &RoastError) -> EnvelopeResponse {
    match err {
        RoastError::MalformedEnvelope(cause) => {
            warn!("rejecting request body: {cause}");
            EnvelopeResponse::error(400, "Invalid JSON body")
        }
        RoastError::InvalidInput(message) => {
            warn!("rejecting request: {message}");
            EnvelopeResponse::error(400, message)
        }
        other => {
            error!("roast request failed: {other}");
            EnvelopeResponse::error(500, "Failed to generate roasts")
        }
    }
}
