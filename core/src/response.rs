//! Response interpretation: typed success payloads or classified failures.
//!
//! # Design
//! The status code is inspected before any deserialization. A 2xx body
//! that fails to deserialize is an `UnexpectedResponse`, a different
//! failure class from a transport error or a service-reported error, so
//! callers can tell a broken payload from a broken request. Non-2xx
//! bodies are parsed as the service's error envelope and mapped onto the
//! taxonomy by status; anything unrecognizable keeps its raw status and
//! body.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// JSON error envelope the service returns for non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub status_code: Option<u16>,
    pub errors: Vec<ErrorDetail>,
}

/// One entry of the envelope's `errors` array.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub error: String,
    pub message: String,
}

/// Interpret a raw response as the endpoint's expected type `T`.
pub fn interpret<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if (200..300).contains(&response.status) {
        return serde_json::from_str(&response.body)
            .map_err(|e| ApiError::UnexpectedResponse(e.to_string()));
    }
    Err(classify_failure(response))
}

/// Map a non-2xx response onto the error taxonomy.
///
/// The first envelope entry's type and message are carried into the
/// variant. An unparseable or empty envelope falls back to `Http`.
fn classify_failure(response: HttpResponse) -> ApiError {
    let HttpResponse { status, body, .. } = response;

    let envelope: ErrorEnvelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(_) => return ApiError::Http { status, body },
    };
    let Some(detail) = envelope.errors.into_iter().next() else {
        return ApiError::Http { status, body };
    };
    let (error, message) = (detail.error, detail.message);

    match status {
        400 => ApiError::BadRequest { error, message },
        401 | 403 => ApiError::Auth { error, message },
        404 => ApiError::NotFound { error, message },
        429 => ApiError::RateLimit { error, message },
        500..=599 => ApiError::Server { error, message },
        _ => ApiError::Http { status, body },
    }
}
