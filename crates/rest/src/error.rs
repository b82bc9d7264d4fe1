//! Remote and network error taxonomy.

use thiserror::Error;

/// Errors produced at the collaborator boundary.
///
/// Validation errors raised before any network call live in the domain
/// crate; everything here is either a rejected request, a connectivity
/// failure, or a payload the client refuses to trust.
#[derive(Debug, Error)]
pub enum RestError {
    /// The server could not be reached at all (DNS, refused connection,
    /// timeout); there is no HTTP status to map.
    #[error("network failure: {detail}")]
    Network { detail: String },

    /// The server answered with a non-success status code.
    #[error("server rejected the request with status {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body could not be parsed as the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response parsed, but violated a record invariant
    /// (e.g. a negative price or stock count).
    #[error("invalid {entity} record: {reason}")]
    InvalidRecord {
        entity: &'static str,
        reason: String,
    },

    /// An enveloped response carried no `data` payload.
    #[error("response carried no data: {message}")]
    MissingData { message: String },
}

impl RestError {
    /// Creates a status error from a response code and raw body text.
    pub fn from_status(code: u16, body: impl Into<String>) -> Self {
        RestError::Status {
            code,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code, if this error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RestError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Maps the error to the message shown to the user.
    ///
    /// Remote rejections are translated by status code with a generic
    /// fallback; connectivity failures get their own message. Decode and
    /// record errors surface as the generic message since the user cannot
    /// act on them.
    pub fn user_message(&self) -> &'static str {
        match self {
            RestError::Network { .. } => {
                "Cannot reach the server. Check your connection and try again."
            }
            RestError::Status { code, .. } => match code {
                401 => "Your session has expired. Please log in again.",
                403 => "You are not authorized to perform this action.",
                404 => "The requested resource was not found.",
                409 => "The request conflicts with the current state. Refresh and try again.",
                422 => "The submitted data was not accepted.",
                500 => "The server hit an internal error. Please try again later.",
                502 | 503 => "The service is temporarily unavailable. Please try again later.",
                504 => "The server took too long to respond. Please try again later.",
                _ => "Something went wrong. Please try again.",
            },
            _ => "Something went wrong. Please try again.",
        }
    }
}
