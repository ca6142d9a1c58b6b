//! Error types for the OctoFit API client.
//!
//! # Design
//! The backend contract knows a single failure class: the request failed.
//! `RequestFailed` carries the HTTP status and the message the server put
//! in its error body, or `DEFAULT_ERROR_MESSAGE` when it sent none.
//! `Transport` is the same class for exchanges that never produced a
//! response. The two codec variants cover local encode/decode problems.

use serde_json::Value;

/// Message used when a failed response carries no `message` field.
pub const DEFAULT_ERROR_MESSAGE: &str = "API request failed";

/// Errors returned by `OctofitClient` parse methods and the `Api` facade.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// The request never completed (connect, DNS, I/O).
    #[error("request failed: {0}")]
    Transport(String),

    /// A 2xx body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Build a `RequestFailed` from a non-2xx response body.
    ///
    /// Uses the body's top-level string `message` when the body is a JSON
    /// object that has a non-empty one. Anything else falls back to
    /// `DEFAULT_ERROR_MESSAGE`.
    pub fn from_failed_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|message| !message.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
        ApiError::RequestFailed { status, message }
    }

    /// True for both flavours of "request failed".
    pub fn is_request_failure(&self) -> bool {
        matches!(self, ApiError::RequestFailed { .. } | ApiError::Transport(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_becomes_the_error_message() {
        let err = ApiError::from_failed_response(
            400,
            r#"{"message":"You are already a member of this team"}"#,
        );
        assert_eq!(err.to_string(), "You are already a member of this team");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn missing_message_falls_back_to_default() {
        let err = ApiError::from_failed_response(404, r#"{"detail":"Not found."}"#);
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
        assert!(err.is_not_found());
    }

    #[test]
    fn non_json_body_falls_back_to_default() {
        let err = ApiError::from_failed_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn non_string_message_is_ignored() {
        let err = ApiError::from_failed_response(400, r#"{"message":42}"#);
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn empty_message_falls_back_to_default() {
        let err = ApiError::from_failed_response(400, r#"{"message":""}"#);
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn transport_errors_count_as_request_failures() {
        let err = ApiError::Transport("connection refused".to_string());
        assert!(err.is_request_failure());
        assert_eq!(err.status(), None);
        assert!(!ApiError::Deserialization("x".to_string()).is_request_failure());
    }
}
