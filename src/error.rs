//! Error taxonomy for calls against the function backend.

use reqwest::StatusCode;

/// Failure of a single remote function call.
///
/// Every variant carries the logical function name so call sites can
/// report "operation failed" without re-threading context.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No persisted session credential was found before dispatch.
    #[error("session expired; log in again")]
    NoSession,

    #[error("request to {function} failed: {source}")]
    Transport {
        function: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{function} returned {status}: {message}")]
    Function {
        function: String,
        status: StatusCode,
        code: Option<i64>,
        message: String,
    },

    #[error("could not decode {function} response: {source}")]
    Decode {
        function: String,
        #[source]
        source: serde_json::Error,
    },

    /// A call that must return a record came back with none.
    #[error("{function} returned no result")]
    EmptyResult { function: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True when the caller should prompt for a new session.
    pub fn is_session_error(&self) -> bool {
        match self {
            ApiError::NoSession => true,
            ApiError::Function { status, code, .. } => {
                // Parse reports an invalid session token as code 209.
                *status == StatusCode::UNAUTHORIZED || *code == Some(209)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_session_message_is_user_facing() {
        assert_eq!(
            ApiError::NoSession.to_string(),
            "session expired; log in again"
        );
    }

    #[test]
    fn invalid_session_token_counts_as_session_error() {
        let err = ApiError::Function {
            function: "get-admin-reports".to_string(),
            status: StatusCode::BAD_REQUEST,
            code: Some(209),
            message: "Invalid session token".to_string(),
        };
        assert!(err.is_session_error());
        assert!(!ApiError::invalid("quantity must be positive").is_session_error());
    }
}
