//! Error types for REST API operations

use bitnut_auth::AuthError;

/// Boxed error returned by [`crate::transport::Transport`] implementations
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Structured rejection returned by the exchange
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API error {code}: {message}")]
pub struct ApiError {
    /// Server-defined error code
    pub code: String,
    /// Server-defined error message (or the raw body if it was not JSON)
    pub message: String,
}

impl ApiError {
    /// Code used when the error body could not be parsed
    pub const UNKNOWN_CODE: &'static str = "unknown";

    /// Create an API error from a code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Wrap an unparseable error body
    pub fn unknown(raw_body: impl Into<String>) -> Self {
        Self::new(Self::UNKNOWN_CODE, raw_body)
    }

    /// Whether the code could not be determined from the response
    pub fn is_unknown(&self) -> bool {
        self.code == Self::UNKNOWN_CODE
    }
}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Malformed request, detected before any I/O
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Network-level failure (connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The caller's cancellation token fired before the response arrived
    #[error("Request cancelled")]
    Cancelled,

    /// The server rejected the request
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Response body did not match the expected shape
    #[error("Failed to deserialize response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Missing API credentials for a keyed endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// Credential or signing failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl RestError {
    /// Check if this error is worth retrying by the caller
    ///
    /// Only transport failures qualify. This layer itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The server-side rejection, if this is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = RestError::from(ApiError::new("1001", "not found"));
        assert_eq!(err.to_string(), "API error 1001: not found");
        assert_eq!(err.api_error().map(|e| e.code.as_str()), Some("1001"));
    }

    #[test]
    fn test_unknown_api_error() {
        let err = ApiError::unknown("<html>bad gateway</html>");
        assert!(err.is_unknown());
        assert_eq!(err.message, "<html>bad gateway</html>");
    }

    #[test]
    fn test_retryable_classification() {
        let transport = RestError::Transport("connection reset".into());
        assert!(transport.is_retryable());

        assert!(!RestError::Validation("empty path".to_string()).is_retryable());
        assert!(!RestError::AuthRequired.is_retryable());
        assert!(!RestError::Cancelled.is_retryable());
        assert!(!RestError::from(ApiError::new("-1", "rejected")).is_retryable());
    }
}
