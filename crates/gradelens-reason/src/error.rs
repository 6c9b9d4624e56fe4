//! Reason generator error types.

use thiserror::Error;

/// Errors that can occur when asking the remote reason service.
///
/// None of these reach the insight engine: the HTTP generator logs them and
/// answers with the local fallback instead.
#[derive(Debug, Error)]
pub enum ReasonError {
    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The service returned a non-success response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response carried no usable `reason` text.
    #[error("response has no reason text")]
    EmptyReason,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl ReasonError {
    /// Returns `true` for failures on the way to or from the service, as
    /// opposed to a service that answered with something unusable.
    pub fn is_transport(&self) -> bool {
        matches!(self, ReasonError::Timeout(_) | ReasonError::NetworkError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = ReasonError::ApiError {
            status: 503,
            message: "busy".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 503): busy");
        assert_eq!(ReasonError::Timeout(8).to_string(), "request timed out after 8s");
        assert!(ReasonError::Timeout(8).is_transport());
        assert!(!ReasonError::EmptyReason.is_transport());
    }
}
