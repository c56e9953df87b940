//! Error types for the REST client.
//!
//! # Design
//! Every failure is fail-fast and propagated to the caller. Non-2xx HTTP
//! statuses are not errors here; they come back as data in
//! `ResponseResult::http_code`. Transport failures from `ureq` are wrapped
//! unchanged in `Transport`.

use thiserror::Error;

/// Errors returned by `HttpClient` construction and `execute`.
#[derive(Debug, Error)]
pub enum RestError {
    /// Missing or blank base URL, or an unsupported return format.
    #[error("{0}")]
    Configuration(String),

    /// The transfer session was never opened or has already been released.
    #[error("transfer session not initialised")]
    SessionNotInitialized,

    /// The request method is not one of DELETE, GET, POST or PUT.
    #[error("invalid request method ({0})")]
    InvalidMethod(String),

    /// The request path was empty or whitespace only.
    #[error("cannot process request without a path")]
    MissingPath,

    /// DNS, connection, TLS or body-read failure reported by the transfer library.
    #[error("transfer failed: {0}")]
    Transport(#[from] ureq::Error),
}

impl RestError {
    pub(crate) fn missing_url() -> Self {
        RestError::Configuration("cannot create a client without a base URL".to_string())
    }

    pub(crate) fn unsupported_format(value: &str) -> Self {
        RestError::Configuration(format!("unsupported return format ({value})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_method_message_carries_value() {
        let err = RestError::InvalidMethod("PATCH".to_string());
        assert_eq!(err.to_string(), "invalid request method (PATCH)");
    }

    #[test]
    fn configuration_messages() {
        assert_eq!(
            RestError::missing_url().to_string(),
            "cannot create a client without a base URL"
        );
        assert_eq!(
            RestError::unsupported_format("xml").to_string(),
            "unsupported return format (xml)"
        );
    }
}
