//! Errors raised by the HTTP transport to the CodeMaker service.

use thiserror::Error;

/// Failure of a single call to the service.
///
/// None of these are retried by the client; the job engine decides whether
/// the failure counts as a submission error or a transport error.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP 429. `retry_after_ms` comes from the `Retry-After` header.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Any other non-success HTTP status, with the response body as message.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Connection, DNS or timeout failure below HTTP.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered 2xx with a body we could not read.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display() {
        let err = ClientError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 5000ms");
    }

    #[test]
    fn api_error_display() {
        let err = ClientError::Api {
            status: 401,
            message: "Invalid API key".into(),
        };
        assert_eq!(err.to_string(), "API error (status 401): Invalid API key");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientError>();
    }
}
