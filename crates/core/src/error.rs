//! Failure type shared by every external collaborator.
//!
//! Object sources, detection capabilities and analytics stores all report
//! through [`ProviderError`]; the pipeline wraps it with the call or table
//! that failed.

/// Boxed cause preserved for diagnostics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request never produced a response (network, DNS, TLS, SDK dispatch).
    #[error("Request failed: {0}")]
    Request(#[source] BoxError),

    /// The provider answered with a non-success status.
    #[error("Provider returned HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The addressed resource does not exist.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// A success response whose body could not be interpreted.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The store accepted the request but refused some rows.
    #[error("{rows} row(s) rejected by {table}: {message}")]
    Rejected {
        table: String,
        rows: usize,
        message: String,
    },
}

impl ProviderError {
    /// Wrap any error as a transport-level failure.
    pub fn request<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Request(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_api_error() {
        let err = ProviderError::Api {
            status: 503,
            body: "backend unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Provider returned HTTP 503: backend unavailable"
        );
    }

    #[test]
    fn display_rejected() {
        let err = ProviderError::Rejected {
            table: "line_observation".to_string(),
            rows: 2,
            message: "invalid: no such field".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 row(s) rejected by line_observation: invalid: no such field"
        );
    }

    #[test]
    fn request_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = ProviderError::request(io);
        let source = std::error::Error::source(&err).expect("source must be kept");
        assert_eq!(source.to_string(), "reset by peer");
    }
}
