//! Error types surfaced by the gateway handler.

use thiserror::Error;

/// Errors propagated from a read-request invocation to the protocol layer.
///
/// Only failures at the transport level end up here. A rejected filename or a
/// non-success origin status is reported to the requester as "file not found"
/// and the handler returns `Ok(())`.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The HTTP exchange could not be completed before a status line arrived.
    #[error("origin transport error: {0}")]
    OriginTransport(String),

    /// The origin prefix and filename did not form a usable URL.
    #[error("invalid origin URL '{url}': {reason}")]
    InvalidOriginUrl { url: String, reason: String },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's top-level message omits the underlying cause (e.g. refused).
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }
        GatewayError::OriginTransport(msg)
    }
}

/// Convenience alias for gateway results.
pub type GatewayResult<T> = Result<T, GatewayError>;
