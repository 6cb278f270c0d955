//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// Smallest block size the transfer protocol negotiates.
pub const MIN_BLOCK_SIZE: usize = 8;

/// Largest block size the transfer protocol negotiates.
pub const MAX_BLOCK_SIZE: usize = 65464;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("origin.http_url '{url}' is not a valid URL: {reason}")]
    InvalidOriginUrl { url: String, reason: String },

    #[error("origin.http_url scheme '{0}' is not http or https")]
    UnsupportedScheme(String),

    #[error("origin.user_agent must be a non-empty header value")]
    InvalidUserAgent,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("transfer.block_size {0} is outside 8..=65464")]
    BlockSizeOutOfRange(usize),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check the configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.origin.http_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidOriginUrl {
            url: config.origin.http_url.clone(),
            reason: e.to_string(),
        }),
    }

    if !is_header_value(&config.origin.user_agent) {
        errors.push(ValidationError::InvalidUserAgent);
    }

    if config.origin.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("origin.connect_timeout_secs"));
    }
    if config.origin.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("origin.request_timeout_secs"));
    }

    let block_size = config.transfer.block_size;
    if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&block_size) {
        errors.push(ValidationError::BlockSizeOutOfRange(block_size));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Visible ASCII and spaces, no leading/trailing whitespace.
fn is_header_value(value: &str) -> bool {
    !value.is_empty()
        && value.trim() == value
        && value.bytes().all(|b| b == b' ' || b.is_ascii_graphic())
}
