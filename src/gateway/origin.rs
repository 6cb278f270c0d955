//! HTTP-transport capability and outbound request construction.
//!
//! # Responsibilities
//! - Build the target URL from the origin prefix and a validated filename
//! - Carry the forwarding headers for one outbound GET
//! - Describe the origin's answer as a status plus a body stream

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use std::net::IpAddr;
use url::Url;

use crate::error::{GatewayError, GatewayResult};

/// Header carrying the requester's IP to the origin.
pub const X_FORWARDED_FOR: &str = "X-Forwarded-For";

/// Header carrying the gateway's identity.
pub const USER_AGENT: &str = "User-Agent";

/// The only origin status treated as success.
pub const SUCCESS_STATUS: u16 = 200;

/// Body of an origin response, yielded as it arrives.
pub type OriginBody = BoxStream<'static, std::io::Result<Bytes>>;

/// Outbound GET derived from one read request. Never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginRequest {
    pub url: Url,
    pub forwarded_for: IpAddr,
    pub user_agent: String,
}

impl OriginRequest {
    /// Build the request for `filename`, which must already be validated.
    pub fn new(
        prefix: &str,
        filename: &str,
        forwarded_for: IpAddr,
        user_agent: impl Into<String>,
    ) -> GatewayResult<Self> {
        Ok(Self {
            url: target_url(prefix, filename)?,
            forwarded_for,
            user_agent: user_agent.into(),
        })
    }

    /// The fixed header set sent with every GET.
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            (X_FORWARDED_FOR, self.forwarded_for.to_string()),
            (USER_AGENT, self.user_agent.clone()),
        ]
    }
}

/// Concatenate the origin prefix with the raw filename.
pub fn target_url(prefix: &str, filename: &str) -> GatewayResult<Url> {
    let raw = format!("{}{}", prefix, filename);
    Url::parse(&raw).map_err(|e| GatewayError::InvalidOriginUrl {
        url: raw,
        reason: e.to_string(),
    })
}

/// The origin's answer to one GET.
pub struct OriginResponse {
    pub status: u16,
    pub body: OriginBody,
}

impl OriginResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

impl std::fmt::Debug for OriginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OriginResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Performs GETs against the origin server.
///
/// Implementations return `Err` only when no status line was received
/// (DNS, connect, timeout, I/O). Any status, including errors, is `Ok`.
#[async_trait]
pub trait OriginClient: Send + Sync {
    async fn get(&self, request: &OriginRequest) -> GatewayResult<OriginResponse>;
}
