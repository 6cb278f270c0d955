//! Origin client backed by reqwest.
//!
//! # Responsibilities
//! - Apply the connect timeout and a deadline for the response headers
//! - Follow redirects up to the configured limit; only the final status counts
//! - Expose the body as a stream so nothing is buffered whole
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` shared by all invocations
//! - No client-wide timeout: the body is read at the requester's pace, one
//!   acknowledged block at a time, so a deadline over the whole exchange
//!   would cut off large files from a healthy origin
//! - Errors before a status line become `GatewayError::OriginTransport`;
//!   errors while reading the body become stream items

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::config::schema::OriginConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::origin::{OriginClient, OriginRequest, OriginResponse};

/// Production [`OriginClient`].
#[derive(Debug, Clone)]
pub struct ReqwestOrigin {
    client: reqwest::Client,
    response_timeout: Duration,
}

impl ReqwestOrigin {
    /// Build a client from origin settings.
    pub fn new(config: &OriginConfig) -> GatewayResult<Self> {
        let client = Self::builder(config).build()?;
        Ok(Self::with_client(config, client))
    }

    /// Client builder preconfigured from origin settings.
    pub fn builder(config: &OriginConfig) -> reqwest::ClientBuilder {
        let redirect = if config.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(config.max_redirects)
        };

        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(redirect)
    }

    /// Wrap an already configured client, keeping the header deadline from `config`.
    pub fn with_client(config: &OriginConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            response_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

#[async_trait]
impl OriginClient for ReqwestOrigin {
    async fn get(&self, request: &OriginRequest) -> GatewayResult<OriginResponse> {
        let mut builder = self.client.get(request.url.clone());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = tokio::time::timeout(self.response_timeout, builder.send())
            .await
            .map_err(|_| {
                GatewayError::OriginTransport(format!(
                    "no response headers within {}s",
                    self.response_timeout.as_secs()
                ))
            })??;
        let status = response.status().as_u16();

        tracing::debug!(
            url = %request.url,
            final_url = %response.url(),
            status,
            "Origin responded"
        );

        let body = response
            .bytes_stream()
            .map(|item| item.map_err(std::io::Error::other))
            .boxed();

        Ok(OriginResponse { status, body })
    }
}
