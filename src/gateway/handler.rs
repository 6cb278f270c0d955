//! Read-request handler.
//!
//! # Responsibilities
//! - Reject unsafe filenames before any network I/O
//! - Translate the request into one origin GET with forwarding headers
//! - Hide origin status codes and error pages behind "file not found"
//! - Stream the body back in blocks, accepting truncation as final
//! - Emit one structured event per outcome
//!
//! # Failure semantics
//! ```text
//! bad filename        → FileNotFound to requester, Ok(())
//! status != 200       → FileNotFound to requester, Ok(())
//! transport failure   → nothing to requester,     Err(GatewayError)
//! mid-stream failure  → bytes already sent stand, Ok(())
//! ```

use async_trait::async_trait;
use futures_util::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::schema::GatewayConfig;
use crate::error::GatewayResult;
use crate::gateway::origin::{OriginBody, OriginClient, OriginRequest};
use crate::gateway::request::{CloseGuard, ReadRequest, TransferErrorKind};
use crate::observability::events::{EventSink, FailureCause, GatewayEvent};
use crate::observability::metrics::{self, Outcome};
use crate::security::validate_filename;

/// Message sent to the requester when the filename is rejected.
pub const BAD_FILENAME_MESSAGE: &str = "File not found (invalid filename)";

/// Message sent to the requester when the origin does not answer 200.
pub const NOT_FOUND_MESSAGE: &str = "File not found";

/// Callback invoked by a protocol server for every inbound read request.
#[async_trait]
pub trait ReadHandler: Send + Sync {
    async fn handle_read(&self, request: &mut dyn ReadRequest) -> GatewayResult<()>;
}

/// Translates read requests into origin GETs.
///
/// Holds only read-only state, so one instance can serve any number of
/// concurrent invocations.
#[derive(Clone)]
pub struct Gateway {
    origin_prefix: Arc<str>,
    user_agent: Arc<str>,
    block_size: usize,
    origin: Arc<dyn OriginClient>,
    events: Arc<dyn EventSink>,
}

/// How the copy loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamSummary {
    bytes: u64,
    truncated: bool,
}

impl Gateway {
    /// Create a gateway from validated configuration.
    pub fn new(
        config: &GatewayConfig,
        origin: Arc<dyn OriginClient>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            origin_prefix: Arc::from(config.origin.http_url.as_str()),
            user_agent: Arc::from(config.origin.user_agent.as_str()),
            block_size: config.transfer.block_size.max(1),
            origin,
            events,
        }
    }

    /// Handle one read request. The request is closed before this returns.
    pub async fn handle<R>(&self, request: &mut R) -> GatewayResult<()>
    where
        R: ReadRequest + ?Sized,
    {
        let span = tracing::info_span!(
            "read_request",
            request_id = %Uuid::new_v4(),
            client = %request.client_addr()
        );
        self.serve(request).instrument(span).await
    }

    async fn serve<R>(&self, request: &mut R) -> GatewayResult<()>
    where
        R: ReadRequest + ?Sized,
    {
        let start_time = Instant::now();
        let mut request = CloseGuard::new(request);
        let client_address = request.client_addr();
        let filename = request.filename().to_string();

        self.events.emit(&GatewayEvent::RequestReceived {
            filename: filename.clone(),
        });

        if !validate_filename(&filename) {
            self.events.emit(&GatewayEvent::RequestRejectedBadFilename {
                client_address,
                filename,
            });
            metrics::record_request(Outcome::BadFilename, 0, start_time);
            signal_not_found(&mut *request, BAD_FILENAME_MESSAGE).await;
            return Ok(());
        }

        let fetched = match OriginRequest::new(
            &self.origin_prefix,
            &filename,
            client_address.ip(),
            &*self.user_agent,
        ) {
            Ok(outbound) => {
                tracing::debug!(url = %outbound.url, "Fetching from origin");
                self.origin.get(&outbound).await
            }
            Err(e) => Err(e),
        };

        let response = match fetched {
            Ok(response) => response,
            Err(e) => {
                self.fail(client_address, filename, FailureCause::Transport(e.to_string()));
                metrics::record_request(Outcome::TransportError, 0, start_time);
                return Err(e);
            }
        };

        if !response.is_success() {
            let status = response.status;
            // Release the error page before reporting; its body is never read.
            drop(response);
            self.fail(client_address, filename, FailureCause::Status(status));
            metrics::record_request(Outcome::HttpStatus, 0, start_time);
            signal_not_found(&mut *request, NOT_FOUND_MESSAGE).await;
            return Ok(());
        }

        let summary = stream_body(&mut *request, response.body, self.block_size).await;

        self.events.emit(&GatewayEvent::RequestCompleted {
            client_address,
            filename,
            bytes: summary.bytes,
            truncated: summary.truncated,
        });
        let outcome = if summary.truncated {
            Outcome::Truncated
        } else {
            Outcome::Completed
        };
        metrics::record_request(outcome, summary.bytes, start_time);
        Ok(())
    }

    fn fail(&self, client_address: SocketAddr, filename: String, cause: FailureCause) {
        self.events.emit(&GatewayEvent::RequestFailedHttp {
            client_address,
            filename,
            cause,
        });
    }
}

#[async_trait]
impl ReadHandler for Gateway {
    async fn handle_read(&self, request: &mut dyn ReadRequest) -> GatewayResult<()> {
        self.handle(request).await
    }
}

async fn signal_not_found<R>(request: &mut R, message: &str)
where
    R: ReadRequest + ?Sized,
{
    if let Err(e) = request
        .write_error(TransferErrorKind::FileNotFound, message)
        .await
    {
        tracing::debug!(error = %e, "Requester did not accept error signal");
    }
}

/// Copy the body to the requester, at most `block_size` bytes per write.
/// Any read or write error ends the loop; bytes already written stand.
async fn stream_body<R>(request: &mut R, mut body: OriginBody, block_size: usize) -> StreamSummary
where
    R: ReadRequest + ?Sized,
{
    let mut bytes = 0u64;

    while let Some(item) = body.next().await {
        let chunk = match item {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::debug!(error = %e, bytes, "Origin body ended with error");
                return StreamSummary { bytes, truncated: true };
            }
        };

        for block in chunk.chunks(block_size) {
            if let Err(e) = request.write(block).await {
                tracing::debug!(error = %e, bytes, "Requester write failed");
                return StreamSummary { bytes, truncated: true };
            }
            bytes += block.len() as u64;
        }
    }

    StreamSummary {
        bytes,
        truncated: false,
    }
}
