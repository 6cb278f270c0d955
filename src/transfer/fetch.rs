//! One-shot fetch driven without a protocol server.

use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncWrite;

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::transfer::local::{LocalRequest, TransferFailure};

/// Why a one-shot fetch produced no file.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Refused(TransferFailure),

    #[error("output: {0}")]
    Io(#[from] std::io::Error),
}

/// Run `request` through the gateway and flush what it delivered.
/// Returns the number of bytes written.
pub async fn fetch<W>(gateway: &Gateway, request: &mut LocalRequest<W>) -> Result<u64, FetchError>
where
    W: AsyncWrite + Unpin + Send,
{
    gateway.handle(request).await?;
    if let Some(failure) = request.failure() {
        return Err(FetchError::Refused(failure.clone()));
    }
    request.flush().await?;
    Ok(request.bytes_written())
}

/// Fetch `filename` into a file at `path`.
///
/// A failed fetch leaves no file at `path`. A truncated body is kept, since
/// the bytes already delivered are the final result.
pub async fn fetch_to_file(
    gateway: &Gateway,
    filename: &str,
    client: SocketAddr,
    path: &Path,
) -> Result<u64, FetchError> {
    let file = tokio::fs::File::create(path).await?;
    let mut request = LocalRequest::new(filename, client, file);
    let fetched = fetch(gateway, &mut request).await;
    drop(request);

    if fetched.is_err() {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove output file");
        }
    }
    fetched
}
