//! Read request backed by a local async writer.

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::gateway::request::{ReadRequest, TransferErrorKind};

/// Error signal received from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFailure {
    pub kind: TransferErrorKind,
    pub message: String,
}

impl std::fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A read request whose file content goes to `W`.
///
/// Once an error has been signalled or the request closed, further writes
/// fail with `BrokenPipe`, as they would on a finished transfer.
#[derive(Debug)]
pub struct LocalRequest<W> {
    filename: String,
    client_addr: SocketAddr,
    writer: W,
    bytes_written: u64,
    blocks_written: u64,
    failure: Option<TransferFailure>,
    closed: bool,
}

impl<W> LocalRequest<W> {
    pub fn new(filename: impl Into<String>, client_addr: SocketAddr, writer: W) -> Self {
        Self {
            filename: filename.into(),
            client_addr,
            writer,
            bytes_written: 0,
            blocks_written: 0,
            failure: None,
            closed: false,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn blocks_written(&self) -> u64 {
        self.blocks_written
    }

    /// The error signal, if the gateway sent one.
    pub fn failure(&self) -> Option<&TransferFailure> {
        self.failure.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: AsyncWrite + Unpin> LocalRequest<W> {
    /// Flush buffered content to the underlying writer.
    pub async fn flush(&mut self) -> io::Result<()> {
        self.writer.flush().await
    }
}

#[async_trait]
impl<W> ReadRequest for LocalRequest<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn filename(&self) -> &str {
        &self.filename
    }

    fn client_addr(&self) -> SocketAddr {
        self.client_addr
    }

    async fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if self.closed || self.failure.is_some() {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.writer.write_all(data).await?;
        self.bytes_written += data.len() as u64;
        self.blocks_written += 1;
        Ok(())
    }

    async fn write_error(&mut self, kind: TransferErrorKind, message: &str) -> io::Result<()> {
        if self.closed {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.failure = Some(TransferFailure {
            kind,
            message: message.to_string(),
        });
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LocalRequest<Vec<u8>> {
        LocalRequest::new("boot/pxe.cfg", "127.0.0.1:1069".parse().unwrap(), Vec::new())
    }

    #[tokio::test]
    async fn writes_accumulate() {
        let mut req = request();
        req.write(b"HEL").await.unwrap();
        req.write(b"LO").await.unwrap();
        assert_eq!(req.bytes_written(), 5);
        assert_eq!(req.blocks_written(), 2);
        assert_eq!(req.into_inner(), b"HELLO".to_vec());
    }

    #[tokio::test]
    async fn error_signal_ends_transfer() {
        let mut req = request();
        req.write_error(TransferErrorKind::FileNotFound, "File not found")
            .await
            .unwrap();
        let err = req.write(b"x").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(
            req.failure().unwrap().to_string(),
            "file not found (1): File not found"
        );
    }

    #[tokio::test]
    async fn closed_request_rejects_writes() {
        let mut req = request();
        req.close();
        assert!(req.is_closed());
        assert!(req.write(b"x").await.is_err());
        assert!(req
            .write_error(TransferErrorKind::FileNotFound, "late")
            .await
            .is_err());
        assert!(req.failure().is_none());
    }
}
