//! Protocol-layer capability consumed by the gateway.
//!
//! # Responsibilities
//! - Expose the attacker-controlled filename and the requester address
//! - Accept file content blocks in order
//! - Accept a protocol error signal (only "file not found" is used here)
//! - Release the transfer once handling ends
//!
//! # Design Decisions
//! - One trait with one implementation per protocol server; the gateway never
//!   sees datagrams, retransmission or acknowledgement
//! - `close` is synchronous so a drop guard can call it on every exit path

use async_trait::async_trait;
use std::net::SocketAddr;
use std::ops::{Deref, DerefMut};

/// Standard file-transfer error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferErrorKind {
    NotDefined,
    FileNotFound,
    AccessViolation,
    DiskFull,
    IllegalOperation,
    UnknownTransferId,
    FileExists,
    NoSuchUser,
}

impl TransferErrorKind {
    /// Wire code carried in the protocol's error packet.
    pub fn code(&self) -> u16 {
        match self {
            TransferErrorKind::NotDefined => 0,
            TransferErrorKind::FileNotFound => 1,
            TransferErrorKind::AccessViolation => 2,
            TransferErrorKind::DiskFull => 3,
            TransferErrorKind::IllegalOperation => 4,
            TransferErrorKind::UnknownTransferId => 5,
            TransferErrorKind::FileExists => 6,
            TransferErrorKind::NoSuchUser => 7,
        }
    }
}

impl std::fmt::Display for TransferErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransferErrorKind::NotDefined => "not defined",
            TransferErrorKind::FileNotFound => "file not found",
            TransferErrorKind::AccessViolation => "access violation",
            TransferErrorKind::DiskFull => "disk full",
            TransferErrorKind::IllegalOperation => "illegal operation",
            TransferErrorKind::UnknownTransferId => "unknown transfer id",
            TransferErrorKind::FileExists => "file exists",
            TransferErrorKind::NoSuchUser => "no such user",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// One inbound read request, owned by the protocol layer.
#[async_trait]
pub trait ReadRequest: Send {
    /// Raw filename as sent by the requester. Never trusted before validation.
    fn filename(&self) -> &str;

    /// Network address of the requester.
    fn client_addr(&self) -> SocketAddr;

    /// Send the next block of file content.
    async fn write(&mut self, data: &[u8]) -> std::io::Result<()>;

    /// Terminate the transfer with a protocol error.
    async fn write_error(&mut self, kind: TransferErrorKind, message: &str) -> std::io::Result<()>;

    /// Release the transfer. Called exactly once per invocation.
    fn close(&mut self);
}

/// Guard that closes the wrapped request when dropped.
pub struct CloseGuard<'a, R: ReadRequest + ?Sized> {
    inner: &'a mut R,
}

impl<'a, R: ReadRequest + ?Sized> CloseGuard<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self { inner }
    }
}

impl<R: ReadRequest + ?Sized> Deref for CloseGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.inner
    }
}

impl<R: ReadRequest + ?Sized> DerefMut for CloseGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.inner
    }
}

impl<R: ReadRequest + ?Sized> Drop for CloseGuard<'_, R> {
    fn drop(&mut self) {
        self.inner.close();
        tracing::trace!(client = %self.inner.client_addr(), "Read request closed");
    }
}
