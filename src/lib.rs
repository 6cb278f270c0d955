//! TFTP to HTTP gateway library.
//!
//! Read requests arriving over a lightweight file-transfer protocol are
//! translated into HTTP GETs against an origin server, and the response body
//! is streamed back to the requester in protocol-sized blocks.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod observability;
pub mod security;
pub mod transfer;

pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use gateway::{Gateway, ReadHandler, ReadRequest, TransferErrorKind};
