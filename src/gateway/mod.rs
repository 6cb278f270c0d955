//! Request translation subsystem.
//!
//! # Data Flow
//! ```text
//! Protocol server (external)
//!     → request.rs (ReadRequest: filename, client address, write/error/close)
//!     → handler.rs (validate → build GET → check status → stream blocks)
//!     → origin.rs (OriginClient: one GET per request)
//!     → observability events, one per outcome
//! ```
//!
//! # Design Decisions
//! - Both collaborators are traits so the handler runs without a real
//!   listener or origin in tests
//! - No state is shared between invocations beyond read-only config

pub mod handler;
pub mod origin;
pub mod request;

pub use handler::{Gateway, ReadHandler, BAD_FILENAME_MESSAGE, NOT_FOUND_MESSAGE};
pub use origin::{OriginBody, OriginClient, OriginRequest, OriginResponse};
pub use request::{CloseGuard, ReadRequest, TransferErrorKind};
