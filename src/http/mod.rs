//! HTTP transport to the origin server.
//!
//! # Data Flow
//! ```text
//! Gateway handler
//!     → client.rs (reqwest GET with forwarding headers, timeouts, redirects)
//!     → status + streamed body back to the handler
//! ```

pub mod client;

pub use client::ReqwestOrigin;
