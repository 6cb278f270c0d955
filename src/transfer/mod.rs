//! Requester-side adapters.
//!
//! The gateway only talks to the protocol layer through [`ReadRequest`].
//! `local.rs` implements it over any async writer, which is what the CLI
//! `fetch` command and the tests use in place of a protocol server.
//! `fetch.rs` runs one such request to completion.
//!
//! [`ReadRequest`]: crate::gateway::ReadRequest

pub mod fetch;
pub mod local;

pub use fetch::{fetch, fetch_to_file, FetchError};
pub use local::{LocalRequest, TransferFailure};
