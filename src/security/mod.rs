//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming read request:
//!     → filename.rs (allow-list check on the raw filename)
//!     → Pass to the gateway handler (URL construction)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a filename that does not match is rejected before any I/O
//! - No trust in client input: the filename is appended verbatim to the
//!   origin URL, so the allow-list is the only guard against path escapes

pub mod filename;

pub use filename::validate_filename;
