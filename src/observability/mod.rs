//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway handler produces:
//!     → events.rs (one structured event per outcome, via EventSink)
//!     → metrics.rs (counters, histogram)
//!
//! Consumers:
//!     → logging.rs (tracing subscriber: pretty or JSON to stderr)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Events are an injected capability so tests can assert on them
//! - Request ID flows through a tracing span per invocation

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{EventSink, FailureCause, GatewayEvent, MemoryEventSink, TracingEventSink};
