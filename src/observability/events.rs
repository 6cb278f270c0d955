//! Structured gateway events.
//!
//! # Responsibilities
//! - Name every outcome of a read request
//! - Deliver events to an injected sink instead of a global logger
//!
//! # Events
//! - `REQUEST_RECEIVED{filename}`: emitted first, for every invocation
//! - `REQUEST_COMPLETED{clientAddress, filename, bytes, truncated}`
//! - `REQUEST_REJECTED_BAD_FILENAME{clientAddress, filename}`
//! - `REQUEST_FAILED_HTTP{clientAddress, filename, cause}`
//!
//! Exactly one of the last three follows `REQUEST_RECEIVED`.

use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Mutex;

/// Why an origin fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// Origin answered with a status other than 200.
    Status(u16),
    /// No status line was received.
    Transport(String),
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCause::Status(code) => write!(f, "HTTP Code: {}", code),
            FailureCause::Transport(msg) => write!(f, "HTTP Error: {}", msg),
        }
    }
}

/// One gateway outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEvent {
    RequestReceived {
        filename: String,
    },
    RequestCompleted {
        client_address: SocketAddr,
        filename: String,
        bytes: u64,
        truncated: bool,
    },
    RequestRejectedBadFilename {
        client_address: SocketAddr,
        filename: String,
    },
    RequestFailedHttp {
        client_address: SocketAddr,
        filename: String,
        cause: FailureCause,
    },
}

impl GatewayEvent {
    /// Stable event name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            GatewayEvent::RequestReceived { .. } => "REQUEST_RECEIVED",
            GatewayEvent::RequestCompleted { .. } => "REQUEST_COMPLETED",
            GatewayEvent::RequestRejectedBadFilename { .. } => "REQUEST_REJECTED_BAD_FILENAME",
            GatewayEvent::RequestFailedHttp { .. } => "REQUEST_FAILED_HTTP",
        }
    }

    /// True for the events that close an invocation.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GatewayEvent::RequestReceived { .. })
    }
}

/// Receiver for gateway events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &GatewayEvent);
}

/// Renders events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &GatewayEvent) {
        let name = event.name();
        match event {
            GatewayEvent::RequestReceived { filename } => {
                // Not yet validated: rendered escaped so it cannot forge lines.
                tracing::info!(event = name, filename = ?filename, "GET");
            }
            GatewayEvent::RequestCompleted {
                client_address,
                filename,
                bytes,
                truncated,
            } => {
                if *truncated {
                    tracing::warn!(
                        event = name,
                        client = %client_address.ip(),
                        filename = %filename,
                        bytes = *bytes,
                        truncated = true,
                        "Transfer ended early"
                    );
                } else {
                    tracing::info!(
                        event = name,
                        client = %client_address.ip(),
                        filename = %filename,
                        bytes = *bytes,
                        "Transfer complete"
                    );
                }
            }
            GatewayEvent::RequestRejectedBadFilename {
                client_address,
                filename,
            } => {
                tracing::error!(
                    event = name,
                    client = %client_address.ip(),
                    filename = ?filename,
                    "GET [{}] (bad filename)",
                    client_address.ip()
                );
            }
            GatewayEvent::RequestFailedHttp {
                client_address,
                filename,
                cause,
            } => {
                let status = match cause {
                    FailureCause::Status(code) => Some(*code),
                    FailureCause::Transport(_) => None,
                };
                tracing::error!(
                    event = name,
                    client = %client_address.ip(),
                    filename = %filename,
                    status = status,
                    cause = %cause,
                    "GET [{}] {} -> {}",
                    client_address.ip(),
                    filename,
                    cause
                );
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<GatewayEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<GatewayEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Names of the recorded events.
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(GatewayEvent::name).collect()
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: &GatewayEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn addr() -> SocketAddr {
        "192.0.2.10:3456".parse().unwrap()
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn render(event: &GatewayEvent) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || TracingEventSink.emit(event));
        let bytes = capture.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn received_filename_is_escaped() {
        let output = render(&GatewayEvent::RequestReceived {
            filename: "boot/pxe.cfg\nINFO forged entry".into(),
        });
        assert_eq!(output.lines().count(), 1, "{output}");
        assert!(output.contains(r#"filename="boot/pxe.cfg\nINFO forged entry""#), "{output}");
        assert!(output.contains("REQUEST_RECEIVED"));
    }

    #[test]
    fn names_are_stable() {
        let ev = GatewayEvent::RequestFailedHttp {
            client_address: addr(),
            filename: "a".into(),
            cause: FailureCause::Status(404),
        };
        assert_eq!(ev.name(), "REQUEST_FAILED_HTTP");
        assert!(ev.is_terminal());
        assert!(!GatewayEvent::RequestReceived { filename: "a".into() }.is_terminal());
    }

    #[test]
    fn serializes_with_event_tag() {
        let ev = GatewayEvent::RequestRejectedBadFilename {
            client_address: addr(),
            filename: "../x".into(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "REQUEST_REJECTED_BAD_FILENAME");
        assert_eq!(json["client_address"], "192.0.2.10:3456");
    }

    #[test]
    fn cause_display() {
        assert_eq!(FailureCause::Status(500).to_string(), "HTTP Code: 500");
        assert_eq!(
            FailureCause::Transport("connection refused".into()).to_string(),
            "HTTP Error: connection refused"
        );
    }

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemoryEventSink::new();
        sink.emit(&GatewayEvent::RequestReceived { filename: "a".into() });
        sink.emit(&GatewayEvent::RequestRejectedBadFilename {
            client_address: addr(),
            filename: "a".into(),
        });
        assert_eq!(sink.names(), vec!["REQUEST_RECEIVED", "REQUEST_REJECTED_BAD_FILENAME"]);
    }
}
