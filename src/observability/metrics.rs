//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tftp2http_requests_total` (counter): read requests by outcome
//! - `tftp2http_bytes_sent_total` (counter): file bytes handed to requesters
//! - `tftp2http_request_duration_seconds` (histogram): handler latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Terminal outcome label for `tftp2http_requests_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Truncated,
    BadFilename,
    HttpStatus,
    TransportError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::Truncated => "truncated",
            Outcome::BadFilename => "bad_filename",
            Outcome::HttpStatus => "http_status",
            Outcome::TransportError => "transport_error",
        }
    }
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished read request.
pub fn record_request(outcome: Outcome, bytes: u64, start_time: Instant) {
    metrics::counter!("tftp2http_requests_total", "outcome" => outcome.as_str()).increment(1);
    if bytes > 0 {
        metrics::counter!("tftp2http_bytes_sent_total").increment(bytes);
    }
    metrics::histogram!("tftp2http_request_duration_seconds", "outcome" => outcome.as_str())
        .record(start_time.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Completed.as_str(), "completed");
        assert_eq!(Outcome::TransportError.as_str(), "transport_error");
    }

    #[test]
    fn recording_without_exporter_is_harmless() {
        record_request(Outcome::Completed, 5, Instant::now());
        record_request(Outcome::BadFilename, 0, Instant::now());
    }
}
