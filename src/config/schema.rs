//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Block size of the legacy transfer protocol.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Origin server settings.
    pub origin: OriginConfig,

    /// Streaming settings.
    pub transfer: TransferConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Origin server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// URL prefix; the requested filename is appended verbatim.
    pub http_url: String,

    /// Value of the `User-Agent` header sent to the origin.
    pub user_agent: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Seconds allowed from dispatch until the response headers arrive.
    /// The body is not bounded; it streams at the requester's pace.
    pub request_timeout_secs: u64,

    /// Redirects followed before the response is taken as final.
    pub max_redirects: usize,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            http_url: "http://127.0.0.1:8080/".to_string(),
            user_agent: "tftp2httpd".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            max_redirects: 10,
        }
    }
}

/// Streaming configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Maximum bytes per write to the requester.
    pub block_size: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level for the crate (overridden by `RUST_LOG`).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus exporter listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9469".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [origin]
            http_url = "http://origin.example/files/"
            "#,
        )
        .unwrap();
        assert_eq!(config.origin.http_url, "http://origin.example/files/");
        assert_eq!(config.origin.user_agent, "tftp2httpd");
        assert_eq!(config.transfer.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn full_config_parses() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [origin]
            http_url = "https://boot.example/tftp/"
            user_agent = "gw/1"
            connect_timeout_secs = 2
            request_timeout_secs = 10
            max_redirects = 0

            [transfer]
            block_size = 1428

            [observability]
            log_level = "debug"
            log_format = "json"
            metrics_enabled = true
            metrics_address = "0.0.0.0:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.origin.max_redirects, 0);
        assert_eq!(config.transfer.block_size, 1428);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.metrics_address, "0.0.0.0:9000");
    }
}
