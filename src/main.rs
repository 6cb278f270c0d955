//! TFTP to HTTP gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                   GATEWAY                    │
//!   Read request        │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ────────────────────┼─▶│ security │──▶│ gateway  │──▶│   http   │──┼──▶ Origin
//!   (protocol server)   │  │ filename │   │ handler  │   │  client  │  │    server
//!                       │  └──────────┘   └────┬─────┘   └──────────┘  │
//!   File blocks /       │                      │                       │
//!   not-found signal    │                      ▼                       │
//!   ◀───────────────────┼──────────────── stream body                  │
//!                       │                                              │
//!                       │  config · observability (events, metrics)    │
//!                       └──────────────────────────────────────────────┘
//! ```
//!
//! The binary drives the gateway without a protocol listener:
//! - `check` validates a configuration file
//! - `fetch` runs one read request end to end and writes the file locally

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tftp2http::config::load_config;
use tftp2http::http::ReqwestOrigin;
use tftp2http::observability::{logging, metrics, TracingEventSink};
use tftp2http::transfer::{self, LocalRequest};
use tftp2http::Gateway;

#[derive(Parser)]
#[command(name = "tftp2http", version)]
#[command(about = "Serve file-transfer read requests from an HTTP origin", long_about = None)]
struct Cli {
    /// TOML configuration file path.
    #[arg(short, long = "config-file", default_value = "etc/tftp2http.toml")]
    config_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print the effective settings
    Check,
    /// Run one read request through the gateway
    Fetch {
        /// Filename exactly as a requester would send it
        filename: String,

        /// Requester address forwarded to the origin
        #[arg(long, default_value = "127.0.0.1:69")]
        client: SocketAddr,

        /// Write the file here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config_file)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        config_file = %cli.config_file.display(),
        origin = %config.origin.http_url,
        block_size = config.transfer.block_size,
        "tftp2http v0.1.0 configuration loaded"
    );

    match cli.command {
        Commands::Check => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Fetch {
            filename,
            client,
            output,
        } => {
            if config.observability.metrics_enabled {
                if let Ok(addr) = config.observability.metrics_address.parse() {
                    metrics::init_metrics(addr);
                } else {
                    tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    );
                }
            }

            let origin = ReqwestOrigin::new(&config.origin)?;
            let gateway = Gateway::new(&config, Arc::new(origin), Arc::new(TracingEventSink));

            let bytes = match &output {
                Some(path) => transfer::fetch_to_file(&gateway, &filename, client, path).await?,
                None => {
                    let mut request = LocalRequest::new(filename, client, tokio::io::stdout());
                    transfer::fetch(&gateway, &mut request).await?
                }
            };

            tracing::info!(bytes, "Fetch complete");
        }
    }

    Ok(())
}
