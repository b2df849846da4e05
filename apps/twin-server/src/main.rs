//! Standalone entry point for the API and Web listeners.
//!
//! Binds both ports, serves until Ctrl+C, then drains in-flight
//! connections before exiting.

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use twin_listeners::config::{DEFAULT_API_PORT, DEFAULT_HOST, DEFAULT_WEB_PORT};
use twin_listeners::{ListenerConfig, Listeners};

/// Command-line arguments for the listener server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host address to bind both listeners to
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port of the API listener (POST only)
    #[arg(long, default_value_t = DEFAULT_API_PORT)]
    api_port: u16,

    /// Port of the Web listener (all methods)
    #[arg(long, default_value_t = DEFAULT_WEB_PORT)]
    web_port: u16,
}

impl From<Args> for ListenerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            api_port: args.api_port,
            web_port: args.web_port,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ListenerConfig::from(args);
    let listeners = Listeners::new(&config).context("Invalid listener configuration")?;
    let running = listeners
        .start()
        .await
        .context("Failed to start listeners")?;

    tracing::info!("API accepts POST requests only");
    tracing::info!("Web server accepts all requests");
    tracing::info!("Both servers are now running!");
    tracing::info!("Press Ctrl+C to stop the servers");

    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    tracing::info!("Shutting down servers...");

    running.stop().await.context("Failed to stop listeners")?;
    tracing::info!("Servers stopped.");
    Ok(())
}
