//! Verification run against the API and Web listeners.
//!
//! Either targets listeners that are already running, or (with
//! `--embedded`) starts both in-process, checks them and stops them again.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use twin_listeners::config::{DEFAULT_API_PORT, DEFAULT_HOST, DEFAULT_WEB_PORT};
use twin_listeners::{ListenerConfig, Listeners};
use twin_verify::{Endpoints, Report, Verifier};

/// Command-line arguments for the verification client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host the listeners run on
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port of the API listener (0 with --embedded picks a free port)
    #[arg(long, default_value_t = DEFAULT_API_PORT)]
    api_port: u16,

    /// Port of the Web listener (0 with --embedded picks a free port)
    #[arg(long, default_value_t = DEFAULT_WEB_PORT)]
    web_port: u16,

    /// Start both listeners in this process for the duration of the run
    #[arg(long)]
    embedded: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = ListenerConfig {
        host: args.host,
        api_port: args.api_port,
        web_port: args.web_port,
    };

    println!("Starting server tests...");
    let report = if args.embedded {
        let running = Listeners::new(&config)
            .context("Invalid listener configuration")?
            .start()
            .await
            .context("Failed to start listeners")?;
        println!(
            "Servers started for testing on {} and {}.",
            running.api_addr(),
            running.web_addr()
        );

        let result = run(Verifier::new(Endpoints::from_running(&running))).await;
        running.stop().await.context("Failed to stop listeners")?;
        println!("Servers stopped.");
        result
    } else {
        let endpoints =
            Endpoints::from_config(&config).context("Invalid listener configuration")?;
        run(Verifier::new(endpoints)).await
    };

    println!("\n=== Test Summary ===");
    println!("API Server: Should accept POST, reject others.");
    println!("Web Server: Should accept GET, POST, PUT and handle query strings.");

    match report {
        Ok(report) if report.all_passed() => {
            println!("\nTests completed!");
            Ok(ExitCode::SUCCESS)
        }
        Ok(_) => Ok(ExitCode::FAILURE),
        Err(err) => {
            eprintln!("An error occurred during tests: {:#}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(verifier: Verifier) -> anyhow::Result<Report> {
    verifier.test_api_server().await?;
    verifier.test_web_server().await?;
    Ok(verifier.verify_statements().await)
}
