//! Interview gateway (v1)
//!
//! HTTP gateway for the mock-interview web app, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                INTERVIEW GATEWAY                  │
//!                        │                                                   │
//!   Page / client        │  ┌─────────┐    ┌──────────────┐                  │
//!   ─────────────────────┼─▶│  http   │───▶│    proxy     │──────────────┐   │
//!                        │  │ server  │    │  handlers    │              │   │
//!                        │  └─────────┘    └──────┬───────┘              │   │
//!                        │                        │ questions /          │   │
//!                        │                        ▼ view-result          │   │
//!                        │                 ┌──────────────┐              │   │
//!                        │                 │  resolution  │              │   │
//!                        │                 │ hint→fetch→  │              │   │
//!                        │                 │ latest/list  │              │   │
//!                        │                 └──────┬───────┘              │   │
//!                        │                        ▼                      ▼   │
//!   JSON / envelope      │  ┌─────────┐    ┌──────────────────────────────┐  │
//!   ◀────────────────────┼──│response │◀───│   upstream::BackendClient    │◀─┼── Interview
//!                        │  └─────────┘    └──────────────────────────────┘  │   backend
//!                        │                                                   │
//!                        │  config · observability · security · lifecycle    │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use interview_gateway::lifecycle::startup;
use interview_gateway::observability::logging;
use interview_gateway::Shutdown;

#[derive(Parser)]
#[command(name = "interview-gateway")]
#[command(about = "HTTP gateway for the interview-processing backend", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    /// `BACKEND_BASE_URL` overrides the backend origin either way.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::resolve_config(cli.config.as_ref())?;
    logging::init_logging(&config.observability)?;

    tracing::info!("interview-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    startup::run(config, cli.config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
