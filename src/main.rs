//! Edge gateway.
//!
//! ```text
//!                          ┌───────────────────────────────────────────────┐
//!                          │                 EDGE GATEWAY                  │
//!     Client Request       │  ┌────────┐   ┌──────────┐   ┌────────────┐   │
//!     ─────────────────────┼─▶│  http  │──▶│ routing  │──▶│  security  │   │
//!                          │  │ server │   │ registry │   │  verifier  │   │
//!                          │  └───┬────┘   └──────────┘   └─────┬──────┘   │
//!                          │      │ /health                     │          │
//!                          │      ▼                             ▼          │
//!     Client Response      │  ┌────────┐                 ┌────────────┐    │     auth / product /
//!     ◀────────────────────┼──│ health │   502 on error  │ http proxy │◀───┼──── order backends
//!                          │  └────────┘ ◀───────────────│  + timeout │    │
//!                          │                             └────────────┘    │
//!                          └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use edge_gateway::config;
use edge_gateway::lifecycle::{signals, startup, Shutdown};
use edge_gateway::observability::logging;
use edge_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "Authenticating edge gateway for the auth, product and order services", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?;

    if cli.print_config {
        let mut printable = config.clone();
        if !printable.auth.jwt_secret.is_empty() {
            printable.auth.jwt_secret = "<redacted>".to_string();
        }
        print!("{}", toml::to_string_pretty(&printable)?);
        return Ok(());
    }

    logging::init(&config.observability)?;

    tracing::info!("edge-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        connect_timeout_secs = config.timeouts.connect_secs,
        response_timeout_secs = config.timeouts.response_secs,
        "Configuration loaded"
    );
    for route in &config.routes {
        tracing::info!(
            route = %route.name,
            prefix = %route.path_prefix,
            backend = %route.backend,
            protected = route.protected,
            "Route configured"
        );
    }

    startup::start_metrics(&config)?;

    let server = HttpServer::new(config.clone())?;
    let listener = startup::bind(&config).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
