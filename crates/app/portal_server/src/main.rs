//! Portal HTTP server binary.
//!
//! Serves the JSON API under `/api` and the static frontend. Configuration
//! comes from the environment (a `.env` file is honoured); a missing
//! `JWT_SECRET` aborts startup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use portal_api::config::ApiConfig;
use portal_core::auth::store::MemoryUserStore;
use tracing::{info, warn};

/// CLI arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "portal_server", about = "Portal login backend and frontend server")]
struct Args {
    /// Port to listen on. Overrides `PORT`.
    #[arg(long)]
    port: Option<u16>,

    /// JSON file with the user records (`[{id, email, name, password_hash}]`).
    #[arg(long, env = "USERS_FILE")]
    users_file: Option<PathBuf>,

    /// Static root with `public/` and `protected/` halves. Overrides `STATIC_DIR`.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,portal_api=debug,portal_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = dir;
    }

    let store = match &args.users_file {
        Some(path) => MemoryUserStore::load(path).await?,
        None => {
            warn!("no USERS_FILE given; every login will be rejected");
            MemoryUserStore::new()
        }
    };

    info!(
        bind_addr = %config.bind_addr,
        static_dir = %config.static_dir.display(),
        secure_cookie = config.cookie_secure,
        "starting portal_server"
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let state = portal_api::AppState {
        store: Arc::new(store),
        config,
    };
    let app = portal_api::router(state);

    info!(addr = %local_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
