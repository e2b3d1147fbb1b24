//! statscope admin server.
//!
//! - `/admin/metric/expressions.json`: registered expressions as query strings
//! - `/admin/dtab.json`: delegation table
//! - `/healthz`, `/metrics`
//!
//! Config path comes from `STATSCOPE_CONFIG` (default `statscope.yaml`).

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use statscope_admin::{app_state, config, router};
use statscope_core::{Result, StatscopeError};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "statscope-admin failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.admin.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "statscope-admin starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| StatscopeError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| StatscopeError::Internal(format!("server failed: {e}")))
}
