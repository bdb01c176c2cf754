use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use leadboard_core::config::{AuthMode, Config};
use leadboard_postgrest::PostgrestBackend;
use leadboard_server::state::AppState;

/// `leadboard health`: liveness probe for container health checks.
///
/// Calls `GET http://localhost:$LEADBOARD_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("LEADBOARD_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }

    // Structured JSON logging; level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leadboard=info".parse()?),
        )
        .json()
        .init();

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let backend = PostgrestBackend::new(
        &cfg.supabase_url,
        &cfg.supabase_service_key,
        cfg.rpc_timeout(),
    )?;

    match &cfg.auth_mode {
        AuthMode::Password { username, .. } => {
            if cfg.session_secret.is_none() {
                tracing::warn!(
                    "LEADBOARD_SESSION_SECRET not set; using a random secret, sessions end on restart"
                );
            }
            info!(user = %username, session_minutes = cfg.session_minutes, "Password auth enabled");
        }
        AuthMode::None => {
            info!("Auth disabled (LEADBOARD_AUTH=none); all routes open");
        }
    }

    let addr = format!("0.0.0.0:{}", cfg.port);
    let state = Arc::new(AppState::new(Arc::new(backend), cfg.clone()));
    let app = leadboard_server::app::build_app(state);

    info!(port = cfg.port, timezone = %cfg.timezone, "Leadboard listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
