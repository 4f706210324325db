use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;
mod dashboard;
mod models;
mod upstream;
mod view;

use config::Config;
use dashboard::AppState;
use upstream::UpstreamClient;
use view::{spawn_refresh_loop, PredictionView, ProxyClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let upstream = UpstreamClient::new(&config.upstream_url, config.api_token.clone(), timeout)?;
    info!("Prediction API: {}", config.upstream_url);

    // The view reads through the proxy endpoint, never the upstream directly
    let proxy_url = config.resolved_proxy_url()?;
    let proxy = ProxyClient::new(proxy_url.clone(), timeout)?;
    let view = Arc::new(PredictionView::new(Arc::new(proxy)));

    let state = AppState {
        upstream,
        view: view.clone(),
        logo_url_template: config.logo_url_template.clone(),
    };
    let app = dashboard::router(state);
    let addr = config.listen_socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Dashboard listening on http://{}", addr);

    // Mount only once the proxy can answer
    info!("View polling {}", proxy_url);
    let refresh = spawn_refresh_loop(
        view,
        Duration::from_secs(config.refresh_interval_secs),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;

    refresh.stop();
    Ok(())
}
