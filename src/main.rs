use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod dashboard;
mod view;

use api::StatsClient;
use config::Config;
use dashboard::AppState;
use view::ViewController;

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

    let client = StatsClient::new(&config.api_base_url, config.request_timeout())?;
    info!("Stats API: {}", client.base_url());

    let controller = Arc::new(ViewController::new(Arc::new(client), config.view_settings()));

    // Initial load, equivalent to the view being mounted
    {
        let controller = controller.clone();
        tokio::spawn(async move {
            let report = controller.load_data().await;
            if !report.is_success() {
                warn!("Initial load finished with {} failed request(s)", report.failures.len());
            }
        });
    }

    let app = dashboard::router(AppState { controller });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
