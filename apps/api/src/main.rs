mod applications;
mod config;
mod errors;
mod jobs;
mod knit_client;
mod platforms;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::dispatcher::ApplicationDispatcher;
use crate::config::Config;
use crate::jobs::catalog::JobCatalog;
use crate::knit_client::KnitClient;
use crate::platforms::PlatformRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS Apply v{}", env!("CARGO_PKG_VERSION"));

    // A missing or malformed platform file is fatal
    let registry = PlatformRegistry::load(&config.ats_config_path)
        .with_context(|| format!("Failed to load ATS config '{}'", config.ats_config_path))?;
    for summary in registry.summaries().iter().filter(|s| s.placeholder) {
        tracing::warn!(
            "Platform '{}' still uses a placeholder integration id",
            summary.name
        );
    }

    let knit = KnitClient::new(config.knit_api_key.clone(), config.knit_api_url.clone())?;
    info!("Knit client initialized (endpoint: {})", knit.endpoint());

    let catalog = JobCatalog::builtin().context("Built-in job listings are invalid")?;
    info!(
        "Job catalog loaded: {} jobs across {} platforms",
        catalog.overview().total_jobs,
        catalog.overview().total_platforms
    );

    let state = AppState {
        dispatcher: ApplicationDispatcher::new(Arc::new(registry), Arc::new(knit)),
        catalog: Arc::new(catalog),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the form is served from a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
