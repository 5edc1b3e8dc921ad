mod config;
mod errors;
mod intent;
mod models;
mod quality;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting refiner API v{}", env!("CARGO_PKG_VERSION"));

    // Compile slot catalog, keyword rules, and quality rubric
    let state = AppState::build(config.clone())?;
    info!(
        "Scoring engine ready: {} keyword rules, cutoffs intent={} prompt={}, max {} turns",
        state.analyzer.extractor().keys().count(),
        config.intent_cutoff,
        config.prompt_cutoff,
        config.max_turns
    );

    // Sweep idle sessions in the background
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut sweep = tokio::time::interval(sessions.ttl());
        loop {
            sweep.tick().await;
            let evicted = sessions.evict_expired().await;
            if evicted > 0 {
                info!("Evicted {evicted} expired sessions");
            }
        }
    });

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
