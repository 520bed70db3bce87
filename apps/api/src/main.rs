mod config;
mod errors;
mod layout;
mod models;
mod news;
mod report;
mod routes;
mod state;
mod upstream;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::default_layout_constants;
use crate::report::export::HttpRasterizer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
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

    info!("Starting Weekly Report API v{}", env!("CARGO_PKG_VERSION"));

    let upstream = UpstreamClient::new(
        config.upstream_api_url.clone(),
        config.upstream_api_token.clone(),
    )?;
    info!("Upstream client initialized ({})", config.upstream_api_url);

    let rasterizer = Arc::new(HttpRasterizer::new(config.render_service_url.clone())?);
    info!("Rasterizer initialized ({})", config.render_service_url);

    let layout_constants = default_layout_constants();
    info!(
        "Layout constants: {}x{}px page, {}px usable height",
        layout_constants.page_width,
        layout_constants.page_height,
        layout_constants.max_page_height()
    );

    let state = AppState {
        upstream,
        rasterizer,
        config: config.clone(),
        layout_constants,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        // TODO: restrict origins to the viewer's host once it is fixed
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
