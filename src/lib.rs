//! Cursor Heatmap - pointer position recording over WebSocket.
//!
//! Clients stream pointer positions while recording is on; the positions
//! are accumulated into one shared grid, and on request the grid is rendered
//! into a PNG next to the running process.

pub mod commands;
pub mod config;
pub mod export;
pub mod processing;
pub mod protocol;
pub mod recorder;
pub mod router;
pub mod server;

use config::HeatmapConfig;
use export::Exporter;
use processing::PngRenderer;
use recorder::GridStore;
use router::EventRouter;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cursor_heatmap=debug,tokio_tungstenite=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the shared grid, exporter and router for `config`
pub fn build_router(config: &HeatmapConfig) -> EventRouter {
    let grid = Arc::new(GridStore::new(config.width, config.height));
    let exporter = Arc::new(Exporter::new(
        grid.clone(),
        config.resolved_output_dir(),
        Arc::new(PngRenderer::new(config.image_width)),
    ));
    EventRouter::new(grid, exporter)
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Serve until interrupted
pub async fn run(config: HeatmapConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Cursor Heatmap v{}", env!("CARGO_PKG_VERSION"));

    let router = build_router(&config);
    tracing::info!(
        "Grid {}x{}, heatmaps written to {}",
        config.width,
        config.height,
        router.exporter().output_dir().display()
    );

    let listeners = server::bind(config.bind_address()).await?;
    for listener in &listeners {
        tracing::info!("Heatmap WS on ws://{}", listener.local_addr()?);
    }

    server::serve(listeners, router.clone(), shutdown_signal()).await?;

    if config.export_on_shutdown {
        let result = router.exporter().export().await;
        tracing::info!("Shutdown export: {:?}", result);
    }

    Ok(())
}
