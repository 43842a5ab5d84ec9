use clap::Parser;
use cursor_heatmap::config::HeatmapConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = HeatmapConfig::parse();
    cursor_heatmap::init_logging();
    cursor_heatmap::run(config).await
}
