//! Process configuration
//!
//! Every setting can come from a command-line flag or an environment
//! variable; flags win.

use crate::export::default_output_dir;
use crate::processing::render::DEFAULT_IMAGE_WIDTH;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, Parser)]
#[command(name = "cursor-heatmap", version, about)]
pub struct HeatmapConfig {
    /// Interface to listen on
    #[arg(long, env = "HEATMAP_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// WebSocket port
    #[arg(long, env = "HEATMAP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Grid width in cells (one per screen pixel)
    #[arg(
        long,
        env = "HEATMAP_WIDTH",
        default_value_t = DEFAULT_WIDTH,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub width: u32,

    /// Grid height in cells
    #[arg(
        long,
        env = "HEATMAP_HEIGHT",
        default_value_t = DEFAULT_HEIGHT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub height: u32,

    /// Where heatmap images are written. Defaults to the executable's directory.
    #[arg(long, env = "HEATMAP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Width of rendered images in pixels
    #[arg(
        long,
        env = "HEATMAP_IMAGE_WIDTH",
        default_value_t = DEFAULT_IMAGE_WIDTH,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub image_width: u32,

    /// Write a final heatmap when the process is interrupted
    #[arg(long, env = "HEATMAP_EXPORT_ON_SHUTDOWN")]
    pub export_on_shutdown: bool,
}

impl HeatmapConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            output_dir: None,
            image_width: DEFAULT_IMAGE_WIDTH,
            export_on_shutdown: false,
        }
    }
}
