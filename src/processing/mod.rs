//! Processing module for turning recorded grids into images
//!
//! Contains the colormap and the PNG renderer used by the exporter.

pub mod colormap;
pub mod render;

pub use colormap::hot;
pub use render::{HeatmapRenderer, PngRenderer, RenderError, DEFAULT_IMAGE_WIDTH};
