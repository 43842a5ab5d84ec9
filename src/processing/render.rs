//! Heatmap rendering
//!
//! Turns a grid snapshot into encoded image bytes. The output is the bitmap
//! only: no axes, labels or borders.

use crate::processing::colormap::hot;
use crate::recorder::grid::GridSnapshot;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, ImageFormat, Luma, Rgb, RgbImage};
use std::io::Cursor;
use thiserror::Error;

/// Default output width in pixels
pub const DEFAULT_IMAGE_WIDTH: u32 = 1200;

/// Errors that can occur while rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Encoding error: {0}")]
    EncodingError(#[from] image::ImageError),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Renders grid snapshots to image bytes
pub trait HeatmapRenderer: Send + Sync {
    /// File extension of the produced image, without the dot
    fn extension(&self) -> &str;

    /// Encode the snapshot as an image
    fn render(&self, snapshot: &GridSnapshot) -> RenderResult<Vec<u8>>;
}

/// PNG renderer using the "hot" colormap and bilinear resampling
#[derive(Debug, Clone)]
pub struct PngRenderer {
    output_width: u32,
}

impl PngRenderer {
    pub fn new(output_width: u32) -> Self {
        Self {
            output_width: output_width.max(1),
        }
    }

    /// Output size for a grid, keeping its aspect ratio
    pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = self.output_width as f64 / width as f64;
        let scaled_height = (height as f64 * scale).round().max(1.0) as u32;
        (self.output_width, scaled_height)
    }

    /// Counts scaled linearly to `[0, 1]` by the snapshot maximum
    fn normalize(snapshot: &GridSnapshot) -> Vec<f32> {
        let max = snapshot.max();
        if max == 0 {
            return vec![0.0; snapshot.counts.len()];
        }
        let max = max as f32;
        snapshot.counts.iter().map(|&c| c as f32 / max).collect()
    }
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_WIDTH)
    }
}

impl HeatmapRenderer for PngRenderer {
    fn extension(&self) -> &str {
        "png"
    }

    fn render(&self, snapshot: &GridSnapshot) -> RenderResult<Vec<u8>> {
        let invalid = || RenderError::InvalidDimensions {
            width: snapshot.width,
            height: snapshot.height,
        };
        if snapshot.width == 0 || snapshot.height == 0 {
            return Err(invalid());
        }

        let intensity: ImageBuffer<Luma<f32>, Vec<f32>> =
            ImageBuffer::from_raw(snapshot.width, snapshot.height, Self::normalize(snapshot))
                .ok_or_else(invalid)?;

        let (out_width, out_height) = self.output_size(snapshot.width, snapshot.height);
        let intensity = if (out_width, out_height) == (snapshot.width, snapshot.height) {
            intensity
        } else {
            imageops::resize(&intensity, out_width, out_height, FilterType::Triangle)
        };

        let colored: RgbImage = ImageBuffer::from_fn(out_width, out_height, |x, y| {
            Rgb(hot(intensity.get_pixel(x, y).0[0]))
        });

        let mut bytes = Cursor::new(Vec::new());
        colored.write_to(&mut bytes, ImageFormat::Png)?;

        tracing::debug!(
            "Rendered {}x{} grid to {}x{} PNG ({} bytes)",
            snapshot.width,
            snapshot.height,
            out_width,
            out_height,
            bytes.get_ref().len()
        );

        Ok(bytes.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(width: u32, height: u32, hits: &[(u32, u32, u32)]) -> GridSnapshot {
        let mut counts = vec![0; (width * height) as usize];
        let mut total = 0;
        for &(x, y, n) in hits {
            counts[(y * width + x) as usize] += n;
            total += n as u64;
        }
        GridSnapshot {
            width,
            height,
            counts,
            total,
        }
    }

    #[test]
    fn test_output_size_keeps_aspect() {
        let renderer = PngRenderer::new(1200);
        assert_eq!(renderer.output_size(1920, 1080), (1200, 675));
        assert_eq!(renderer.output_size(10_000, 1), (1200, 1));
    }

    #[test]
    fn test_render_produces_png() {
        let renderer = PngRenderer::new(32);
        let snapshot = snapshot_with(64, 32, &[(10, 20, 5), (11, 20, 1)]);

        let bytes = renderer.render(&snapshot).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.to_rgb8().dimensions(), (32, 16));
    }

    #[test]
    fn test_hottest_cell_is_white_at_native_size() {
        let renderer = PngRenderer::new(8);
        let snapshot = snapshot_with(8, 4, &[(3, 2, 9)]);

        let bytes = renderer.render(&snapshot).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(3, 2).0, [255, 255, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, hot(0.0));
    }

    #[test]
    fn test_empty_grid_renders_cold() {
        let renderer = PngRenderer::new(4);
        let bytes = renderer.render(&snapshot_with(4, 4, &[])).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert!(decoded.pixels().all(|p| p.0 == hot(0.0)));
    }

    #[test]
    fn test_rejects_mismatched_buffer() {
        let renderer = PngRenderer::default();
        let snapshot = GridSnapshot {
            width: 4,
            height: 4,
            counts: vec![1; 3],
            total: 3,
        };
        assert!(matches!(
            renderer.render(&snapshot),
            Err(RenderError::InvalidDimensions { width: 4, height: 4 })
        ));
    }
}
