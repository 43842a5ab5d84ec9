//! Heatmap export
//!
//! Snapshots the grid, renders it and writes the image next to the running
//! process.

pub mod exporter;

pub use exporter::{
    default_output_dir, heatmap_filename, write_file_atomically, ExportError, ExportResult,
    Exporter, NO_DATA_MESSAGE,
};
