use crate::processing::render::{HeatmapRenderer, RenderError};
use crate::protocol::OutboundMessage;
use crate::recorder::grid::GridStore;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Reason reported when an export is requested before anything was recorded
pub const NO_DATA_MESSAGE: &str =
    "No data recorded yet. Please start recording and move your mouse first.";

/// Sortable timestamp embedded in export filenames
const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Errors that can occur while writing a heatmap
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Render error: {0}")]
    RenderError(#[from] RenderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Render task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

/// Outcome of one export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportResult {
    Success { filename: String, path: PathBuf },
    Failure { reason: String },
}

impl ExportResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportResult::Success { .. })
    }

    /// Reply sent to the requesting client
    pub fn to_message(&self) -> OutboundMessage {
        match self {
            ExportResult::Success { filename, .. } => OutboundMessage::HeatmapGenerated {
                message: format!("Heatmap generated successfully: {}", filename),
                filename: filename.clone(),
            },
            ExportResult::Failure { reason } => OutboundMessage::Error {
                message: reason.clone(),
            },
        }
    }
}

/// `heatmap_<YYYY-MM-DD_HH-MM-SS>.<extension>`
pub fn heatmap_filename(now: DateTime<Local>, extension: &str) -> String {
    format!(
        "heatmap_{}.{}",
        now.format(FILENAME_TIMESTAMP_FORMAT),
        extension
    )
}

/// Directory containing the running executable, or the working directory
/// when that cannot be determined.
pub fn default_output_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub struct Exporter {
    grid: Arc<GridStore>,
    output_dir: PathBuf,
    renderer: Arc<dyn HeatmapRenderer>,
}

impl Exporter {
    pub fn new(
        grid: Arc<GridStore>,
        output_dir: impl Into<PathBuf>,
        renderer: Arc<dyn HeatmapRenderer>,
    ) -> Self {
        Self {
            grid,
            output_dir: output_dir.into(),
            renderer,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render the current grid to a new file.
    ///
    /// Never fails: every problem is reported through `ExportResult::Failure`.
    pub async fn export(&self) -> ExportResult {
        let total = self.grid.total();
        tracing::info!("Generating heatmap... Total data points: {}", total);

        if total == 0 {
            tracing::warn!("{}", NO_DATA_MESSAGE);
            return ExportResult::Failure {
                reason: NO_DATA_MESSAGE.to_string(),
            };
        }

        match self.write_heatmap().await {
            Ok((filename, path)) => {
                tracing::info!("Heatmap generated successfully: {}", filename);
                ExportResult::Success { filename, path }
            }
            Err(e) => {
                let reason = format!("Failed to generate heatmap: {}", e);
                tracing::error!("{}", reason);
                ExportResult::Failure { reason }
            }
        }
    }

    async fn write_heatmap(&self) -> Result<(String, PathBuf), ExportError> {
        let filename = heatmap_filename(Local::now(), self.renderer.extension());
        let path = self.output_dir.join(&filename);

        let grid = self.grid.clone();
        let renderer = self.renderer.clone();
        let bytes = tokio::task::spawn_blocking(move || {
            let snapshot = grid.snapshot();
            renderer.render(&snapshot)
        })
        .await??;

        tracing::info!("Saving heatmap to: {}", path.display());
        tokio::fs::create_dir_all(&self.output_dir).await?;
        write_file_atomically(&path, &bytes).await?;

        Ok((filename, path))
    }
}

/// Write `bytes` to a hidden sibling of `path`, then rename it into place.
///
/// `path` either holds the complete image or is left untouched; the
/// temporary file is removed on failure.
pub async fn write_file_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.tmp", name));

    let written = match tokio::fs::write(&temp_path, bytes).await {
        Ok(()) => tokio::fs::rename(&temp_path, path).await,
        Err(e) => Err(e),
    };

    if written.is_err() {
        let _ = tokio::fs::remove_file(&temp_path).await;
    }
    written
}
