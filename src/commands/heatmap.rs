//! Heatmap generation command

use crate::export::Exporter;
use crate::protocol::OutboundMessage;

/// Export the grid and describe the outcome for the requester.
///
/// Does not touch the recording state.
pub async fn generate_heatmap(exporter: &Exporter) -> OutboundMessage {
    exporter.export().await.to_message()
}
