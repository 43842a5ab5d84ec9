//! Recording start/stop and status commands

use crate::protocol::OutboundMessage;
use crate::recorder::grid::GridStore;

/// Start recording. Acknowledged even when already recording.
pub fn start_recording(grid: &GridStore) -> OutboundMessage {
    let state = grid.start();
    tracing::info!("Recording started");
    OutboundMessage::RecordingStatus {
        recording: state.is_recording(),
    }
}

/// Stop recording. Acknowledged even when already idle.
pub fn stop_recording(grid: &GridStore) -> OutboundMessage {
    let state = grid.stop();
    tracing::info!("Recording stopped (total data points: {})", grid.total());
    OutboundMessage::RecordingStatus {
        recording: state.is_recording(),
    }
}

/// Report the current state without changing it.
pub fn recording_status(grid: &GridStore) -> OutboundMessage {
    OutboundMessage::RecordingStatus {
        recording: grid.state().is_recording(),
    }
}
