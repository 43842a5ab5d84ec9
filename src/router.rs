//! Event router
//!
//! Decides what a decoded inbound message means given the current recording
//! state, then applies it. Precedence:
//!
//! 1. control commands and status queries, regardless of state
//! 2. anything else while idle is dropped
//! 3. in-bounds samples are recorded
//! 4. everything left is dropped

use crate::commands::{heatmap, recording};
use crate::export::Exporter;
use crate::protocol::{ControlCommand, InboundMessage, OutboundMessage};
use crate::recorder::grid::GridStore;
use crate::recorder::state::RecordingState;
use std::sync::Arc;

/// Action chosen for one inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Command(ControlCommand),
    UnknownCommand,
    Status,
    DropWhileIdle,
    Record { x: i64, y: i64 },
    OutOfBounds { x: i64, y: i64 },
    Unrecognized,
}

/// Pick the route for `message` in `state` on `grid`.
pub fn plan(message: &InboundMessage, state: RecordingState, grid: &GridStore) -> Route {
    match (message, state) {
        (InboundMessage::Control(Some(command)), _) => Route::Command(*command),
        (InboundMessage::Control(None), _) => Route::UnknownCommand,
        (InboundMessage::StatusQuery, _) => Route::Status,
        (_, RecordingState::Idle) => Route::DropWhileIdle,
        (InboundMessage::Sample(sample), RecordingState::Recording) => {
            let (x, y) = sample.cell();
            if grid.contains(x, y) {
                Route::Record { x, y }
            } else {
                Route::OutOfBounds { x, y }
            }
        }
        (InboundMessage::Unrecognized, RecordingState::Recording) => Route::Unrecognized,
    }
}

/// Shared by every session; owns handles to the grid and exporter.
#[derive(Clone)]
pub struct EventRouter {
    grid: Arc<GridStore>,
    exporter: Arc<Exporter>,
}

impl EventRouter {
    pub fn new(grid: Arc<GridStore>, exporter: Arc<Exporter>) -> Self {
        Self { grid, exporter }
    }

    pub fn grid(&self) -> &Arc<GridStore> {
        &self.grid
    }

    pub fn exporter(&self) -> &Arc<Exporter> {
        &self.exporter
    }

    /// Apply one message. Returns the reply to send, if any.
    pub async fn route(&self, message: InboundMessage) -> Option<OutboundMessage> {
        match plan(&message, self.grid.state(), &self.grid) {
            Route::Command(command) => {
                tracing::debug!("Received command: {}", command);
                Some(self.run_command(command).await)
            }
            Route::Status => Some(recording::recording_status(&self.grid)),
            Route::Record { x, y } => {
                self.grid.increment(x, y);
                None
            }
            Route::UnknownCommand => {
                tracing::debug!("Ignoring unknown command: {:?}", message);
                None
            }
            Route::OutOfBounds { x, y } => {
                tracing::trace!("Dropping out-of-bounds sample ({}, {})", x, y);
                None
            }
            Route::DropWhileIdle | Route::Unrecognized => None,
        }
    }

    async fn run_command(&self, command: ControlCommand) -> OutboundMessage {
        match command {
            ControlCommand::StartRecording => recording::start_recording(&self.grid),
            ControlCommand::StopRecording => recording::stop_recording(&self.grid),
            ControlCommand::GenerateHeatmap => heatmap::generate_heatmap(&self.exporter).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::NO_DATA_MESSAGE;
    use crate::processing::render::PngRenderer;
    use crate::protocol::{decode, PositionSample};

    fn router(dir: &std::path::Path) -> EventRouter {
        let grid = Arc::new(GridStore::new(100, 50));
        let exporter = Arc::new(Exporter::new(
            grid.clone(),
            dir,
            Arc::new(PngRenderer::new(50)),
        ));
        EventRouter::new(grid, exporter)
    }

    async fn send(router: &EventRouter, text: &str) -> Option<OutboundMessage> {
        router.route(decode(text).unwrap()).await
    }

    #[test]
    fn test_plan_precedence() {
        let grid = GridStore::new(10, 10);
        let sample = InboundMessage::Sample(PositionSample { x: 3.0, y: 4.0 });
        let start = InboundMessage::Control(Some(ControlCommand::StartRecording));

        assert_eq!(
            plan(&start, RecordingState::Idle, &grid),
            Route::Command(ControlCommand::StartRecording)
        );
        assert_eq!(
            plan(&InboundMessage::Control(None), RecordingState::Recording, &grid),
            Route::UnknownCommand
        );
        assert_eq!(
            plan(&InboundMessage::StatusQuery, RecordingState::Idle, &grid),
            Route::Status
        );
        assert_eq!(plan(&sample, RecordingState::Idle, &grid), Route::DropWhileIdle);
        assert_eq!(
            plan(&sample, RecordingState::Recording, &grid),
            Route::Record { x: 3, y: 4 }
        );
        assert_eq!(
            plan(
                &InboundMessage::Sample(PositionSample { x: -5.0, y: 4.0 }),
                RecordingState::Recording,
                &grid
            ),
            Route::OutOfBounds { x: -5, y: 4 }
        );
        assert_eq!(
            plan(&InboundMessage::Unrecognized, RecordingState::Recording, &grid),
            Route::Unrecognized
        );
    }

    #[tokio::test]
    async fn test_start_stop_replies() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());

        let reply = send(&router, r#"{"type":"command","command":"start-recording"}"#).await;
        assert_eq!(reply, Some(OutboundMessage::RecordingStatus { recording: true }));
        assert_eq!(router.grid().state(), RecordingState::Recording);

        let reply = send(&router, r#"{"type":"command","command":"stop-recording"}"#).await;
        assert_eq!(reply, Some(OutboundMessage::RecordingStatus { recording: false }));
        assert_eq!(router.grid().state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn test_samples_only_count_while_recording() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());

        assert_eq!(send(&router, r#"{"x":10,"y":20}"#).await, None);
        assert_eq!(router.grid().total(), 0);

        send(&router, r#"{"type":"command","command":"start-recording"}"#).await;
        for _ in 0..5 {
            assert_eq!(send(&router, r#"{"x":10,"y":20}"#).await, None);
        }
        assert_eq!(router.grid().cell(10, 20), Some(5));

        send(&router, r#"{"type":"command","command":"stop-recording"}"#).await;
        for _ in 0..3 {
            send(&router, r#"{"x":10,"y":20}"#).await;
        }
        assert_eq!(router.grid().total(), 5);

        send(&router, r#"{"type":"command","command":"start-recording"}"#).await;
        send(&router, r#"{"x":10,"y":20}"#).await;
        assert_eq!(router.grid().total(), 6);
    }

    #[tokio::test]
    async fn test_out_of_bounds_and_noise_are_silent() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        send(&router, r#"{"type":"command","command":"start-recording"}"#).await;

        for text in [
            r#"{"x":-5,"y":20}"#,
            r#"{"x":100,"y":0}"#,
            r#"{"x":0,"y":50}"#,
            r#"{"x":"1","y":"2"}"#,
            r#"{"type":"mouse-move"}"#,
            r#"{"type":"command","command":"clear"}"#,
        ] {
            assert_eq!(send(&router, text).await, None, "{} should not reply", text);
        }
        assert_eq!(router.grid().total(), 0);
    }

    #[tokio::test]
    async fn test_status_query_reports_state() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        let query = r#"{"type":"get-status"}"#;

        assert_eq!(
            send(&router, query).await,
            Some(OutboundMessage::RecordingStatus { recording: false })
        );
        send(&router, r#"{"type":"command","command":"start-recording"}"#).await;
        assert_eq!(
            send(&router, query).await,
            Some(OutboundMessage::RecordingStatus { recording: true })
        );
        assert_eq!(router.grid().state(), RecordingState::Recording);
    }

    #[tokio::test]
    async fn test_browser_mouse_move_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        let moved = r#"{"type":"mouse-move","x":3,"y":4,"t":1}"#;

        assert_eq!(send(&router, moved).await, None);
        assert_eq!(router.grid().total(), 0);

        send(&router, r#"{"type":"command","command":"start-recording"}"#).await;
        assert_eq!(send(&router, moved).await, None);
        assert_eq!(router.grid().cell(3, 4), Some(1));
    }

    #[tokio::test]
    async fn test_command_ignores_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        send(&router, r#"{"type":"command","command":"start-recording"}"#).await;
        send(&router, r#"{"type":"command","command":"start-recording","x":1,"y":1}"#).await;
        assert_eq!(router.grid().total(), 0);
    }

    #[tokio::test]
    async fn test_generate_heatmap_replies() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());

        let reply = send(&router, r#"{"type":"command","command":"generate-heatmap"}"#).await;
        assert_eq!(
            reply,
            Some(OutboundMessage::Error {
                message: NO_DATA_MESSAGE.to_string()
            })
        );

        send(&router, r#"{"type":"command","command":"start-recording"}"#).await;
        send(&router, r#"{"x":10,"y":20}"#).await;
        let reply = send(&router, r#"{"type":"command","command":"generate-heatmap"}"#).await;
        match reply {
            Some(OutboundMessage::HeatmapGenerated { filename, .. }) => {
                assert!(dir.path().join(filename).is_file());
            }
            other => panic!("unexpected reply {:?}", other),
        }
        assert_eq!(router.grid().state(), RecordingState::Recording);
    }
}
