/// Whether inbound position samples are applied to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// Samples are dropped.
    #[default]
    Idle,
    /// Samples are accumulated into the grid.
    Recording,
}

impl RecordingState {
    pub fn from_flag(recording: bool) -> Self {
        if recording {
            RecordingState::Recording
        } else {
            RecordingState::Idle
        }
    }

    pub fn is_recording(self) -> bool {
        matches!(self, RecordingState::Recording)
    }
}
