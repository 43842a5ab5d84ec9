use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while decoding an inbound frame
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Binary frame is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Control commands carried by `{"type": "command", "command": ...}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    StartRecording,
    StopRecording,
    GenerateHeatmap,
}

impl ControlCommand {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "start-recording" => Some(ControlCommand::StartRecording),
            "stop-recording" => Some(ControlCommand::StopRecording),
            "generate-heatmap" => Some(ControlCommand::GenerateHeatmap),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlCommand::StartRecording => "start-recording",
            ControlCommand::StopRecording => "stop-recording",
            ControlCommand::GenerateHeatmap => "generate-heatmap",
        }
    }
}

impl std::fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer position as sent by the client
///
/// Bare `{"x", "y"}` objects and browser `{"type": "mouse-move", "x", "y", "t"}`
/// frames both decode to a sample; `t` is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub x: f64,
    pub y: f64,
}

impl PositionSample {
    /// Grid cell for this sample, truncating toward zero.
    pub fn cell(&self) -> (i64, i64) {
        (self.x.trunc() as i64, self.y.trunc() as i64)
    }
}

/// Shape of one decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `type == "command"`. `None` when the command name is not recognized.
    Control(Option<ControlCommand>),
    /// `type == "get-status"`: asks for the current recording state.
    StatusQuery,
    /// Object with numeric `x` and `y`.
    Sample(PositionSample),
    /// Anything else.
    Unrecognized,
}

impl InboundMessage {
    fn classify(fields: &Map<String, Value>) -> Self {
        match fields.get("type").and_then(Value::as_str) {
            Some("command") => {
                let command = fields
                    .get("command")
                    .and_then(Value::as_str)
                    .and_then(ControlCommand::parse);
                return InboundMessage::Control(command);
            }
            Some("get-status") => return InboundMessage::StatusQuery,
            _ => {}
        }

        match (
            fields.get("x").and_then(Value::as_f64),
            fields.get("y").and_then(Value::as_f64),
        ) {
            (Some(x), Some(y)) => InboundMessage::Sample(PositionSample { x, y }),
            _ => InboundMessage::Unrecognized,
        }
    }
}

/// Decode one text frame.
pub fn decode(text: &str) -> Result<InboundMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(fields) => Ok(InboundMessage::classify(&fields)),
        Value::Array(_) => Err(ProtocolError::NotAnObject("array")),
        Value::String(_) => Err(ProtocolError::NotAnObject("string")),
        Value::Number(_) => Err(ProtocolError::NotAnObject("number")),
        Value::Bool(_) => Err(ProtocolError::NotAnObject("boolean")),
        Value::Null => Err(ProtocolError::NotAnObject("null")),
    }
}

/// Replies written back on the requesting connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundMessage {
    RecordingStatus { recording: bool },
    HeatmapGenerated { message: String, filename: String },
    Error { message: String },
}

impl OutboundMessage {
    pub fn to_json(&self) -> String {
        // A tagged enum of strings and bools always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}
