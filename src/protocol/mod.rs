//! Wire format for the heatmap WebSocket endpoint
//!
//! Every frame carries one JSON object. Inbound frames are either control
//! commands or pointer samples; outbound frames are replies to commands.

pub mod message;

pub use message::{
    decode, ControlCommand, InboundMessage, OutboundMessage, PositionSample, ProtocolError,
};
