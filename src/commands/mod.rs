//! Control command handlers
//!
//! Each handler performs one control command and builds the reply that goes
//! back to the requesting client.

pub mod heatmap;
pub mod recording;
