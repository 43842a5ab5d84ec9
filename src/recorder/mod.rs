//! Recording state and the shared visit grid
//!
//! The grid is created once at startup and handed to every connection
//! session through an `Arc`.

pub mod grid;
pub mod state;

pub use grid::{GridSnapshot, GridStore};
pub use state::RecordingState;
