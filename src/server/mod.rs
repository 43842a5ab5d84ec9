//! WebSocket server
//!
//! One task per accepted connection. Sessions share nothing but the router,
//! which holds the grid and exporter handles.

pub mod listener;
pub mod session;

pub use listener::{bind, bind_all, serve};
pub use session::{handle_connection, run_session, SessionStats};
