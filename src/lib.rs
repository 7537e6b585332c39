//! Real-time patient/provider messaging core.
//!
//! Room-scoped chat over WebSocket: two participants per room, typing
//! indicators with a debounced expiry, and full history replay on join. The
//! surrounding application (appointments, profiles, search) only hands this
//! core participant-pair identifiers; everything it needs from the outside
//! comes in through the identity and directory ports.

pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod time;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ServerConfig, run_server};
