// Library interface for gemchat-web.
// The binary in main.rs is a thin wrapper; integration tests drive the
// router through this crate.

pub mod page;
pub mod server;
pub mod state;

pub use server::{router, serve};
pub use state::{AppState, Mode, SessionRegistry};
