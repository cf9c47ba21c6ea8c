//! Server runtime: shared state, the accept loop and the admin console.

pub mod admin;
pub mod listener;
pub mod state;

pub use state::{ConnectionGuard, ServerState};
