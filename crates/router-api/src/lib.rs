//! router-api: HTTP API layer for the swap router
//!
//! Serves graph inspection, route queries and market list updates for one
//! network.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::{AppState, StateError};
