//! Sieve HTTP viewer
//!
//! Serves the table page, filter/subsheet/download controls and a JSON
//! health endpoint. Run with `sieve-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_server, spawn_load, AppState, ServerConfig};
