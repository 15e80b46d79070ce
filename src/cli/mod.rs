//! CLI command handlers

pub mod commands;

pub use commands::{export, filter, sheets, view};
