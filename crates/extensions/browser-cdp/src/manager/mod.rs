//! Chrome process and connection management.
//!
//! Reuses a Chrome already listening on the debug port, otherwise launches
//! one with a persistent profile so the planning site login survives runs.

mod manager_core;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
