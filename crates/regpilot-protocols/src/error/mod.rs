//! Error types for the regpilot protocol layer.

mod host;

pub use host::*;
