//! Common types used across regpilot.

mod class_spec;
mod status;
mod workflow;

pub use class_spec::*;
pub use status::*;
pub use workflow::*;
