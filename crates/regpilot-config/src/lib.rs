//! # regpilot Config
//!
//! Configuration for regpilot: the sites and term a workflow targets, how
//! the browser is reached, page automation pacing, storage and logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, Finding, Severity, ValidationReport};
