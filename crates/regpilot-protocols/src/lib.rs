//! # regpilot Protocols
//!
//! Shared types and interface definitions for regpilot.
//! Contains only plain data and traits - no browser or coordinator logic.
//!
//! ## Core Traits
//!
//! - [`TabHost`] - The environment that owns browser tabs: opens them,
//!   navigates them, runs page automation in them and reports their
//!   lifecycle events back as [`HostEvent`]s.
//!
//! ## Core Types
//!
//! - [`Mode`] / [`ExecutorKind`] / [`InjectionPayload`] - what runs where
//! - [`ClassSpec`] - a parsed class-specification string
//! - [`StatusUpdate`] - human-visible progress records

pub mod error;
pub mod host;
pub mod types;

pub use error::HostError;
pub use host::{CompletionNotifier, TabHost};
pub use types::*;
