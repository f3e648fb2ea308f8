//! # regpilot Core
//!
//! The tab workflow coordinator: a registry of per-tab workflow states and
//! a table-driven state machine that advances them in response to host
//! events.
//!
//! ## Architecture
//!
//! ```text
//!  Command (start / shutdown)          HostEvent (navigation, close, signal)
//!            │                                      │
//!            └──────────────┐      ┌────────────────┘
//!                           ▼      ▼
//!                       ┌──────────────┐   create_tab / navigate / inject
//!                       │  EventLoop   │ ─────────────────────────────────► TabHost
//!                       │ Coordinator  │
//!                       │  Registry    │
//!                       └──────────────┘
//! ```
//!
//! Every state change happens inside the single event loop task, one event
//! at a time, so the registry is never shared.
//!
//! ## Key Components
//!
//! - [`Coordinator`]: the four workflow operations
//! - [`WorkflowRegistry`]: tab → [`WorkflowState`] store
//! - [`transition`]: the unified transition table
//! - [`EventLoop`] / [`LoopHandle`]: channel-driven event delivery

pub mod coordinator;
pub mod error;
pub mod event_loop;
pub mod registry;
pub mod sites;
pub mod stage;
pub mod transition;

pub use coordinator::{Coordinator, StepOutcome};
pub use error::CoordinatorError;
pub use event_loop::{Command, EventLoop, EventLoopConfig, LoopHandle, StartRequest};
pub use registry::{WorkflowRegistry, WorkflowState};
pub use sites::{Location, SiteMap};
pub use stage::Stage;
