//! Chrome backend for regpilot.
//!
//! ```text
//! ┌──────────────┐  TabHost   ┌─────────────┐   WebSocket   ┌──────────────┐
//! │ Coordinator  │ ─────────► │ CdpTabHost  │ ◄───────────► │ Chrome       │
//! │ (core)       │ ◄───────── │ + executors │      CDP      │ (user's      │
//! └──────────────┘ HostEvent  └─────────────┘               │  profile)    │
//!                                                           └──────────────┘
//! ```
//!
//! Chrome runs with a persistent profile so the planning site login is
//! reused between runs. An already running Chrome with
//! `--remote-debugging-port` is used as is.

pub mod cdp;
pub mod executors;
mod host;
pub mod manager;
pub mod retry;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use executors::{
    ExecutorContext, ExecutorError, ExecutorRegistry, ExecutorSettings, PageDriver, PageExecutor,
    TermTarget,
};
pub use host::{CdpTabHost, PageEventTranslator, closed_target};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use retry::{PollOutcome, RetryPolicy, poll_until};
