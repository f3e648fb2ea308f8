//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome over the browser-level WebSocket and multiplexes
//! flattened page sessions on it. Commands are correlated with responses by
//! id; events are routed to a per-session channel, browser-level events to
//! the channel registered under the empty session id.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let mut page = client.new_page().await?;
//! let events = page.take_events();
//! page.navigate("https://myplan.uw.edu/plan/").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::{CdpEvent, CdpRequest, CommandFault, NewTarget, VersionInfo};
pub use session::PageSession;
