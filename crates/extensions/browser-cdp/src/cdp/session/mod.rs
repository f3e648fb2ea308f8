//! A flattened CDP session attached to one page target.

mod commands;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use super::client::Connection;
use super::error::CdpError;
use super::protocol::CdpEvent;

/// Page target plus the session commands to it are sent on.
pub struct PageSession {
    target_id: String,
    session_id: String,
    conn: Arc<Connection>,
    /// Page events, until handed out by `take_events`.
    events: Option<mpsc::UnboundedReceiver<CdpEvent>>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        conn: Arc<Connection>,
        events: mpsc::UnboundedReceiver<CdpEvent>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            conn,
            events: Some(events),
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Take the page's event stream. Only the first call returns it.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<CdpEvent>> {
        self.events.take()
    }

    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.conn.call(method, params, Some(&self.session_id)).await
    }

    /// Turn on the Page domain events and the Runtime domain.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        debug!("Session {} ready on target {}", self.session_id, self.target_id);
        Ok(())
    }
}
