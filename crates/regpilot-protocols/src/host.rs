//! Tab host protocol definitions.
//!
//! The host owns the browser. The coordinator only ever talks to it through
//! [`TabHost`], and receives its lifecycle callbacks as [`HostEvent`]s on a
//! channel the host was built with.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::HostError;
use crate::types::{HostEvent, InjectionPayload, TabId};

/// Environment that opens, navigates and automates browser tabs.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Open a new tab at `url` and return its identifier.
    async fn create_tab(&self, url: &str) -> Result<TabId, HostError>;

    /// Point an existing tab at `url` without waiting for the load.
    async fn navigate(&self, tab_id: &TabId, url: &str) -> Result<(), HostError>;

    /// Start page automation in `tab_id`.
    ///
    /// Must return once the automation is scheduled; the automation itself
    /// runs outside the caller's event handling.
    async fn inject(&self, tab_id: &TabId, payload: InjectionPayload) -> Result<(), HostError>;

    /// Start delivering navigation and tab-closed events.
    fn subscribe(&self);

    /// Stop delivering navigation and tab-closed events.
    fn unsubscribe(&self);
}

/// One-shot handle an executor uses to report that its multi-page
/// sub-task finished.
///
/// `signal` consumes the notifier, so a completion is sent at most once.
#[derive(Debug)]
pub struct CompletionNotifier {
    tab_id: TabId,
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl CompletionNotifier {
    pub fn new(tab_id: TabId, tx: mpsc::UnboundedSender<HostEvent>) -> Self {
        Self { tab_id, tx }
    }

    pub fn tab_id(&self) -> &TabId {
        &self.tab_id
    }

    /// Send the completion signal. Returns `false` if the receiving side
    /// is gone.
    pub fn signal(self) -> bool {
        self.tx.send(HostEvent::CompletionSignal(self.tab_id)).is_ok()
    }
}
