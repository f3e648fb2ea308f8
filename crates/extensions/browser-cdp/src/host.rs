//! [`TabHost`] backed by a Chrome instance over CDP.
//!
//! Each tab is a page target with a flattened session. A pump task per
//! session turns page events into [`HostEvent::NavigationCompleted`]; one
//! browser-level pump turns target teardown into [`HostEvent::TabClosed`].
//! Executors run on a [`TaskTracker`] so callers can wait for them.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use regpilot_protocols::{
    CompletionNotifier, HostError, HostEvent, InjectionPayload, NavigationEvent, StatusUpdate,
    TabHost, TabId,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::cdp::{CdpClient, CdpError, CdpEvent, PageSession};
use crate::executors::{ExecutorContext, ExecutorRegistry, ExecutorSettings};

/// Tracks the main frame of one page so load events can carry its URL.
#[derive(Debug)]
pub struct PageEventTranslator {
    tab_id: TabId,
    main_frame: Option<String>,
    url: Option<String>,
}

impl PageEventTranslator {
    pub fn new(tab_id: TabId) -> Self {
        Self {
            tab_id,
            main_frame: None,
            url: None,
        }
    }

    /// Chrome names a page's main frame after its target until told otherwise.
    fn is_main_frame(&self, frame_id: &str) -> bool {
        match &self.main_frame {
            Some(main) => main == frame_id,
            None => frame_id == self.tab_id.as_str(),
        }
    }

    /// Host event for a page-session CDP event, if it is one.
    pub fn translate(&mut self, event: &CdpEvent) -> Option<HostEvent> {
        let params = &event.params;
        match event.method.as_str() {
            "Page.frameNavigated" => {
                let frame = params.get("frame")?;
                // Only the main frame has no parent.
                if frame.get("parentId").is_none() {
                    if let Some(id) = frame.get("id").and_then(|id| id.as_str()) {
                        self.main_frame = Some(id.to_string());
                    }
                    self.url = frame.get("url")?.as_str().map(str::to_string);
                }
                None
            }
            "Page.navigatedWithinDocument" => {
                if !self.is_main_frame(event.param_str("frameId")?) {
                    return None;
                }
                let url = params.get("url")?.as_str()?.to_string();
                self.url = Some(url.clone());
                Some(HostEvent::NavigationCompleted(NavigationEvent::completed(
                    self.tab_id.clone(),
                    url,
                )))
            }
            "Page.loadEventFired" => {
                let url = self.url.clone()?;
                Some(HostEvent::NavigationCompleted(NavigationEvent::completed(
                    self.tab_id.clone(),
                    url,
                )))
            }
            _ => None,
        }
    }
}

/// Target a browser-level event reports as gone.
pub fn closed_target(event: &CdpEvent) -> Option<&str> {
    if event.is("Target.targetDestroyed") || event.is("Target.detachedFromTarget") {
        return event.param_str("targetId");
    }
    None
}

/// Browser-backed tab host.
pub struct CdpTabHost {
    client: Arc<CdpClient>,
    sessions: Arc<RwLock<HashMap<TabId, Arc<PageSession>>>>,
    subscribed: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<HostEvent>,
    status: mpsc::UnboundedSender<StatusUpdate>,
    executors: Arc<ExecutorRegistry>,
    settings: Arc<ExecutorSettings>,
    tracker: TaskTracker,
    pumps: Mutex<Vec<JoinHandle<()>>>,
}

impl CdpTabHost {
    /// Build a host on a connected client. Host events go to `events`,
    /// executor progress to `status`.
    pub async fn new(
        client: Arc<CdpClient>,
        events: mpsc::UnboundedSender<HostEvent>,
        status: mpsc::UnboundedSender<StatusUpdate>,
        settings: ExecutorSettings,
    ) -> Result<Self, CdpError> {
        let host = Self {
            client,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            subscribed: Arc::new(AtomicBool::new(false)),
            events,
            status,
            executors: Arc::new(ExecutorRegistry::with_defaults()),
            settings: Arc::new(settings),
            tracker: TaskTracker::new(),
            pumps: Mutex::new(Vec::new()),
        };

        let browser_events = host.client.browser_events();
        host.client.discover_targets().await?;
        let pump = host.spawn_browser_pump(browser_events);
        host.pumps.lock().push(pump);

        Ok(host)
    }

    /// Replace the executor set.
    pub fn with_executors(mut self, executors: ExecutorRegistry) -> Self {
        self.executors = Arc::new(executors);
        self
    }

    /// Number of tabs this host is tracking.
    pub fn tab_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Wait for every executor started so far. No executor can be started
    /// afterwards.
    pub async fn wait_for_executors(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    fn session(&self, tab_id: &TabId) -> Result<Arc<PageSession>, HostError> {
        self.sessions
            .read()
            .get(tab_id)
            .cloned()
            .ok_or_else(|| HostError::TabNotFound(tab_id.to_string()))
    }

    fn spawn_page_pump(
        &self,
        tab_id: TabId,
        mut rx: mpsc::UnboundedReceiver<CdpEvent>,
    ) -> JoinHandle<()> {
        let events = self.events.clone();
        let subscribed = self.subscribed.clone();
        tokio::spawn(async move {
            let mut translator = PageEventTranslator::new(tab_id.clone());
            while let Some(event) = rx.recv().await {
                let Some(host_event) = translator.translate(&event) else {
                    continue;
                };
                if !subscribed.load(Ordering::SeqCst) {
                    debug!("Dropping event for tab {}: not subscribed", tab_id);
                    continue;
                }
                if events.send(host_event).is_err() {
                    break;
                }
            }
            debug!("Event pump for tab {} stopped", tab_id);
        })
    }

    fn spawn_browser_pump(&self, mut rx: mpsc::UnboundedReceiver<CdpEvent>) -> JoinHandle<()> {
        let client = self.client.clone();
        let sessions = self.sessions.clone();
        let events = self.events.clone();
        let subscribed = self.subscribed.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(target_id) = closed_target(&event) else {
                    continue;
                };
                let tab_id = TabId::from(target_id);
                let Some(session) = sessions.write().remove(&tab_id) else {
                    continue;
                };
                client.release_session(session.session_id());
                info!("Tab {} closed", tab_id);
                if subscribed.load(Ordering::SeqCst) && events.send(HostEvent::TabClosed(tab_id)).is_err() {
                    break;
                }
            }
        })
    }
}

#[async_trait]
impl TabHost for CdpTabHost {
    async fn create_tab(&self, url: &str) -> Result<TabId, HostError> {
        let mut session = self
            .client
            .new_page()
            .await
            .map_err(|e| HostError::TabCreation(e.to_string()))?;
        let tab_id = TabId::from(session.target_id());

        let events = session
            .take_events()
            .ok_or_else(|| HostError::TabCreation("page events already taken".to_string()))?;
        let pump = self.spawn_page_pump(tab_id.clone(), events);
        self.pumps.lock().push(pump);

        let session = Arc::new(session);
        self.sessions.write().insert(tab_id.clone(), session.clone());

        if let Err(e) = session.navigate(url).await {
            error!("Tab {} could not open {}: {}", tab_id, url, e);
            self.sessions.write().remove(&tab_id);
            if let Err(e) = self.client.close_page(tab_id.as_str()).await {
                warn!("Failed to close tab {}: {}", tab_id, e);
            }
            return Err(HostError::TabCreation(e.to_string()));
        }

        info!("Opened tab {} at {}", tab_id, url);
        Ok(tab_id)
    }

    async fn navigate(&self, tab_id: &TabId, url: &str) -> Result<(), HostError> {
        let session = self.session(tab_id)?;
        session
            .navigate(url)
            .await
            .map_err(|e| HostError::Navigation(e.to_string()))
    }

    async fn inject(&self, tab_id: &TabId, payload: InjectionPayload) -> Result<(), HostError> {
        let session = self.session(tab_id)?;
        if self.tracker.is_closed() {
            return Err(HostError::Injection("host is shutting down".to_string()));
        }
        if !self.executors.contains(payload.executor) {
            return Err(HostError::Injection(format!(
                "no executor for {}",
                payload.executor
            )));
        }

        let notifier = payload
            .signals_completion()
            .then(|| CompletionNotifier::new(tab_id.clone(), self.events.clone()));
        let ctx = ExecutorContext {
            tab_id: tab_id.clone(),
            payload,
            page: session,
            settings: self.settings.clone(),
            status: self.status.clone(),
            notifier,
        };

        let executors = self.executors.clone();
        self.tracker.spawn(async move {
            let tab_id = ctx.tab_id.clone();
            let kind = ctx.payload.executor;
            match executors.run(ctx).await {
                Ok(()) => info!("Executor {} finished in tab {}", kind, tab_id),
                Err(e) => warn!("Executor {} failed in tab {}: {}", kind, tab_id, e),
            }
        });
        Ok(())
    }

    fn subscribe(&self) {
        if !self.subscribed.swap(true, Ordering::SeqCst) {
            debug!("Host events subscribed");
        }
    }

    fn unsubscribe(&self) {
        if self.subscribed.swap(false, Ordering::SeqCst) {
            debug!("Host events unsubscribed");
        }
    }
}

impl Drop for CdpTabHost {
    fn drop(&mut self) {
        for pump in self.pumps.lock().drain(..) {
            pump.abort();
        }
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
