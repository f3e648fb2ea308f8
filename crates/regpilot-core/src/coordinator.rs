//! The tab workflow coordinator.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use regpilot_protocols::{
    ExecutorKind, HostEvent, InjectionPayload, Mode, NavigationEvent, TabHandle, TabHost, TabId,
};

use crate::error::CoordinatorError;
use crate::registry::{WorkflowRegistry, WorkflowState};
use crate::sites::{Location, SiteMap};
use crate::stage::Stage;
use crate::transition::{self, Next, Transition};

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Unregistered tab, incomplete load, or no matching transition.
    Ignored,
    Advanced { from: Stage, to: Stage },
    /// Matched a row that keeps the tab in its stage.
    Held(Stage),
    /// Terminal row fired; the entry was removed.
    Completed,
    /// The row's action failed; the tab stays in this stage.
    Stalled(Stage),
    /// The tab closed and its entry was removed.
    Removed,
}

/// Owns the workflow registry and drives every tab's state machine.
///
/// All methods take `&mut self`: the coordinator lives in one event loop
/// and sees events one at a time.
pub struct Coordinator {
    host: Arc<dyn TabHost>,
    sites: SiteMap,
    registry: WorkflowRegistry,
    subscribed: bool,
}

impl Coordinator {
    pub fn new(host: Arc<dyn TabHost>, sites: SiteMap) -> Self {
        Self::with_registry(host, sites, WorkflowRegistry::new())
    }

    /// Build a coordinator around an existing registry.
    pub fn with_registry(host: Arc<dyn TabHost>, sites: SiteMap, registry: WorkflowRegistry) -> Self {
        let mut coordinator = Self {
            host,
            sites,
            registry,
            subscribed: false,
        };
        coordinator.sync_subscription();
        coordinator
    }

    pub fn registry(&self) -> &WorkflowRegistry {
        &self.registry
    }

    pub fn sites(&self) -> &SiteMap {
        &self.sites
    }

    /// Whether host events are currently subscribed.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Open a tab at `initial_target` and start `mode` in it.
    pub async fn start_workflow(
        &mut self,
        mode: Mode,
        initial_target: &str,
        classes: Vec<String>,
    ) -> Result<TabHandle, CoordinatorError> {
        let classes = if mode.carries_classes() {
            if classes.is_empty() {
                return Err(CoordinatorError::EmptyClassList(mode));
            }
            classes
        } else {
            Vec::new()
        };

        // Subscribe before the tab exists so its first load is not missed.
        self.ensure_subscribed();

        let tab_id = match self.host.create_tab(initial_target).await {
            Ok(tab_id) => tab_id,
            Err(e) => {
                error!("Failed to open tab for {} workflow: {}", mode, e);
                self.sync_subscription();
                return Err(CoordinatorError::TabCreation(e.to_string()));
            }
        };

        let state = WorkflowState::new(tab_id.clone(), mode, classes);
        info!(
            "Started {} workflow in tab {} at stage {}",
            mode, tab_id, state.stage
        );
        if let Some(previous) = self.registry.insert(state) {
            warn!(
                "Tab {} was already running {} workflow; replaced",
                tab_id, previous.mode
            );
        }
        self.sync_subscription();

        Ok(TabHandle {
            tab_id,
            mode,
            url: initial_target.to_string(),
        })
    }

    /// Dispatch a host event to its handler.
    pub async fn handle(&mut self, event: HostEvent) -> StepOutcome {
        match event {
            HostEvent::NavigationCompleted(nav) => self.on_navigation_completed(&nav).await,
            HostEvent::TabClosed(tab_id) => self.on_tab_closed(&tab_id),
            HostEvent::CompletionSignal(tab_id) => self.on_completion_signal(&tab_id).await,
        }
    }

    /// A tab finished loading a URL.
    pub async fn on_navigation_completed(&mut self, event: &NavigationEvent) -> StepOutcome {
        let Some((mode, stage)) = self.position(&event.tab_id) else {
            return StepOutcome::Ignored;
        };
        let Some(raw_url) = event.completed_url() else {
            return StepOutcome::Ignored;
        };

        let location = match Location::parse(raw_url) {
            Ok(location) => location,
            Err(e) => {
                warn!("Ignoring navigation in tab {}: {}", event.tab_id, e);
                return StepOutcome::Ignored;
            }
        };

        match transition::on_arrival(mode, stage, &location, &self.sites) {
            Some(row) => self.apply(&event.tab_id, row).await,
            None => {
                debug!(
                    "No transition for tab {} ({} at {}) on {}",
                    event.tab_id, mode, stage, raw_url
                );
                StepOutcome::Ignored
            }
        }
    }

    /// An executor reported that its multi-page sub-task finished.
    pub async fn on_completion_signal(&mut self, tab_id: &TabId) -> StepOutcome {
        let Some((mode, stage)) = self.position(tab_id) else {
            return StepOutcome::Ignored;
        };
        match transition::on_signal(mode, stage) {
            Some(row) => self.apply(tab_id, row).await,
            None => {
                debug!(
                    "Tab {} is not waiting for a completion signal (stage {})",
                    tab_id, stage
                );
                StepOutcome::Ignored
            }
        }
    }

    /// A tab closed, by the user or otherwise.
    pub fn on_tab_closed(&mut self, tab_id: &TabId) -> StepOutcome {
        match self.registry.remove(tab_id) {
            Some(state) => {
                info!(
                    "Tab {} closed during {} workflow at stage {}",
                    tab_id, state.mode, state.stage
                );
                self.sync_subscription();
                StepOutcome::Removed
            }
            None => StepOutcome::Ignored,
        }
    }

    async fn apply(&mut self, tab_id: &TabId, row: &Transition) -> StepOutcome {
        let Some(state) = self.registry.get(tab_id) else {
            return StepOutcome::Ignored;
        };
        let (mode, stage) = (state.mode, state.stage);

        if let Some(kind) = row.action.inject {
            let mut payload = InjectionPayload::new(mode, kind);
            if kind == ExecutorKind::ClassSearch {
                payload = payload.with_classes(state.classes.clone());
            }
            if let Err(e) = self.host.inject(tab_id, payload).await {
                error!("Failed to inject {} into tab {}: {}", kind, tab_id, e);
                return StepOutcome::Stalled(stage);
            }
            debug!("Injected {} into tab {}", kind, tab_id);
        }

        if let Some(target) = row.action.navigate {
            let url = target.url(&self.sites);
            if let Err(e) = self.host.navigate(tab_id, &url).await {
                error!("Failed to navigate tab {} to {}: {}", tab_id, url, e);
                return StepOutcome::Stalled(stage);
            }
            debug!("Navigating tab {} to {}", tab_id, url);
        }

        match row.next {
            Next::Hold => StepOutcome::Held(stage),
            Next::Advance(next) => match self.registry.advance(tab_id, next) {
                Ok(_) => {
                    info!("Tab {} ({}) advanced {} -> {}", tab_id, mode, stage, next);
                    StepOutcome::Advanced {
                        from: stage,
                        to: next,
                    }
                }
                Err(e) => {
                    error!("Tab {}: {}", tab_id, e);
                    StepOutcome::Stalled(stage)
                }
            },
            Next::Terminal => {
                self.registry.remove(tab_id);
                info!("Tab {} finished {} workflow", tab_id, mode);
                self.sync_subscription();
                StepOutcome::Completed
            }
        }
    }

    fn position(&self, tab_id: &TabId) -> Option<(Mode, Stage)> {
        self.registry.get(tab_id).map(|state| (state.mode, state.stage))
    }

    fn ensure_subscribed(&mut self) {
        if !self.subscribed {
            self.host.subscribe();
            self.subscribed = true;
            debug!("Subscribed to tab events");
        }
    }

    /// Make subscription follow registry occupancy.
    fn sync_subscription(&mut self) {
        if self.registry.is_empty() {
            if self.subscribed {
                self.host.unsubscribe();
                self.subscribed = false;
                debug!("Unsubscribed from tab events");
            }
        } else {
            self.ensure_subscribed();
        }
    }
}
