//! Workflow identity, modes and host event types.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;

/// Opaque tab identifier assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TabId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Handle returned to the caller of a successful workflow start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabHandle {
    pub tab_id: TabId,
    pub mode: Mode,
    /// URL the tab was opened at.
    pub url: String,
}

/// Workflow variant a tab is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Select the term on the planning site, then import and submit on the
    /// registration site.
    Registration,
    /// Search for and add the requested classes on the planning site only.
    AddClasses,
    /// Add the requested classes, then run the registration handoff.
    AddClassesAndRegister,
}

impl Mode {
    /// Whether this mode has a stage that waits for an executor's
    /// completion signal.
    pub fn awaits_completion_signal(self) -> bool {
        matches!(self, Mode::AddClassesAndRegister)
    }

    /// Whether this mode needs a class list.
    pub fn carries_classes(self) -> bool {
        matches!(self, Mode::AddClasses | Mode::AddClassesAndRegister)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Registration => write!(f, "registration"),
            Mode::AddClasses => write!(f, "add_classes"),
            Mode::AddClassesAndRegister => write!(f, "add_classes_and_register"),
        }
    }
}

/// Page automation the coordinator can ask the host to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    /// Pick the target term on the planning site, then follow the
    /// registration link.
    TermSelectHandoff,
    /// Follow the registration link from a page already showing the term.
    RegisterHandoff,
    /// Import the planned cart on the registration site and submit it.
    ImportAndSubmit,
    /// Search for each requested class and select its sections.
    ClassSearch,
}

impl fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorKind::TermSelectHandoff => write!(f, "term_select_handoff"),
            ExecutorKind::RegisterHandoff => write!(f, "register_handoff"),
            ExecutorKind::ImportAndSubmit => write!(f, "import_and_submit"),
            ExecutorKind::ClassSearch => write!(f, "class_search"),
        }
    }
}

/// Everything an executor receives at injection time.
///
/// Plain data only; nothing is captured from the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionPayload {
    pub mode: Mode,
    pub executor: ExecutorKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

impl InjectionPayload {
    pub fn new(mode: Mode, executor: ExecutorKind) -> Self {
        Self {
            mode,
            executor,
            classes: Vec::new(),
        }
    }

    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    /// Whether the executor should report completion back to the coordinator.
    pub fn signals_completion(&self) -> bool {
        self.executor == ExecutorKind::ClassSearch && self.mode.awaits_completion_signal()
    }
}

/// Load state carried by a navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Complete,
}

/// A tab reported a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub tab_id: TabId,
    pub status: LoadStatus,
    pub url: Option<String>,
}

impl NavigationEvent {
    /// A finished load at `url`.
    pub fn completed(tab_id: impl Into<TabId>, url: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            status: LoadStatus::Complete,
            url: Some(url.into()),
        }
    }

    /// The URL of a completed load, if this event is one.
    pub fn completed_url(&self) -> Option<&str> {
        match self.status {
            LoadStatus::Complete => self.url.as_deref(),
            LoadStatus::Loading => None,
        }
    }
}

/// Events the host delivers to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    NavigationCompleted(NavigationEvent),
    TabClosed(TabId),
    /// An executor finished a multi-page sub-task in this tab.
    CompletionSignal(TabId),
}

impl HostEvent {
    pub fn tab_id(&self) -> &TabId {
        match self {
            HostEvent::NavigationCompleted(event) => &event.tab_id,
            HostEvent::TabClosed(tab_id) | HostEvent::CompletionSignal(tab_id) => tab_id,
        }
    }
}
