//! Page automation run in a tab after a qualifying navigation.
//!
//! Executors are strategies keyed by [`ExecutorKind`]. They receive plain
//! data ([`InjectionPayload`]), act on the page through [`PageDriver`],
//! report progress as [`StatusUpdate`]s and, when the mode waits for it,
//! consume their [`CompletionNotifier`].

mod class_search;
mod driver;
mod error;
mod handoff;
pub mod scripts;
mod sections;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regpilot_protocols::{CompletionNotifier, ExecutorKind, InjectionPayload, StatusUpdate, TabId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::retry::{PollOutcome, RetryPolicy, poll_until};

pub use class_search::ClassSearch;
pub use driver::{Locator, PageDriver, SectionRow};
pub use error::ExecutorError;
pub use handoff::{ImportAndSubmit, RegisterHandoff, TermSelectHandoff};
pub use sections::{SectionChoice, SelectionError, detect_quiz_sections, select_sections};

#[cfg(test)]
#[path = "executors_tests.rs"]
mod tests;

/// The term whose sections and plan page executors work with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermTarget {
    pub fragment: String,
    pub label: String,
    pub section_table_prefix: String,
}

impl Default for TermTarget {
    fn default() -> Self {
        Self {
            fragment: "/wi26".to_string(),
            label: "Winter 2026".to_string(),
            section_table_prefix: "winter-".to_string(),
        }
    }
}

/// Named waits between dependent page steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Term link clicked, plan view updating.
    AfterTermClick,
    /// Cart import running before submit.
    BeforeSubmit,
    /// Search text entered.
    AfterFill,
    /// Search submitted, results loading.
    SearchResults,
    /// Course page loading.
    CoursePage,
    /// Lecture selected, before its quiz.
    BetweenSections,
    /// Sections selected, before leaving the course page.
    BeforeBack,
    /// Before starting the next class.
    NextClass,
}

impl Pause {
    /// Length in half steps.
    fn half_steps(self) -> u32 {
        match self {
            Pause::AfterFill | Pause::BetweenSections => 1,
            Pause::AfterTermClick => 2,
            Pause::BeforeBack => 3,
            Pause::BeforeSubmit | Pause::SearchResults | Pause::NextClass => 4,
            Pause::CoursePage => 6,
        }
    }
}

/// Settings shared by every executor run.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub retry: RetryPolicy,
    /// Base step; each [`Pause`] is a multiple of it.
    pub step_delay: Duration,
    pub term: TermTarget,
    pub registration_host: String,
}

impl ExecutorSettings {
    pub fn pause_for(&self, pause: Pause) -> Duration {
        self.step_delay.saturating_mul(pause.half_steps()) / 2
    }

    /// No polling delay or pauses; polling still gives up after `attempts`.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            retry: RetryPolicy::new(attempts, Duration::ZERO),
            step_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            step_delay: Duration::from_secs(1),
            term: TermTarget::default(),
            registration_host: "register.uw.edu".to_string(),
        }
    }
}

/// Everything one executor run gets.
pub struct ExecutorContext {
    pub tab_id: TabId,
    pub payload: InjectionPayload,
    pub page: Arc<dyn PageDriver>,
    pub settings: Arc<ExecutorSettings>,
    pub status: mpsc::UnboundedSender<StatusUpdate>,
    pub notifier: Option<CompletionNotifier>,
}

impl ExecutorContext {
    /// Send a status update; a closed receiver is not an error.
    pub fn report(&self, update: StatusUpdate) {
        debug!("Status for tab {}: {}", self.tab_id, update);
        let _ = self.status.send(update);
    }

    pub async fn pause(&self, pause: Pause) {
        let duration = self.settings.pause_for(pause);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    /// Click `locator` once it appears. `false` when polling ran out.
    pub async fn click_when_present(&self, locator: &Locator) -> Result<bool, ExecutorError> {
        let page = &self.page;
        let outcome = poll_until(&self.settings.retry, || async move {
            Ok::<_, ExecutorError>(page.click(locator).await?.then_some(()))
        })
        .await?;
        Ok(self.found(locator, outcome))
    }

    /// Fill `locator` with `value` once it appears. `false` when polling ran out.
    pub async fn fill_when_present(&self, locator: &Locator, value: &str) -> Result<bool, ExecutorError> {
        let page = &self.page;
        let outcome = poll_until(&self.settings.retry, || async move {
            Ok::<_, ExecutorError>(page.fill(locator, value).await?.then_some(()))
        })
        .await?;
        Ok(self.found(locator, outcome))
    }

    /// Section rows of the configured term once any are listed.
    pub async fn section_rows(&self) -> Result<Option<Vec<SectionRow>>, ExecutorError> {
        let page = &self.page;
        let prefix = self.settings.term.section_table_prefix.as_str();
        let outcome = poll_until(&self.settings.retry, || async move {
            let rows = page.section_rows(prefix).await?;
            Ok::<_, ExecutorError>((!rows.is_empty()).then_some(rows))
        })
        .await?;
        if matches!(outcome, PollOutcome::Exhausted) {
            warn!("No section rows found in tab {}", self.tab_id);
        }
        Ok(outcome.found())
    }

    fn found(&self, locator: &Locator, outcome: PollOutcome<()>) -> bool {
        match outcome {
            PollOutcome::Found(()) => true,
            PollOutcome::Exhausted => {
                warn!(
                    "{} not found in tab {} after {} attempts",
                    locator, self.tab_id, self.settings.retry.attempts
                );
                false
            }
        }
    }

    /// Send the completion signal if this run holds the notifier.
    pub fn signal_completion(&mut self) {
        if let Some(notifier) = self.notifier.take() {
            if !notifier.signal() {
                warn!("Completion signal for tab {} had no receiver", self.tab_id);
            }
        }
    }
}

/// Page automation for one [`ExecutorKind`].
#[async_trait]
pub trait PageExecutor: Send + Sync {
    fn kind(&self) -> ExecutorKind;

    async fn execute(&self, ctx: ExecutorContext) -> Result<(), ExecutorError>;
}

/// Executors by kind.
pub struct ExecutorRegistry {
    executors: HashMap<ExecutorKind, Arc<dyn PageExecutor>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self {
            executors: HashMap::new(),
        }
    }

    /// Registry holding the four built-in executors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults: [Arc<dyn PageExecutor>; 4] = [
            Arc::new(TermSelectHandoff),
            Arc::new(RegisterHandoff),
            Arc::new(ImportAndSubmit),
            Arc::new(ClassSearch),
        ];
        for executor in defaults {
            registry.executors.insert(executor.kind(), executor);
        }
        registry
    }

    /// Register an executor. Fails if its kind is taken.
    pub fn register(&mut self, executor: Arc<dyn PageExecutor>) -> Result<(), ExecutorError> {
        let kind = executor.kind();
        if self.executors.contains_key(&kind) {
            return Err(ExecutorError::AlreadyRegistered(kind));
        }
        self.executors.insert(kind, executor);
        Ok(())
    }

    pub fn get(&self, kind: ExecutorKind) -> Option<Arc<dyn PageExecutor>> {
        self.executors.get(&kind).cloned()
    }

    pub fn contains(&self, kind: ExecutorKind) -> bool {
        self.executors.contains_key(&kind)
    }

    /// Run the executor the payload names.
    pub async fn run(&self, ctx: ExecutorContext) -> Result<(), ExecutorError> {
        let kind = ctx.payload.executor;
        let executor = self.get(kind).ok_or(ExecutorError::NotRegistered(kind))?;
        debug!("Running {} in tab {}", kind, ctx.tab_id);
        executor.execute(ctx).await
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
