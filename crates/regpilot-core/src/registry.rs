//! Per-tab workflow state store.

use std::collections::HashMap;

use regpilot_protocols::{Mode, TabId};

use crate::error::CoordinatorError;
use crate::stage::Stage;

/// Workflow state of one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    pub tab_id: TabId,
    pub mode: Mode,
    pub stage: Stage,
    /// Class specifications, in the order the user entered them.
    pub classes: Vec<String>,
}

impl WorkflowState {
    pub fn new(tab_id: TabId, mode: Mode, classes: Vec<String>) -> Self {
        Self {
            tab_id,
            mode,
            stage: Stage::initial(mode),
            classes,
        }
    }
}

/// Mapping from tab to workflow state. At most one entry per tab.
#[derive(Debug, Default)]
pub struct WorkflowRegistry {
    states: HashMap<TabId, WorkflowState>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a state, returning the one it replaced.
    pub fn insert(&mut self, state: WorkflowState) -> Option<WorkflowState> {
        self.states.insert(state.tab_id.clone(), state)
    }

    pub fn get(&self, tab_id: &TabId) -> Option<&WorkflowState> {
        self.states.get(tab_id)
    }

    pub fn contains(&self, tab_id: &TabId) -> bool {
        self.states.contains_key(tab_id)
    }

    /// Move a tab to a later stage.
    ///
    /// Returns `Ok(None)` if the tab is not registered.
    pub fn advance(&mut self, tab_id: &TabId, next: Stage) -> Result<Option<Stage>, CoordinatorError> {
        let Some(state) = self.states.get_mut(tab_id) else {
            return Ok(None);
        };
        if next <= state.stage {
            return Err(CoordinatorError::BackwardTransition {
                from: state.stage,
                to: next,
            });
        }
        let previous = state.stage;
        state.stage = next;
        Ok(Some(previous))
    }

    pub fn remove(&mut self, tab_id: &TabId) -> Option<WorkflowState> {
        self.states.remove(tab_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkflowState> {
        self.states.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: &str, mode: Mode) -> WorkflowState {
        WorkflowState::new(TabId::from(id), mode, Vec::new())
    }

    #[test]
    fn test_new_state_starts_at_initial_stage() {
        let s = state("t1", Mode::Registration);
        assert_eq!(s.stage, Stage::PlanningSite);
    }

    #[test]
    fn test_insert_replaces_same_tab() {
        let mut registry = WorkflowRegistry::new();
        assert!(registry.insert(state("t1", Mode::Registration)).is_none());
        let replaced = registry.insert(state("t1", Mode::AddClasses));
        assert_eq!(replaced.unwrap().mode, Mode::Registration);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&TabId::from("t1")).unwrap().mode, Mode::AddClasses);
    }

    #[test]
    fn test_advance_forward() {
        let mut registry = WorkflowRegistry::new();
        registry.insert(state("t1", Mode::AddClassesAndRegister));
        let tab = TabId::from("t1");
        let previous = registry.advance(&tab, Stage::AddingClasses).unwrap();
        assert_eq!(previous, Some(Stage::CourseSearch));
        assert_eq!(registry.get(&tab).unwrap().stage, Stage::AddingClasses);
    }

    #[test]
    fn test_advance_rejects_backward_and_same() {
        let mut registry = WorkflowRegistry::new();
        registry.insert(state("t1", Mode::AddClassesAndRegister));
        let tab = TabId::from("t1");
        registry.advance(&tab, Stage::NavigateToTerm).unwrap();

        assert!(registry.advance(&tab, Stage::AddingClasses).is_err());
        assert!(registry.advance(&tab, Stage::NavigateToTerm).is_err());
        assert_eq!(registry.get(&tab).unwrap().stage, Stage::NavigateToTerm);
    }

    #[test]
    fn test_advance_unknown_tab() {
        let mut registry = WorkflowRegistry::new();
        assert_eq!(registry.advance(&TabId::from("nope"), Stage::RegisterPending).unwrap(), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = WorkflowRegistry::new();
        registry.insert(state("t1", Mode::Registration));
        assert!(registry.remove(&TabId::from("t1")).is_some());
        assert!(registry.remove(&TabId::from("t1")).is_none());
        assert!(registry.is_empty());
    }
}
