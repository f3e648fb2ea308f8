//! Workflow stages.

use std::fmt;

use serde::{Deserialize, Serialize};

use regpilot_protocols::Mode;

/// Step within a mode's state machine.
///
/// Variants are declared in workflow order; every mode's sequence is
/// increasing under the derived `Ord`, which is how forward-only movement
/// is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Registration mode: waiting for the planning site to load.
    PlanningSite,
    /// Class modes: waiting for the course search page to load.
    CourseSearch,
    /// Class search is running; waiting for its completion signal.
    AddingClasses,
    /// Tab was sent to the term plan page; waiting for it to load.
    NavigateToTerm,
    /// Registration handoff clicked; waiting for the registration site.
    RegisterPending,
}

impl Stage {
    /// First stage of `mode`.
    pub fn initial(mode: Mode) -> Self {
        match mode {
            Mode::Registration => Stage::PlanningSite,
            Mode::AddClasses | Mode::AddClassesAndRegister => Stage::CourseSearch,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::PlanningSite => "planning_site",
            Stage::CourseSearch => "course_search",
            Stage::AddingClasses => "adding_classes",
            Stage::NavigateToTerm => "navigate_to_term",
            Stage::RegisterPending => "register_pending",
        };
        f.write_str(name)
    }
}
