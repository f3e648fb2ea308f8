//! The unified transition table.
//!
//! One row per `(mode, stage, trigger)`. Rows are checked in order and the
//! first match wins.

use regpilot_protocols::{ExecutorKind, Mode};

use crate::sites::{Location, SiteMap};
use crate::stage::Stage;

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;

/// Where a completed navigation must land for a row to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    /// Any page on the planning site.
    Planning,
    /// The planning site's course search page.
    CourseSearch,
    /// The planning site showing the target term.
    TermPlan,
    /// Any page on the registration site.
    Registration,
}

impl Place {
    pub fn matches(self, location: &Location, sites: &SiteMap) -> bool {
        match self {
            Place::Planning => sites.is_planning(location),
            Place::CourseSearch => sites.is_course_search(location),
            Place::TermPlan => sites.is_term_plan(location),
            Place::Registration => sites.is_registration(location),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Arrived(Place),
    CompletionSignal,
}

/// Navigation the coordinator issues as part of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateTo {
    TermPlan,
}

impl NavigateTo {
    pub fn url(self, sites: &SiteMap) -> String {
        match self {
            NavigateTo::TermPlan => sites.term_plan_url(),
        }
    }
}

/// What happens to the tab when a row fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub inject: Option<ExecutorKind>,
    pub navigate: Option<NavigateTo>,
}

impl Action {
    const NONE: Action = Action {
        inject: None,
        navigate: None,
    };

    const fn inject(kind: ExecutorKind) -> Action {
        Action {
            inject: Some(kind),
            navigate: None,
        }
    }

    const fn navigate(to: NavigateTo) -> Action {
        Action {
            inject: None,
            navigate: Some(to),
        }
    }

    pub fn is_none(&self) -> bool {
        self.inject.is_none() && self.navigate.is_none()
    }
}

/// Where the workflow goes after a row fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Advance(Stage),
    /// Stay in the current stage.
    Hold,
    /// Workflow finished; the entry is removed.
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub mode: Mode,
    pub stage: Stage,
    pub trigger: Trigger,
    pub action: Action,
    pub next: Next,
}

const fn row(mode: Mode, stage: Stage, trigger: Trigger, action: Action, next: Next) -> Transition {
    Transition {
        mode,
        stage,
        trigger,
        action,
        next,
    }
}

pub static TRANSITIONS: &[Transition] = &[
    row(
        Mode::Registration,
        Stage::PlanningSite,
        Trigger::Arrived(Place::Planning),
        Action::inject(ExecutorKind::TermSelectHandoff),
        Next::Advance(Stage::RegisterPending),
    ),
    row(
        Mode::Registration,
        Stage::RegisterPending,
        Trigger::Arrived(Place::Registration),
        Action::inject(ExecutorKind::ImportAndSubmit),
        Next::Terminal,
    ),
    row(
        Mode::AddClasses,
        Stage::CourseSearch,
        Trigger::Arrived(Place::Planning),
        Action::inject(ExecutorKind::ClassSearch),
        Next::Terminal,
    ),
    row(
        Mode::AddClassesAndRegister,
        Stage::CourseSearch,
        Trigger::Arrived(Place::CourseSearch),
        Action::inject(ExecutorKind::ClassSearch),
        Next::Advance(Stage::AddingClasses),
    ),
    row(
        Mode::AddClassesAndRegister,
        Stage::AddingClasses,
        Trigger::Arrived(Place::CourseSearch),
        Action::NONE,
        Next::Hold,
    ),
    row(
        Mode::AddClassesAndRegister,
        Stage::AddingClasses,
        Trigger::CompletionSignal,
        Action::navigate(NavigateTo::TermPlan),
        Next::Advance(Stage::NavigateToTerm),
    ),
    row(
        Mode::AddClassesAndRegister,
        Stage::NavigateToTerm,
        Trigger::Arrived(Place::TermPlan),
        Action::inject(ExecutorKind::RegisterHandoff),
        Next::Advance(Stage::RegisterPending),
    ),
    row(
        Mode::AddClassesAndRegister,
        Stage::RegisterPending,
        Trigger::Arrived(Place::Registration),
        Action::inject(ExecutorKind::ImportAndSubmit),
        Next::Terminal,
    ),
];

/// Row fired by a completed navigation to `location`, if any.
pub fn on_arrival(
    mode: Mode,
    stage: Stage,
    location: &Location,
    sites: &SiteMap,
) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|t| {
        t.mode == mode
            && t.stage == stage
            && matches!(t.trigger, Trigger::Arrived(place) if place.matches(location, sites))
    })
}

/// Row fired by a completion signal, if the stage is waiting for one.
pub fn on_signal(mode: Mode, stage: Stage) -> Option<&'static Transition> {
    TRANSITIONS
        .iter()
        .find(|t| t.mode == mode && t.stage == stage && t.trigger == Trigger::CompletionSignal)
}
