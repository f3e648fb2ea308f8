use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use regpilot_protocols::{HostError, LoadStatus};

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Create(String),
    Navigate(TabId, String),
    Inject(TabId, InjectionPayload),
    Subscribe,
    Unsubscribe,
}

#[derive(Default)]
struct FakeHost {
    next_id: AtomicU64,
    calls: Mutex<Vec<Call>>,
    fail_create: AtomicBool,
    fail_inject: AtomicBool,
    fail_navigate: AtomicBool,
}

impl FakeHost {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn injections(&self) -> Vec<InjectionPayload> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Inject(_, payload) => Some(payload),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl TabHost for FakeHost {
    async fn create_tab(&self, url: &str) -> Result<TabId, HostError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(HostError::TabCreation("no window".to_string()));
        }
        self.calls.lock().push(Call::Create(url.to_string()));
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TabId::new(format!("tab-{}", n)))
    }

    async fn navigate(&self, tab_id: &TabId, url: &str) -> Result<(), HostError> {
        if self.fail_navigate.load(Ordering::SeqCst) {
            return Err(HostError::Navigation("blocked".to_string()));
        }
        self.calls.lock().push(Call::Navigate(tab_id.clone(), url.to_string()));
        Ok(())
    }

    async fn inject(&self, tab_id: &TabId, payload: InjectionPayload) -> Result<(), HostError> {
        if self.fail_inject.load(Ordering::SeqCst) {
            return Err(HostError::Injection("cannot script this page".to_string()));
        }
        self.calls.lock().push(Call::Inject(tab_id.clone(), payload));
        Ok(())
    }

    fn subscribe(&self) {
        self.calls.lock().push(Call::Subscribe);
    }

    fn unsubscribe(&self) {
        self.calls.lock().push(Call::Unsubscribe);
    }
}

const PLAN: &str = "https://myplan.uw.edu/plan/";
const SEARCH: &str = "https://myplan.uw.edu/course/#/courses?states=N4Ig";
const TERM: &str = "https://myplan.uw.edu/plan/#/wi26";
const REGISTER: &str = "https://register.uw.edu/register/";

fn setup() -> (Arc<FakeHost>, Coordinator) {
    let host = Arc::new(FakeHost::default());
    let coordinator = Coordinator::new(host.clone(), SiteMap::default());
    (host, coordinator)
}

fn nav(tab: &TabId, url: &str) -> NavigationEvent {
    NavigationEvent::completed(tab.clone(), url)
}

fn stage_of(coordinator: &Coordinator, tab: &TabId) -> Option<Stage> {
    coordinator.registry().get(tab).map(|s| s.stage)
}

#[tokio::test]
async fn test_start_registers_initial_stage_and_subscribes() {
    let (host, mut coordinator) = setup();
    assert!(!coordinator.is_subscribed());

    let handle = coordinator
        .start_workflow(Mode::Registration, PLAN, vec!["ignored".to_string()])
        .await
        .unwrap();

    assert_eq!(handle.mode, Mode::Registration);
    assert_eq!(handle.url, PLAN);
    assert_eq!(stage_of(&coordinator, &handle.tab_id), Some(Stage::PlanningSite));
    assert!(coordinator.registry().get(&handle.tab_id).unwrap().classes.is_empty());
    assert!(coordinator.is_subscribed());
    assert_eq!(host.calls(), vec![Call::Subscribe, Call::Create(PLAN.to_string())]);
}

#[tokio::test]
async fn test_start_failure_returns_error_and_releases_subscription() {
    let (host, mut coordinator) = setup();
    host.fail_create.store(true, Ordering::SeqCst);

    let err = coordinator
        .start_workflow(Mode::Registration, PLAN, Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CoordinatorError::TabCreation(_)));
    assert!(coordinator.registry().is_empty());
    assert!(!coordinator.is_subscribed());
    assert_eq!(host.calls(), vec![Call::Subscribe, Call::Unsubscribe]);
}

#[tokio::test]
async fn test_class_modes_require_classes() {
    let (host, mut coordinator) = setup();
    let err = coordinator
        .start_workflow(Mode::AddClasses, SEARCH, Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::EmptyClassList(Mode::AddClasses)));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_registration_workflow() {
    let (host, mut coordinator) = setup();
    let tab = coordinator
        .start_workflow(Mode::Registration, PLAN, Vec::new())
        .await
        .unwrap()
        .tab_id;

    let outcome = coordinator.on_navigation_completed(&nav(&tab, PLAN)).await;
    assert_eq!(
        outcome,
        StepOutcome::Advanced {
            from: Stage::PlanningSite,
            to: Stage::RegisterPending
        }
    );

    // Term selection navigates within the planning site: no change.
    let outcome = coordinator.on_navigation_completed(&nav(&tab, TERM)).await;
    assert_eq!(outcome, StepOutcome::Ignored);

    let outcome = coordinator.on_navigation_completed(&nav(&tab, REGISTER)).await;
    assert_eq!(outcome, StepOutcome::Completed);
    assert!(coordinator.registry().is_empty());
    assert!(!coordinator.is_subscribed());

    let kinds: Vec<ExecutorKind> = host.injections().iter().map(|p| p.executor).collect();
    assert_eq!(
        kinds,
        vec![ExecutorKind::TermSelectHandoff, ExecutorKind::ImportAndSubmit]
    );
    assert_eq!(host.calls().last(), Some(&Call::Unsubscribe));
}

#[tokio::test]
async fn test_add_classes_injects_payload_and_finishes() {
    let (host, mut coordinator) = setup();
    let classes = vec!["CSE 373 A AA".to_string(), "MATH 124".to_string()];
    let tab = coordinator
        .start_workflow(Mode::AddClasses, SEARCH, classes.clone())
        .await
        .unwrap()
        .tab_id;

    let outcome = coordinator.on_navigation_completed(&nav(&tab, SEARCH)).await;
    assert_eq!(outcome, StepOutcome::Completed);
    assert!(coordinator.registry().is_empty());

    let injected = host.injections();
    assert_eq!(injected.len(), 1);
    assert_eq!(injected[0].mode, Mode::AddClasses);
    assert_eq!(injected[0].executor, ExecutorKind::ClassSearch);
    assert_eq!(injected[0].classes, classes);
}

#[tokio::test]
async fn test_completion_signal_only_counts_in_waiting_stage() {
    let (host, mut coordinator) = setup();
    let tab = coordinator
        .start_workflow(Mode::AddClassesAndRegister, SEARCH, vec!["MATH 124".to_string()])
        .await
        .unwrap()
        .tab_id;

    // Too early: still at CourseSearch.
    assert_eq!(coordinator.on_completion_signal(&tab).await, StepOutcome::Ignored);
    assert_eq!(stage_of(&coordinator, &tab), Some(Stage::CourseSearch));

    coordinator.on_navigation_completed(&nav(&tab, SEARCH)).await;
    assert_eq!(stage_of(&coordinator, &tab), Some(Stage::AddingClasses));

    // Section pages inside the search app hold the stage.
    assert_eq!(
        coordinator.on_navigation_completed(&nav(&tab, SEARCH)).await,
        StepOutcome::Held(Stage::AddingClasses)
    );

    assert_eq!(
        coordinator.on_completion_signal(&tab).await,
        StepOutcome::Advanced {
            from: Stage::AddingClasses,
            to: Stage::NavigateToTerm
        }
    );
    assert!(host.calls().contains(&Call::Navigate(tab.clone(), TERM.to_string())));

    // A second signal is not expected anymore.
    assert_eq!(coordinator.on_completion_signal(&tab).await, StepOutcome::Ignored);
    assert_eq!(stage_of(&coordinator, &tab), Some(Stage::NavigateToTerm));
}

#[tokio::test]
async fn test_unregistered_tab_is_noop_everywhere() {
    let (host, mut coordinator) = setup();
    let ghost = TabId::from("ghost");

    assert_eq!(coordinator.on_navigation_completed(&nav(&ghost, PLAN)).await, StepOutcome::Ignored);
    assert_eq!(coordinator.on_completion_signal(&ghost).await, StepOutcome::Ignored);
    assert_eq!(coordinator.on_tab_closed(&ghost), StepOutcome::Ignored);
    assert_eq!(
        coordinator.handle(HostEvent::TabClosed(ghost.clone())).await,
        StepOutcome::Ignored
    );

    assert!(coordinator.registry().is_empty());
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_incomplete_load_and_bad_url_are_ignored() {
    let (host, mut coordinator) = setup();
    let tab = coordinator
        .start_workflow(Mode::Registration, PLAN, Vec::new())
        .await
        .unwrap()
        .tab_id;

    let loading = NavigationEvent {
        tab_id: tab.clone(),
        status: LoadStatus::Loading,
        url: Some(PLAN.to_string()),
    };
    assert_eq!(coordinator.on_navigation_completed(&loading).await, StepOutcome::Ignored);
    assert_eq!(
        coordinator.on_navigation_completed(&nav(&tab, "::not a url::")).await,
        StepOutcome::Ignored
    );
    assert_eq!(
        coordinator.on_navigation_completed(&nav(&tab, "https://idp.u.washington.edu/")).await,
        StepOutcome::Ignored
    );

    assert_eq!(stage_of(&coordinator, &tab), Some(Stage::PlanningSite));
    assert!(host.injections().is_empty());
}

#[tokio::test]
async fn test_injection_failure_stalls_stage() {
    let (host, mut coordinator) = setup();
    let tab = coordinator
        .start_workflow(Mode::Registration, PLAN, Vec::new())
        .await
        .unwrap()
        .tab_id;

    host.fail_inject.store(true, Ordering::SeqCst);
    assert_eq!(
        coordinator.on_navigation_completed(&nav(&tab, PLAN)).await,
        StepOutcome::Stalled(Stage::PlanningSite)
    );
    assert_eq!(stage_of(&coordinator, &tab), Some(Stage::PlanningSite));

    // A later load of the same page (e.g. the user reloads) tries again.
    host.fail_inject.store(false, Ordering::SeqCst);
    assert!(matches!(
        coordinator.on_navigation_completed(&nav(&tab, PLAN)).await,
        StepOutcome::Advanced { .. }
    ));
}

#[tokio::test]
async fn test_navigation_failure_on_signal_stalls() {
    let (host, mut coordinator) = setup();
    let tab = coordinator
        .start_workflow(Mode::AddClassesAndRegister, SEARCH, vec!["MATH 124".to_string()])
        .await
        .unwrap()
        .tab_id;
    coordinator.on_navigation_completed(&nav(&tab, SEARCH)).await;

    host.fail_navigate.store(true, Ordering::SeqCst);
    assert_eq!(
        coordinator.on_completion_signal(&tab).await,
        StepOutcome::Stalled(Stage::AddingClasses)
    );
    assert_eq!(stage_of(&coordinator, &tab), Some(Stage::AddingClasses));
}

#[tokio::test]
async fn test_tab_close_mid_workflow_is_idempotent() {
    let (host, mut coordinator) = setup();
    let tab = coordinator
        .start_workflow(Mode::AddClassesAndRegister, SEARCH, vec!["MATH 124".to_string()])
        .await
        .unwrap()
        .tab_id;
    coordinator.on_navigation_completed(&nav(&tab, SEARCH)).await;

    assert_eq!(coordinator.on_tab_closed(&tab), StepOutcome::Removed);
    assert!(coordinator.registry().is_empty());
    assert!(!coordinator.is_subscribed());

    assert_eq!(coordinator.on_tab_closed(&tab), StepOutcome::Ignored);
    let unsubscribes = host.calls().iter().filter(|c| **c == Call::Unsubscribe).count();
    assert_eq!(unsubscribes, 1);
}

#[tokio::test]
async fn test_subscription_tracks_occupancy_across_tabs() {
    let (host, mut coordinator) = setup();
    let first = coordinator
        .start_workflow(Mode::Registration, PLAN, Vec::new())
        .await
        .unwrap()
        .tab_id;
    let second = coordinator
        .start_workflow(Mode::AddClasses, SEARCH, vec!["CSE 142".to_string()])
        .await
        .unwrap()
        .tab_id;
    assert_ne!(first, second);
    assert_eq!(coordinator.registry().len(), 2);

    coordinator.on_tab_closed(&first);
    assert!(coordinator.is_subscribed());

    coordinator.on_navigation_completed(&nav(&second, SEARCH)).await;
    assert!(coordinator.registry().is_empty());
    assert!(!coordinator.is_subscribed());

    let subscribes = host.calls().iter().filter(|c| **c == Call::Subscribe).count();
    assert_eq!(subscribes, 1);
}

#[tokio::test]
async fn test_with_registry_subscribes_when_preloaded() {
    let host = Arc::new(FakeHost::default());
    let mut registry = WorkflowRegistry::new();
    registry.insert(WorkflowState::new(TabId::from("t9"), Mode::Registration, Vec::new()));

    let coordinator = Coordinator::with_registry(host.clone(), SiteMap::default(), registry);
    assert!(coordinator.is_subscribed());
    assert_eq!(host.calls(), vec![Call::Subscribe]);
}
