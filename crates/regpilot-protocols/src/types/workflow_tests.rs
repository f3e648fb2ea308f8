use super::*;

#[test]
fn test_tab_id_display_and_from() {
    let id = TabId::from("A1B2");
    assert_eq!(id.to_string(), "A1B2");
    assert_eq!(id, TabId::new(String::from("A1B2")));
}

#[test]
fn test_tab_id_serializes_transparently() {
    let json = serde_json::to_string(&TabId::from("target-9")).unwrap();
    assert_eq!(json, "\"target-9\"");
}

#[test]
fn test_mode_capabilities() {
    assert!(!Mode::Registration.carries_classes());
    assert!(Mode::AddClasses.carries_classes());
    assert!(Mode::AddClassesAndRegister.carries_classes());

    assert!(!Mode::Registration.awaits_completion_signal());
    assert!(!Mode::AddClasses.awaits_completion_signal());
    assert!(Mode::AddClassesAndRegister.awaits_completion_signal());
}

#[test]
fn test_mode_serialization() {
    let json = serde_json::to_string(&Mode::AddClassesAndRegister).unwrap();
    assert_eq!(json, "\"add_classes_and_register\"");
    let parsed: Mode = serde_json::from_str("\"registration\"").unwrap();
    assert_eq!(parsed, Mode::Registration);
}

#[test]
fn test_payload_signals_completion_only_for_combined_class_search() {
    let combined = InjectionPayload::new(Mode::AddClassesAndRegister, ExecutorKind::ClassSearch);
    assert!(combined.signals_completion());

    let add_only = InjectionPayload::new(Mode::AddClasses, ExecutorKind::ClassSearch);
    assert!(!add_only.signals_completion());

    let handoff = InjectionPayload::new(Mode::AddClassesAndRegister, ExecutorKind::RegisterHandoff);
    assert!(!handoff.signals_completion());
}

#[test]
fn test_payload_round_trips_through_json() {
    let payload = InjectionPayload::new(Mode::AddClasses, ExecutorKind::ClassSearch)
        .with_classes(vec!["MATH 124".to_string(), "CSE 373 A AA".to_string()]);
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["executor"], "class_search");
    assert_eq!(json["classes"][1], "CSE 373 A AA");

    let back: InjectionPayload = serde_json::from_value(json).unwrap();
    assert_eq!(back, payload);
}

#[test]
fn test_payload_omits_empty_classes() {
    let payload = InjectionPayload::new(Mode::Registration, ExecutorKind::ImportAndSubmit);
    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("classes").is_none());
}

#[test]
fn test_navigation_event_completed_url() {
    let done = NavigationEvent::completed("t1", "https://myplan.uw.edu/plan/");
    assert_eq!(done.completed_url(), Some("https://myplan.uw.edu/plan/"));

    let loading = NavigationEvent {
        tab_id: TabId::from("t1"),
        status: LoadStatus::Loading,
        url: Some("https://myplan.uw.edu/".to_string()),
    };
    assert_eq!(loading.completed_url(), None);

    let no_url = NavigationEvent {
        tab_id: TabId::from("t1"),
        status: LoadStatus::Complete,
        url: None,
    };
    assert_eq!(no_url.completed_url(), None);
}

#[test]
fn test_host_event_tab_id() {
    let event = HostEvent::CompletionSignal(TabId::from("t3"));
    assert_eq!(event.tab_id().as_str(), "t3");
    let event = HostEvent::NavigationCompleted(NavigationEvent::completed("t4", "about:blank"));
    assert_eq!(event.tab_id().as_str(), "t4");
}
