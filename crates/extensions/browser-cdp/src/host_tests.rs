use serde_json::json;

use super::*;

fn event(value: serde_json::Value) -> CdpEvent {
    serde_json::from_value(value).unwrap()
}

fn frame_navigated(url: &str, parent: Option<&str>) -> CdpEvent {
    let mut frame = json!({"id": "F1", "url": url});
    if let Some(parent) = parent {
        frame["parentId"] = json!(parent);
    }
    event(json!({"method": "Page.frameNavigated", "params": {"frame": frame}, "sessionId": "S"}))
}

fn load_fired() -> CdpEvent {
    event(json!({"method": "Page.loadEventFired", "params": {"timestamp": 1.0}, "sessionId": "S"}))
}

#[test]
fn test_load_event_carries_main_frame_url() {
    let mut translator = PageEventTranslator::new(TabId::from("T1"));
    assert_eq!(translator.translate(&frame_navigated("https://myplan.uw.edu/plan/", None)), None);
    assert_eq!(
        translator.translate(&load_fired()),
        Some(HostEvent::NavigationCompleted(NavigationEvent::completed(
            "T1",
            "https://myplan.uw.edu/plan/"
        )))
    );
}

#[test]
fn test_subframe_navigation_ignored() {
    let mut translator = PageEventTranslator::new(TabId::from("T1"));
    translator.translate(&frame_navigated("https://register.uw.edu/", None));
    translator.translate(&frame_navigated("https://ads.example.com/frame", Some("F0")));
    let Some(HostEvent::NavigationCompleted(nav)) = translator.translate(&load_fired()) else {
        panic!("expected navigation event");
    };
    assert_eq!(nav.url.as_deref(), Some("https://register.uw.edu/"));
}

#[test]
fn test_load_before_any_frame_is_ignored() {
    let mut translator = PageEventTranslator::new(TabId::from("T1"));
    assert_eq!(translator.translate(&load_fired()), None);
}

#[test]
fn test_fragment_navigation_completes_immediately() {
    let mut translator = PageEventTranslator::new(TabId::from("T1"));
    translator.translate(&frame_navigated("https://myplan.uw.edu/plan/", None));
    let within = event(json!({
        "method": "Page.navigatedWithinDocument",
        "params": {"frameId": "F1", "url": "https://myplan.uw.edu/plan/#/wi26"}
    }));
    let Some(HostEvent::NavigationCompleted(nav)) = translator.translate(&within) else {
        panic!("expected navigation event");
    };
    assert_eq!(nav.url.as_deref(), Some("https://myplan.uw.edu/plan/#/wi26"));
    // A later load reports the same URL.
    assert!(translator.translate(&load_fired()).is_some());
}

fn within_document(frame_id: &str, url: &str) -> CdpEvent {
    event(json!({
        "method": "Page.navigatedWithinDocument",
        "params": {"frameId": frame_id, "url": url}
    }))
}

#[test]
fn test_subframe_fragment_navigation_ignored() {
    let mut translator = PageEventTranslator::new(TabId::from("T1"));
    assert_eq!(
        translator.translate(&within_document("child-frame", "https://ads.example.com/#x")),
        None
    );

    translator.translate(&frame_navigated("https://register.uw.edu/", None));
    assert_eq!(
        translator.translate(&within_document("child-frame", "https://ads.example.com/#y")),
        None
    );
    let Some(HostEvent::NavigationCompleted(nav)) = translator.translate(&load_fired()) else {
        panic!("expected navigation event");
    };
    assert_eq!(nav.url.as_deref(), Some("https://register.uw.edu/"));
}

#[test]
fn test_fragment_navigation_before_frame_uses_target_id() {
    let mut translator = PageEventTranslator::new(TabId::from("T1"));
    let Some(HostEvent::NavigationCompleted(nav)) =
        translator.translate(&within_document("T1", "https://myplan.uw.edu/plan/#/wi26"))
    else {
        panic!("expected navigation event");
    };
    assert_eq!(nav.url.as_deref(), Some("https://myplan.uw.edu/plan/#/wi26"));
}

#[test]
fn test_unrelated_events_ignored() {
    let mut translator = PageEventTranslator::new(TabId::from("T1"));
    let other = event(json!({"method": "Runtime.consoleAPICalled", "params": {"type": "log"}}));
    assert_eq!(translator.translate(&other), None);
}

#[test]
fn test_closed_target() {
    let destroyed = event(json!({"method": "Target.targetDestroyed", "params": {"targetId": "T1"}}));
    assert_eq!(closed_target(&destroyed), Some("T1"));

    let detached = event(json!({
        "method": "Target.detachedFromTarget",
        "params": {"sessionId": "S1", "targetId": "T2"}
    }));
    assert_eq!(closed_target(&detached), Some("T2"));

    let created = event(json!({"method": "Target.targetCreated", "params": {"targetInfo": {}}}));
    assert_eq!(closed_target(&created), None);
}
