use serde_json::json;

use super::*;

fn event(value: Value) -> CdpEvent {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_events_routed_by_session() {
    let routes = Routes::default();
    let mut browser = routes.open(BROWSER_SESSION);
    let mut page = routes.open("S1");

    routes.deliver(event(json!({"method": "Target.targetDestroyed", "params": {"targetId": "T"}})));
    routes.deliver(event(json!({"method": "Page.loadEventFired", "params": {}, "sessionId": "S1"})));

    assert!(browser.try_recv().unwrap().is("Target.targetDestroyed"));
    assert!(page.try_recv().unwrap().is("Page.loadEventFired"));
    assert!(browser.try_recv().is_err());
}

#[test]
fn test_closed_route_ends_stream() {
    let routes = Routes::default();
    let mut page = routes.open("S1");
    routes.close("S1");

    routes.deliver(event(json!({"method": "Page.loadEventFired", "sessionId": "S1"})));
    assert!(matches!(
        page.try_recv(),
        Err(mpsc::error::TryRecvError::Disconnected)
    ));
}
