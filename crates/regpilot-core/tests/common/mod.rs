//! Fake host shared by the scenario tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use regpilot_protocols::{HostError, InjectionPayload, TabHost, TabId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Navigate(TabId, String),
    Inject(TabId, InjectionPayload),
    Subscribe,
    Unsubscribe,
}

/// Records every host call and hands out sequential tab ids.
#[derive(Default)]
pub struct RecordingHost {
    next_id: AtomicU64,
    calls: Mutex<Vec<Call>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn is_subscribed(&self) -> bool {
        self.calls()
            .iter()
            .rev()
            .find_map(|c| match c {
                Call::Subscribe => Some(true),
                Call::Unsubscribe => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl TabHost for RecordingHost {
    async fn create_tab(&self, url: &str) -> Result<TabId, HostError> {
        self.calls.lock().push(Call::Create(url.to_string()));
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TabId::new(format!("target-{}", n)))
    }

    async fn navigate(&self, tab_id: &TabId, url: &str) -> Result<(), HostError> {
        self.calls.lock().push(Call::Navigate(tab_id.clone(), url.to_string()));
        Ok(())
    }

    async fn inject(&self, tab_id: &TabId, payload: InjectionPayload) -> Result<(), HostError> {
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
