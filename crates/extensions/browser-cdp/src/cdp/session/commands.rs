//! Page commands: navigation, history and script evaluation.

use serde_json::{Value, json};
use tracing::debug;

use super::PageSession;
use crate::cdp::error::CdpError;

impl PageSession {
    /// Start navigating to `url`. Returns once Chrome accepted the
    /// navigation; the load itself arrives as a page event.
    pub async fn navigate(&self, url: &str) -> Result<(), CdpError> {
        let reply = self.call("Page.navigate", Some(json!({"url": url}))).await?;
        if let Some(reason) = reply["errorText"].as_str() {
            return Err(CdpError::Navigation {
                url: url.to_string(),
                reason: reason.to_string(),
            });
        }
        debug!("Target {} navigating to {}", self.target_id(), url);
        Ok(())
    }

    /// Go one entry back in the tab's history. No-op on the first entry.
    pub async fn go_back(&self) -> Result<(), CdpError> {
        let history = self.call("Page.getNavigationHistory", None).await?;
        let Some(entry_id) = previous_entry(&history) else {
            debug!("Target {} has no earlier history entry", self.target_id());
            return Ok(());
        };
        self.call("Page.navigateToHistoryEntry", Some(json!({"entryId": entry_id})))
            .await?;
        Ok(())
    }

    /// Evaluate `expression` in the page, awaiting promises, and return the
    /// value by copy.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let reply = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;
        if let Some(details) = reply.get("exceptionDetails") {
            return Err(CdpError::Script(exception_text(details)));
        }
        Ok(reply["result"]["value"].clone())
    }
}

/// Id of the entry before the current one in a `Page.getNavigationHistory`
/// reply.
pub(super) fn previous_entry(history: &Value) -> Option<i64> {
    let current = usize::try_from(history["currentIndex"].as_i64()?).ok()?;
    let previous = current.checked_sub(1)?;
    history["entries"].get(previous)?["id"].as_i64()
}

/// Most specific message in a `Runtime.ExceptionDetails`.
pub(super) fn exception_text(details: &Value) -> String {
    details["exception"]["description"]
        .as_str()
        .or_else(|| details["text"].as_str())
        .unwrap_or("unknown exception")
        .to_string()
}
