//! CDP wire messages.
//!
//! Outgoing commands are [`CdpRequest`]s. Everything Chrome sends back is
//! decoded as a [`RawMessage`] and split into either a reply to a pending
//! command or a [`CdpEvent`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A command sent to the browser or to one flattened session.
#[derive(Debug, Serialize)]
pub struct CdpRequest<'a> {
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Error object of a failed command.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandFault {
    pub code: i64,
    pub message: String,
}

/// Anything read off the socket, before classification.
#[derive(Debug, Deserialize)]
pub(crate) struct RawMessage {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<CommandFault>,
    method: Option<String>,
    #[serde(default)]
    params: Value,
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// A classified incoming message.
#[derive(Debug)]
pub(crate) enum Incoming {
    Reply {
        id: u64,
        outcome: Result<Value, CommandFault>,
    },
    Event(CdpEvent),
    /// Neither a reply nor an event; dropped.
    Unknown,
}

impl RawMessage {
    pub(crate) fn classify(self) -> Incoming {
        match (self.id, self.method) {
            (Some(id), _) => Incoming::Reply {
                id,
                outcome: match self.error {
                    Some(fault) => Err(fault),
                    None => Ok(self.result.unwrap_or(Value::Null)),
                },
            },
            (None, Some(method)) => Incoming::Event(CdpEvent {
                method,
                params: self.params,
                session_id: self.session_id,
            }),
            (None, None) => Incoming::Unknown,
        }
    }
}

/// An event pushed by Chrome. Page events carry the session they belong
/// to; target lifecycle events arrive on the browser session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CdpEvent {
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

impl CdpEvent {
    pub fn is(&self, method: &str) -> bool {
        self.method == method
    }

    /// String parameter `key`.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.as_str()
    }
}

/// Target description returned by `/json/new`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTarget {
    pub id: String,
    #[serde(default)]
    pub url: String,
}

/// The `/json/version` document. Chrome spells these keys inconsistently.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub browser_ws_url: String,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
