//! CDP error types.

use std::time::Duration;

use thiserror::Error;

/// Failures talking to Chrome.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Nothing answered on the DevTools HTTP endpoint.
    #[error("No DevTools endpoint at {endpoint} ({reason}); is Chrome running with --remote-debugging-port?")]
    EndpointUnreachable { endpoint: String, reason: String },

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Chrome rejected a command.
    #[error("{method} failed: {message} (code {code})")]
    Command {
        method: String,
        code: i64,
        message: String,
    },

    #[error("{method} got no reply within {timeout:?}")]
    NoReply { method: String, timeout: Duration },

    /// The socket closed while a command was in flight.
    #[error("Browser connection closed")]
    ConnectionClosed,

    #[error("Malformed CDP message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("DevTools HTTP request failed: {0}")]
    Http(String),

    #[error("Could not open {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// A page script threw.
    #[error("Page script failed: {0}")]
    Script(String),

    #[error("{method} reply is missing {field}")]
    MissingField {
        method: &'static str,
        field: &'static str,
    },
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        let err = CdpError::Command {
            method: "Target.closeTarget".to_string(),
            code: -32000,
            message: "No target with given id".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Target.closeTarget failed: No target with given id (code -32000)"
        );
    }

    #[test]
    fn test_no_reply_display() {
        let err = CdpError::NoReply {
            method: "Page.navigate".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "Page.navigate got no reply within 30s");
    }
}
