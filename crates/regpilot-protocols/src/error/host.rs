//! Tab host errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Tab creation failed: {0}")]
    TabCreation(String),

    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Injection failed: {0}")]
    Injection(String),

    #[error("Host not connected")]
    NotConnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_creation_display() {
        let err = HostError::TabCreation("refused".to_string());
        assert_eq!(err.to_string(), "Tab creation failed: refused");
    }

    #[test]
    fn test_injection_display() {
        let err = HostError::Injection("tab 7 has no session".to_string());
        assert!(err.to_string().contains("tab 7"));
        assert!(err.to_string().starts_with("Injection failed"));
    }

    #[test]
    fn test_not_connected_display() {
        assert_eq!(HostError::NotConnected.to_string(), "Host not connected");
    }
}
