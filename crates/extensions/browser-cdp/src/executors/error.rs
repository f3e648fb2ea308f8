//! Executor errors.

use regpilot_protocols::ExecutorKind;
use thiserror::Error;

use crate::cdp::CdpError;

#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Polling ran out before the element appeared.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The page could not be driven (session closed, script failed, ...).
    #[error("Page error: {0}")]
    Page(String),

    #[error("Unexpected page response: {0}")]
    InvalidResponse(String),

    #[error("No executor registered for {0}")]
    NotRegistered(ExecutorKind),

    #[error("Executor already registered: {0}")]
    AlreadyRegistered(ExecutorKind),
}

impl From<CdpError> for ExecutorError {
    fn from(e: CdpError) -> Self {
        ExecutorError::Page(e.to_string())
    }
}

impl From<serde_json::Error> for ExecutorError {
    fn from(e: serde_json::Error) -> Self {
        ExecutorError::InvalidResponse(e.to_string())
    }
}
