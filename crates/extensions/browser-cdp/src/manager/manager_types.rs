//! Browser manager errors and configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cdp::CdpError;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("No Chrome or Chromium executable found; install Google Chrome or start it with --remote-debugging-port")]
    ChromeNotFound,

    #[error("Failed to launch {}: {reason}", path.display())]
    Launch { path: PathBuf, reason: String },

    #[error("Chrome did not open debug port {port} within {waited:?}")]
    LaunchTimeout { port: u16, waited: Duration },

    #[error(transparent)]
    Cdp(#[from] CdpError),
}

/// Where Chrome listens and which profile it runs with.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    pub debug_port: u16,
    /// Persistent profile so site logins survive between runs.
    pub profile_dir: Option<PathBuf>,
    pub headless: bool,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            profile_dir: None,
            headless: false,
        }
    }
}

impl BrowserManagerConfig {
    /// Profile directory, `~/.regpilot/browser-profile` when unset.
    pub fn get_profile_dir(&self) -> PathBuf {
        match &self.profile_dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".regpilot/browser-profile"),
        }
    }

    /// DevTools HTTP endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }
}
