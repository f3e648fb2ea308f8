//! Browser, automation, storage and logging configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// How the Chrome instance is reached or launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default)]
    pub headless: bool,

    /// Persistent profile directory, keeps the planning site login.
    #[serde(default = "default_profile_dir")]
    pub profile_dir: String,
}

fn default_debug_port() -> u16 {
    9222
}

fn default_profile_dir() -> String {
    "~/.regpilot/browser-profile".to_string()
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: false,
            profile_dir: default_profile_dir(),
        }
    }
}

/// Pacing of page automation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationConfig {
    /// Attempts made while waiting for an element to appear.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Base pause between dependent page steps; longer waits are multiples.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
}

fn default_retry_attempts() -> u32 {
    60
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_step_delay_ms() -> u64 {
    1000
}

impl AutomationConfig {
    /// Worst-case time spent polling for one element.
    pub fn polling_budget_ms(&self) -> u64 {
        u64::from(self.retry_attempts).saturating_mul(self.retry_delay_ms)
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

/// Where the class list, status log and log files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    "~/.regpilot".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write a daily-rotated log file under `<storage>/logs`.
    #[serde(default = "default_true")]
    pub file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: true,
        }
    }
}
