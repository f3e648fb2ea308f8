//! BrowserManager: find, launch and connect to Chrome.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{BrowserError, BrowserManagerConfig};
use crate::cdp::CdpClient;

/// How long a freshly launched Chrome gets to open its debug port.
const LAUNCH_PROBES: u32 = 30;
const LAUNCH_PROBE_INTERVAL: Duration = Duration::from_millis(200);

#[cfg(target_os = "macos")]
const CHROME_CANDIDATES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(target_os = "linux")]
const CHROME_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
];

#[cfg(target_os = "windows")]
const CHROME_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CHROME_CANDIDATES: &[&str] = &[];

/// Owns the CDP connection and, if it started one, the Chrome process.
pub struct BrowserManager {
    config: BrowserManagerConfig,
    client: Mutex<Option<Arc<CdpClient>>>,
    launched: Mutex<Option<Child>>,
}

impl BrowserManager {
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: Mutex::new(None),
            launched: Mutex::new(None),
        }
    }

    /// First installed Chrome or Chromium.
    pub fn find_chrome() -> Option<PathBuf> {
        CHROME_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Flags Chrome is launched with.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.config.debug_port),
            format!("--user-data-dir={}", self.config.get_profile_dir().display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
        ];
        if self.config.headless {
            args.push("--headless=new".to_string());
        }
        args
    }

    /// Connect to Chrome, launching it first if nothing listens on the
    /// debug port. Later calls reuse the connection.
    pub async fn connect(&self) -> Result<Arc<CdpClient>, BrowserError> {
        let mut client = self.client.lock().await;
        if let Some(client) = client.as_ref() {
            return Ok(client.clone());
        }

        if self.listening().await {
            info!("Using Chrome already listening on port {}", self.config.debug_port);
        } else {
            let child = self.launch().await?;
            *self.launched.lock().await = Some(child);
            self.wait_until_listening().await?;
        }

        let connected = Arc::new(CdpClient::connect(&self.config.endpoint()).await?);
        *client = Some(connected.clone());
        info!("Connected to Chrome at {}", self.config.endpoint());
        Ok(connected)
    }

    /// Drop the connection. A Chrome we launched keeps running so the user
    /// stays logged in and can inspect the final page.
    pub async fn close(&self) {
        if self.client.lock().await.take().is_some() {
            debug!("Browser connection closed");
        }
        if let Some(child) = self.launched.lock().await.take() {
            info!("Leaving Chrome (pid {:?}) running", child.id());
        }
    }

    async fn listening(&self) -> bool {
        reqwest::get(format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok()
    }

    async fn launch(&self) -> Result<Child, BrowserError> {
        let path = Self::find_chrome().ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = self.config.get_profile_dir();
        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Could not create profile directory {}: {}", profile_dir.display(), e);
        }

        info!("Launching {} with profile {}", path.display(), profile_dir.display());
        Command::new(&path)
            .args(self.launch_args())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| BrowserError::Launch {
                path,
                reason: e.to_string(),
            })
    }

    async fn wait_until_listening(&self) -> Result<(), BrowserError> {
        for _ in 0..LAUNCH_PROBES {
            tokio::time::sleep(LAUNCH_PROBE_INTERVAL).await;
            if self.listening().await {
                return Ok(());
            }
        }
        Err(BrowserError::LaunchTimeout {
            port: self.config.debug_port,
            waited: LAUNCH_PROBE_INTERVAL * LAUNCH_PROBES,
        })
    }
}
