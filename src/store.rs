//! Persisted class list and status log.
//!
//! Both live in one JSON file under the storage directory so the CLI can
//! add classes in one invocation and run them in another.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use regpilot_protocols::{ClassSpec, StatusUpdate};

const STATE_FILE: &str = "state.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No class at position {} (list has {len})", .index + 1)]
    IndexOutOfRange { index: usize, len: usize },
}

/// Contents of the state file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default)]
    pub class_list: Vec<String>,
    #[serde(default)]
    pub status_messages: Vec<StatusUpdate>,
}

/// File-backed store.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state; a missing file is an empty state.
    pub async fn load(&self) -> Result<StoredState, StoreError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(StoredState::default());
        }
        let content = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, state: &StoredState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!("Saved state to {:?}", self.path);
        Ok(())
    }

    pub async fn classes(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.load().await?.class_list)
    }

    /// Add classes in canonical form, skipping blanks and duplicates.
    /// Returns the entries actually added.
    pub async fn add_classes<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<String>, StoreError> {
        let mut state = self.load().await?;
        let mut added = Vec::new();
        for input in inputs {
            let Ok(spec) = ClassSpec::parse(input.as_ref()) else {
                continue;
            };
            let entry = spec.display_text();
            if !state.class_list.contains(&entry) {
                state.class_list.push(entry.clone());
                added.push(entry);
            }
        }
        if !added.is_empty() {
            self.save(&state).await?;
        }
        Ok(added)
    }

    /// Remove the class at zero-based `index`.
    pub async fn remove_class(&self, index: usize) -> Result<String, StoreError> {
        let mut state = self.load().await?;
        if index >= state.class_list.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: state.class_list.len(),
            });
        }
        let removed = state.class_list.remove(index);
        self.save(&state).await?;
        Ok(removed)
    }

    pub async fn clear_classes(&self) -> Result<(), StoreError> {
        let mut state = self.load().await?;
        state.class_list.clear();
        self.save(&state).await
    }

    pub async fn statuses(&self) -> Result<Vec<StatusUpdate>, StoreError> {
        Ok(self.load().await?.status_messages)
    }

    pub async fn append_status(&self, update: StatusUpdate) -> Result<(), StoreError> {
        let mut state = self.load().await?;
        state.status_messages.push(update);
        self.save(&state).await
    }

    pub async fn clear_statuses(&self) -> Result<(), StoreError> {
        let mut state = self.load().await?;
        state.status_messages.clear();
        self.save(&state).await
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
