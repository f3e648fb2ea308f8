//! Configuration loader.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// `${NAME}` references substituted from the environment before parsing.
const ENV_REFERENCE: &str = r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}";

/// Reads `config.toml`, substituting `${NAME}` references first.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_str(&content)
    }

    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(&Self::expand_env_vars(content)?)?)
    }

    /// Load `path` if it exists. A missing file means all defaults.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// `~/.regpilot/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".regpilot")
            .join("config.toml")
    }

    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let pattern = Regex::new(ENV_REFERENCE).map_err(|e| ConfigError::InvalidValue {
            field: "${NAME}".to_string(),
            message: e.to_string(),
        })?;

        let mut expanded = String::with_capacity(content.len());
        let mut copied = 0;
        for caps in pattern.captures_iter(content) {
            let (Some(reference), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = std::env::var(name.as_str())
                .map_err(|_| ConfigError::UnsetVariable(name.as_str().to_string()))?;
            expanded.push_str(&content[copied..reference.start()]);
            expanded.push_str(&value);
            copied = reference.end();
        }
        expanded.push_str(&content[copied..]);
        Ok(expanded)
    }

    /// Expand a leading `~` (e.g. `~/.regpilot`).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).as_ref())
    }
}
