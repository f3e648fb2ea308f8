//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `${NAME}` appears in the file but `NAME` is not set.
    #[error("Config references ${{{0}}}, which is not set")]
    UnsetVariable(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/etc/regpilot.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "Cannot read config file /etc/regpilot.toml: denied"
        );
    }

    #[test]
    fn test_unset_variable_display() {
        let err = ConfigError::UnsetVariable("REGPILOT_PROFILE".to_string());
        assert_eq!(
            err.to_string(),
            "Config references ${REGPILOT_PROFILE}, which is not set"
        );
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "browser.debug_port".to_string(),
            message: "Port cannot be 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for browser.debug_port: Port cannot be 0"
        );
    }
}
