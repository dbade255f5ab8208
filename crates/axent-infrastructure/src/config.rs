//! Application configuration.
//!
//! Loaded once from `config.toml` under the Axent config directory. A
//! missing file yields the defaults, which put the application in
//! local-only mode with the assistant disabled.

use std::path::Path;

use serde::{Deserialize, Serialize};

use axent_core::error::{AxentError, Result};

use crate::paths::AxentPaths;

/// Remote document backend settings. Presence alone does not enable
/// remote mode; the values must also pass the startup validity probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

/// Assistant (Gemini) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_assistant_model")]
    pub model: String,
}

fn default_assistant_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_assistant_model(),
        }
    }
}

/// Session layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identity poll interval in milliseconds (clamped to ≤ 1000 by the
    /// fallback session source).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxentConfig {
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AxentConfig {
    /// Loads the configuration from the default location.
    ///
    /// A missing file is not an error; it yields the defaults.
    pub fn load() -> Result<Self> {
        let path = AxentPaths::config_file()
            .map_err(|e| AxentError::config(e.to_string()))?;
        Self::load_from(&path)
    }

    /// Loads the configuration from an explicit path (used in tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AxentConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.remote.is_none());
        assert_eq!(config.session.poll_interval_ms, 1000);
        assert_eq!(config.assistant.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_parses_remote_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[remote]
base_url = "https://docs.example.com/v1"
api_key = "secret-key-123"

[session]
poll_interval_ms = 500
"#,
        )
        .unwrap();

        let config = AxentConfig::load_from(&path).unwrap();
        let remote = config.remote.unwrap();
        assert_eq!(remote.base_url, "https://docs.example.com/v1");
        assert_eq!(remote.api_key, "secret-key-123");
        assert_eq!(config.session.poll_interval_ms, 500);
    }

    #[test]
    fn test_invalid_toml_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[remote\nbroken").unwrap();

        let err = AxentConfig::load_from(&path).unwrap_err();
        assert!(err.is_serialization());
    }
}
