//! Unified path management for Axent storage files.
//!
//! All cache and configuration files live under the platform config
//! directory so every storage component resolves paths the same way.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find platform config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for Axent.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/axent/             # Config directory
/// ├── config.toml              # Application configuration
/// ├── snapshot.json            # Full AppState snapshot (cache key A)
/// ├── identity.json            # Reduced identity record (cache key B)
/// └── preferences.json         # Dark-mode preference (cache key C)
/// ```
pub struct AxentPaths;

impl AxentPaths {
    /// Returns the Axent configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("axent"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the snapshot document (cache key A).
    pub fn snapshot_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("snapshot.json"))
    }

    /// Returns the path to the identity record (cache key B).
    pub fn identity_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("identity.json"))
    }

    /// Returns the path to the preferences document (cache key C).
    pub fn preferences_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("preferences.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_the_config_dir() {
        let dir = AxentPaths::config_dir().unwrap();
        assert!(AxentPaths::snapshot_file().unwrap().starts_with(&dir));
        assert!(AxentPaths::identity_file().unwrap().starts_with(&dir));
        assert!(AxentPaths::preferences_file().unwrap().starts_with(&dir));
        assert!(AxentPaths::config_file().unwrap().starts_with(&dir));
    }
}
