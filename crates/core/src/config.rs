//! Application Configuration
//!
//! Persistent defaults for the antdroid CLI, stored as TOML next to the
//! user's other tool configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default project directory when none is given on the command line
    pub project_dir: Option<PathBuf>,

    /// Build in release mode by default
    pub release_by_default: bool,

    /// Extra arguments appended to every Ant invocation
    pub extra_ant_args: Vec<String>,

    /// Emit verbose tool output
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_dir: None,
            release_by_default: false,
            extra_ant_args: Vec::new(),
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load an existing configuration or create and persist the default one
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {:?}", path);
            Self::load(path)
        } else {
            info!("Creating default configuration at {:?}", path);
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }
}

/// Get the configuration directory
pub fn config_dir() -> PathBuf {
    #[cfg(windows)]
    {
        std::env::var("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("antdroid")
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".config")
            .join("antdroid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.release_by_default = true;
        config.extra_ant_args = vec!["-quiet".to_string()];
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert!(loaded.release_by_default);
        assert_eq!(loaded.extra_ant_args, vec!["-quiet".to_string()]);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_or_create(&path).unwrap();
        assert!(!config.release_by_default);
        assert!(path.exists());
    }
}
