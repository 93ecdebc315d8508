//! Configuration management for Aula

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the IAEV Online platform API
    pub api_base_url: String,

    /// Model the AI tutor asks for explanations
    pub tutor_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost/api".to_string(),
            tutor_model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "aula").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "aula").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Directory where rendered certificates are kept by default
    pub fn certificates_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("certificates"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_api() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost/api");
    }

    #[test]
    fn default_config_uses_flash_model() {
        let config = Config::default();
        assert_eq!(config.tutor_model, "gemini-2.5-flash");
    }

    #[test]
    fn config_serializes_to_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("gemini-2.5-flash"));
    }

    #[test]
    fn config_deserializes_from_json() {
        let json = r#"{"api_base_url":"https://iaev.example/api","tutor_model":"gemini-2.5-pro"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_base_url, "https://iaev.example/api");
        assert_eq!(config.tutor_model, "gemini-2.5-pro");
    }
}
