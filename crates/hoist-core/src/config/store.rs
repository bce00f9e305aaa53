//! Config store for loading and saving hoist.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::HoistConfig;

/// Loads and saves hoist.toml.
///
/// A project-local `hoist.toml` takes precedence; otherwise the global config
/// directory (e.g. ~/.config/hoist/hoist.toml) is used.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Resolve the config location from the current directory and the
    /// platform config dir.
    pub fn from_default_location() -> anyhow::Result<Self> {
        let project_local = std::env::current_dir()?.join("hoist.toml");
        if project_local.exists() {
            return Ok(Self::from_path(project_local));
        }
        let global_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("hoist");
        Ok(Self::from_path(global_dir.join("hoist.toml")))
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> anyhow::Result<HoistConfig> {
        if !self.config_path.exists() {
            return Ok(HoistConfig::new());
        }
        let content = std::fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;
        toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })
    }

    pub fn save(&self, config: &HoistConfig) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
