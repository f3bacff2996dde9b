use anyhow::{Context, Result};
use flowmap_render::{FlowmapConfig, Size};
use flowmap_selection::DEFAULT_WEIGHT_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "attention-flowmap";
const CONFIG_FILE: &str = "config.toml";
const REGISTRY_FILE: &str = "sources.json";

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub weight_threshold: f64,

    pub size: Size,

    /// Where the data source list lives; defaults to the user config dir.
    pub registry_path: Option<PathBuf>,

    pub http_timeout_secs: u64,

    pub flowmap: FlowmapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            weight_threshold: DEFAULT_WEIGHT_THRESHOLD,
            size: Size::default(),
            registry_path: None,
            http_timeout_secs: 30,
            flowmap: FlowmapConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read `path`, or the default config file if it exists, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.weight_threshold > 0.0 && self.weight_threshold <= 1.0) {
            return Err(format!(
                "weight_threshold must be in (0, 1] (got {})",
                self.weight_threshold
            ));
        }
        if !(self.size.width > 0.0 && self.size.height > 0.0) {
            return Err(format!(
                "size must be positive (got {}x{})",
                self.size.width, self.size.height
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err("http_timeout_secs must be at least 1".into());
        }
        self.flowmap.validate()
    }

    pub fn registry_path(&self) -> Option<PathBuf> {
        self.registry_path
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR).join(REGISTRY_FILE)))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
