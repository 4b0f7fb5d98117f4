use super::Config;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Configuration file loader
pub struct ConfigLoader {
    config_path: PathBuf,
    config: Config,
}

impl ConfigLoader {
    /// Create a new config loader with default path and default config
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            config: Config::default(),
        }
    }

    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        let config = if config_path.exists() {
            info!("Loading config from {:?}", config_path);
            let contents = fs::read_to_string(&config_path)?;

            match toml::from_str::<Config>(&contents) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to parse config: {}, using defaults", e);
                    Config::default()
                }
            }
        } else {
            info!(
                "No config file found, creating default at {:?}",
                config_path
            );
            let default = Config::default();

            if let Err(e) = Self::save_config(&config_path, &default) {
                warn!("Failed to create default config: {}", e);
            }

            default
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Get current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Update configuration and save to disk
    pub fn update(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Self::save_config(&self.config_path, &self.config)
    }

    /// Get config file path
    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Default configuration file path
    fn default_config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));

        config_dir.join("hindsight").join("config.toml")
    }

    /// Save configuration to specified path
    fn save_config(path: &PathBuf, config: &Config) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(config)?;
        fs::write(path, toml)?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
