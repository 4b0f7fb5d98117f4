use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub view: ViewConfig,
    pub browser: BrowserConfig,
    pub ui: UiConfig,
}

/// Default view state, written back on clean exit from interactive mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Granularity opened on launch: "day", "week", or "month"
    pub default_granularity: String,
    /// Start in repeated-visits mode (one record per physical visit)
    pub repeated_visits: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_granularity: "week".to_string(),
            repeated_visits: false,
        }
    }
}

/// History backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// "auto" probes installed browsers; or a concrete backend name
    pub backend: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            backend: "auto".to_string(),
        }
    }
}

/// Rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// ANSI highlighting of matched search terms
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.view.default_granularity, "week");
        assert!(!config.view.repeated_visits);
        assert_eq!(config.browser.backend, "auto");
        assert!(config.ui.color);
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml).unwrap();

        assert_eq!(
            config.view.default_granularity,
            deserialized.view.default_granularity
        );
        assert_eq!(config.browser.backend, deserialized.browser.backend);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[view]\nrepeated_visits = true\n").unwrap();
        assert!(config.view.repeated_visits);
        assert_eq!(config.view.default_granularity, "week");
        assert_eq!(config.browser.backend, "auto");
    }
}
