use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const VASU_DIR: &str = ".vasu";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    Memory,
    #[default]
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    pub backend: LedgerBackend,
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            path: get_vasu_dir().join("ledger.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub assistant_name: String,
    pub currency: String,
    pub ledger: LedgerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: "openai/gpt-oss-20b".to_string(),
            temperature: None,
            assistant_name: "Vasu".to_string(),
            currency: "INR".to_string(),
            ledger: LedgerConfig::default(),
        }
    }
}

pub fn get_vasu_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(VASU_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_vasu_dir().join("config.toml")
}

pub fn ensure_vasu_dir() -> Result<PathBuf> {
    let vasu_dir = get_vasu_dir();

    if !vasu_dir.exists() {
        std::fs::create_dir_all(&vasu_dir).with_context(|| {
            format!("Failed to create vasu directory at {}", vasu_dir.display())
        })?;
    }

    Ok(vasu_dir)
}

impl Config {
    /// Loads the config file, falling back to defaults when none exists.
    pub fn load_or_default() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }
}

pub fn load_config() -> Result<Config> {
    let config_path = get_config_path();

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found. Run 'vasu onboard' to set up your configuration."
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))
}

pub fn save_config(config: &Config) -> Result<()> {
    ensure_vasu_dir()?;

    let config_path = get_config_path();
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.model, "openai/gpt-oss-20b");
        assert_eq!(config.currency, "INR");
        assert_eq!(config.assistant_name, "Vasu");
        assert_eq!(config.ledger.backend, LedgerBackend::Json);
        assert!(config.temperature.is_none());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = Config::from_toml(
            r#"
provider = "openai"
model = "gpt-4o-mini"
currency = "USD"

[ledger]
backend = "memory"
"#,
        )
        .unwrap();
        assert_eq!(config.provider.as_deref(), Some("openai"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.currency, "USD");
        assert_eq!(config.ledger.backend, LedgerBackend::Memory);
        assert!(config.ledger.path.ends_with("ledger.json"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Config::from_toml("[ledger]\nbackend = \"mongo\"\n").is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.temperature = Some(0.2);
        let text = toml::to_string_pretty(&config).unwrap();
        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.temperature, Some(0.2));
        assert_eq!(back.ledger, config.ledger);
    }
}
