use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "present";

pub const KEYS: &[&str] = &["defaults.theme", "defaults.windowed", "defaults.show_help"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windowed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_help: Option<bool>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `present config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, format!("# present configuration\n{yaml}"))?;
        Ok(())
    }

    pub fn theme(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("light")
    }

    pub fn windowed(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.windowed)
            .unwrap_or(false)
    }

    pub fn show_help(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.show_help)
            .unwrap_or(true)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.windowed" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .windowed = Some(parse_bool(key, value)?);
            }
            "defaults.show_help" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .show_help = Some(parse_bool(key, value)?);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: {}",
                KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid value for {key}: {value}. Must be 'true' or 'false'."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.theme(), "light");
        assert!(!config.windowed());
        assert!(config.show_help());
    }

    #[test]
    fn test_set_valid_values() {
        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("defaults.windowed", "yes").unwrap();
        config.set("defaults.show_help", "false").unwrap();
        assert_eq!(config.theme(), "dark");
        assert!(config.windowed());
        assert!(!config.show_help());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("defaults.windowed", "maybe").is_err());
        let err = config.set("defaults.transition", "fade").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
        assert!(config.defaults.is_none());
    }

    #[test]
    fn test_yaml_skips_unset_fields() {
        let mut config = Config::default();
        assert_eq!(serde_yaml::to_string(&config).unwrap().trim(), "{}");
        config.set("defaults.theme", "dark").unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("theme: dark"));
        assert!(!yaml.contains("windowed"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir()
            .join(format!("present-config-test-{}", std::process::id()))
            .join(FILENAME);
        let mut config = Config::default();
        config.set("defaults.show_help", "off").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.show_help());
        assert_eq!(loaded.theme(), "light");

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_load_missing_file_mentions_command() {
        let err = Config::load_from(Path::new("/no/such/dir/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("present config show"));
    }
}
