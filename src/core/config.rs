use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default assistant service endpoint when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the assistant service.
    pub base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    fn get_config_path() -> PathBuf {
        let proj_dirs =
            ProjectDirs::from("org", "merchat", "merchat").expect("Failed to determine config directory");
        proj_dirs.config_dir().join("config.toml")
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");

        let config = Config::load_from_path(&path).expect("load");
        assert_eq!(config.base_url, None);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            base_url: Some("https://assistant.example.com".to_string()),
        };
        config.save_to_path(&path).expect("save");

        let loaded = Config::load_from_path(&path).expect("load");
        assert_eq!(loaded.base_url(), "https://assistant.example.com");
    }
}
