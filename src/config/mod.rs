use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = ".rugplay";
const CONFIG_FILE: &str = "config.json";

/// Sentinel meaning "no session cookie configured yet".
pub const UNSET_COOKIE: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub cookie: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cookie: UNSET_COOKIE.to_string(),
        }
    }
}

impl Config {
    /// Load the config from its fixed path under the home directory.
    ///
    /// Never fails: a missing or unreadable file yields the default config,
    /// which is written back so the next run finds a well-formed file. The
    /// failure is reported but startup continues.
    pub fn load() -> Self {
        Self::load_or_init(&Self::config_path())
    }

    fn load_or_init(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                println!(
                    "{} could not read config ({:#}), starting with defaults",
                    "!".yellow(),
                    e
                );
                let config = Self::default();
                if let Err(e) = config.save_to(path) {
                    println!("{} could not write default config: {:#}", "!".yellow(), e);
                }
                config
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn is_authenticated(&self) -> bool {
        self.cookie != UNSET_COOKIE
    }

    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(CONFIG_FILE)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        serde_json::from_str(&content).context("Failed to parse config file")
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            // Best effort: a failure here surfaces on the write below anyway.
            let _ = fs::create_dir_all(parent);
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips_cookie() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            cookie: "abc123".to_string(),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cookie, "abc123");
    }

    #[test]
    fn valid_file_returns_cookie_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "cookie": "session=xyz; other=1" }"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cookie, "session=xyz; other=1");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json at all").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn corrupt_file_yields_sentinel_and_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ definitely not json").unwrap();

        let config = Config::load_or_init(&path);
        assert_eq!(config.cookie, UNSET_COOKIE);

        // The broken file was replaced with a well-formed default.
        let on_disk = Config::load_from(&path).unwrap();
        assert_eq!(on_disk.cookie, UNSET_COOKIE);
    }

    #[test]
    fn missing_file_yields_sentinel_and_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh").join("config.json");

        let config = Config::load_or_init(&path);
        assert_eq!(config.cookie, UNSET_COOKIE);
        assert_eq!(Config::load_from(&path).unwrap().cookie, UNSET_COOKIE);
    }

    #[test]
    fn valid_file_survives_load_or_init_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "cookie": "abc123" }"#).unwrap();

        let config = Config::load_or_init(&path);
        assert_eq!(config.cookie, "abc123");
    }

    #[test]
    fn default_config_uses_the_sentinel() {
        let config = Config::default();
        assert_eq!(config.cookie, UNSET_COOKIE);
        assert!(!config.is_authenticated());
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deeper").join("config.json");
        Config::default().save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().cookie, UNSET_COOKIE);
    }
}
