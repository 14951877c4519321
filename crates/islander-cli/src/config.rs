//! Configuration file management for islander.
//!
//! Provides a TOML-based config file at `~/.config/islander/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use islander_core::config::ClientConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub planner: PlannerSection,
    #[serde(default)]
    pub geocoder: GeocoderSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlannerSection {
    /// Base URL of the planner backend (without `/api/plan`).
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeocoderSection {
    pub url: String,
    /// Text appended to every search query.
    pub region_hint: String,
}

impl Default for GeocoderSection {
    fn default() -> Self {
        Self {
            url: ClientConfig::DEFAULT_GEOCODER_URL.to_string(),
            region_hint: ClientConfig::DEFAULT_REGION_HINT.to_string(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the islander config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/islander` or
/// `~/.config/islander`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("islander");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("islander")
}

/// Return the path to the islander config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Resolve the client configuration using the chain:
/// CLI flag > env var > config file > default.
///
/// - Planner URL: `cli_planner_url` > `ISLANDER_PLANNER_URL` > `planner.url` > default
/// - Geocoder URL: `ISLANDER_GEOCODER_URL` > `geocoder.url` > default
/// - Region hint: `geocoder.region_hint` > default
pub fn resolve(cli_planner_url: Option<&str>) -> ClientConfig {
    resolve_with(cli_planner_url, load_config().ok())
}

fn resolve_with(cli_planner_url: Option<&str>, file_config: Option<ConfigFile>) -> ClientConfig {
    let planner_url = if let Some(url) = cli_planner_url {
        url.to_string()
    } else if let Ok(url) = std::env::var("ISLANDER_PLANNER_URL") {
        url
    } else if let Some(ref cfg) = file_config {
        cfg.planner.url.clone()
    } else {
        ClientConfig::DEFAULT_PLANNER_URL.to_string()
    };

    let geocoder_url = if let Ok(url) = std::env::var("ISLANDER_GEOCODER_URL") {
        url
    } else if let Some(ref cfg) = file_config {
        cfg.geocoder.url.clone()
    } else {
        ClientConfig::DEFAULT_GEOCODER_URL.to_string()
    };

    let mut config = ClientConfig::new(planner_url, geocoder_url);
    if let Some(cfg) = file_config {
        config.region_hint = cfg.geocoder.region_hint;
    }
    config
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    fn sample() -> ConfigFile {
        ConfigFile {
            planner: PlannerSection {
                url: "http://10.58.72.42".to_string(),
            },
            geocoder: GeocoderSection {
                url: "http://geo.local/search".to_string(),
                region_hint: "Andaman Islands".to_string(),
            },
        }
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("islander").join("config.toml");

        save_config_to(&sample(), &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.planner.url, "http://10.58.72.42");
        assert_eq!(loaded.geocoder.url, "http://geo.local/search");
        assert_eq!(loaded.geocoder.region_hint, "Andaman Islands");
    }

    #[test]
    fn geocoder_section_is_optional() {
        let cfg: ConfigFile = toml::from_str("[planner]\nurl = \"http://p\"\n").unwrap();
        assert_eq!(cfg.geocoder.url, ClientConfig::DEFAULT_GEOCODER_URL);
        assert_eq!(cfg.geocoder.region_hint, "Andaman");
    }

    #[test]
    fn load_missing_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = load_config_from(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn cli_flag_overrides_all() {
        let _lock = lock_env();
        unsafe { std::env::set_var("ISLANDER_PLANNER_URL", "http://env") };

        let config = resolve_with(Some("http://cli"), Some(sample()));
        assert_eq!(config.planner_url, "http://cli");

        unsafe { std::env::remove_var("ISLANDER_PLANNER_URL") };
    }

    #[test]
    fn env_var_overrides_config_file() {
        let _lock = lock_env();
        unsafe { std::env::set_var("ISLANDER_PLANNER_URL", "http://env") };
        unsafe { std::env::set_var("ISLANDER_GEOCODER_URL", "http://env-geo/search") };

        let config = resolve_with(None, Some(sample()));
        assert_eq!(config.planner_url, "http://env");
        assert_eq!(config.geocoder_url, "http://env-geo/search");
        assert_eq!(config.region_hint, "Andaman Islands");

        unsafe { std::env::remove_var("ISLANDER_PLANNER_URL") };
        unsafe { std::env::remove_var("ISLANDER_GEOCODER_URL") };
    }

    #[test]
    fn config_file_overrides_defaults() {
        let _lock = lock_env();
        unsafe { std::env::remove_var("ISLANDER_PLANNER_URL") };
        unsafe { std::env::remove_var("ISLANDER_GEOCODER_URL") };

        let config = resolve_with(None, Some(sample()));
        assert_eq!(config.planner_url, "http://10.58.72.42");
        assert_eq!(config.geocoder_url, "http://geo.local/search");
    }

    #[test]
    fn defaults_when_nothing_set() {
        let _lock = lock_env();
        unsafe { std::env::remove_var("ISLANDER_PLANNER_URL") };
        unsafe { std::env::remove_var("ISLANDER_GEOCODER_URL") };

        let config = resolve_with(None, None);
        assert_eq!(config.planner_url, ClientConfig::DEFAULT_PLANNER_URL);
        assert_eq!(config.geocoder_url, ClientConfig::DEFAULT_GEOCODER_URL);
        assert_eq!(config.region_hint, ClientConfig::DEFAULT_REGION_HINT);
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("islander/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
