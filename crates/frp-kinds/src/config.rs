//! Configuration for display and sampling
//!
//! Sources, highest priority first:
//! 1. Environment variables (`FRP_ASCII_ONLY`, `FRP_SEED`)
//! 2. The file named by `FRP_CONFIG`
//! 3. `.frp.toml`, `.frp.yaml`, `.frp.yml` or `.frp.json` in the current directory
//! 4. `~/.config/frp/config.{toml,yaml,yml,json}`
//! 5. Built-in defaults

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrpConfig {
    /// How Kinds are rendered
    #[serde(default)]
    pub display: DisplayConfig,
    /// Random draws
    #[serde(default)]
    pub sampling: SamplingConfig,
}

/// Rendering options passed explicitly to `render`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Plain ASCII output without a surrounding box
    #[serde(default)]
    pub ascii_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Fixed seed for reproducible draws
    pub seed: Option<u64>,
}

/// Configuration loader with multiple source support
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<FrpConfig> {
        let mut config = Self::load_from_files()?;
        Self::apply_environment_variables(&mut config)?;
        Ok(config)
    }

    fn load_from_files() -> Result<FrpConfig> {
        for path in Self::find_config_files() {
            if path.is_dir() {
                info!(
                    "Ignoring config directory path (expected file): {}",
                    path.display()
                );
                continue;
            }
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(&path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(FrpConfig::default())
    }

    fn find_config_files() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(config_path) = env::var("FRP_CONFIG") {
            paths.push(PathBuf::from(config_path));
        }

        if let Ok(current_dir) = env::current_dir() {
            for name in [".frp.toml", ".frp.yaml", ".frp.yml", ".frp.json"] {
                paths.push(current_dir.join(name));
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            for name in ["config.toml", "config.yaml", "config.yml", "config.json"] {
                paths.push(home_dir.join(".config/frp").join(name));
            }
        }

        paths
    }

    /// Load configuration from a specific file, choosing the format by extension
    pub fn load_from_file(path: &Path) -> Result<FrpConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            _ => {
                if let Ok(config) = toml::from_str(&content) {
                    config
                } else if let Ok(config) = serde_yaml::from_str(&content) {
                    config
                } else if let Ok(config) = serde_json::from_str(&content) {
                    config
                } else {
                    return Err(anyhow::anyhow!(
                        "Could not parse config file {} (tried TOML, YAML, JSON)",
                        path.display()
                    ));
                }
            }
        };

        Ok(config)
    }

    fn apply_environment_variables(config: &mut FrpConfig) -> Result<()> {
        if let Some(flag) = env::var("FRP_ASCII_ONLY")
            .ok()
            .and_then(|v| parse_bool(&v))
        {
            config.display.ascii_only = flag;
        }

        if let Ok(seed) = env::var("FRP_SEED") {
            let seed = seed.trim();
            config.sampling.seed = if seed.is_empty() {
                None
            } else {
                Some(
                    seed.parse()
                        .with_context(|| format!("FRP_SEED must be an unsigned integer, got {seed:?}"))?,
                )
            };
        }

        Ok(())
    }

    /// Save configuration to a file in the format implied by its extension
    pub fn save_to_file(config: &FrpConfig, path: &Path) -> Result<()> {
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::to_string(config).context("Failed to serialize config to YAML")?
            }
            Some("json") => serde_json::to_string_pretty(config)
                .context("Failed to serialize config to JSON")?,
            _ => toml::to_string_pretty(config).context("Failed to serialize config to TOML")?,
        };

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!("Configuration saved to: {}", path.display());
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_GUARD: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    #[test]
    fn defaults() {
        let config = FrpConfig::default();
        assert!(!config.display.ascii_only);
        assert_eq!(config.sampling.seed, None);
    }

    #[test]
    fn file_round_trip_in_each_format() {
        let temp_dir = TempDir::new().unwrap();
        let config = FrpConfig {
            display: DisplayConfig { ascii_only: true },
            sampling: SamplingConfig { seed: Some(42) },
        };
        for name in ["frp.toml", "frp.yaml", "frp.json"] {
            let path = temp_dir.path().join(name);
            ConfigLoader::save_to_file(&config, &path).unwrap();
            assert_eq!(ConfigLoader::load_from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn partial_files_fill_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.toml");
        fs::write(&path, "[sampling]\nseed = 3\n").unwrap();
        let loaded = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(loaded.sampling.seed, Some(3));
        assert!(!loaded.display.ascii_only);
    }

    #[test]
    fn unparseable_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn environment_overrides() {
        let _lock = ENV_GUARD.lock().unwrap();
        env::set_var("FRP_ASCII_ONLY", "yes");
        env::set_var("FRP_SEED", "99");
        let mut config = FrpConfig::default();
        ConfigLoader::apply_environment_variables(&mut config).unwrap();
        assert!(config.display.ascii_only);
        assert_eq!(config.sampling.seed, Some(99));

        env::set_var("FRP_SEED", "not-a-number");
        assert!(ConfigLoader::apply_environment_variables(&mut config).is_err());

        env::remove_var("FRP_ASCII_ONLY");
        env::remove_var("FRP_SEED");
    }

    #[test]
    fn explicit_config_path_wins() {
        let _lock = ENV_GUARD.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.yaml");
        fs::write(&path, "display:\n  ascii_only: true\n").unwrap();
        env::set_var("FRP_CONFIG", &path);
        let loaded = ConfigLoader::load();
        env::remove_var("FRP_CONFIG");
        assert!(loaded.unwrap().display.ascii_only);
    }
}
