use anyhow::{Context, Result};
use cyclefit::models::{CycleProfile, UserFitnessPreferences};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the config directory, mainly for tests.
pub const CONFIG_DIR_ENV: &str = "CYCLEFIT_CONFIG_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cycle: CycleProfile,

    #[serde(default)]
    pub fitness: UserFitnessPreferences,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default = "default_true")]
    pub start_tomorrow: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file; the built-in catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_date_format() -> String {
    "%a %d %b".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            color: default_true(),
            start_tomorrow: default_true(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.cyclefit/)
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".cyclefit"))
    }

    /// Get config file path (~/.cyclefit/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolve an explicit `--config` path or fall back to the default file.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_file(),
        }
    }

    /// Load configuration from file
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_file = Self::resolve_path(explicit)?;

        if !config_file.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, explicit: Option<&Path>) -> Result<()> {
        let config_file = Self::resolve_path(explicit)?;
        if let Some(dir) = config_file.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_file, contents).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use cyclefit::models::{CycleMode, Injury};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cycle.cycle_length, 28);
        assert_eq!(config.fitness.workouts_per_week, 3);
        assert!(config.ui.color);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.cycle.last_cycle_start = NaiveDate::from_ymd_opt(2026, 2, 3);
        config.cycle.mode = CycleMode::Irregular;
        config.fitness.rest_days = vec![Weekday::Sun];
        config.fitness.injuries = vec![Injury::new("knee")];

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.cycle, config.cycle);
        assert_eq!(deserialized.fitness, config.fitness);
        assert_eq!(config.ui.date_format, deserialized.ui.date_format);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cycle]
            cycle_length = 31
            last_cycle_start = "2026-01-10"

            [fitness]
            workouts_per_week = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.cycle.cycle_length, 31);
        assert_eq!(config.cycle.period_length, 5);
        assert_eq!(config.fitness.workouts_per_week, 5);
        assert!(config.ui.start_tomorrow);
    }

    #[test]
    fn test_save_and_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.fitness.workouts_per_week = 4;
        config.save(Some(&path)).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.fitness.workouts_per_week, 4);
    }
}
