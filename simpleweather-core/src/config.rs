use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::Units;

pub const DEFAULT_LANGUAGE: &str = "ru";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Endpoints and HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,

    /// Remember resolved coordinates per display identity instead of
    /// geocoding again before every weather or forecast fetch.
    pub cache_places: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            timeout_secs: 10,
            user_agent: "SimpleWeather/1.0".to_string(),
            cache_places: true,
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub refresh_interval_secs: u64,
    pub suggestion_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 600,
            suggestion_debounce_ms: 500,
        }
    }
}

impl TimingConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }
}

/// Persisted user settings.
///
/// Example TOML:
/// ```toml
/// favorites = ["Paris, France"]
/// last_city = "Paris, France"
/// language = "en"
/// units = "fahrenheit"
///
/// [network]
/// timeout_secs = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub favorites: Vec<String>,
    pub last_city: Option<String>,
    pub language: String,
    pub units: Units,
    pub network: NetworkConfig,
    pub timing: TimingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            favorites: Vec::new(),
            last_city: None,
            language: DEFAULT_LANGUAGE.to_string(),
            units: Units::default(),
            network: NetworkConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config directory, or defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "WeatherApp", "SimpleWeather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Where the orchestrator writes settings after a user-visible change.
pub trait SettingsStore: Send {
    fn save(&mut self, config: &Config) -> Result<()>;
}

/// TOML file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Config::config_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn save(&mut self, config: &Config) -> Result<()> {
        config.save_to(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.language, "ru");
        assert_eq!(cfg.units, Units::Celsius);
        assert_eq!(cfg.timing.refresh_interval(), Duration::from_secs(600));
        assert_eq!(cfg.timing.suggestion_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "language = \"en\"\nunits = \"fahrenheit\"\n[network]\ntimeout_secs = 3\n",
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.units, Units::Fahrenheit);
        assert_eq!(cfg.network.timeout_secs, 3);
        assert_eq!(cfg.network.geocoding_url, DEFAULT_GEOCODING_URL);
        assert!(cfg.network.cache_places);
        assert!(cfg.favorites.is_empty());
    }

    #[test]
    fn file_store_round_trip_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut store = FileStore::new(&path);

        let cfg = Config {
            favorites: vec!["Paris, France".into(), "Oslo, Norway".into()],
            last_city: Some("Oslo, Norway".into()),
            ..Config::default()
        };
        store.save(&cfg).unwrap();

        assert_eq!(Config::load_from(store.path()).unwrap(), cfg);
    }

    #[test]
    fn unknown_units_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = \"kelvin\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
