//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/coverage-map/config.toml

pub mod defaults;

use crate::constants::api::PHOTON_URL;
use crate::coverage::{RadiusMode, ResolverConfig};
use crate::error::{Error, Result};
use crate::viewport::FitPolicy;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Coverage thresholds
    #[serde(default)]
    pub coverage: CoverageConfig,

    /// Auto-fit settings
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Provider table
    #[serde(default)]
    pub data: DataConfig,

    /// Address search
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// CLI output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Coverage thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Coverage radius in miles
    #[serde(default = "default_fixed_radius")]
    pub fixed_radius_miles: f64,

    /// Outside cap in miles
    #[serde(default = "default_max_outside")]
    pub max_outside_miles: f64,

    /// Most suggestions outside coverage
    #[serde(default = "default_outside_limit")]
    pub outside_limit: usize,

    /// "fixed" or "per_record"
    #[serde(default = "default_radius_mode")]
    pub radius_mode: String,
}

/// Auto-fit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_excluded_regions")]
    pub excluded_regions: Vec<String>,

    #[serde(default = "default_padding")]
    pub padding: f64,
}

/// Provider table settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file with provider rows
    #[serde(default = "default_data_path")]
    pub path: String,
}

/// Geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Photon-compatible search endpoint
    #[serde(default = "default_geocoder_url")]
    pub url: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// CLI output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_fixed_radius() -> f64 {
    DEFAULT_FIXED_RADIUS_MILES
}
fn default_max_outside() -> f64 {
    DEFAULT_MAX_OUTSIDE_MILES
}
fn default_outside_limit() -> usize {
    DEFAULT_OUTSIDE_LIMIT
}
fn default_radius_mode() -> String {
    DEFAULT_RADIUS_MODE.to_string()
}
fn default_excluded_regions() -> Vec<String> {
    DEFAULT_EXCLUDED_REGIONS.iter().map(|r| r.to_string()).collect()
}
fn default_padding() -> f64 {
    DEFAULT_FIT_PADDING
}
fn default_data_path() -> String {
    DEFAULT_DATA_PATH.to_string()
}
fn default_geocoder_url() -> String {
    PHOTON_URL.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            fixed_radius_miles: default_fixed_radius(),
            max_outside_miles: default_max_outside(),
            outside_limit: default_outside_limit(),
            radius_mode: default_radius_mode(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            excluded_regions: default_excluded_regions(),
            padding: default_padding(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: default_geocoder_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

/// A coverage radius: finite and above zero
pub fn check_radius(key: &str, miles: f64) -> Result<f64> {
    if miles.is_finite() && miles > 0.0 {
        Ok(miles)
    } else {
        Err(Error::InvalidInput(format!("{} must be a positive number of miles, got {}", key, miles)))
    }
}

/// A distance cap or padding: finite and not negative
pub fn check_non_negative(key: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!("{} must not be negative, got {}", key, value)))
    }
}

fn parse_number(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["coverage", "fixed_radius_miles"] => Some(self.coverage.fixed_radius_miles.to_string()),
            ["coverage", "max_outside_miles"] => Some(self.coverage.max_outside_miles.to_string()),
            ["coverage", "outside_limit"] => Some(self.coverage.outside_limit.to_string()),
            ["coverage", "radius_mode"] => Some(self.coverage.radius_mode.clone()),

            ["viewport", "excluded_regions"] => Some(self.viewport.excluded_regions.join(",")),
            ["viewport", "padding"] => Some(self.viewport.padding.to_string()),

            ["data", "path"] => Some(self.data.path.clone()),

            ["geocoder", "url"] => Some(self.geocoder.url.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["coverage", "fixed_radius_miles"] => {
                self.coverage.fixed_radius_miles = check_radius(key, parse_number(key, value)?)?;
            }
            ["coverage", "max_outside_miles"] => {
                self.coverage.max_outside_miles = check_non_negative(key, parse_number(key, value)?)?;
            }
            ["coverage", "outside_limit"] => {
                self.coverage.outside_limit = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid outside_limit value: {}", value))
                })?;
            }
            ["coverage", "radius_mode"] => {
                let mode = RadiusMode::from_str(value).map_err(Error::Config)?;
                self.coverage.radius_mode = mode.to_string();
            }

            ["viewport", "excluded_regions"] => {
                self.viewport.excluded_regions = value
                    .split(',')
                    .map(|r| r.trim().to_uppercase())
                    .filter(|r| !r.is_empty())
                    .collect();
            }
            ["viewport", "padding"] => {
                self.viewport.padding = check_non_negative(key, parse_number(key, value)?)?;
            }

            ["data", "path"] => {
                self.data.path = value.to_string();
            }

            ["geocoder", "url"] => {
                self.geocoder.url = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "coverage.fixed_radius_miles",
            "coverage.max_outside_miles",
            "coverage.outside_limit",
            "coverage.radius_mode",
            "viewport.excluded_regions",
            "viewport.padding",
            "data.path",
            "geocoder.url",
            "server.host",
            "server.port",
            "output.format",
        ]
    }

    /// Resolver thresholds from the coverage section
    pub fn resolver_config(&self) -> Result<ResolverConfig> {
        let radius_mode = RadiusMode::from_str(&self.coverage.radius_mode).map_err(Error::Config)?;
        Ok(ResolverConfig {
            fixed_radius_miles: check_radius(
                "coverage.fixed_radius_miles",
                self.coverage.fixed_radius_miles,
            )?,
            max_outside_miles: check_non_negative(
                "coverage.max_outside_miles",
                self.coverage.max_outside_miles,
            )?,
            outside_limit: self.coverage.outside_limit,
            radius_mode,
        })
    }

    /// Auto-fit policy from the viewport section
    pub fn fit_policy(&self) -> FitPolicy {
        FitPolicy::new(&self.viewport.excluded_regions, self.viewport.padding)
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.coverage.fixed_radius_miles, 100.0);
        assert_eq!(config.coverage.max_outside_miles, 250.0);
        assert_eq!(config.coverage.outside_limit, 5);
        assert_eq!(config.coverage.radius_mode, "fixed");
        assert_eq!(config.viewport.excluded_regions, vec!["HI", "AK"]);
        assert_eq!(config.data.path, "data.csv");
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("coverage.fixed_radius_miles"), Some("100".to_string()));

        config.set("coverage.fixed_radius_miles", "75.5").unwrap();
        assert_eq!(config.coverage.fixed_radius_miles, 75.5);

        config.set("coverage.radius_mode", "per-record").unwrap();
        assert_eq!(config.get("coverage.radius_mode"), Some("per_record".to_string()));

        config.set("viewport.excluded_regions", "hi, ak ,PR").unwrap();
        assert_eq!(config.viewport.excluded_regions, vec!["HI", "AK", "PR"]);
        assert_eq!(config.get("viewport.excluded_regions"), Some("HI,AK,PR".to_string()));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("coverage.fixed_radius_miles", "not_a_number").is_err());
        assert!(config.set("coverage.max_outside_miles", "-5").is_err());
        assert!(config.set("coverage.radius_mode", "sometimes").is_err());
        assert!(config.set("server.port", "99999").is_err());
    }

    #[test]
    fn test_radius_must_be_positive() {
        let mut config = Config::default();
        for bad in ["0", "-5", "NaN", "inf"] {
            assert!(
                config.set("coverage.fixed_radius_miles", bad).is_err(),
                "accepted radius {bad}"
            );
        }
        assert_eq!(config.coverage.fixed_radius_miles, 100.0);

        assert!(config.set("coverage.max_outside_miles", "0").is_ok());
        assert!(config.set("coverage.max_outside_miles", "NaN").is_err());
    }

    #[test]
    fn test_resolver_config_rejects_bad_file_values() {
        let config: Config = toml::from_str("[coverage]\nfixed_radius_miles = 0.0\n").unwrap();
        assert!(config.resolver_config().is_err());

        let config: Config = toml::from_str("[coverage]\nmax_outside_miles = -1.0\n").unwrap();
        assert!(config.resolver_config().is_err());
    }

    #[test]
    fn test_check_helpers() {
        assert_eq!(check_radius("radius", 0.5).unwrap(), 0.5);
        assert!(matches!(check_radius("radius", 0.0), Err(Error::InvalidInput(_))));
        assert!(check_radius("radius", f64::NAN).is_err());
        assert_eq!(check_non_negative("cap", 0.0).unwrap(), 0.0);
        assert!(check_non_negative("cap", -0.1).is_err());
    }

    #[test]
    fn test_resolver_config() {
        let mut config = Config::default();
        let resolver = config.resolver_config().unwrap();
        assert_eq!(resolver, ResolverConfig::default());

        config.coverage.radius_mode = "per_record".to_string();
        assert_eq!(
            config.resolver_config().unwrap().radius_mode,
            RadiusMode::PerRecord
        );

        config.coverage.radius_mode = "bogus".to_string();
        assert!(config.resolver_config().is_err());
    }

    #[test]
    fn test_fit_policy() {
        let policy = Config::default().fit_policy();
        assert!(policy.excluded_regions.contains("AK"));
        assert_eq!(policy.padding, 0.25);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.coverage.fixed_radius_miles = 60.0;
        config.data.path = "/srv/providers.csv".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.coverage.fixed_radius_miles, 60.0);
        assert_eq!(loaded.data.path, "/srv/providers.csv");
    }

    #[test]
    fn test_load_creates_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.coverage.outside_limit, 5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[coverage]\nfixed_radius_miles = 40.0\n").unwrap();
        assert_eq!(config.coverage.fixed_radius_miles, 40.0);
        assert_eq!(config.coverage.max_outside_miles, 250.0);
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[coverage]"));
        assert!(toml.contains("[viewport]"));
        assert!(toml.contains("[geocoder]"));
        assert!(toml.contains("[server]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7878");
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        assert!(keys.contains(&"coverage.fixed_radius_miles"));
        assert!(keys.contains(&"server.port"));
        for key in keys {
            assert!(Config::default().get(key).is_some(), "{key} has no getter");
        }
    }
}
