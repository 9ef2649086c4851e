//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Coverage radius every provider gets in fixed mode, in miles
pub const DEFAULT_FIXED_RADIUS_MILES: f64 = 100.0;

/// Furthest a provider outside coverage may be and still be suggested
pub const DEFAULT_MAX_OUTSIDE_MILES: f64 = 250.0;

/// Most providers suggested when nobody covers the job
pub const DEFAULT_OUTSIDE_LIMIT: usize = 5;

/// Default radius mode ("fixed" or "per_record")
pub const DEFAULT_RADIUS_MODE: &str = "fixed";

/// Regions left out of auto-fit unless nothing else matches
pub const DEFAULT_EXCLUDED_REGIONS: [&str; 2] = ["HI", "AK"];

/// Fraction of the span added on each side when fitting
pub const DEFAULT_FIT_PADDING: f64 = 0.25;

/// Default provider table
pub const DEFAULT_DATA_PATH: &str = "data.csv";

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "coverage-map";
