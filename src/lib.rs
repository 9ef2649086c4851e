//! coverage-map: Service-Provider Coverage Map
//!
//! A library and CLI tool for finding which field providers can serve a job
//! location, and for keeping a map viewport fitted to the current selection.
//!
//! ## Features
//!
//! - CSV provider table with forgiving normalization
//! - Partner / role / region filtering
//! - Great-circle eligibility with a fallback to the nearest providers
//! - Viewport fitting that ignores far-flung regions
//! - Address search through a Photon geocoder
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use coverage_map::coverage::{resolve, CoverageResult, ResolverConfig};
//! use coverage_map::record::{normalize_all, RawRow};
//! use coverage_map::Coordinates;
//!
//! let row: RawRow = [
//!     ("partner", "Acme"),
//!     ("name", "Jo"),
//!     ("role", "Technician"),
//!     ("lat", "32.75"),
//!     ("lon", "-97.33"),
//!     ("state", "tx"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let records = normalize_all([&row]);
//! let job = Coordinates::new(32.76, -97.34); // Fort Worth
//!
//! let result = resolve(job, &records, &ResolverConfig::default());
//! assert!(matches!(result, CoverageResult::Eligible(_)));
//! println!("{}", result.status_message(&ResolverConfig::default()));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod coverage;
pub mod error;
pub mod filter;
pub mod format;
pub mod geo;
pub mod record;
pub mod server;
pub mod session;
pub mod viewport;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use coverage::{CoverageResult, ResolverConfig};
pub use error::{Error, Result};
pub use filter::{FilterCriteria, Selection};
pub use geo::JobPoint;
pub use record::ProviderRecord;
pub use session::{Session, Snapshot};
