//! Geocoding module
//!
//! Turns a free-text address into a job point.

pub mod photon;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A resolved job location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPoint {
    pub lat: f64,
    pub lng: f64,
    /// Display label (address or locality)
    pub label: String,
}

impl JobPoint {
    /// Create a job point, rejecting invalid coordinates
    pub fn new(lat: f64, lng: f64, label: impl Into<String>) -> Result<Self> {
        Coordinates::new(lat, lng).validate()?;
        Ok(Self {
            lat,
            lng,
            label: label.into(),
        })
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode an address to a job point
    ///
    /// Returns the best match for the query, or None if not found. Transport
    /// errors and non-success responses are `Err`.
    fn geocode(&self, address: &str) -> impl std::future::Future<Output = Result<Option<JobPoint>>> + Send;
}

/// Reject blank addresses before any request is made
pub fn validate_address(address: &str) -> Result<&str> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Address must not be blank".to_string()));
    }
    Ok(trimmed)
}

/// Get the default geocoding backend
pub fn get_geocoder(base_url: &str) -> Result<photon::PhotonBackend> {
    photon::PhotonBackend::with_base_url(base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_point_validation() {
        let job = JobPoint::new(32.76, -97.34, "Fort Worth").unwrap();
        assert_eq!(job.coords(), Coordinates::new(32.76, -97.34));

        assert!(JobPoint::new(91.0, 0.0, "nowhere").is_err());
        assert!(JobPoint::new(f64::NAN, 0.0, "nowhere").is_err());
    }

    #[test]
    fn test_validate_address() {
        assert_eq!(validate_address("  Fort Worth, TX ").unwrap(), "Fort Worth, TX");
        assert!(matches!(validate_address("   "), Err(Error::InvalidInput(_))));
        assert!(validate_address("").is_err());
    }

    #[test]
    fn test_job_point_serialization() {
        let job = JobPoint::new(40.7128, -74.0060, "New York City").unwrap();

        let json = serde_json::to_string(&job).unwrap();
        let parsed: JobPoint = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, job);
    }
}
