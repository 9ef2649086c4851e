//! Photon geocoding backend (OpenStreetMap data)
//!
//! `GET {base}?q=<address>&limit=1`, GeoJSON feature collection back.

use crate::constants::api::PHOTON_URL;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, JobPoint};
use serde::Deserialize;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("coverage-map/", env!("CARGO_PKG_VERSION"));

/// Photon geocoding backend
#[derive(Debug, Clone)]
pub struct PhotonBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Photon search response
#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    geometry: PhotonGeometry,
    #[serde(default)]
    properties: PhotonProperties,
}

#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    /// GeoJSON order: [lon, lat]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotonProperties {
    name: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl PhotonBackend {
    /// Create a backend against the public Photon instance
    pub fn new() -> Result<Self> {
        Self::with_base_url(PHOTON_URL)
    }

    /// Create a backend against a specific endpoint
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::geocoding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the locality fields that are present, or fall back to the query
    fn compose_label(properties: &PhotonProperties, address: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in [
            &properties.name,
            &properties.city,
            &properties.state,
            &properties.country,
        ]
        .into_iter()
        .flatten()
        {
            let part = part.trim();
            if !part.is_empty() && parts.last() != Some(&part) {
                parts.push(part);
            }
        }

        if parts.is_empty() {
            address.to_string()
        } else {
            parts.join(", ")
        }
    }

    /// First usable feature as a job point
    fn parse_response(response: PhotonResponse, address: &str) -> Option<JobPoint> {
        let feature = response.features.into_iter().next()?;

        let &[lng, lat] = feature.geometry.coordinates.as_slice() else {
            warn!("Photon feature without a [lon, lat] pair");
            return None;
        };

        if !Coordinates::new(lat, lng).is_valid() {
            warn!("Photon returned invalid coordinates ({}, {})", lat, lng);
            return None;
        }

        Some(JobPoint {
            lat,
            lng,
            label: Self::compose_label(&feature.properties, address),
        })
    }
}

impl GeoBackend for PhotonBackend {
    async fn geocode(&self, address: &str) -> Result<Option<JobPoint>> {
        let url = format!(
            "{}?q={}&limit=1",
            self.base_url,
            urlencoding::encode(address)
        );
        debug!("Geocoding {:?}", address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::geocoding(format!("Photon request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::geocoding_status(
                status.as_u16(),
                format!("Photon returned status: {}", status),
            ));
        }

        let body: PhotonResponse = response
            .json()
            .await
            .map_err(|e| Error::geocoding(format!("Failed to parse Photon response: {}", e)))?;

        Ok(Self::parse_response(body, address))
    }
}
