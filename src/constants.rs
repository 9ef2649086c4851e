//! Centralized constants for the coverage-map crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in miles
    pub const EARTH_RADIUS_MILES: f64 = 3958.7613;

    /// Meters per statute mile
    pub const METERS_PER_MILE: f64 = 1609.344;
}

/// External API endpoints
pub mod api {
    /// Photon geocoder (OpenStreetMap data, no key required)
    pub const PHOTON_URL: &str = "https://photon.komoot.io/api/";
}

/// Tabular input columns
pub mod columns {
    pub const PARTNER: &str = "partner";
    pub const NAME: &str = "name";
    pub const ROLE: &str = "role";
    pub const LAT: &str = "lat";
    pub const LON: &str = "lon";
    pub const PRICE: &str = "price";
    pub const NOTES: &str = "notes";
    pub const ACTIVE: &str = "active";
    pub const STATE: &str = "state";
    pub const SERVICE_RADIUS_MILES: &str = "service_radius_miles";

    /// Every column the normalizer reads; anything else in a row is ignored
    pub const RECOGNIZED: [&str; 10] = [
        PARTNER,
        NAME,
        ROLE,
        LAT,
        LON,
        PRICE,
        NOTES,
        ACTIVE,
        STATE,
        SERVICE_RADIUS_MILES,
    ];
}

/// Selector sentinel meaning "no restriction"
pub const ALL: &str = "All";
