//! Server shared state
//!
//! Holds configuration, the loaded provider table and the geocoder.

use crate::config::Config;
use crate::error::Result;
use crate::geo::get_geocoder;
use crate::geo::photon::PhotonBackend;
use crate::record::ProviderRecord;
use crate::session::Session;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,

    /// Provider table, immutable after load
    pub records: Arc<[ProviderRecord]>,

    /// Address search client
    pub geocoder: PhotonBackend,

    started: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, records: impl Into<Arc<[ProviderRecord]>>) -> Result<Self> {
        let geocoder = get_geocoder(&config.geocoder.url)?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            records: records.into(),
            geocoder,
            started: Instant::now(),
        })
    }

    /// A fresh per-request session over the shared table
    pub async fn session(&self) -> Result<Session> {
        let config = self.config.read().await;
        Ok(Session::new(
            Arc::clone(&self.records),
            config.resolver_config()?,
            config.fit_policy(),
        ))
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
