//! Session coordinator
//!
//! Owns the loaded providers, the current filter selection and the current
//! job point. Every state change is followed by a fresh, synchronous
//! [`Session::snapshot`]; nothing is updated incrementally.
//!
//! Address searches are sequence-stamped. Only the most recently started
//! search may change the job point; a response for an older ticket is
//! dropped.

use crate::coord::distance::miles_to_meters;
use crate::coverage::{resolve, CoverageResult, ResolverConfig};
use crate::error::{Error, Result};
use crate::filter::{apply, FilterCriteria, FilterOptions, Selection};
use crate::geo::{validate_address, GeoBackend, JobPoint};
use crate::record::ProviderRecord;
use crate::viewport::{select_bounds, BoundingBox, FitPolicy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handle for one in-flight address search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    address: String,
}

impl SearchTicket {
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// What a completed search did to the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Job point replaced; carries the label
    Found(String),
    /// Geocoder had nothing for the address; job unchanged
    NoMatch(String),
    /// Geocoder failed; job unchanged
    Failed(String),
    /// A newer search was started; response discarded
    Superseded,
}

impl SearchOutcome {
    /// Status line for the presentation layer
    pub fn status_message(&self) -> String {
        match self {
            Self::Found(label) => format!("Job location: {}", label),
            Self::NoMatch(address) => format!("No match found for \"{}\".", address),
            Self::Failed(detail) => format!("Address search failed: {}. Try again.", detail),
            Self::Superseded => "Search superseded by a newer one.".to_string(),
        }
    }
}

/// What the map should do with its viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum ViewportChange {
    Fit(BoundingBox),
    Recenter(JobPoint),
    Unchanged,
}

/// A provider on the map with the coverage circle drawn around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShownRecord {
    pub record: ProviderRecord,
    /// Radius the resolver applies to this record
    pub radius_miles: f64,
    pub circle_meters: f64,
}

impl ShownRecord {
    fn new(record: &ProviderRecord, resolver: &ResolverConfig) -> Self {
        let radius_miles = resolver.radius_for(record);
        Self {
            record: record.clone(),
            radius_miles,
            circle_meters: miles_to_meters(radius_miles),
        }
    }
}

/// Everything the presentation layer needs after a state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub criteria: FilterCriteria,
    pub shown: Vec<ShownRecord>,
    pub counts_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobPoint>,
    /// Present only while a job is active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageResult>,
    pub viewport: ViewportChange,
    pub status: String,
}

impl Snapshot {
    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }
}

/// Session-level state owner
#[derive(Debug, Clone)]
pub struct Session {
    records: Arc<[ProviderRecord]>,
    criteria: FilterCriteria,
    job: Option<JobPoint>,
    resolver: ResolverConfig,
    fit: FitPolicy,
    search_seq: u64,
}

impl Session {
    /// Create a session over an already-loaded collection
    pub fn new(records: impl Into<Arc<[ProviderRecord]>>, resolver: ResolverConfig, fit: FitPolicy) -> Self {
        let records = records.into();
        debug!("Session started with {} providers", records.len());
        Self {
            records,
            criteria: FilterCriteria::all(),
            job: None,
            resolver,
            fit,
            search_seq: 0,
        }
    }

    pub fn records(&self) -> &[ProviderRecord] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn job(&self) -> Option<&JobPoint> {
        self.job.as_ref()
    }

    pub fn resolver_config(&self) -> &ResolverConfig {
        &self.resolver
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_records(&self.records)
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        debug!("Filters: {:?}", criteria);
        self.criteria = criteria;
    }

    pub fn set_partner(&mut self, partner: impl Into<Selection>) {
        let criteria = self.criteria.clone().with_partner(partner);
        self.set_criteria(criteria);
    }

    pub fn set_role(&mut self, role: impl Into<Selection>) {
        let criteria = self.criteria.clone().with_role(role);
        self.set_criteria(criteria);
    }

    pub fn set_region(&mut self, region: impl Into<Selection>) {
        let criteria = self.criteria.clone().with_region(region);
        self.set_criteria(criteria);
    }

    /// Change the coverage radius (e.g. from a radius input)
    ///
    /// Values below one mile are raised to one mile.
    pub fn set_fixed_radius(&mut self, miles: f64) {
        self.resolver.fixed_radius_miles = if miles.is_finite() { miles.max(1.0) } else { 1.0 };
    }

    /// Replace the current job point directly (e.g. a clicked location)
    pub fn set_job(&mut self, job: JobPoint) {
        info!("Job set to {} ({}, {})", job.label, job.lat, job.lng);
        self.job = Some(job);
    }

    /// Drop the current job point; auto-fit resumes
    pub fn clear_job(&mut self) {
        if self.job.take().is_some() {
            info!("Job cleared");
        }
    }

    /// Records passing the current filters, in collection order
    pub fn filtered(&self) -> Vec<&ProviderRecord> {
        apply(&self.records, &self.criteria)
    }

    /// Start an address search, superseding any in flight
    pub fn begin_search(&mut self, address: &str) -> Result<SearchTicket> {
        let address = validate_address(address)?;
        self.search_seq += 1;
        debug!("Search #{} for {:?}", self.search_seq, address);
        Ok(SearchTicket {
            seq: self.search_seq,
            address: address.to_string(),
        })
    }

    /// Apply the geocoder's answer for a ticket
    ///
    /// The job point only changes on `Ok(Some(_))` for the latest ticket.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        response: Result<Option<JobPoint>>,
    ) -> SearchOutcome {
        if ticket.seq != self.search_seq {
            debug!(
                "Discarding stale search #{} (latest #{})",
                ticket.seq, self.search_seq
            );
            return SearchOutcome::Superseded;
        }

        match response {
            Ok(Some(job)) => {
                let label = job.label.clone();
                self.set_job(job);
                SearchOutcome::Found(label)
            }
            Ok(None) => {
                info!("No geocoding match for {:?}", ticket.address);
                SearchOutcome::NoMatch(ticket.address)
            }
            Err(e) => {
                warn!("Geocoding failed for {:?}: {}", ticket.address, e);
                let detail = match e {
                    Error::Geocoding { message, .. } => message,
                    other => other.to_string(),
                };
                SearchOutcome::Failed(detail)
            }
        }
    }

    /// Search an address and apply the result in one step
    pub async fn search<G: GeoBackend>(&mut self, geocoder: &G, address: &str) -> Result<SearchOutcome> {
        let ticket = self.begin_search(address)?;
        let response = geocoder.geocode(ticket.address()).await;
        Ok(self.complete_search(ticket, response))
    }

    /// Coverage for the current job, if one is set
    pub fn coverage(&self) -> Option<CoverageResult> {
        let job = self.job.as_ref()?;
        Some(resolve(job.coords(), self.filtered(), &self.resolver))
    }

    /// Recompute everything the presentation layer shows
    pub fn snapshot(&self) -> Snapshot {
        let filtered = self.filtered();
        let counts_message = format!("{} location(s) shown", filtered.len());

        let (coverage, viewport, status) = match &self.job {
            Some(job) => {
                let result = resolve(job.coords(), filtered.iter().copied(), &self.resolver);
                let status = result.status_message(&self.resolver);
                debug!("Coverage for {:?}: {}", job.label, result.kind());
                (Some(result), ViewportChange::Recenter(job.clone()), status)
            }
            None => {
                let viewport = select_bounds(filtered.iter().copied(), None, &self.fit)
                    .map(ViewportChange::Fit)
                    .unwrap_or(ViewportChange::Unchanged);
                (None, viewport, counts_message.clone())
            }
        };

        Snapshot {
            criteria: self.criteria.clone(),
            shown: filtered
                .into_iter()
                .map(|record| ShownRecord::new(record, &self.resolver))
                .collect(),
            counts_message,
            job: self.job.clone(),
            coverage,
            viewport,
            status,
        }
    }

    /// Box to fit the current results regardless of any job (a "fit" button)
    pub fn fit_to_results(&self) -> Option<BoundingBox> {
        select_bounds(self.filtered(), None, &self.fit)
    }
}
