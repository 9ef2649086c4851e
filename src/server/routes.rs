//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::config::check_radius;
use crate::error::Error;
use crate::filter::{FilterCriteria, FilterOptions};
use crate::format::{available_formats, FormatInfo};
use crate::geo::JobPoint;
use crate::server::state::AppState;
use crate::session::{SearchOutcome, Snapshot};
use crate::viewport::{region_bounds, BoundingBox};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::debug;

/// Static assets next to the working directory, else next to the binary
fn static_dir() -> PathBuf {
    let local = PathBuf::from("static");
    if local.exists() {
        return local;
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/filters", get(filters_handler))
        .route("/api/formats", get(formats_handler))
        .route("/api/providers", get(providers_handler))
        .route("/api/resolve", post(resolve_handler))
        .route("/api/regions/:code/bounds", get(region_bounds_handler))
        .fallback_service(ServeDir::new(static_dir()).append_index_html_on_directories(true))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "GEOCODE_FAILED" => StatusCode::BAD_GATEWAY,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "CONFIG_ERROR" | "INTERNAL_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Geocoding { .. } => "GEOCODE_FAILED",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError::new(code, err.to_string())
    }
}

/// Filter selection accepted as query parameters or body fields
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub partner: Option<String>,
    pub role: Option<String>,
    pub region: Option<String>,
}

impl FilterQuery {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::all()
            .with_partner(self.partner.clone())
            .with_role(self.role.clone())
            .with_region(self.region.clone())
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Rows loaded
    pub providers: usize,
    /// Rows flagged active
    pub active: usize,
    /// Geocoding endpoint in use
    pub geocoder: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: state.records.len(),
        active: state.records.iter().filter(|r| r.active).count(),
        geocoder: state.geocoder.base_url().to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Selector values for the loaded table
///
/// GET /api/filters
async fn filters_handler(State(state): State<Arc<AppState>>) -> Json<FilterOptions> {
    Json(FilterOptions::from_records(&state.records))
}

/// Formats list response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

/// Providers passing the filters, with the box to fit
///
/// GET /api/providers?partner=..&role=..&region=..
async fn providers_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.session().await?;
    session.set_criteria(query.criteria());
    Ok(Json(session.snapshot()))
}

/// Resolve request body
///
/// Either `address`, or `lat` and `lng`.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub label: Option<String>,
    /// Override the configured coverage radius (miles)
    pub radius: Option<f64>,
    #[serde(flatten)]
    pub filters: FilterQuery,
}

/// Resolve response: the snapshot plus what the address search did
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchOutcome>,
    /// Box around the shown results, ignoring the job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_bounds: Option<BoundingBox>,
}

/// Coverage for one job location
///
/// POST /api/resolve
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let mut session = state.session().await?;
    session.set_criteria(req.filters.criteria());

    if let Some(radius) = req.radius {
        session.set_fixed_radius(check_radius("radius", radius)?);
    }

    let search = match (&req.address, req.lat, req.lng) {
        (Some(address), _, _) => {
            let outcome = session.search(&state.geocoder, address).await?;
            if let SearchOutcome::Failed(_) = outcome {
                return Err(ApiError::new("GEOCODE_FAILED", outcome.status_message()));
            }
            Some(outcome)
        }
        (None, Some(lat), Some(lng)) => {
            let label = req
                .label
                .clone()
                .unwrap_or_else(|| format!("{:.5}, {:.5}", lat, lng));
            session.set_job(JobPoint::new(lat, lng, label)?);
            None
        }
        _ => {
            return Err(ApiError::new(
                "INVALID_INPUT",
                "Provide an address, or both lat and lng",
            ));
        }
    };

    let mut snapshot = session.snapshot();
    if let Some(outcome @ SearchOutcome::NoMatch(_)) = &search {
        snapshot.status = outcome.status_message();
    }
    debug!("Resolved: {}", snapshot.status);

    Ok(Json(ResolveResponse {
        snapshot,
        search,
        results_bounds: session.fit_to_results(),
    }))
}

/// Zoom box for a region code
///
/// GET /api/regions/:code/bounds
async fn region_bounds_handler(Path(code): Path<String>) -> Result<Json<BoundingBox>, ApiError> {
    region_bounds(&code)
        .map(Json)
        .ok_or_else(|| ApiError::new("NOT_FOUND", format!("No bounds for region: {}", code)))
}
