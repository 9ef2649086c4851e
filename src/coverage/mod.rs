//! Coverage resolution
//!
//! Given a job point and the filtered providers, decide who can serve it:
//!
//! 1. Providers within their coverage radius, nearest first
//! 2. Otherwise, up to `outside_limit` nearest providers within
//!    `max_outside_miles`
//! 3. Otherwise, nothing
//!
//! Resolution is pure and total. Bad input is filtered, never reported.

use crate::coord::distance::distance_miles;
use crate::coord::Coordinates;
use crate::record::ProviderRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How each record's coverage radius is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusMode {
    /// Every record uses the fixed radius
    #[default]
    Fixed,
    /// A record's own radius when it has a usable one, else the fixed radius
    PerRecord,
}

impl std::str::FromStr for RadiusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "per_record" | "per-record" | "perrecord" => Ok(Self::PerRecord),
            _ => Err(format!("Unknown radius mode: {}", s)),
        }
    }
}

impl std::fmt::Display for RadiusMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::PerRecord => write!(f, "per_record"),
        }
    }
}

/// Thresholds for one resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub fixed_radius_miles: f64,
    pub max_outside_miles: f64,
    pub outside_limit: usize,
    pub radius_mode: RadiusMode,
}

impl ResolverConfig {
    pub fn new(fixed_radius_miles: f64, max_outside_miles: f64) -> Self {
        Self {
            fixed_radius_miles,
            max_outside_miles,
            ..Self::default()
        }
    }

    pub fn with_radius_mode(mut self, radius_mode: RadiusMode) -> Self {
        self.radius_mode = radius_mode;
        self
    }

    /// Radius that applies to one record
    pub fn radius_for(&self, record: &ProviderRecord) -> f64 {
        match self.radius_mode {
            RadiusMode::Fixed => self.fixed_radius_miles,
            RadiusMode::PerRecord => record
                .radius_override()
                .unwrap_or(self.fixed_radius_miles),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        use crate::config::defaults::*;
        Self {
            fixed_radius_miles: DEFAULT_FIXED_RADIUS_MILES,
            max_outside_miles: DEFAULT_MAX_OUTSIDE_MILES,
            outside_limit: DEFAULT_OUTSIDE_LIMIT,
            radius_mode: RadiusMode::Fixed,
        }
    }
}

/// A provider with its distance to the job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: ProviderRecord,
    pub distance_miles: f64,
    /// Radius this record was judged against
    pub radius_miles: f64,
    pub eligible: bool,
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "matches", rename_all = "snake_case")]
pub enum CoverageResult {
    /// Filters left nothing with a usable location
    NoCandidates,
    /// Providers covering the job, nearest first
    Eligible(Vec<ScoredRecord>),
    /// Nobody covers the job; closest few within the outside cap
    NearestOutside(Vec<ScoredRecord>),
    /// Nobody within the radius or the outside cap
    NoneWithinRange,
}

impl CoverageResult {
    /// Stable name of the outcome kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoCandidates => "no_candidates",
            Self::Eligible(_) => "eligible",
            Self::NearestOutside(_) => "nearest_outside",
            Self::NoneWithinRange => "none_within_range",
        }
    }

    /// Ordered matches for the outcome (empty for the terminal kinds)
    pub fn matches(&self) -> &[ScoredRecord] {
        match self {
            Self::Eligible(list) | Self::NearestOutside(list) => list,
            Self::NoCandidates | Self::NoneWithinRange => &[],
        }
    }

    /// The nearest eligible provider, for highlighting
    pub fn best_match(&self) -> Option<&ScoredRecord> {
        match self {
            Self::Eligible(list) => list.first(),
            _ => None,
        }
    }

    /// Status line for the presentation layer
    pub fn status_message(&self, config: &ResolverConfig) -> String {
        let radius = match config.radius_mode {
            RadiusMode::Fixed => format!("{} mi", format_miles(config.fixed_radius_miles)),
            RadiusMode::PerRecord => "service radius".to_string(),
        };
        let cap = format_miles(config.max_outside_miles);

        match self {
            Self::NoCandidates => "No matching resources under current filters.".to_string(),
            Self::Eligible(list) => {
                let nearest = list
                    .first()
                    .map(|s| {
                        format!(
                            " Nearest: {} ({:.1} mi).",
                            s.record.display_name(),
                            s.distance_miles
                        )
                    })
                    .unwrap_or_default();
                format!(
                    "{} eligible resource(s) within {}.{}",
                    list.len(),
                    radius,
                    nearest
                )
            }
            Self::NearestOutside(list) => format!(
                "No resources within {}. Showing {} nearest within {} mi.",
                radius,
                list.len(),
                cap
            ),
            Self::NoneWithinRange => format!(
                "No resources within {} or {} mi. Try navigating the map manually.",
                radius, cap
            ),
        }
    }
}

fn format_miles(miles: f64) -> String {
    if miles.fract() == 0.0 {
        format!("{}", miles as i64)
    } else {
        format!("{:.1}", miles)
    }
}

/// Resolve coverage for a job point
///
/// # Arguments
/// * `job` - Job location (expected valid)
/// * `filtered` - Records that passed the current filters, in collection order
/// * `config` - Radius, outside cap and tier limit
pub fn resolve<'a, I>(job: Coordinates, filtered: I, config: &ResolverConfig) -> CoverageResult
where
    I: IntoIterator<Item = &'a ProviderRecord>,
{
    let scored: Vec<ScoredRecord> = filtered
        .into_iter()
        .filter(|r| r.has_valid_location())
        .map(|record| {
            let distance = distance_miles(job, record.coords());
            let radius = config.radius_for(record);
            ScoredRecord {
                record: record.clone(),
                distance_miles: distance,
                radius_miles: radius,
                eligible: distance <= radius,
            }
        })
        .collect();

    if scored.is_empty() {
        debug!("No candidates with valid locations");
        return CoverageResult::NoCandidates;
    }

    let (mut eligible, mut outside): (Vec<_>, Vec<_>) =
        scored.into_iter().partition(|s| s.eligible);

    // Vec::sort_by is stable: equal distances keep collection order
    if !eligible.is_empty() {
        eligible.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
        debug!("{} eligible providers", eligible.len());
        return CoverageResult::Eligible(eligible);
    }

    outside.retain(|s| s.distance_miles <= config.max_outside_miles);
    outside.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    outside.truncate(config.outside_limit);

    if outside.is_empty() {
        debug!("Nothing within {} mi", config.max_outside_miles);
        CoverageResult::NoneWithinRange
    } else {
        debug!("{} providers just outside coverage", outside.len());
        CoverageResult::NearestOutside(outside)
    }
}
