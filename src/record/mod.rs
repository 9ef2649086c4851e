//! Provider records
//!
//! Converts raw tabular rows into typed [`ProviderRecord`]s. All loose-data
//! parsing (booleans-as-strings, numeric coercion, trimming, case) lives
//! here so downstream code only ever sees typed fields.

pub mod load;

use crate::constants::columns;
use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One raw row: column name to cell text
pub type RawRow = HashMap<String, String>;

/// Display name used when a record has no name
pub const UNNAMED: &str = "Unnamed";

/// One service provider with a fixed location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub partner: String,
    pub name: String,
    pub role: String,
    /// May be non-finite or out of range; see [`ProviderRecord::has_valid_location`]
    pub lat: f64,
    pub lng: f64,
    pub price: String,
    pub notes: String,
    /// Uppercased region code (the `state` column)
    pub region: String,
    pub active: bool,
    /// Per-record coverage radius, when the table carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_miles: Option<f64>,
}

impl ProviderRecord {
    /// Location as coordinates (unvalidated)
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Whether this record may take part in distance or bounding
    pub fn has_valid_location(&self) -> bool {
        self.coords().is_valid()
    }

    /// Name for display, falling back to "Unnamed"
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNNAMED
        } else {
            &self.name
        }
    }

    /// Single-letter marker label for the role
    pub fn role_label(&self) -> &'static str {
        match self.role.as_str() {
            "Electrician" => "E",
            "Technician" => "T",
            _ => "?",
        }
    }

    /// The usable radius override: present, finite and positive
    pub fn radius_override(&self) -> Option<f64> {
        self.radius_miles.filter(|r| r.is_finite() && *r > 0.0)
    }
}

/// Whether an `active` cell counts as true
///
/// Empty (absent) means active. Otherwise TRUE, 1 or YES, case-insensitive.
pub fn is_truthy(raw: &str) -> bool {
    let value = raw.trim().to_uppercase();
    matches!(value.as_str(), "" | "TRUE" | "1" | "YES")
}

/// Coerce a cell to a number; failure yields NaN rather than an error
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn field(row: &RawRow, column: &str) -> String {
    row.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Normalize one raw row into a provider record
///
/// Pure. Does not drop anything; see [`normalize_all`] for the
/// collection-level policy.
pub fn normalize(row: &RawRow) -> ProviderRecord {
    let radius = field(row, columns::SERVICE_RADIUS_MILES);

    ProviderRecord {
        partner: field(row, columns::PARTNER),
        name: field(row, columns::NAME),
        role: field(row, columns::ROLE),
        lat: parse_number(&field(row, columns::LAT)),
        lng: parse_number(&field(row, columns::LON)),
        price: field(row, columns::PRICE),
        notes: field(row, columns::NOTES),
        region: field(row, columns::STATE).to_uppercase(),
        active: is_truthy(&field(row, columns::ACTIVE)),
        radius_miles: if radius.is_empty() {
            None
        } else {
            Some(parse_number(&radius))
        },
    }
}

/// Normalize every row, then drop records with no partner
pub fn normalize_all<'a, I>(rows: I) -> Vec<ProviderRecord>
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut total = 0usize;
    let records: Vec<ProviderRecord> = rows
        .into_iter()
        .map(|row| {
            total += 1;
            normalize(row)
        })
        .filter(|r| !r.partner.is_empty())
        .collect();

    if records.len() < total {
        debug!(
            "Dropped {} of {} rows with no partner",
            total - records.len(),
            total
        );
    }

    records
}
