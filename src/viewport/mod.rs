//! Viewport fitting
//!
//! Picks the bounding box the map should show for the current provider set.
//! Outlying regions (by default HI and AK) are left out of auto-fit unless
//! they are all there is.

use crate::coord::Coordinates;
use crate::record::ProviderRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A latitude/longitude rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Smallest box containing every point, or None when there are none
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let start = Self::new(first.lat, first.lng, first.lat, first.lng);

        Some(points.fold(start, |b, p| Self {
            south: b.south.min(p.lat),
            west: b.west.min(p.lng),
            north: b.north.max(p.lat),
            east: b.east.max(p.lng),
        }))
    }

    /// Grow each side by `fraction` of the span on that axis
    pub fn pad(&self, fraction: f64) -> Self {
        let lat_pad = (self.north - self.south) * fraction;
        let lng_pad = (self.east - self.west) * fraction;

        Self {
            south: self.south - lat_pad,
            west: self.west - lng_pad,
            north: self.north + lat_pad,
            east: self.east + lng_pad,
        }
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }
}

/// Parameters for auto-fit
#[derive(Debug, Clone, PartialEq)]
pub struct FitPolicy {
    /// Uppercased region codes left out of auto-fit
    pub excluded_regions: HashSet<String>,
    /// Fraction of the span added on each side
    pub padding: f64,
}

impl FitPolicy {
    pub fn new<I, S>(excluded_regions: I, padding: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            excluded_regions: excluded_regions
                .into_iter()
                .map(|r| r.as_ref().trim().to_uppercase())
                .collect(),
            padding,
        }
    }

    fn excludes(&self, record: &ProviderRecord) -> bool {
        self.excluded_regions.contains(&record.region)
    }
}

impl Default for FitPolicy {
    fn default() -> Self {
        use crate::config::defaults::{DEFAULT_EXCLUDED_REGIONS, DEFAULT_FIT_PADDING};
        Self::new(DEFAULT_EXCLUDED_REGIONS, DEFAULT_FIT_PADDING)
    }
}

/// Choose the box to auto-fit, or None to leave the viewport alone
///
/// Returns None while a job is active (the caller recenters on the job
/// instead) and when no record has a usable location.
pub fn select_bounds<'a, I>(
    records: I,
    job: Option<&Coordinates>,
    policy: &FitPolicy,
) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a ProviderRecord>,
{
    if job.is_some() {
        return None;
    }

    let valid: Vec<&ProviderRecord> = records
        .into_iter()
        .filter(|r| r.has_valid_location())
        .collect();

    let preferred: Vec<&ProviderRecord> = valid
        .iter()
        .copied()
        .filter(|r| !policy.excludes(r))
        .collect();

    let chosen = if preferred.is_empty() { &valid } else { &preferred };

    BoundingBox::enclosing(chosen.iter().map(|r| r.coords())).map(|b| b.pad(policy.padding))
}

/// Approximate boxes for zooming straight to a region
///
/// Unknown codes return None; the caller should leave the map as it is.
pub fn region_bounds(code: &str) -> Option<BoundingBox> {
    let (south, west, north, east) = match code.trim().to_uppercase().as_str() {
        "TX" => (25.8, -106.7, 36.6, -93.5),
        "CA" => (32.5, -124.5, 42.1, -114.1),
        "NV" => (35.0, -120.0, 42.0, -114.0),
        "FL" => (24.4, -87.7, 31.2, -80.0),
        "IN" => (37.8, -88.1, 41.8, -84.8),
        "KS" => (37.0, -102.1, 40.1, -94.6),
        "WA" => (45.5, -124.9, 49.1, -116.9),
        _ => return None,
    };
    Some(BoundingBox::new(south, west, north, east))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(region: &str, lat: f64, lng: f64) -> ProviderRecord {
        ProviderRecord {
            partner: "P1".to_string(),
            name: String::new(),
            role: String::new(),
            lat,
            lng,
            price: String::new(),
            notes: String::new(),
            region: region.to_string(),
            active: true,
            radius_miles: None,
        }
    }

    fn no_padding() -> FitPolicy {
        FitPolicy::new(["HI", "AK"], 0.0)
    }

    #[test]
    fn test_excluded_regions_skipped() {
        let records = vec![
            record("HI", 21.3, -157.85),
            record("HI", 19.7, -155.1),
            record("TX", 32.75, -97.33),
        ];

        let bounds = select_bounds(&records, None, &no_padding()).unwrap();
        assert_eq!(bounds, BoundingBox::new(32.75, -97.33, 32.75, -97.33));
    }

    #[test]
    fn test_only_excluded_regions_uses_full_set() {
        let records = vec![record("HI", 21.3, -157.85), record("HI", 19.7, -155.1)];

        let bounds = select_bounds(&records, None, &no_padding()).unwrap();
        assert_eq!(bounds, BoundingBox::new(19.7, -157.85, 21.3, -155.1));
    }

    #[test]
    fn test_suppressed_while_job_active() {
        let records = vec![record("TX", 32.75, -97.33)];
        let job = Coordinates::new(32.0, -97.0);
        assert!(select_bounds(&records, Some(&job), &no_padding()).is_none());
    }

    #[test]
    fn test_none_when_nothing_valid() {
        let records = vec![record("TX", f64::NAN, -97.0), record("TX", 100.0, -97.0)];
        assert!(select_bounds(&records, None, &no_padding()).is_none());

        let empty: Vec<ProviderRecord> = Vec::new();
        assert!(select_bounds(&empty, None, &no_padding()).is_none());
    }

    #[test]
    fn test_invalid_records_do_not_stretch_bounds() {
        let records = vec![
            record("TX", 30.0, -98.0),
            record("TX", 32.0, -96.0),
            record("TX", -95.0, 500.0),
        ];
        let bounds = select_bounds(&records, None, &no_padding()).unwrap();
        assert_eq!(bounds, BoundingBox::new(30.0, -98.0, 32.0, -96.0));
    }

    #[test]
    fn test_padding_applied() {
        let records = vec![record("TX", 30.0, -98.0), record("TX", 32.0, -94.0)];
        let policy = FitPolicy::new(["HI", "AK"], 0.25);

        let bounds = select_bounds(&records, None, &policy).unwrap();

        assert_relative_eq!(bounds.south, 29.5);
        assert_relative_eq!(bounds.north, 32.5);
        assert_relative_eq!(bounds.west, -99.0);
        assert_relative_eq!(bounds.east, -93.0);
    }

    #[test]
    fn test_policy_normalizes_regions() {
        let policy = FitPolicy::new([" hi", "Ak "], 0.25);
        assert!(policy.excluded_regions.contains("HI"));
        assert!(policy.excluded_regions.contains("AK"));

        let default = FitPolicy::default();
        assert!(default.excluded_regions.contains("HI"));
        assert_eq!(default.padding, 0.25);
    }

    #[test]
    fn test_box_helpers() {
        let b = BoundingBox::new(30.0, -98.0, 32.0, -94.0);
        assert!(b.contains(Coordinates::new(31.0, -95.0)));
        assert!(!b.contains(Coordinates::new(33.0, -95.0)));
    }

    #[test]
    fn test_region_bounds() {
        let tx = region_bounds("tx").unwrap();
        assert!(tx.contains(Coordinates::new(32.75, -97.33)));
        assert!(region_bounds("ZZ").is_none());
        assert!(region_bounds("All").is_none());
    }

}
