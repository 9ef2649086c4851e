//! Provider filtering
//!
//! Holds the current selection (partner, role, region) and narrows the full
//! record collection to the active records that satisfy it.

use crate::constants::ALL;
use crate::record::ProviderRecord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// One selector value: everything, or one specific value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Whether a record's field value passes this selection
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(value) => value,
        }
    }
}

impl std::str::FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for Selection {
    fn from(s: &str) -> Self {
        if s == ALL {
            Self::All
        } else {
            Self::Only(s.to_string())
        }
    }
}

impl From<Option<String>> for Selection {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Selection::from).unwrap_or_default()
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Selection::from(s.as_str()))
    }
}

/// Current selection state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub partner: Selection,
    #[serde(default)]
    pub role: Selection,
    #[serde(default)]
    pub region: Selection,
}

impl FilterCriteria {
    /// Criteria that pass every active record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_partner(mut self, partner: impl Into<Selection>) -> Self {
        self.partner = partner.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<Selection>) -> Self {
        self.role = role.into();
        self
    }

    /// Region codes compare uppercased, matching normalized records
    pub fn with_region(mut self, region: impl Into<Selection>) -> Self {
        self.region = match region.into() {
            Selection::Only(code) => Selection::Only(code.trim().to_uppercase()),
            Selection::All => Selection::All,
        };
        self
    }

    /// Whether a single record passes
    pub fn accepts(&self, record: &ProviderRecord) -> bool {
        record.active
            && self.partner.matches(&record.partner)
            && self.role.matches(&record.role)
            && self.region.matches(&record.region)
    }
}

/// Apply criteria to the record collection
///
/// Order-preserving and free of hidden state: the same inputs always give
/// the same output.
pub fn apply<'a>(records: &'a [ProviderRecord], criteria: &FilterCriteria) -> Vec<&'a ProviderRecord> {
    records.iter().filter(|r| criteria.accepts(r)).collect()
}

/// Distinct values available for each selector, sorted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub partners: Vec<String>,
    pub roles: Vec<String>,
    pub regions: Vec<String>,
}

impl FilterOptions {
    /// Collect options from every loaded record (active or not)
    pub fn from_records(records: &[ProviderRecord]) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
            let mut options: Vec<String> = values
                .filter(|v| !v.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect();
            options.sort_by(|a, b| compare_labels(a, b));
            options
        }

        Self {
            partners: distinct(records.iter().map(|r| r.partner.as_str())),
            roles: distinct(records.iter().map(|r| r.role.as_str())),
            regions: distinct(records.iter().map(|r| r.region.as_str())),
        }
    }
}

/// Dictionary order: case-insensitive, lowercase first on ties
fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(partner: &str, role: &str, region: &str, active: bool) -> ProviderRecord {
        ProviderRecord {
            partner: partner.to_string(),
            name: format!("{partner}-{role}-{region}"),
            role: role.to_string(),
            lat: 30.0,
            lng: -95.0,
            price: String::new(),
            notes: String::new(),
            region: region.to_string(),
            active,
            radius_miles: None,
        }
    }

    fn sample() -> Vec<ProviderRecord> {
        vec![
            record("Acme", "Technician", "TX", true),
            record("Bolt", "Electrician", "TX", true),
            record("Acme", "Electrician", "CA", true),
            record("Acme", "Technician", "CA", false),
            record("Bolt", "Technician", "HI", true),
        ]
    }

    fn names(records: &[&ProviderRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_all_criteria_keeps_active_only() {
        let records = sample();
        let filtered = apply(&records, &FilterCriteria::all());
        assert_eq!(filtered.len(), 4);
        assert!(filtered.iter().all(|r| r.active));
    }

    #[test]
    fn test_partner_filter() {
        let records = sample();
        let filtered = apply(&records, &FilterCriteria::all().with_partner("Acme"));
        assert_eq!(
            names(&filtered),
            vec!["Acme-Technician-TX", "Acme-Electrician-CA"]
        );
    }

    #[test]
    fn test_combined_filters() {
        let records = sample();
        let criteria = FilterCriteria::all()
            .with_role("Technician")
            .with_region("tx");
        let filtered = apply(&records, &criteria);
        assert_eq!(names(&filtered), vec!["Acme-Technician-TX"]);
    }

    #[test]
    fn test_no_match() {
        let records = sample();
        let filtered = apply(&records, &FilterCriteria::all().with_partner("Nobody"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_idempotent_and_ordered() {
        let records = sample();
        let criteria = FilterCriteria::all().with_region("TX");

        let first = apply(&records, &criteria);
        let second = apply(&records, &criteria);

        assert_eq!(first, second);
        assert_eq!(
            names(&first),
            vec!["Acme-Technician-TX", "Bolt-Electrician-TX"]
        );
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!(Selection::from("All"), Selection::All);
        assert_eq!(Selection::from("Acme"), Selection::Only("Acme".to_string()));
        assert_eq!(Selection::from(None::<String>), Selection::All);
        assert_eq!("All".parse::<Selection>().unwrap(), Selection::All);
    }

    #[test]
    fn test_criteria_serde() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"partner":"Acme","region":"All"}"#).unwrap();
        assert_eq!(criteria.partner, Selection::Only("Acme".to_string()));
        assert!(criteria.role.is_all());
        assert!(criteria.region.is_all());

        let json = serde_json::to_string(&criteria).unwrap();
        assert_eq!(json, r#"{"partner":"Acme","role":"All","region":"All"}"#);
    }

    #[test]
    fn test_filter_options() {
        let mut records = sample();
        records.push(record("Acme", "", "", true));

        let options = FilterOptions::from_records(&records);

        assert_eq!(options.partners, vec!["Acme", "Bolt"]);
        assert_eq!(options.roles, vec!["Electrician", "Technician"]);
        assert_eq!(options.regions, vec!["CA", "HI", "TX"]);
    }

    #[test]
    fn test_filter_options_dictionary_order() {
        let records = vec![
            record("Bolt", "technician", "tx", true),
            record("acme", "Electrician", "CA", true),
            record("Acme", "Technician", "TX", true),
            record("Bolt", "Technician", "TX", false),
        ];

        let options = FilterOptions::from_records(&records);

        assert_eq!(options.partners, vec!["acme", "Acme", "Bolt"]);
        assert_eq!(options.roles, vec!["Electrician", "technician", "Technician"]);
        assert_eq!(options.regions, vec!["CA", "tx", "TX"]);
    }
}
