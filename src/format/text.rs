//! Human-readable text output formatter

use crate::config::Config;
use crate::coverage::{CoverageResult, ScoredRecord};
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::record::ProviderRecord;
use crate::session::{Snapshot, ViewportChange};
use std::fmt::Write as _;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn provider_line(record: &ProviderRecord) -> String {
    let mut line = format!(
        "[{}] {} ({}, {})",
        record.role_label(),
        record.display_name(),
        or_dash(&record.partner),
        or_dash(&record.role),
    );
    if !record.region.is_empty() {
        let _ = write!(line, " {}", record.region);
    }
    if !record.price.is_empty() {
        let _ = write!(line, " - {}", record.price);
    }
    line
}

fn scored_line(index: usize, scored: &ScoredRecord) -> String {
    format!(
        "  {}. {} - {:.1} mi (radius {} mi)",
        index + 1,
        provider_line(&scored.record),
        scored.distance_miles,
        scored.radius_miles
    )
}

fn write_matches(output: &mut String, heading: &str, list: &[ScoredRecord]) {
    let _ = writeln!(output, "{}", heading);
    for (i, scored) in list.iter().enumerate() {
        let _ = writeln!(output, "{}", scored_line(i, scored));
    }
    output.push('\n');
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, snapshot: &Snapshot, config: &Config) -> Result<String> {
        let mut output = String::new();

        let criteria = &snapshot.criteria;
        let _ = writeln!(
            output,
            "Filters: partner={} role={} region={}",
            criteria.partner, criteria.role, criteria.region
        );
        let _ = writeln!(output, "{}", snapshot.counts_message);

        if let Some(job) = &snapshot.job {
            let coverage = &config.coverage;
            let _ = writeln!(output, "Job: {} ({:.5}, {:.5})", job.label, job.lat, job.lng);
            let _ = writeln!(
                output,
                "Radius: {} mi ({}), outside cap {} mi",
                coverage.fixed_radius_miles, coverage.radius_mode, coverage.max_outside_miles
            );
        }
        output.push('\n');

        match &snapshot.coverage {
            Some(CoverageResult::Eligible(list)) => {
                write_matches(&mut output, "Eligible:", list);
            }
            Some(CoverageResult::NearestOutside(list)) => {
                write_matches(&mut output, "Nearest outside coverage:", list);
            }
            Some(_) => {}
            None => {
                for shown in &snapshot.shown {
                    let _ = writeln!(
                        output,
                        "  {} [{} mi]",
                        provider_line(&shown.record),
                        shown.radius_miles
                    );
                }
                if !snapshot.shown.is_empty() {
                    output.push('\n');
                }
            }
        }

        match &snapshot.viewport {
            ViewportChange::Fit(b) => {
                let _ = writeln!(
                    output,
                    "Viewport: fit ({:.4}, {:.4}) - ({:.4}, {:.4})",
                    b.south, b.west, b.north, b.east
                );
            }
            ViewportChange::Recenter(job) => {
                let _ = writeln!(output, "Viewport: recenter on ({:.5}, {:.5})", job.lat, job.lng);
            }
            ViewportChange::Unchanged => {
                let _ = writeln!(output, "Viewport: unchanged");
            }
        }

        let _ = writeln!(output, "Status: {}", snapshot.status);

        Ok(output)
    }
}
