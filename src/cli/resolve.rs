//! Resolve command handler
//!
//! Finds the providers that can serve one job location.

use crate::cli::{init_tracing, load_session, render, DataArgs, FilterArgs};
use crate::config::{check_non_negative, check_radius, Config};
use crate::coverage::RadiusMode;
use crate::error::{Error, Result};
use crate::geo::{get_geocoder, GeoBackend, JobPoint};
use crate::session::{SearchOutcome, Session};
use clap::Args;

/// Resolve command arguments
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Job address (geocoded)
    #[arg(long, short = 'a', conflicts_with_all = ["lat", "lng"])]
    pub address: Option<String>,

    /// Job latitude
    #[arg(long, allow_negative_numbers = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Job longitude
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lng: Option<f64>,

    /// Coverage radius in miles
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Outside cap in miles
    #[arg(long)]
    pub max_outside: Option<f64>,

    /// Use each provider's own radius when the table has one
    #[arg(long)]
    pub per_record_radius: bool,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Where the job ended up after reading the arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// The session has a job point
    Placed,
    /// The address had no match; carries the status line
    NoMatch(String),
}

/// Copy command-line thresholds into the config, rejecting bad values
pub fn apply_overrides(config: &mut Config, args: &ResolveArgs) -> Result<()> {
    if let Some(radius) = args.radius {
        config.coverage.fixed_radius_miles = check_radius("--radius", radius)?;
    }
    if let Some(max_outside) = args.max_outside {
        config.coverage.max_outside_miles = check_non_negative("--max-outside", max_outside)?;
    }
    if args.per_record_radius {
        config.coverage.radius_mode = RadiusMode::PerRecord.to_string();
    }
    Ok(())
}

/// Set the session's job from `--address` or `--lat/--lng`
///
/// A geocoder failure comes back as `Error::Geocoding` with its status.
pub async fn place_job<G: GeoBackend>(
    session: &mut Session,
    geocoder: &G,
    args: &ResolveArgs,
) -> Result<Placement> {
    if let Some(address) = &args.address {
        let ticket = session.begin_search(address)?;
        let response = geocoder.geocode(ticket.address()).await?;

        return match session.complete_search(ticket, Ok(response)) {
            SearchOutcome::Found(label) => {
                eprintln!("Geocoded to: {}", label);
                Ok(Placement::Placed)
            }
            outcome => Ok(Placement::NoMatch(outcome.status_message())),
        };
    }

    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            session.set_job(JobPoint::new(lat, lng, format!("{:.5}, {:.5}", lat, lng))?);
            Ok(Placement::Placed)
        }
        _ => Err(Error::InvalidInput(
            "No job location specified. Use --address or --lat/--lng".to_string(),
        )),
    }
}

/// Run the resolve command
pub async fn run(args: ResolveArgs) -> Result<()> {
    init_tracing("warn");

    let mut config = Config::load()?;
    apply_overrides(&mut config, &args)?;

    let mut session = load_session(&config, &args.data)?;
    session.set_criteria(args.filters.criteria());

    let geocoder = get_geocoder(&config.geocoder.url)?;
    if let Placement::NoMatch(status) = place_job(&mut session, &geocoder, &args).await? {
        println!("{}", status);
        return Ok(());
    }

    let output = render(&session.snapshot(), args.format.as_deref(), &config)?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(extra: &[&str]) -> ResolveArgs {
        let mut argv = vec!["coverage-map", "resolve"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Resolve(args) => args,
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = Config::default();
        let args = parse(&["--radius", "40", "--max-outside", "120", "--per-record-radius"]);
        apply_overrides(&mut config, &args).unwrap();

        let resolver = config.resolver_config().unwrap();
        assert_eq!(resolver.fixed_radius_miles, 40.0);
        assert_eq!(resolver.max_outside_miles, 120.0);
        assert_eq!(resolver.radius_mode, RadiusMode::PerRecord);
    }

    #[test]
    fn test_bad_radius_rejected() {
        for bad in ["0", "-5", "NaN"] {
            let mut config = Config::default();
            let radius = format!("--radius={bad}");
            let args = parse(&["--lat", "32.76", "--lng", "-97.34", radius.as_str()]);
            let err = apply_overrides(&mut config, &args).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "radius {bad}: {err}");
            assert_eq!(config.coverage.fixed_radius_miles, 100.0);
        }
    }

    #[test]
    fn test_bad_max_outside_rejected() {
        let mut config = Config::default();
        let args = parse(&["--max-outside=-1"]);
        assert!(apply_overrides(&mut config, &args).is_err());
    }
}
