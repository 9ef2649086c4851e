//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod filters;
pub mod providers;
pub mod resolve;
pub mod serve;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use crate::format::get_formatter;
use crate::record::load::load_path;
use crate::session::{Session, Snapshot};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Service-provider coverage for job locations
#[derive(Parser)]
#[command(name = "coverage-map")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find providers that can serve a job location
    Resolve(resolve::ResolveArgs),

    /// List providers passing the filters
    Providers(providers::ProvidersArgs),

    /// Show available partners, roles and regions
    Filters(filters::FiltersArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),
}

/// Provider table selection shared by commands that load data
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Provider CSV (defaults to data.path from config)
    #[arg(long, short = 'd')]
    pub data: Option<PathBuf>,
}

impl DataArgs {
    pub fn path(&self, config: &Config) -> PathBuf {
        self.data
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.data.path))
    }
}

/// Filter selection shared by commands that filter
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Partner to show ("All" for every partner)
    #[arg(long)]
    pub partner: Option<String>,

    /// Role to show ("All" for every role)
    #[arg(long)]
    pub role: Option<String>,

    /// Region code to show ("All" for every region)
    #[arg(long)]
    pub region: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::all()
            .with_partner(self.partner.clone())
            .with_role(self.role.clone())
            .with_region(self.region.clone())
    }
}

/// Initialize logging; RUST_LOG overrides the default level
pub fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load providers and build a session from config
pub fn load_session(config: &Config, data: &DataArgs) -> Result<Session> {
    let records = load_path(&data.path(config))?;
    Ok(Session::new(records, config.resolver_config()?, config.fit_policy()))
}

/// Render a snapshot in the requested (or configured) format
pub fn render(snapshot: &Snapshot, format: Option<&str>, config: &Config) -> Result<String> {
    let format = format.unwrap_or(&config.output.format);
    let formatter = get_formatter(format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
    formatter.format(snapshot, config)
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve(args) => resolve::run(args).await,
        Commands::Providers(args) => providers::run(args),
        Commands::Filters(args) => filters::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Serve(args) => serve::run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selection;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_args_to_criteria() {
        let args = FilterArgs {
            partner: Some("Acme".to_string()),
            role: None,
            region: Some("tx".to_string()),
        };
        let criteria = args.criteria();
        assert_eq!(criteria.partner, Selection::Only("Acme".to_string()));
        assert_eq!(criteria.role, Selection::All);
        assert_eq!(criteria.region, Selection::Only("TX".to_string()));
    }

    #[test]
    fn test_data_path_override() {
        let config = Config::default();
        assert_eq!(DataArgs::default().path(&config), PathBuf::from("data.csv"));

        let args = DataArgs {
            data: Some(PathBuf::from("/tmp/other.csv")),
        };
        assert_eq!(args.path(&config), PathBuf::from("/tmp/other.csv"));
    }

    #[test]
    fn test_parse_resolve_command() {
        let cli = Cli::try_parse_from([
            "coverage-map",
            "resolve",
            "--lat",
            "32.76",
            "--lng",
            "-97.34",
            "--partner",
            "Acme",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.lat, Some(32.76));
                assert_eq!(args.filters.partner.as_deref(), Some("Acme"));
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_address_conflicts_with_coordinates() {
        let result = Cli::try_parse_from([
            "coverage-map",
            "resolve",
            "--address",
            "Fort Worth",
            "--lat",
            "32.0",
        ]);
        assert!(result.is_err());
    }
}
