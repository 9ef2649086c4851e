//! Providers command handler
//!
//! Lists the providers passing the filters and the box a map would fit.

use crate::cli::{init_tracing, load_session, render, DataArgs, FilterArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::viewport::region_bounds;
use clap::Args;

/// Providers command arguments
#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Print the zoom box for the selected region instead of the list
    #[arg(long, requires = "region")]
    pub zoom: bool,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Run the providers command
pub fn run(args: ProvidersArgs) -> Result<()> {
    init_tracing("warn");

    let config = Config::load()?;

    if args.zoom {
        let region = args.filters.criteria().region;
        if region.is_all() {
            return Err(Error::InvalidInput("--zoom needs a specific --region".to_string()));
        }
        match region_bounds(region.as_str()) {
            Some(b) => println!("{:.4},{:.4},{:.4},{:.4}", b.south, b.west, b.north, b.east),
            None => eprintln!("No zoom box known for region {}", region),
        }
        return Ok(());
    }

    let mut session = load_session(&config, &args.data)?;
    session.set_criteria(args.filters.criteria());

    let output = render(&session.snapshot(), args.format.as_deref(), &config)?;
    println!("{}", output);

    Ok(())
}
