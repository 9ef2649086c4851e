//! Filters command handler
//!
//! Shows the values each selector offers for the loaded table.

use crate::cli::{init_tracing, load_session, DataArgs};
use crate::config::Config;
use crate::constants::ALL;
use crate::error::Result;
use clap::Args;

/// Filters command arguments
#[derive(Args, Debug)]
pub struct FiltersArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Run the filters command
pub fn run(args: FiltersArgs) -> Result<()> {
    init_tracing("warn");

    let config = Config::load()?;
    let session = load_session(&config, &args.data)?;
    let options = session.filter_options();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    for (label, values) in [
        ("Partners", &options.partners),
        ("Roles", &options.roles),
        ("Regions", &options.regions),
    ] {
        println!("{}:", label);
        println!("  {}", ALL);
        for value in values {
            println!("  {}", value);
        }
        println!();
    }

    Ok(())
}
