//! coverage-map CLI entry point
//!
//! Provider coverage lookups - CLI + web app

use coverage_map::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
