//! tfverify - provision a Terraform template, check its outputs, tear it down

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tfverify::cli::Cli;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout is reserved for human and JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
