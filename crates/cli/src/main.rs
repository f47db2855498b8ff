//! bcp - copy between local disk and S3-compatible object storage
//!
//! `bcp <SOURCE> <DESTINATION>`, where either side is a local path or
//! `s3://bucket/key`.

use bucketcp::commands::{self, Cli};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log filter used when RUST_LOG is unset
fn default_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("info,bcp=debug,bucketcp=debug,bcp_core=debug,bcp_s3=debug")
    } else {
        EnvFilter::new("info")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Missing positionals exit here with a usage message and code 2
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(cli.debug)))
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
