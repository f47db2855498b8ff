//! cp command - Copy files and trees
//!
//! Copies between local filesystem and S3, in any of the four directions.

use std::path::PathBuf;

use bcp_core::{ConfigManager, Copier, CopyReport, CopySpec, RemoteConfig, Result};
use bcp_s3::S3Client;
use clap::Args;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Copy arguments
#[derive(Args, Debug)]
pub struct CpArgs {
    /// Source path (local path or s3://bucket/key)
    pub source: String,

    /// Destination path (local path or s3://bucket/key)
    pub target: String,

    /// Config file path
    #[arg(long, env = "BCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// S3 endpoint URL, overrides the config file
    #[arg(long, env = "BCP_ENDPOINT")]
    pub endpoint: Option<String>,

    /// S3 region, overrides the config file
    #[arg(long, env = "BCP_REGION")]
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
struct CpOutput {
    status: &'static str,
    source: String,
    target: String,
    files: u64,
    size_bytes: u64,
    size_human: String,
}

/// Execute the cp command
pub async fn execute(args: CpArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    match run(&args).await {
        Ok(report) => {
            if formatter.is_json() {
                formatter.json(&CpOutput {
                    status: "success",
                    source: args.source.clone(),
                    target: args.target.clone(),
                    files: report.files,
                    size_bytes: report.bytes,
                    size_human: report.size_human(),
                });
            } else {
                formatter.success(&format!(
                    "Copied {} file(s) ({}).",
                    report.files,
                    report.size_human()
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

async fn run(args: &CpArgs) -> Result<CopyReport> {
    let spec = CopySpec::new(&args.source, &args.target);

    if !spec.direction().needs_remote() {
        return Copier::local_only().run(&spec).await;
    }

    let remote = remote_config(args)?;
    // One client for the whole run, shared by every transfer
    let client = S3Client::new(&remote).await?;
    Copier::new(&client).run(&spec).await
}

/// Config file settings with command-line overrides applied
fn remote_config(args: &CpArgs) -> Result<RemoteConfig> {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new()?,
    };
    tracing::debug!("Loading config from {}", manager.config_path().display());
    let mut remote = manager.load()?.remote;

    if let Some(endpoint) = &args.endpoint {
        remote.endpoint = Some(endpoint.clone());
    }
    if let Some(region) = &args.region {
        remote.region = region.clone();
    }

    remote.validate()?;
    Ok(remote)
}
