//! CLI definition and execution
//!
//! bcp takes no subcommand: the two positionals and the connection flags live
//! in [`cp::CpArgs`], the output and logging flags here.

use clap::Parser;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

pub mod cp;

/// bcp - copy files and directory trees between local disk and S3
///
/// Either side may be a local path or s3://bucket/key. Directories and
/// key prefixes are copied recursively, file by file.
#[derive(Parser, Debug)]
#[command(name = "bcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub copy: cp::CpArgs,

    /// Print the summary and errors as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Suppress the summary line
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    cp::execute(cli.copy, output_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_two_positionals() {
        let cli = Cli::try_parse_from(["bcp", "a/b.txt", "s3://bucket/x/y.txt"]).unwrap();
        assert_eq!(cli.copy.source, "a/b.txt");
        assert_eq!(cli.copy.target, "s3://bucket/x/y.txt");
        assert!(!cli.json);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_missing_arguments() {
        for args in [vec!["bcp"], vec!["bcp", "only-source"]] {
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(
                err.kind(),
                clap::error::ErrorKind::MissingRequiredArgument
            );
            assert_eq!(err.exit_code(), ExitCode::UsageError.as_i32());
        }
    }

    #[test]
    fn test_cli_rejects_third_positional() {
        assert!(Cli::try_parse_from(["bcp", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "bcp",
            "--json",
            "--endpoint",
            "http://localhost:9000",
            "s3://b/k",
            "out",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(
            cli.copy.endpoint.as_deref(),
            Some("http://localhost:9000")
        );
    }
}
