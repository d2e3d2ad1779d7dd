use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// funcstack command line interface
#[derive(Parser)]
#[command(name = "funcstack")]
#[command(about = "Build, provision and publish stacks of serverless function apps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct FuncstackCli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON file overriding file names, naming and retry settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Capture external tool output without echoing it
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover a stack and list its deployments and functions
    Inspect {
        /// Stack root directory
        root: PathBuf,
        /// Record build commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Deploy every unit of a stack, rolling back on failure
    Deploy {
        /// Stack root directory
        root: PathBuf,
        /// Tear the stack down again after a successful deploy
        #[arg(long)]
        remove_after: bool,
        /// Show the commands that would run without executing them
        #[arg(long)]
        dry_run: bool,
        /// Publish attempts per unit, including the first
        #[arg(long)]
        publish_attempts: Option<u32>,
        /// Pause between publish attempts (seconds)
        #[arg(long)]
        publish_delay_secs: Option<u64>,
    },

    /// Check that the external tools are installed
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub remove_after: bool,
    pub dry_run: bool,
    pub publish_attempts: Option<u32>,
    pub publish_delay_secs: Option<u64>,
    pub quiet: bool,
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deploy_with_overrides() {
        let cli = FuncstackCli::try_parse_from([
            "funcstack",
            "-vv",
            "deploy",
            "./stack",
            "--remove-after",
            "--publish-attempts",
            "3",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Deploy {
                root,
                remove_after,
                dry_run,
                publish_attempts,
                publish_delay_secs,
            } => {
                assert_eq!(root, PathBuf::from("./stack"));
                assert!(remove_after);
                assert!(!dry_run);
                assert_eq!(publish_attempts, Some(3));
                assert_eq!(publish_delay_secs, None);
            }
            _ => panic!("Expected deploy command"),
        }
    }

    #[test]
    fn test_root_is_required() {
        assert!(FuncstackCli::try_parse_from(["funcstack", "inspect"]).is_err());
    }
}
