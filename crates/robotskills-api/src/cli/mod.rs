//! CLI command definitions and dispatch for the `rskills` binary.
//!
//! Uses clap derive macros for argument parsing. Workflow commands live under
//! `rskills submission`; `validate` checks a section file without touching the
//! database.

pub mod display;
pub mod status;
pub mod submission;
pub mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Track robot skill submissions from draft to publication.
#[derive(Parser)]
#[command(name = "rskills", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs as JSON lines.
    #[arg(long, global = true, env = "ROBOTSKILLS_LOG_JSON")]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "ROBOTSKILLS_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage submissions (create, list, show, set-section, submit, ...).
    #[command(alias = "sub")]
    Submission {
        #[command(subcommand)]
        action: submission::SubmissionCommand,
    },

    /// Validate a section payload file without storing it.
    Validate {
        /// Section kind: identity, assets, compatibility, permissions, package.
        kind: String,

        /// JSON file with the section payload (`-` for stdin).
        file: PathBuf,
    },

    /// Submission counts and system status.
    Status,

    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` in config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["rskills", "status", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["rskills", "validate", "package", "pkg.json"]).unwrap();
        match cli.command {
            Commands::Validate { kind, file } => {
                assert_eq!(kind, "package");
                assert_eq!(file, PathBuf::from("pkg.json"));
            }
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn test_serve_defaults_to_config() {
        let cli = Cli::try_parse_from(["rskills", "serve"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: None,
                host: None
            }
        ));
    }
}
