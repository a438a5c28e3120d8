//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// lambda-tools - Validate and resolve aws-lambda.yml configurations
#[derive(Parser, Debug)]
#[command(name = "ltools")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file, or a directory to look for aws-lambda.yml (or .yaml, .json) in
    #[arg(short, long, global = true)]
    pub source: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Validate the configuration document
    ///
    /// Legacy documents are migrated in memory first; the file is never
    /// rewritten.
    Check,

    /// List the functions defined in the configuration
    Functions {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Resolve names, aliases and roles into deployable identifiers
    ///
    /// Lookups are answered from a lookups file, so no cloud credentials
    /// are needed.
    ///
    /// Examples:
    ///   ltools resolve                        # Resolve every function
    ///   ltools resolve hello --json           # One function, as JSON
    ///   ltools resolve --lookups lookups.yml  # Use recorded resource names
    Resolve {
        /// Functions to resolve (all when omitted)
        names: Vec<String>,

        /// Account id used for role and dead-letter ARNs
        #[arg(long, env = "LTOOLS_ACCOUNT_ID")]
        account_id: Option<String>,

        /// Region for functions that do not name one
        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,

        /// YAML or JSON file with resource names, key aliases and account id
        #[arg(long, env = "LTOOLS_LOOKUPS")]
        lookups: Option<PathBuf>,

        /// Abort resolution after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print deployment requests as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show tool and configuration layout versions
    Version,
}
