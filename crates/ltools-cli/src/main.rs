//! lambda-tools CLI
//!
//! Validates aws-lambda.yml configurations and resolves them into
//! deployment requests.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::ResolveArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.source),
        None => {
            println!("{} lambda-tools", "ltools".green().bold());
            println!();
            println!("Run {} for available commands.", "ltools --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, source: Option<std::path::PathBuf>) -> Result<()> {
    let source = source.as_deref();
    match cmd {
        Commands::Check => commands::run_check(source),
        Commands::Functions { json } => commands::run_functions(source, json),
        Commands::Resolve {
            names,
            account_id,
            region,
            lookups,
            timeout_secs,
            json,
        } => {
            let args = ResolveArgs {
                names,
                account_id,
                region,
                lookups,
                timeout_secs,
                json,
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(commands::run_resolve(source, args))
        }
        Commands::Version => {
            println!("ltools {}", env!("CARGO_PKG_VERSION"));
            println!(
                "configuration layout version {}",
                ltools_schema::CURRENT_VERSION
            );
            Ok(())
        }
    }
}
