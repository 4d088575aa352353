//! smrt command-line interface.
//!
//! Scans TypeScript sources for classes carrying the `@smrt` marker, builds
//! the manifest and generates artifacts from it.
//!
//! # Examples
//!
//! ```bash
//! # Scan src/ and save the manifest
//! smrt scan src --output manifest.json
//!
//! # Generate every artifact into ./generated
//! smrt generate src --out-dir generated
//!
//! # Show what the API surface exposes for one object
//! smrt inspect manifest.json Product
//! ```

#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use smrt_cli::commands;
use smrt_cli::{Config, GenerateArgs, ScanArgs};
use smrt_core::cli::{ExitCode, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// smrt - scan annotated TypeScript classes and generate code from them.
#[derive(Parser, Debug)]
#[command(name = "smrt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,

    /// Project configuration file (default: ./smrt.toml when present)
    #[arg(long, global = true, env = "SMRT_CONFIG")]
    config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan sources and report the objects found.
    ///
    /// Files are scanned concurrently. Files that fail to read or parse are
    /// reported and the rest of the run continues.
    Scan {
        #[command(flatten)]
        args: ScanArgs,

        /// Write the manifest to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate artifacts from sources or a saved manifest.
    Generate(GenerateArgs),

    /// Show the contents of a saved manifest.
    Inspect {
        /// Manifest file written by `smrt scan --output`
        manifest: PathBuf,

        /// Only show this object (class name or manifest key)
        object: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{} {e:#}", "error:".red().bold());
        return ExitCode::ERROR.into();
    }

    let output_format = match cli.format.parse::<OutputFormat>() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::INVALID_INPUT.into();
        }
    };
    if output_format.is_machine_readable() {
        colored::control::set_override(false);
    }

    let exit_code = match execute_command(cli.command, cli.config, output_format).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::ERROR
        }
    };
    tracing::debug!("Exiting with status {exit_code}");
    exit_code.into()
}

/// Installs the stderr log subscriber; `RUST_LOG` applies unless
/// `--verbose` forces debug.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Loads the project configuration; a bad file is invalid input.
fn load_config(path: Option<&std::path::Path>) -> Option<Config> {
    match Config::discover(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            None
        }
    }
}

async fn execute_command(
    command: Commands,
    config_path: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    match command {
        Commands::Scan { args, output } => {
            let Some(config) = load_config(config_path.as_deref()) else {
                return Ok(ExitCode::INVALID_INPUT);
            };
            commands::scan::run(args.apply(config.scan), output, output_format).await
        }
        Commands::Generate(args) => {
            let Some(config) = load_config(config_path.as_deref()) else {
                return Ok(ExitCode::INVALID_INPUT);
            };
            commands::generate::run(args, config, output_format).await
        }
        Commands::Inspect { manifest, object } => {
            commands::inspect::run(&manifest, object, output_format).await
        }
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd).await
        }
    }
}
