//! Generate command implementation.
//!
//! Builds a manifest (by scanning, or by loading a saved one) and writes the
//! requested artifacts into the output directory.

use super::scan::{ScanArgs, scan_project};
use crate::config::Config;
use crate::formatters::format_output;
use crate::writer::write_generated;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use smrt_codegen::{Artifact, CodeGenerator};
use smrt_core::Manifest;
use smrt_core::cli::{ExitCode, OutputFormat};
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments of `smrt generate`.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Scan overrides, used when no manifest is given
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Generate from a saved manifest instead of scanning
    #[arg(long, conflicts_with = "paths")]
    pub manifest: Option<PathBuf>,

    /// Output directory (default: `generate.out_dir`)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Artifact to generate; repeat for several (default: `generate.artifacts`)
    #[arg(long = "artifact", num_args = 1)]
    pub artifacts: Vec<String>,
}

impl GenerateArgs {
    /// Applies the flags that were given on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: Config) -> Config {
        config.scan = self.scan.apply(config.scan);
        if let Some(out_dir) = &self.out_dir {
            config.generate.out_dir.clone_from(out_dir);
        }
        if !self.artifacts.is_empty() {
            config.generate.artifacts.clone_from(&self.artifacts);
        }
        config
    }
}

/// Report printed by `smrt generate`.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    /// Where the manifest came from: a file path or `scan`
    pub source: String,
    /// Objects in the manifest
    pub objects: usize,
    /// Output directory
    pub out_dir: String,
    /// Files written, in generation order
    pub files: Vec<WrittenFile>,
    /// Files that failed to scan
    pub failed_files: Vec<String>,
}

/// One written file in a [`GenerateReport`].
#[derive(Debug, Serialize)]
pub struct WrittenFile {
    /// Path relative to the output directory
    pub path: String,
    /// Size in bytes
    pub bytes: usize,
}

/// Runs the generate command.
///
/// Exits with [`ExitCode::INVALID_INPUT`] for unknown artifact names, a
/// missing scan path or an unreadable manifest, and with
/// [`ExitCode::PARTIAL_FAILURE`] when artifacts were written but some files
/// failed to scan.
///
/// # Errors
///
/// Returns an error if rendering or writing an artifact fails.
pub async fn run(
    args: GenerateArgs,
    config: Config,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let config = args.apply(config);

    let artifacts: Vec<Artifact> = match config.generate.artifacts() {
        Ok(artifacts) => artifacts,
        Err(e) => {
            warn!("{e}");
            return Ok(ExitCode::INVALID_INPUT);
        }
    };

    let (manifest, source, failed_files) = if let Some(path) = &args.manifest {
        match Manifest::load(path) {
            Ok(manifest) => (manifest, path.display().to_string(), Vec::new()),
            Err(e) => {
                warn!("{e}");
                return Ok(ExitCode::INVALID_INPUT);
            }
        }
    } else {
        let outcome = match scan_project(&config.scan).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("{e:#}");
                return Ok(ExitCode::INVALID_INPUT);
            }
        };
        let failed = outcome
            .results
            .iter()
            .filter(|r| r.has_errors())
            .map(|r| r.file_path.clone())
            .collect();
        (outcome.manifest, "scan".to_string(), failed)
    };

    if manifest.is_empty() {
        warn!("Manifest has no objects; generated files will be empty");
    }

    let generator = CodeGenerator::with_options(config.generate.generator_options())?;
    let code = generator.generate(&manifest, &artifacts)?;

    let out_dir = &config.generate.out_dir;
    write_generated(out_dir, &code)
        .with_context(|| format!("failed to write artifacts to {}", out_dir.display()))?;
    info!(
        "Wrote {} file(s), {} bytes, to {}",
        code.file_count(),
        code.total_bytes(),
        out_dir.display()
    );

    let report = GenerateReport {
        source,
        objects: manifest.objects.len(),
        out_dir: out_dir.display().to_string(),
        files: code
            .files()
            .map(|f| WrittenFile {
                path: f.path.clone(),
                bytes: f.content.len(),
            })
            .collect(),
        failed_files,
    };
    println!("{}", format_output(&report, output_format)?);

    if report.failed_files.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::PARTIAL_FAILURE)
    }
}
