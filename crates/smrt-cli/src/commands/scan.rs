//! Scan command implementation.
//!
//! Discovers source files, scans them concurrently, merges the results into
//! a manifest and reports what was found.

use crate::config::ScanConfig;
use crate::formatters::format_output;
use crate::writer::write_atomic;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use smrt_core::cli::{ExitCode, OutputFormat};
use smrt_core::{Manifest, ScanDiagnostic, ScanOptions, ScanResult, build_manifest};
use smrt_scanner::{ScanQueue, Scanner, collect_diagnostics, discover_files};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Flags shared by `scan` and `generate` that override `[scan]` settings.
#[derive(Debug, Clone, Default, Args)]
pub struct ScanArgs {
    /// Files or directories to scan (default: `scan.include`)
    pub paths: Vec<PathBuf>,

    /// Accepted base class; repeat for several (default: `scan.base_classes`)
    #[arg(long = "base-class", num_args = 1)]
    pub base_classes: Vec<String>,

    /// Marker annotation identifier (default: `scan.marker`)
    #[arg(long)]
    pub marker: Option<String>,

    /// Also emit methods declared `private`
    #[arg(long)]
    pub include_private: bool,

    /// Leave out methods declared `static`
    #[arg(long)]
    pub no_static: bool,

    /// Also scan files reached through relative imports
    #[arg(long)]
    pub follow_imports: bool,
}

impl ScanArgs {
    /// Applies the flags that were given on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: ScanConfig) -> ScanConfig {
        if !self.paths.is_empty() {
            config.include.clone_from(&self.paths);
        }
        if !self.base_classes.is_empty() {
            config.base_classes.clone_from(&self.base_classes);
        }
        if let Some(marker) = &self.marker {
            config.marker.clone_from(marker);
        }
        if self.include_private {
            config.include_private_methods = true;
        }
        if self.no_static {
            config.include_static_methods = false;
        }
        if self.follow_imports {
            config.follow_imports = true;
        }
        config
    }
}

/// Outcome of scanning a project.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Number of files read, including files reached through imports
    pub files_scanned: usize,
    /// Non-empty results in input order
    pub results: Vec<ScanResult>,
    /// Manifest built from `results`
    pub manifest: Manifest,
}

impl ScanOutcome {
    /// Returns `true` if any file reported an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(ScanResult::has_errors)
    }

    /// Exit code for a finished run: partial failure when any file failed.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.has_errors() {
            ExitCode::PARTIAL_FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Scans `files` concurrently, one blocking task per file.
///
/// This is the parallel counterpart of
/// [`Scanner::scan_files`](smrt_scanner::Scanner::scan_files): both walk a
/// [`ScanQueue`] round by round, so every file is scanned at most once and
/// results come back in the same order regardless of completion order.
/// Empty results are dropped.
///
/// Returns the number of files scanned and the non-empty results.
///
/// # Errors
///
/// Returns an error only if a scan task panics.
pub async fn scan_paths(
    files: Vec<PathBuf>,
    options: ScanOptions,
) -> Result<(usize, Vec<ScanResult>)> {
    let mut queue = ScanQueue::new(files, options.follow_imports);
    let scanner = Arc::new(Scanner::new(options));
    let mut results = Vec::new();

    loop {
        let batch = queue.next_round();
        if batch.is_empty() {
            break;
        }
        debug!("Scanning {} file(s) concurrently", batch.len());

        let mut tasks = JoinSet::new();
        for (index, path) in batch.into_iter().enumerate() {
            let scanner = Arc::clone(&scanner);
            tasks.spawn_blocking(move || (index, scanner.scan_file_with_imports(&path)));
        }

        let mut finished = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            finished.push(joined.context("scan task failed")?);
        }
        finished.sort_by_key(|(index, _)| *index);

        for (_, (result, imported)) in finished {
            queue.push_imports(imported);
            if !result.is_empty() {
                results.push(result);
            }
        }
    }

    Ok((queue.scanned(), results))
}

/// Discovers and scans the files described by `config`.
///
/// # Errors
///
/// Returns an error if a configured path does not exist or a scan task
/// panics. Per-file failures are reported inside the results instead.
pub async fn scan_project(config: &ScanConfig) -> Result<ScanOutcome> {
    let files = discover_files(&config.include, &config.extensions, &config.exclude)
        .context("failed to collect source files")?;
    info!("Found {} source file(s)", files.len());

    let (files_scanned, results) = scan_paths(files, config.scan_options()).await?;
    let manifest = build_manifest(&results);

    for (file, diagnostic) in collect_diagnostics(&results) {
        warn!("{file}: {diagnostic}");
    }
    info!(
        "Scanned {files_scanned} file(s), found {} object(s)",
        manifest.objects.len()
    );

    Ok(ScanOutcome {
        files_scanned,
        results,
        manifest,
    })
}

/// Report printed by `smrt scan`.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Files read
    pub files_scanned: usize,
    /// One entry per object, in manifest order
    pub objects: Vec<ObjectSummary>,
    /// File-level failures
    pub errors: Vec<DiagnosticEntry>,
    /// Soft failures
    pub warnings: Vec<DiagnosticEntry>,
    /// Where the manifest was written, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
}

/// One object in a [`ScanReport`].
#[derive(Debug, Serialize)]
pub struct ObjectSummary {
    /// Class name as declared
    pub class: String,
    /// Collection name
    pub collection: String,
    /// Declaring file
    pub file: String,
    /// Number of fields
    pub fields: usize,
    /// Number of methods
    pub methods: usize,
}

/// One diagnostic in a [`ScanReport`].
#[derive(Debug, Serialize)]
pub struct DiagnosticEntry {
    /// File the diagnostic belongs to
    pub file: String,
    /// `line:column: kind: message`
    pub message: String,
}

impl ScanReport {
    /// Builds the report for a finished scan.
    #[must_use]
    pub fn new(outcome: &ScanOutcome, manifest_path: Option<&Path>) -> Self {
        Self {
            files_scanned: outcome.files_scanned,
            objects: outcome
                .manifest
                .objects
                .values()
                .map(|obj| ObjectSummary {
                    class: obj.class_name.clone(),
                    collection: obj.collection_name.clone(),
                    file: obj.file_path.clone(),
                    fields: obj.fields.len(),
                    methods: obj.methods.len(),
                })
                .collect(),
            errors: diagnostic_entries(&outcome.results, |r| &r.errors),
            warnings: diagnostic_entries(&outcome.results, |r| &r.warnings),
            manifest: manifest_path.map(|p| p.display().to_string()),
        }
    }
}

/// Runs the scan command.
///
/// Prints a [`ScanReport`] and, with `output`, writes the manifest there.
/// Exits with [`ExitCode::PARTIAL_FAILURE`] when some files failed and
/// [`ExitCode::INVALID_INPUT`] when a scan path does not exist.
///
/// # Errors
///
/// Returns an error if the manifest cannot be written or the report cannot
/// be formatted.
pub async fn run(
    config: ScanConfig,
    output: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let outcome = match scan_project(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("{e:#}");
            return Ok(ExitCode::INVALID_INPUT);
        }
    };

    if let Some(path) = &output {
        let json = outcome.manifest.to_json_pretty()?;
        let (dir, name) = split_output_path(path);
        write_atomic(dir, name, &json)
            .with_context(|| format!("failed to write manifest to {}", path.display()))?;
        info!("Wrote manifest to {}", path.display());
    }

    let report = ScanReport::new(&outcome, output.as_deref());
    println!("{}", format_output(&report, output_format)?);
    Ok(outcome.exit_code())
}

/// Splits a user-supplied output file into the directory to write into and
/// the bare file name.
pub(crate) fn split_output_path(path: &Path) -> (&Path, &Path) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path.file_name().map_or(path, Path::new);
    (dir, name)
}

fn diagnostic_entries(
    results: &[ScanResult],
    pick: impl Fn(&ScanResult) -> &Vec<ScanDiagnostic>,
) -> Vec<DiagnosticEntry> {
    results
        .iter()
        .flat_map(|result| {
            pick(result).iter().map(|d| DiagnosticEntry {
                file: result.file_path.clone(),
                message: d.to_string(),
            })
        })
        .collect()
}
