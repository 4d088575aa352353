//! Inspect command implementation.
//!
//! Shows what a saved manifest contains: fields, methods and the operations
//! each surface will expose.

use crate::formatters::format_output;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use smrt_core::cli::{ExitCode, OutputFormat};
use smrt_core::{Manifest, MethodDescriptor, SourceObject, Surface};
use std::path::Path;
use tracing::warn;

/// Manifest-level report.
#[derive(Debug, Serialize)]
pub struct ManifestReport {
    /// Schema version
    pub version: String,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Objects in manifest order
    pub objects: Vec<ObjectReport>,
}

/// Everything known about one object.
#[derive(Debug, Serialize)]
pub struct ObjectReport {
    /// Manifest key
    pub name: String,
    /// Class name as declared
    pub class: String,
    /// Collection name
    pub collection: String,
    /// Declaring file
    pub file: String,
    /// Fields in declaration order
    pub fields: Vec<FieldReport>,
    /// Method signatures in declaration order
    pub methods: Vec<String>,
    /// Visible operations per surface
    pub surfaces: Vec<SurfaceReport>,
}

/// One field of an [`ObjectReport`].
#[derive(Debug, Serialize)]
pub struct FieldReport {
    /// Field name
    pub name: String,
    /// Semantic type
    #[serde(rename = "type")]
    pub kind: String,
    /// Required on create
    pub required: bool,
    /// Literal default, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Visibility on one surface.
#[derive(Debug, Serialize)]
pub struct SurfaceReport {
    /// Surface key (`api`, `mcp`, `cli`)
    pub surface: String,
    /// Operations exposed, in emission order
    pub operations: Vec<String>,
}

impl ObjectReport {
    /// Builds the report for one object.
    #[must_use]
    pub fn new(object: &SourceObject) -> Self {
        Self {
            name: object.name.clone(),
            class: object.class_name.clone(),
            collection: object.collection_name.clone(),
            file: object.file_path.clone(),
            fields: object
                .fields
                .iter()
                .map(|(name, field)| FieldReport {
                    name: name.clone(),
                    kind: serde_json::to_value(field.kind)
                        .ok()
                        .and_then(|v| v.as_str().map(ToString::to_string))
                        .unwrap_or_default(),
                    required: field.required,
                    default: field.default.clone(),
                })
                .collect(),
            methods: object.methods.values().map(signature).collect(),
            surfaces: Surface::ALL
                .iter()
                .map(|surface| SurfaceReport {
                    surface: surface.key().to_string(),
                    operations: object
                        .feature_config
                        .surface(*surface)
                        .allowed_operations()
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                })
                .collect(),
        }
    }
}

impl ManifestReport {
    /// Builds the report for a whole manifest.
    #[must_use]
    pub fn new(manifest: &Manifest) -> Self {
        Self {
            version: manifest.version.clone(),
            timestamp: manifest.timestamp,
            objects: manifest.objects.values().map(ObjectReport::new).collect(),
        }
    }
}

/// Renders a method as `[static ][async ]name(a: T, b?: U): R`.
fn signature(method: &MethodDescriptor) -> String {
    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| {
            let mark = if p.optional { "?" } else { "" };
            format!("{}{mark}: {}", p.name, p.type_label)
        })
        .collect();
    format!(
        "{}{}{}({}): {}",
        if method.is_static { "static " } else { "" },
        if method.is_async { "async " } else { "" },
        method.name,
        params.join(", "),
        method.return_type
    )
}

/// Runs the inspect command.
///
/// With `object`, reports only that object; the name is matched against the
/// manifest key or the declared class name, case-insensitively. An unknown
/// object exits with [`ExitCode::INVALID_INPUT`].
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed.
pub async fn run(
    manifest_path: &Path,
    object: Option<String>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let text = tokio::fs::read_to_string(manifest_path)
        .await
        .with_context(|| format!("failed to read manifest {}", manifest_path.display()))?;
    let manifest = Manifest::from_json(&text)
        .with_context(|| format!("invalid manifest {}", manifest_path.display()))?;

    let output = match object {
        Some(name) => {
            let Some(found) = manifest.objects.get(&name.to_lowercase()) else {
                warn!(
                    "No object '{name}' in {} (known: {})",
                    manifest_path.display(),
                    manifest.objects.keys().cloned().collect::<Vec<_>>().join(", ")
                );
                return Ok(ExitCode::INVALID_INPUT);
            };
            format_output(&ObjectReport::new(found), output_format)?
        }
        None => format_output(&ManifestReport::new(&manifest), output_format)?,
    };

    println!("{output}");
    Ok(ExitCode::SUCCESS)
}
