//! Core types for the smrt source-to-manifest pipeline.
//!
//! This crate holds the data every other stage agrees on:
//!
//! - The per-class model ([`SourceObject`], [`FieldDescriptor`],
//!   [`MethodDescriptor`]) produced by the scanner
//! - Feature configuration and the visibility rule shared by all generators
//!   ([`FeatureConfig`], [`SurfaceConfig`])
//! - Per-file [`ScanResult`]s and the merged, versioned [`Manifest`]
//! - The error hierarchy
//!
//! # Examples
//!
//! ```
//! use smrt_core::{build_manifest, Operation, ScanResult, SourceObject, Surface};
//!
//! let mut result = ScanResult::new("src/models.ts");
//! result.objects.push(SourceObject::new("Category", "src/models.ts"));
//!
//! let manifest = build_manifest(&[result]);
//! assert_eq!(manifest.objects["category"].collection_name, "categories");
//! assert!(manifest.visible_operations("category", Surface::Api).contains(&Operation::List));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;
mod feature;
mod manifest;
mod model;
mod operation;
mod scan;

pub mod cli;

pub use error::{Error, Result};
pub use feature::{FeatureConfig, SurfaceConfig};
pub use manifest::{MANIFEST_VERSION, Manifest, ManifestBuilder, build_manifest};
pub use model::{
    FieldDescriptor, FieldKind, MethodDescriptor, ParameterDescriptor, SourceObject, pluralize,
};
pub use operation::{Operation, Surface};
pub use scan::{
    DEFAULT_BASE_CLASSES, DEFAULT_MARKER, DiagnosticKind, ScanDiagnostic, ScanOptions, ScanResult,
};
