//! The versioned manifest: single source of truth for every generator.
//!
//! A manifest is built fresh from a list of [`ScanResult`]s on every run.
//! Objects are keyed by their lower-cased name; when two results contain the
//! same key, the later one wins.
//!
//! # Examples
//!
//! ```
//! use smrt_core::{ManifestBuilder, ScanResult, SourceObject};
//!
//! let mut first = ScanResult::new("a.ts");
//! first.objects.push(SourceObject::new("Product", "a.ts"));
//!
//! let mut second = ScanResult::new("b.ts");
//! second.objects.push(SourceObject::new("Product", "b.ts"));
//!
//! let manifest = ManifestBuilder::new()
//!     .add_result(&first)
//!     .add_result(&second)
//!     .build();
//!
//! assert_eq!(manifest.objects.len(), 1);
//! assert_eq!(manifest.objects["product"].file_path, "b.ts");
//! ```

use crate::{Error, Operation, Result, ScanResult, SourceObject, Surface};
use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Schema version written into every manifest.
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Merged description of all scanned objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Schema version
    pub version: String,

    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,

    /// Objects keyed by lower-cased class name, in scan order
    pub objects: IndexMap<String, SourceObject>,
}

impl Manifest {
    /// Creates an empty manifest stamped with the current time.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            objects: IndexMap::new(),
        }
    }

    /// Returns `true` if no objects were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects whose `surface` is not fully disabled, in manifest order.
    pub fn objects_on(&self, surface: Surface) -> impl Iterator<Item = &SourceObject> {
        self.objects
            .values()
            .filter(move |obj| obj.feature_config.surface(surface).is_enabled())
    }

    /// Operations of `object` visible on `surface`; empty if the object is
    /// unknown.
    #[must_use]
    pub fn visible_operations(&self, object: &str, surface: Surface) -> Vec<Operation> {
        self.objects
            .get(object)
            .map(|obj| obj.feature_config.surface(surface).allowed_operations())
            .unwrap_or_default()
    }

    /// Serializes the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::SerializationError {
            message: "failed to serialize manifest".to_string(),
            source: Some(e),
        })
    }

    /// Parses a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if the text is not a manifest.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::SerializationError {
            message: "failed to parse manifest".to_string(),
            source: Some(e),
        })
    }

    /// Writes the manifest to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Saved manifest with {} objects to {}", self.objects.len(), path.display());
        Ok(())
    }

    /// Reads a manifest previously written by [`Manifest::save`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::ManifestParse`] if it is not a manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Accumulates scan results into a [`Manifest`].
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    objects: IndexMap<String, SourceObject>,
}

impl ManifestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts every object of `result`, replacing earlier entries with the
    /// same key.
    #[must_use]
    pub fn add_result(mut self, result: &ScanResult) -> Self {
        for object in &result.objects {
            self.insert(object.clone());
        }
        self
    }

    /// Inserts one object, replacing an earlier entry with the same key.
    pub fn insert(&mut self, object: SourceObject) {
        if let Some(previous) = self.objects.get(&object.name) {
            tracing::warn!(
                "Object '{}' from {} replaces the one from {}",
                object.name,
                object.file_path,
                previous.file_path
            );
        }
        self.objects.insert(object.name.clone(), object);
    }

    /// Finishes the manifest, stamping it with the current time.
    #[must_use]
    pub fn build(self) -> Manifest {
        Manifest {
            version: MANIFEST_VERSION.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            objects: self.objects,
        }
    }
}

/// Builds a manifest from scan results in order.
#[must_use]
pub fn build_manifest(results: &[ScanResult]) -> Manifest {
    results
        .iter()
        .fold(ManifestBuilder::new(), ManifestBuilder::add_result)
        .build()
}
