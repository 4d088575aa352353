//! Scan options and per-file scan results.

use crate::SourceObject;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker annotation recognized by default (`@smrt` / `@smrt(...)`).
pub const DEFAULT_MARKER: &str = "smrt";

/// Base classes a qualifying class may extend by default.
pub const DEFAULT_BASE_CLASSES: [&str; 3] = ["SmrtObject", "SmrtClass", "SmrtCollection"];

/// Options controlling what the scanner extracts.
///
/// # Examples
///
/// ```
/// use smrt_core::ScanOptions;
///
/// let options = ScanOptions::default();
/// assert!(!options.include_private_methods);
/// assert!(options.include_static_methods);
/// assert!(options.is_base_class("SmrtObject"));
///
/// let custom = ScanOptions::default().with_base_classes(["BaseObject"]);
/// assert!(custom.is_base_class("BaseObject"));
/// assert!(!custom.is_base_class("SmrtObject"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanOptions {
    /// Emit methods declared `private`
    pub include_private_methods: bool,

    /// Emit methods declared `static`
    pub include_static_methods: bool,

    /// Also scan files reached through relative imports
    pub follow_imports: bool,

    /// Class names accepted in an `extends` clause
    pub base_classes: Vec<String>,

    /// Identifier of the marker annotation
    pub marker: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_private_methods: false,
            include_static_methods: true,
            follow_imports: false,
            base_classes: DEFAULT_BASE_CLASSES.iter().map(ToString::to_string).collect(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

impl ScanOptions {
    /// Replaces the accepted base classes.
    #[must_use]
    pub fn with_base_classes<I, S>(mut self, base_classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_classes = base_classes.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the marker identifier.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Returns `true` if `name` is one of the accepted base classes.
    #[must_use]
    pub fn is_base_class(&self, name: &str) -> bool {
        self.base_classes.iter().any(|base| base == name)
    }
}

/// Category of a scan diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// The file could not be read
    Io,
    /// The file contains syntax the parser could not recover cleanly
    Parse,
    /// A marker argument was not a usable literal; defaults were applied
    Configuration,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Io => "io",
            Self::Parse => "parse",
            Self::Configuration => "configuration",
        })
    }
}

/// One problem found while scanning a file.
///
/// `line` and `column` are 1-based; both are `0` when the problem has no
/// position (for example an unreadable file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDiagnostic {
    /// Diagnostic category
    pub kind: DiagnosticKind,
    /// Human-readable description
    pub message: String,
    /// 1-based line, `0` when unknown
    pub line: usize,
    /// 1-based column, `0` when unknown
    pub column: usize,
}

impl ScanDiagnostic {
    /// Creates a diagnostic without a source position.
    #[must_use]
    pub fn unpositioned(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    /// Creates a diagnostic at a 1-based position.
    #[must_use]
    pub fn at(kind: DiagnosticKind, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}: {}", self.kind, self.message)
        } else {
            write!(f, "{}:{}: {}: {}", self.line, self.column, self.kind, self.message)
        }
    }
}

/// Everything extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Scanned file
    pub file_path: String,

    /// Qualifying classes in declaration order
    pub objects: Vec<SourceObject>,

    /// Failures that affected the whole file
    pub errors: Vec<ScanDiagnostic>,

    /// Soft failures; the affected objects were still emitted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScanDiagnostic>,
}

impl ScanResult {
    /// Creates an empty result for `file_path`.
    #[must_use]
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            objects: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A result with no objects and no errors carries no information and is
    /// left out of aggregate scan output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.errors.is_empty()
    }

    /// Returns `true` if any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
