//! TypeScript source scanning for the smrt pipeline.
//!
//! Parses source files with tree-sitter, finds classes that carry the marker
//! annotation (`@smrt` or `@smrt({...})`) **and** extend one of the
//! configured base classes, and describes each as a
//! [`SourceObject`](smrt_core::SourceObject).
//!
//! Scanning is whole-file and best-effort: syntax errors, unreadable files,
//! and malformed marker configuration are recorded in the per-file
//! [`ScanResult`](smrt_core::ScanResult) and never abort a multi-file run.
//!
//! # Examples
//!
//! ```
//! use smrt_core::ScanOptions;
//! use smrt_scanner::Scanner;
//!
//! let source = r#"
//!     @smrt({ api: { exclude: ['delete'] } })
//!     export class Product extends SmrtObject {
//!         name: string = '';
//!         price = 0;
//!     }
//! "#;
//!
//! let scanner = Scanner::new(ScanOptions::default());
//! let result = scanner.scan_source("product.ts", source);
//!
//! let product = &result.objects[0];
//! assert_eq!(product.collection_name, "products");
//! assert_eq!(product.fields.len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod class;
mod discovery;
mod imports;
mod infer;
mod literal;
mod scanner;
mod syntax;

pub use discovery::{DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS, discover_files};
pub use scanner::{ScanQueue, Scanner, collect_diagnostics, scan_files};
