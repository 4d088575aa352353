//! File-level scanning and failure containment.

use crate::class::ClassExtractor;
use crate::imports;
use crate::syntax::{self, Dialect, first_error, position};
use smrt_core::{DiagnosticKind, ScanDiagnostic, ScanOptions, ScanResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Scans TypeScript files for marked classes.
///
/// A `Scanner` holds only its options and can be shared freely across
/// threads; every call parses from scratch.
///
/// # Examples
///
/// ```
/// use smrt_core::ScanOptions;
/// use smrt_scanner::Scanner;
///
/// let scanner = Scanner::new(ScanOptions::default());
/// let result = scanner.scan_source("plain.ts", "class Helper extends SmrtObject {}");
///
/// // No marker annotation: nothing qualifies, and that is not an error.
/// assert!(result.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    /// Creates a scanner with the given options.
    #[must_use]
    pub const fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Returns the scan options.
    #[must_use]
    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scans `paths` in order and returns the non-empty results.
    ///
    /// With `follow_imports` set, files reached through relative imports are
    /// appended to the work list; each file is scanned at most once.
    /// A file that cannot be read or parsed produces an error-only result and
    /// the run continues.
    pub fn scan_files<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<ScanResult> {
        let mut queue = ScanQueue::new(
            paths.iter().map(|p| p.as_ref().to_path_buf()),
            self.options.follow_imports,
        );
        let mut results = Vec::new();

        loop {
            let round = queue.next_round();
            if round.is_empty() {
                break;
            }
            for path in round {
                let (result, imported) = self.scan_file_with_imports(&path);
                queue.push_imports(imported);
                if !result.is_empty() {
                    results.push(result);
                }
            }
        }

        tracing::info!(
            "Scanned {} files, {} with findings",
            queue.scanned(),
            results.len()
        );
        results
    }

    /// Scans one file from disk.
    ///
    /// Always returns a result, even when it is empty.
    pub fn scan_file(&self, path: impl AsRef<Path>) -> ScanResult {
        self.scan_file_with_imports(path.as_ref()).0
    }

    /// Scans one file and also returns the existing files it imports
    /// through relative specifiers.
    pub fn scan_file_with_imports(&self, path: impl AsRef<Path>) -> (ScanResult, Vec<PathBuf>) {
        let path = path.as_ref();
        let display = path.display().to_string();
        tracing::debug!("Scanning {}", path.display());

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", path.display());
                let mut result = ScanResult::new(display);
                result.errors.push(ScanDiagnostic::unpositioned(
                    DiagnosticKind::Io,
                    format!("failed to read file: {e}"),
                ));
                return (result, Vec::new());
            }
        };

        let (result, specifiers) = self.scan_text(&display, &source);
        let imported = specifiers
            .iter()
            .filter_map(|specifier| imports::resolve(path, specifier))
            .collect();
        (result, imported)
    }

    /// Scans in-memory source text as if it were the file `file_path`.
    pub fn scan_source(&self, file_path: &str, source: &str) -> ScanResult {
        self.scan_text(file_path, source).0
    }

    fn scan_text(&self, file_path: &str, source: &str) -> (ScanResult, Vec<String>) {
        let mut result = ScanResult::new(file_path);

        let tree = match syntax::parse(source, Dialect::for_path(file_path)) {
            Ok(tree) => tree,
            Err(message) => {
                result
                    .errors
                    .push(ScanDiagnostic::unpositioned(DiagnosticKind::Parse, message));
                return (result, Vec::new());
            }
        };
        let root = tree.root_node();

        if let Some(node) = first_error(root) {
            let (line, column) = position(node);
            let message = if node.is_missing() {
                format!("missing '{}'", node.kind())
            } else {
                format!("unexpected syntax near '{}'", snippet(syntax::text(node, source)))
            };
            tracing::warn!("{file_path}:{line}:{column}: {message}");
            result
                .errors
                .push(ScanDiagnostic::at(DiagnosticKind::Parse, message, line, column));
        }

        let extraction = ClassExtractor::new(&self.options, source, file_path).extract(root);
        result.objects = extraction.objects;
        result.warnings = extraction.warnings;

        (result, imports::specifiers(root, source))
    }
}

/// Scans `paths` with `options`; see [`Scanner::scan_files`].
pub fn scan_files<P: AsRef<Path>>(paths: &[P], options: &ScanOptions) -> Vec<ScanResult> {
    Scanner::new(options.clone()).scan_files(paths)
}

/// Breadth-first work list of files to scan, each visited at most once.
///
/// Files are handed out in rounds: the current pending files first, then
/// the files they import. Callers may scan a round sequentially or in
/// parallel; keeping each round's results in round order yields the same
/// file order either way.
///
/// # Examples
///
/// ```
/// use smrt_scanner::ScanQueue;
/// use std::path::PathBuf;
///
/// let mut queue = ScanQueue::new([PathBuf::from("a.ts"), PathBuf::from("a.ts")], true);
/// assert_eq!(queue.next_round(), vec![PathBuf::from("a.ts")]);
///
/// queue.push_imports(vec![PathBuf::from("a.ts"), PathBuf::from("b.ts")]);
/// assert_eq!(queue.next_round(), vec![PathBuf::from("b.ts")]);
/// assert!(queue.next_round().is_empty());
/// assert_eq!(queue.scanned(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScanQueue {
    pending: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
    follow_imports: bool,
}

impl ScanQueue {
    /// Creates a queue seeded with `paths`.
    #[must_use]
    pub fn new(paths: impl IntoIterator<Item = PathBuf>, follow_imports: bool) -> Self {
        Self {
            pending: paths.into_iter().collect(),
            visited: HashSet::new(),
            follow_imports,
        }
    }

    /// Takes the pending files that were not handed out before, in order.
    ///
    /// An empty round means the traversal is complete.
    pub fn next_round(&mut self) -> Vec<PathBuf> {
        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .filter(|path| self.visited.insert(visit_key(path)))
            .collect()
    }

    /// Queues the imports of a scanned file for the next round; ignored
    /// unless imports are followed.
    pub fn push_imports(&mut self, imported: Vec<PathBuf>) {
        if self.follow_imports {
            self.pending.extend(imported);
        }
    }

    /// Number of distinct files handed out so far.
    #[must_use]
    pub fn scanned(&self) -> usize {
        self.visited.len()
    }
}

/// Errors and warnings of all results, each paired with its file path.
#[must_use]
pub fn collect_diagnostics(results: &[ScanResult]) -> Vec<(&str, &ScanDiagnostic)> {
    results
        .iter()
        .flat_map(|result| {
            result
                .errors
                .iter()
                .chain(&result.warnings)
                .map(|diagnostic| (result.file_path.as_str(), diagnostic))
        })
        .collect()
}

fn visit_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn snippet(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() > 24 {
        format!("{}...", line.chars().take(24).collect::<String>())
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smrt_core::{FieldKind, Operation, Surface};
    use serde_json::json;

    fn scan(source: &str) -> ScanResult {
        Scanner::default().scan_source("models.ts", source)
    }

    #[test]
    fn test_scan_queue_rounds() {
        let mut queue = ScanQueue::new(
            ["a.ts", "b.ts", "a.ts"].map(PathBuf::from),
            true,
        );
        assert_eq!(queue.next_round(), ["a.ts", "b.ts"].map(PathBuf::from));

        queue.push_imports(vec![PathBuf::from("c.ts"), PathBuf::from("b.ts")]);
        queue.push_imports(vec![PathBuf::from("c.ts")]);
        assert_eq!(queue.next_round(), vec![PathBuf::from("c.ts")]);
        assert!(queue.next_round().is_empty());
        assert_eq!(queue.scanned(), 3);
    }

    #[test]
    fn test_scan_queue_ignores_imports_when_not_following() {
        let mut queue = ScanQueue::new([PathBuf::from("a.ts")], false);
        assert_eq!(queue.next_round().len(), 1);
        queue.push_imports(vec![PathBuf::from("b.ts")]);
        assert!(queue.next_round().is_empty());
        assert_eq!(queue.scanned(), 1);
    }

    #[test]
    fn test_requires_marker_and_base_class() {
        let result = scan(
            "
            @smrt() class A extends SmrtObject {}
            class B extends SmrtObject {}
            @smrt() class C extends Other {}
            @smrt() class D {}
            @other() class E extends SmrtObject {}
            ",
        );
        let names: Vec<_> = result.objects.iter().map(|o| o.class_name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_export_forms_and_bare_marker() {
        let result = scan(
            "
            @smrt
            export class Bare extends SmrtClass {}
            @smrt()
            export default class Defaulted extends SmrtCollection {}
            @smrt()
            export abstract class Archived extends SmrtObject {}
            ",
        );
        let names: Vec<_> = result.objects.iter().map(|o| o.class_name.as_str()).collect();
        assert_eq!(names, vec!["Bare", "Defaulted", "Archived"]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_nested_classes_are_ignored() {
        let result = scan(
            "
            function factory() {
                @smrt() class Inner extends SmrtObject {}
                return Inner;
            }
            ",
        );
        assert!(result.objects.is_empty());
    }

    #[test]
    fn test_field_extraction() {
        let result = scan(
            "
            @smrt()
            class Product extends SmrtObject {
                name: string = '';
                description?: string;
                price: number = 0;
                inStock: boolean = true;
                tags: string[] = [];
                metadata = { color: 'red' };
                discount = -5;
                createdAt: Date;
                notes: string | undefined;
                owner = currentUser();
                untyped;
                static registry = new Map();
                #secret = 1;
            }
            ",
        );
        let fields = &result.objects[0].fields;
        let names: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "name",
                "description",
                "price",
                "inStock",
                "tags",
                "metadata",
                "discount",
                "createdAt",
                "notes",
                "owner",
                "untyped"
            ]
        );

        assert_eq!(fields["name"].kind, FieldKind::Text);
        assert_eq!(fields["name"].default, Some(json!("")));
        assert!(fields["name"].required);
        assert!(!fields["description"].required);
        assert_eq!(fields["description"].default, None);
        assert_eq!(fields["price"].kind, FieldKind::Decimal);
        assert_eq!(fields["price"].default, Some(json!(0)));
        assert_eq!(fields["inStock"].default, Some(json!(true)));
        assert_eq!(fields["tags"].kind, FieldKind::Text);
        assert_eq!(fields["tags"].default, Some(json!([])));
        assert_eq!(fields["metadata"].kind, FieldKind::Json);
        assert_eq!(fields["metadata"].default, Some(json!({"color": "red"})));
        assert_eq!(fields["discount"].kind, FieldKind::Decimal);
        assert_eq!(fields["createdAt"].kind, FieldKind::DateTime);
        assert!(!fields["notes"].required);
        assert_eq!(fields["owner"].kind, FieldKind::Text);
        assert_eq!(fields["owner"].default, None);
        assert_eq!(fields["untyped"].kind, FieldKind::Text);
    }

    #[test]
    fn test_method_extraction_defaults() {
        let source = "
            @smrt()
            class Product extends SmrtObject {
                constructor(options: any) { super(options); }
                async calculateDiscount(percentage: number, round?: boolean, scale = 2): Promise<number> {
                    return 0;
                }
                static findByCategory(category) { return []; }
                private validatePrice(): boolean { return true; }
                get label(): string { return ''; }
            }
        ";
        let result = scan(source);
        let methods = &result.objects[0].methods;
        let names: Vec<_> = methods.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["calculateDiscount", "findByCategory"]);

        let discount = &methods["calculateDiscount"];
        assert!(discount.is_async);
        assert!(discount.is_public);
        assert_eq!(discount.return_type, "Promise<number>");
        assert_eq!(discount.parameters.len(), 3);
        assert_eq!(discount.parameters[0].type_label, "number");
        assert!(discount.parameters[1].optional);
        assert_eq!(discount.parameters[2].type_label, "any");
        assert_eq!(discount.parameters[2].default, Some(json!(2)));

        let find = &methods["findByCategory"];
        assert!(find.is_static);
        assert_eq!(find.return_type, "void");
        assert_eq!(find.parameters[0].type_label, "any");
    }

    #[test]
    fn test_method_options() {
        let source = "
            @smrt()
            class Product extends SmrtObject {
                static findAll() {}
                private check(): boolean { return true; }
            }
        ";
        let options = ScanOptions {
            include_private_methods: true,
            include_static_methods: false,
            ..ScanOptions::default()
        };
        let result = Scanner::new(options).scan_source("p.ts", source);
        let methods = &result.objects[0].methods;
        assert!(!methods.contains_key("findAll"));
        assert!(!methods["check"].is_public);
    }

    #[test]
    fn test_feature_config_from_marker() {
        let result = scan(
            "
            @smrt({
                api: { exclude: ['delete'] },
                mcp: { include: ['list', 'get', 'create'] },
                cli: true,
            })
            class Product extends SmrtObject {}
            ",
        );
        let config = &result.objects[0].feature_config;
        assert!(!config.allows(Surface::Api, Operation::Delete));
        assert!(config.allows(Surface::Api, Operation::Update));
        assert!(!config.allows(Surface::Tooling, Operation::Update));
        assert!(config.allows(Surface::Cli, Operation::Delete));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_non_literal_config_degrades_to_default() {
        let result = scan(
            "
            @smrt({ api: sharedApiConfig })
            class Product extends SmrtObject { name = ''; }
            ",
        );
        assert_eq!(result.objects.len(), 1);
        assert_eq!(result.objects[0].feature_config, smrt_core::FeatureConfig::default());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, DiagnosticKind::Configuration);
        assert_eq!(result.warnings[0].line, 2);
    }

    #[test]
    fn test_custom_marker_and_base_classes() {
        let options = ScanOptions::default()
            .with_marker("model")
            .with_base_classes(["BaseObject"]);
        let result = Scanner::new(options).scan_source(
            "m.ts",
            "@model() class Tag extends BaseObject {}\n@smrt() class Old extends SmrtObject {}",
        );
        assert_eq!(result.objects.len(), 1);
        assert_eq!(result.objects[0].class_name, "Tag");
    }

    #[test]
    fn test_syntax_error_is_recorded_and_scan_continues() {
        let result = scan(
            "
            @smrt()
            class Product extends SmrtObject {
                name: string = '';
            }

            function broken( {
            ",
        );
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, DiagnosticKind::Parse);
        assert!(result.errors[0].line > 0);
        assert_eq!(result.objects.len(), 1);
    }

    #[test]
    fn test_unreadable_file() {
        let result = Scanner::default().scan_file("/definitely/not/here.ts");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, DiagnosticKind::Io);
        assert_eq!(result.errors[0].line, 0);
        assert!(result.objects.is_empty());
    }

    #[test]
    fn test_collect_diagnostics() {
        let mut a = ScanResult::new("a.ts");
        a.errors
            .push(ScanDiagnostic::unpositioned(DiagnosticKind::Io, "gone"));
        let mut b = ScanResult::new("b.ts");
        b.warnings.push(ScanDiagnostic::at(
            DiagnosticKind::Configuration,
            "bad config",
            2,
            5,
        ));
        let results = [a, b];
        let all = collect_diagnostics(&results);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, "a.ts");
        assert_eq!(all[1].1.message, "bad config");
    }

    #[test]
    fn test_snippet_truncates() {
        assert_eq!(snippet("short"), "short");
        assert_eq!(snippet("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmnopqrstuvwx...");
        assert_eq!(snippet("first\nsecond"), "first");
    }
}
