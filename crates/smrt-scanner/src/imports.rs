//! Relative import resolution for `followImports`.

use crate::literal::string_value;
use crate::syntax::named_children;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Module specifiers of `import ... from` and `export ... from` statements.
pub(crate) fn specifiers(root: Node<'_>, source: &str) -> Vec<String> {
    named_children(root)
        .into_iter()
        .filter(|node| matches!(node.kind(), "import_statement" | "export_statement"))
        .filter_map(|node| node.child_by_field_name("source"))
        .filter(|node| node.kind() == "string")
        .map(|node| string_value(node, source))
        .collect()
}

/// Resolves a relative specifier against the importing file.
///
/// Bare package specifiers resolve to `None`. `./x.js` is mapped back to
/// its TypeScript source; extensionless specifiers try `.ts`, `.tsx`, and
/// directory `index` files.
pub(crate) fn resolve(importer: &Path, specifier: &str) -> Option<PathBuf> {
    if !(specifier.starts_with("./") || specifier.starts_with("../")) {
        return None;
    }
    let base = importer.parent().unwrap_or_else(|| Path::new("")).join(specifier);
    candidates(&base).into_iter().find(|path| path.is_file())
}

fn candidates(base: &Path) -> Vec<PathBuf> {
    match base.extension().and_then(|ext| ext.to_str()) {
        Some("ts" | "tsx") => vec![base.to_path_buf()],
        Some("js" | "mjs") => vec![base.with_extension("ts"), base.with_extension("tsx")],
        Some("jsx") => vec![base.with_extension("tsx")],
        _ => vec![
            with_suffix(base, ".ts"),
            with_suffix(base, ".tsx"),
            base.join("index.ts"),
            base.join("index.tsx"),
        ],
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}
