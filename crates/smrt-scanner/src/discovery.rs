//! Source file discovery.

use smrt_core::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["ts", "tsx"];

/// Path patterns skipped when none are configured.
pub const DEFAULT_EXCLUDES: [&str; 4] = [".test.ts", ".spec.ts", ".d.ts", "node_modules"];

/// Expands `roots` into a sorted, de-duplicated list of source files.
///
/// A root that is a file is taken as-is. A directory is walked recursively,
/// keeping files whose extension is in `extensions`. A path is excluded when
/// one of its components equals an `exclude` pattern or its file name ends
/// with one.
///
/// # Errors
///
/// Returns [`Error::Io`] if a root does not exist or a directory cannot be
/// read.
///
/// # Examples
///
/// ```
/// use smrt_scanner::discover_files;
/// use std::fs;
///
/// let dir = tempfile::tempdir().unwrap();
/// fs::write(dir.path().join("product.ts"), "").unwrap();
/// fs::write(dir.path().join("product.test.ts"), "").unwrap();
///
/// let files = discover_files(&[dir.path()], &["ts"], &[".test.ts"]).unwrap();
/// assert_eq!(files, vec![dir.path().join("product.ts")]);
/// ```
pub fn discover_files<P, E, X>(roots: &[P], extensions: &[E], exclude: &[X]) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    E: AsRef<str>,
    X: AsRef<str>,
{
    let mut files = Vec::new();
    for root in roots {
        let root = root.as_ref();
        let metadata = root.metadata().map_err(|source| Error::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if metadata.is_file() {
            files.push(root.to_path_buf());
            continue;
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry.path(), exclude));
        for entry in walker {
            let entry = entry.map_err(|e| Error::Io {
                path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                source: e.into(),
            })?;
            if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    tracing::debug!("Discovered {} source files", files.len());
    Ok(files)
}

fn has_extension<E: AsRef<str>>(path: &Path, extensions: &[E]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.as_ref() == ext))
}

fn is_excluded<X: AsRef<str>>(path: &Path, exclude: &[X]) -> bool {
    let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
    exclude.iter().any(|pattern| {
        let pattern = pattern.as_ref();
        file_name == pattern || file_name.ends_with(pattern)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walks_recursively_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("models/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("models/zeta.ts"), "").unwrap();
        fs::write(root.join("models/alpha.tsx"), "").unwrap();
        fs::write(root.join("models/nested/beta.ts"), "").unwrap();
        fs::write(root.join("models/types.d.ts"), "").unwrap();
        fs::write(root.join("models/readme.md"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.ts"), "").unwrap();

        let files = discover_files(&[root], &DEFAULT_EXTENSIONS, &DEFAULT_EXCLUDES).unwrap();
        assert_eq!(
            files,
            vec![
                root.join("models/alpha.tsx"),
                root.join("models/nested/beta.ts"),
                root.join("models/zeta.ts"),
            ]
        );
    }

    #[test]
    fn test_explicit_file_root_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("model.mts");
        fs::write(&file, "").unwrap();

        let files = discover_files(&[&file, &file], &DEFAULT_EXTENSIONS, &DEFAULT_EXCLUDES).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = discover_files(&[temp_dir.path().join("nope")], &["ts"], &[] as &[&str])
            .unwrap_err();
        assert!(err.is_io_error());
    }
}
