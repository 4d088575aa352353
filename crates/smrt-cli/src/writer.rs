//! Atomic file output.
//!
//! Generated files are written to a temporary sibling and renamed into
//! place, so an interrupted run never leaves a half-written artifact.

use smrt_codegen::GeneratedCode;
use smrt_core::{Error, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Writes `content` to `relative` under `base`, creating parent directories.
///
/// Returns the full path written.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `relative` is absolute or contains
/// `..`, and [`Error::Io`] if a directory or file cannot be written.
///
/// # Examples
///
/// ```
/// use smrt_cli::writer::write_atomic;
///
/// let dir = tempfile::tempdir()?;
/// let path = write_atomic(dir.path(), "nested/types.ts", "export {};\n")?;
/// assert_eq!(std::fs::read_to_string(path)?, "export {};\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_atomic(base: &Path, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
    let relative = relative.as_ref();
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(Error::InvalidArgument(format!(
            "output path must stay inside the output directory: {}",
            relative.display()
        )));
    }

    let target = base.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::InvalidArgument(format!("output path has no file name: {}", relative.display()))
        })?;
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&temp, content).map_err(|source| Error::Io {
        path: temp.clone(),
        source,
    })?;
    fs::rename(&temp, &target).map_err(|source| {
        let _ = fs::remove_file(&temp);
        Error::Io {
            path: target.clone(),
            source,
        }
    })?;

    debug!("Wrote {} ({} bytes)", target.display(), content.len());
    Ok(target)
}

/// Writes every generated file under `out_dir`, in generation order.
///
/// # Errors
///
/// Stops at the first file that cannot be written.
pub fn write_generated(out_dir: &Path, code: &GeneratedCode) -> Result<Vec<PathBuf>> {
    code.files()
        .map(|file| write_atomic(out_dir, &file.path, &file.content))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smrt_codegen::GeneratedFile;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_atomic(temp_dir.path(), "a/b/out.ts", "one").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one");

        write_atomic(temp_dir.path(), "a/b/out.ts", "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        write_atomic(temp_dir.path(), "types.ts", "x").unwrap();
        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["types.ts"]);
    }

    #[test]
    fn test_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let err = write_atomic(temp_dir.path(), "../escape.ts", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(!temp_dir.path().parent().unwrap().join("escape.ts").exists());
    }

    #[test]
    fn test_rejects_absolute_path() {
        let temp_dir = TempDir::new().unwrap();
        let err = write_atomic(temp_dir.path(), "/etc/escape.ts", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_write_generated() {
        let temp_dir = TempDir::new().unwrap();
        let mut code = GeneratedCode::new();
        code.add_file(GeneratedFile {
            path: "types.ts".to_string(),
            content: "export interface ProductData {\n}".to_string(),
        });
        code.add_file(GeneratedFile {
            path: "openapi.json".to_string(),
            content: "{}".to_string(),
        });

        let written = write_generated(&temp_dir.path().join("out"), &code).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("types.ts"));
        assert_eq!(fs::read_to_string(&written[1]).unwrap(), "{}");
    }
}
