//! Project configuration file.
//!
//! Settings are read from `smrt.toml` in TOML format. Every key is optional;
//! missing keys take the built-in defaults, and command-line flags override
//! whatever the file says.
//!
//! ```toml
//! [scan]
//! include = ["src"]
//! extensions = ["ts", "tsx"]
//! exclude = [".test.ts", ".spec.ts", ".d.ts", "node_modules"]
//! base_classes = ["SmrtObject", "SmrtClass", "SmrtCollection"]
//! marker = "smrt"
//! include_private_methods = false
//! include_static_methods = true
//! follow_imports = false
//!
//! [generate]
//! out_dir = "generated"
//! artifacts = ["types", "routes", "tools", "client", "manifest", "openapi", "cli"]
//! api_base_path = "/api/v1"
//! title = "smrt API"
//! ```

use serde::{Deserialize, Serialize};
use smrt_codegen::{Artifact, DEFAULT_API_BASE_PATH, GeneratorOptions, OpenApiOptions};
use smrt_core::{DEFAULT_BASE_CLASSES, DEFAULT_MARKER, Error, Result, ScanOptions};
use smrt_scanner::{DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "smrt.toml";

/// Contents of `smrt.toml`.
///
/// # Examples
///
/// ```
/// use smrt_cli::config::Config;
///
/// let config = Config::from_toml("[scan]\nmarker = \"model\"\n")?;
/// assert_eq!(config.scan.marker, "model");
/// assert_eq!(config.generate.out_dir.to_str(), Some("generated"));
/// # Ok::<(), smrt_core::Error>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    /// Scanner settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Generator settings
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// `[scan]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// Files or directories to scan
    pub include: Vec<PathBuf>,

    /// File extensions picked up when walking directories
    pub extensions: Vec<String>,

    /// Path fragments that exclude a file
    pub exclude: Vec<String>,

    /// Accepted base classes
    pub base_classes: Vec<String>,

    /// Marker annotation identifier
    pub marker: String,

    /// Emit `private` methods
    pub include_private_methods: bool,

    /// Emit `static` methods
    pub include_static_methods: bool,

    /// Scan files reached through relative imports
    pub follow_imports: bool,
}

/// `[generate]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerateConfig {
    /// Directory receiving generated files
    pub out_dir: PathBuf,

    /// Artifact names to generate
    pub artifacts: Vec<String>,

    /// REST mount point used by the client and `OpenAPI` document
    pub api_base_path: String,

    /// `OpenAPI` document title
    pub title: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let defaults = ScanOptions::default();
        Self {
            include: vec![PathBuf::from("src")],
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            exclude: DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect(),
            base_classes: DEFAULT_BASE_CLASSES.iter().map(ToString::to_string).collect(),
            marker: DEFAULT_MARKER.to_string(),
            include_private_methods: defaults.include_private_methods,
            include_static_methods: defaults.include_static_methods,
            follow_imports: defaults.follow_imports,
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("generated"),
            artifacts: Artifact::ALL.iter().map(ToString::to_string).collect(),
            api_base_path: DEFAULT_API_BASE_PATH.to_string(),
            title: OpenApiOptions::default().title,
        }
    }
}

impl ScanConfig {
    /// Scanner options described by this section.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_private_methods: self.include_private_methods,
            include_static_methods: self.include_static_methods,
            follow_imports: self.follow_imports,
            base_classes: self.base_classes.clone(),
            marker: self.marker.clone(),
        }
    }
}

impl GenerateConfig {
    /// Parses the configured artifact names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unknown name.
    pub fn artifacts(&self) -> Result<Vec<Artifact>> {
        self.artifacts.iter().map(|name| name.parse()).collect()
    }

    /// Generator options described by this section.
    #[must_use]
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            api_base_path: self.api_base_path.clone(),
            title: self.title.clone(),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the text is not valid TOML or has
    /// keys of the wrong type.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigError {
            message: e.to_string(),
        })
    }

    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::ConfigError`] if it cannot be parsed or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|e| Error::ConfigError {
            message: format!("{}: {e}", path.display()),
        })?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `explicit` if given, otherwise `./smrt.toml` when it exists,
    /// otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected file cannot be loaded.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
            Ok(Self::default())
        }
    }

    /// Checks settings that would make a run meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for an empty marker, an empty base-class
    /// list, or an unknown artifact name.
    pub fn validate(&self) -> Result<()> {
        if self.scan.marker.trim().is_empty() {
            return Err(Error::ConfigError {
                message: "scan.marker must not be empty".to_string(),
            });
        }
        if self.scan.base_classes.is_empty() {
            return Err(Error::ConfigError {
                message: "scan.base_classes must name at least one class".to_string(),
            });
        }
        self.generate
            .artifacts()
            .map_err(|e| Error::ConfigError {
                message: format!("generate.artifacts: {e}"),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_matches_scanner_defaults() {
        let config = Config::default();
        assert_eq!(config.scan.scan_options(), ScanOptions::default());
        assert_eq!(config.scan.extensions, vec!["ts", "tsx"]);
        assert_eq!(config.generate.artifacts().unwrap(), Artifact::ALL.to_vec());
        assert_eq!(config.generate.generator_options(), GeneratorOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[scan]
base_classes = ["BaseObject"]
follow_imports = true

[generate]
artifacts = ["types", "openapi"]
"#,
        )
        .unwrap();

        assert_eq!(config.scan.base_classes, vec!["BaseObject"]);
        assert!(config.scan.follow_imports);
        assert_eq!(config.scan.marker, "smrt");
        assert_eq!(
            config.generate.artifacts().unwrap(),
            vec![Artifact::Types, Artifact::OpenApi]
        );
        assert_eq!(config.generate.api_base_path, "/api/v1");
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[scan\nmarker = ").unwrap_err();
        assert!(err.is_config_error());

        let err = Config::from_toml("[scan]\nfollow_imports = \"yes\"").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validate_rejects_empty_marker() {
        let mut config = Config::default();
        config.scan.marker = "  ".to_string();
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_validate_rejects_empty_base_classes() {
        let mut config = Config::default();
        config.scan.base_classes.clear();
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_validate_rejects_unknown_artifact() {
        let mut config = Config::default();
        config.generate.artifacts = vec!["types".to_string(), "graphql".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("graphql"));
    }

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("smrt.toml");
        fs::write(&path, "[generate]\nout_dir = \"out\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.generate.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_load_validates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("smrt.toml");
        fs::write(&path, "[scan]\nmarker = \"\"\n").unwrap();

        assert!(Config::load(&path).unwrap_err().is_config_error());
    }

    #[test]
    fn test_discover_explicit_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::discover(Some(&temp_dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.is_io_error());
    }
}
