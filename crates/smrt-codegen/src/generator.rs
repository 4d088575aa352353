//! Bundle generator: renders artifact modules from one manifest.
//!
//! # Examples
//!
//! ```
//! use smrt_codegen::{Artifact, CodeGenerator};
//! use smrt_core::{build_manifest, ScanResult, SourceObject};
//!
//! let mut result = ScanResult::new("models.ts");
//! result.objects.push(SourceObject::new("Product", "models.ts"));
//! let manifest = build_manifest(&[result]);
//!
//! let generator = CodeGenerator::new().unwrap();
//! let code = generator.generate(&manifest, &[Artifact::Types, Artifact::Routes]).unwrap();
//!
//! assert_eq!(code.file_count(), 2);
//! assert!(code.get("types.ts").unwrap().content.contains("export interface ProductData"));
//! ```

use crate::client::{DEFAULT_API_BASE_PATH, generate_api_client};
use crate::cli_commands::generate_cli_commands;
use crate::openapi::{OpenApiOptions, generate_openapi};
use crate::rest::generate_rest_endpoints;
use crate::template_engine::{ModuleContext, TemplateEngine};
use crate::tools::generate_tool_schemas;
use crate::typescript::generate_type_definitions;
use crate::types::{GeneratedCode, GeneratedFile};
use chrono::{DateTime, SecondsFormat};
use smrt_core::{Error, Manifest, Result, Surface};
use std::fmt;
use std::str::FromStr;

/// One generated output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Artifact {
    /// `types.ts`: one interface per object
    Types,
    /// `routes.ts`: REST handler stubs
    Routes,
    /// `mcp.ts`: AI tool descriptors
    Tools,
    /// `client.ts`: typed REST client
    Client,
    /// `manifest.ts`: the manifest as a constant
    Manifest,
    /// `openapi.json`: OpenAPI 3.1 document
    OpenApi,
    /// `cli.json`: command catalogue
    Cli,
}

impl Artifact {
    /// Every artifact, in generation order.
    pub const ALL: [Self; 7] = [
        Self::Types,
        Self::Routes,
        Self::Tools,
        Self::Client,
        Self::Manifest,
        Self::OpenApi,
        Self::Cli,
    ];

    /// Name used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Types => "types",
            Self::Routes => "routes",
            Self::Tools => "tools",
            Self::Client => "client",
            Self::Manifest => "manifest",
            Self::OpenApi => "openapi",
            Self::Cli => "cli",
        }
    }

    /// Output path relative to the output directory.
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Types => "types.ts",
            Self::Routes => "routes.ts",
            Self::Tools => "mcp.ts",
            Self::Client => "client.ts",
            Self::Manifest => "manifest.ts",
            Self::OpenApi => "openapi.json",
            Self::Cli => "cli.json",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Artifact {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "types" => Ok(Self::Types),
            "routes" | "rest" => Ok(Self::Routes),
            "tools" | "mcp" => Ok(Self::Tools),
            "client" => Ok(Self::Client),
            "manifest" => Ok(Self::Manifest),
            "openapi" => Ok(Self::OpenApi),
            "cli" => Ok(Self::Cli),
            _ => Err(Error::InvalidArgument(format!(
                "unknown artifact: '{s}' (expected one of: types, routes, tools, client, manifest, openapi, cli)"
            ))),
        }
    }
}

/// Settings shared by the artifact generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Mount point of the REST API, used by the client and OpenAPI document
    pub api_base_path: String,
    /// OpenAPI `info.title`
    pub title: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            api_base_path: DEFAULT_API_BASE_PATH.to_string(),
            title: OpenApiOptions::default().title,
        }
    }
}

/// Renders artifacts for a manifest.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`; one generator can serve many manifests.
#[derive(Debug)]
pub struct CodeGenerator<'a> {
    engine: TemplateEngine<'a>,
    options: GeneratorOptions,
}

impl CodeGenerator<'_> {
    /// Creates a generator with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if template registration fails.
    pub fn new() -> Result<Self> {
        Self::with_options(GeneratorOptions::default())
    }

    /// Creates a generator with the given options.
    ///
    /// # Errors
    ///
    /// Returns an error if template registration fails.
    pub fn with_options(options: GeneratorOptions) -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            options,
        })
    }

    /// Returns the generator options.
    #[must_use]
    pub const fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates the requested artifacts in the order given, skipping
    /// duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render or the manifest
    /// cannot be serialized.
    pub fn generate(&self, manifest: &Manifest, artifacts: &[Artifact]) -> Result<GeneratedCode> {
        tracing::info!(
            "Generating {} artifact(s) for {} object(s)",
            artifacts.len(),
            manifest.objects.len()
        );

        let mut code = GeneratedCode::new();
        for artifact in artifacts {
            if code.get(artifact.file_name()).is_some() {
                continue;
            }
            let content = self.render(manifest, *artifact)?;
            tracing::debug!("Generated {} ({} bytes)", artifact.file_name(), content.len());
            code.add_file(GeneratedFile {
                path: artifact.file_name().to_string(),
                content,
            });
        }
        Ok(code)
    }

    fn render(&self, manifest: &Manifest, artifact: Artifact) -> Result<String> {
        let module = |template: &str, surface: Option<Surface>, body: String| {
            let objects: Vec<_> = match surface {
                Some(surface) => manifest.objects_on(surface).collect(),
                None => manifest.objects.values().collect(),
            };
            let context = ModuleContext {
                manifest_version: manifest.version.clone(),
                generated_at: format_timestamp(manifest.timestamp),
                object_count: objects.len(),
                accessors: objects.iter().map(|obj| obj.class_name.clone()).collect(),
                body,
            };
            self.engine.render(template, &context)
        };

        match artifact {
            Artifact::Types => module("types", None, generate_type_definitions(manifest)),
            Artifact::Routes => module(
                "routes",
                Some(Surface::Api),
                indent(&generate_rest_endpoints(manifest), 2),
            ),
            Artifact::Tools => module("mcp", Some(Surface::Tooling), generate_tool_schemas(manifest)),
            Artifact::Client => module(
                "client",
                Some(Surface::Api),
                generate_api_client(manifest, &self.options.api_base_path),
            ),
            Artifact::Manifest => module("manifest", None, manifest.to_json_pretty()?),
            Artifact::OpenApi => Ok(generate_openapi(
                manifest,
                &OpenApiOptions {
                    title: self.options.title.clone(),
                    base_path: self.options.api_base_path.clone(),
                },
            ) + "\n"),
            Artifact::Cli => Ok(generate_cli_commands(manifest) + "\n"),
        }
    }
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || millis.to_string(),
        |at| at.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Indents every non-empty line by `width` spaces.
fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use smrt_core::{ManifestBuilder, SourceObject, SurfaceConfig};

    fn manifest() -> Manifest {
        let mut product = SourceObject::new("Product", "p.ts");
        product.feature_config.cli = SurfaceConfig::EnabledAll;
        let mut hidden = SourceObject::new("Secret", "s.ts");
        hidden.feature_config.api = SurfaceConfig::Disabled;
        let mut builder = ManifestBuilder::new();
        builder.insert(product);
        builder.insert(hidden);
        let mut manifest = builder.build();
        manifest.timestamp = 1_700_000_000_000;
        manifest
    }

    #[test]
    fn test_artifact_names() {
        for artifact in Artifact::ALL {
            assert_eq!(artifact.as_str().parse::<Artifact>().unwrap(), artifact);
        }
        assert_eq!("MCP".parse::<Artifact>().unwrap(), Artifact::Tools);
        assert!("docs".parse::<Artifact>().unwrap_err().to_string().contains("docs"));
        assert_eq!(Artifact::OpenApi.file_name(), "openapi.json");
    }

    #[test]
    fn test_generate_all() {
        let generator = CodeGenerator::new().unwrap();
        let code = generator.generate(&manifest(), &Artifact::ALL).unwrap();
        let paths: Vec<_> = code.files().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "types.ts",
                "routes.ts",
                "mcp.ts",
                "client.ts",
                "manifest.ts",
                "openapi.json",
                "cli.json"
            ]
        );
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let generator = CodeGenerator::new().unwrap();
        let code = generator
            .generate(&manifest(), &[Artifact::Types, Artifact::Types])
            .unwrap();
        assert_eq!(code.file_count(), 1);
    }

    #[test]
    fn test_routes_module() {
        let generator = CodeGenerator::new().unwrap();
        let code = generator.generate(&manifest(), &[Artifact::Routes]).unwrap();
        let routes = &code.files[0].content;
        assert!(routes.contains("2023-11-14T22:13:20Z"));
        assert!(routes.contains("1 object(s)"));
        assert!(routes.contains("declare function getProductCollection(): Promise<any>;"));
        assert!(!routes.contains("getSecretCollection"));
        assert!(routes.contains("  // Product endpoints\n    // GET /products - List products\n"));
    }

    #[test]
    fn test_manifest_module_embeds_json() {
        let generator = CodeGenerator::new().unwrap();
        let code = generator.generate(&manifest(), &[Artifact::Manifest]).unwrap();
        let module = &code.files[0].content;
        assert!(module.contains("export const manifest = {\n  \"version\": \"1.0.0\""));
        assert!(module.contains("} as const;"));
    }

    #[test]
    fn test_json_artifacts_parse() {
        let generator = CodeGenerator::with_options(GeneratorOptions {
            api_base_path: "/v2".to_string(),
            title: "Shop".to_string(),
        })
        .unwrap();
        let code = generator
            .generate(&manifest(), &[Artifact::OpenApi, Artifact::Cli])
            .unwrap();
        let openapi: serde_json::Value = serde_json::from_str(&code.files[0].content).unwrap();
        assert_eq!(openapi["servers"][0]["url"], "/v2");
        assert_eq!(openapi["info"]["title"], "Shop");
        let cli: serde_json::Value = serde_json::from_str(&code.files[1].content).unwrap();
        assert_eq!(cli.as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\n\n  b", 2), "  a\n\n    b");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00Z");
    }
}
