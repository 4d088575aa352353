//! Code generation from smrt manifests.
//!
//! Every generator is a pure function of a [`Manifest`](smrt_core::Manifest):
//! no I/O, no shared state, and no failure for a structurally valid
//! manifest. Visibility is resolved per surface through
//! [`FeatureConfig`](smrt_core::FeatureConfig), so all artifacts agree on
//! which operations exist.
//!
//! | Generator | Surface | Output |
//! |-----------|---------|--------|
//! | [`generate_type_definitions`] | all objects | `export interface <ClassName>Data` |
//! | [`generate_rest_endpoints`] | `api` | handler stubs |
//! | [`generate_tool_schemas`] | `mcp` | JSON array of tool descriptors |
//! | [`generate_api_client`] | `api` | `createClient(basePath)` module |
//! | [`generate_openapi`] | `api` | OpenAPI 3.1 document |
//! | [`generate_cli_commands`] | `cli` | command catalogue |
//!
//! [`CodeGenerator`] renders the selected artifacts into module files
//! through Handlebars templates.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod template_engine;

mod cli_commands;
mod client;
mod generator;
mod openapi;
mod rest;
mod tools;
mod types;
mod typescript;

pub use cli_commands::{CliCommand, CliOption, cli_commands, generate_cli_commands};
pub use client::{DEFAULT_API_BASE_PATH, generate_api_client};
pub use generator::{Artifact, CodeGenerator, GeneratorOptions};
pub use openapi::{OpenApiOptions, generate_openapi, openapi_document};
pub use rest::{generate_rest_endpoints, route_path};
pub use tools::{ToolDefinition, generate_tool_schemas, tool_definitions};
pub use types::{GeneratedCode, GeneratedFile};
pub use typescript::generate_type_definitions;
