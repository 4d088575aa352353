//! Template engine for module rendering using Handlebars.
//!
//! Generators produce the body of each module as plain text; templates add
//! the shared header and the surrounding declarations.
//!
//! # Examples
//!
//! ```
//! use smrt_codegen::template_engine::{ModuleContext, TemplateEngine};
//!
//! let engine = TemplateEngine::new().unwrap();
//! let context = ModuleContext {
//!     manifest_version: "1.0.0".to_string(),
//!     generated_at: "2024-01-01T00:00:00Z".to_string(),
//!     object_count: 0,
//!     accessors: vec![],
//!     body: "export {};".to_string(),
//! };
//! let rendered = engine.render("types", &context).unwrap();
//! assert!(rendered.contains("export {};"));
//! ```

use handlebars::Handlebars;
use serde::Serialize;
use smrt_core::{Error, Result};

/// Built-in module templates, by registered name.
const TEMPLATES: [(&str, &str); 5] = [
    ("types", include_str!("../templates/types.ts.hbs")),
    ("routes", include_str!("../templates/routes.ts.hbs")),
    ("mcp", include_str!("../templates/mcp.ts.hbs")),
    ("client", include_str!("../templates/client.ts.hbs")),
    ("manifest", include_str!("../templates/manifest.ts.hbs")),
];

/// Values available to every module template.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleContext {
    /// Schema version of the source manifest
    pub manifest_version: String,
    /// Manifest creation time, RFC 3339
    pub generated_at: String,
    /// Number of objects rendered into the module
    pub object_count: usize,
    /// Class names whose collection accessor the module calls
    pub accessors: Vec<String>,
    /// Generated module body
    pub body: String,
}

/// Handlebars registry holding the module templates and the `header`
/// partial. Shared read-only across threads by [`crate::CodeGenerator`].
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates a new template engine with the built-in module templates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if a built-in template fails to
    /// register.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // A missing context key must fail the render, not print nothing.
        handlebars.set_strict_mode(true);

        handlebars
            .register_partial("header", include_str!("../templates/header.hbs"))
            .map_err(|e| Error::TemplateError {
                message: format!("invalid header partial: {e}"),
            })?;

        let mut engine = Self { handlebars };
        for (name, template) in TEMPLATES {
            engine.register_template_string(name, template)?;
        }
        Ok(engine)
    }

    /// Renders a registered template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template is unknown, the
    /// context cannot be serialized, or a referenced variable is missing.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::TemplateError {
                message: format!("cannot render '{template_name}': {e}"),
            })
    }

    /// Registers an additional template, replacing one with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template string is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use smrt_codegen::template_engine::TemplateEngine;
    ///
    /// let mut engine = TemplateEngine::new().unwrap();
    /// engine.register_template_string("custom", "// {{name}}").unwrap();
    /// ```
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                message: format!("invalid template '{name}': {e}"),
            })
    }

    /// Returns `true` if a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
