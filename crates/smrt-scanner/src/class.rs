//! Class qualification and member extraction.

use crate::infer::{infer_kind, is_optional_type};
use crate::literal::{self, string_value};
use crate::syntax::{children, has_token, named_children, position, text, type_text};
use smrt_core::{
    DiagnosticKind, FeatureConfig, FieldDescriptor, MethodDescriptor, ParameterDescriptor,
    ScanDiagnostic, ScanOptions, SourceObject,
};
use tree_sitter::Node;

const CLASS_KINDS: [&str; 3] = ["class_declaration", "abstract_class_declaration", "class"];

/// Extracted objects plus soft failures for one file.
#[derive(Debug, Default)]
pub(crate) struct Extraction {
    pub(crate) objects: Vec<SourceObject>,
    pub(crate) warnings: Vec<ScanDiagnostic>,
}

/// Walks the top-level statements of one file.
#[derive(Debug)]
pub(crate) struct ClassExtractor<'a> {
    options: &'a ScanOptions,
    source: &'a str,
    file_path: &'a str,
}

impl<'a> ClassExtractor<'a> {
    pub(crate) const fn new(options: &'a ScanOptions, source: &'a str, file_path: &'a str) -> Self {
        Self {
            options,
            source,
            file_path,
        }
    }

    /// Extracts every qualifying top-level class under `root`.
    pub(crate) fn extract(&self, root: Node<'_>) -> Extraction {
        let mut extraction = Extraction::default();
        for statement in named_children(root) {
            let (class, outer_decorators) = match statement.kind() {
                kind if CLASS_KINDS.contains(&kind) => (statement, Vec::new()),
                "export_statement" => {
                    let Some(declaration) = statement
                        .child_by_field_name("declaration")
                        .or_else(|| statement.child_by_field_name("value"))
                        .filter(|node| CLASS_KINDS.contains(&node.kind()))
                    else {
                        continue;
                    };
                    (declaration, decorators(statement))
                }
                _ => continue,
            };
            self.extract_class(class, &outer_decorators, &mut extraction);
        }
        extraction
    }

    fn extract_class(&self, class: Node<'_>, outer: &[Node<'_>], extraction: &mut Extraction) {
        let Some(name_node) = class.child_by_field_name("name") else {
            tracing::debug!("Skipping anonymous class in {}", self.file_path);
            return;
        };
        let class_name = text(name_node, self.source);

        let own = decorators(class);
        let Some(marker) = outer.iter().chain(own.iter()).find(|d| self.is_marker(**d)) else {
            tracing::debug!("Skipping {class_name}: no @{} marker", self.options.marker);
            return;
        };
        if !self.extends_base_class(class) {
            tracing::debug!("Skipping {class_name}: does not extend a recognized base class");
            return;
        }

        let mut object = SourceObject::new(class_name, self.file_path);
        match self.feature_config(*marker) {
            Ok(config) => object.feature_config = config,
            Err(warning) => {
                tracing::warn!(
                    "Using default configuration for {class_name} in {}: {}",
                    self.file_path,
                    warning.message
                );
                extraction.warnings.push(warning);
            }
        }

        if let Some(body) = class.child_by_field_name("body") {
            for member in named_children(body) {
                match member.kind() {
                    "public_field_definition" => {
                        if let Some((name, field)) = self.field(member) {
                            object.fields.insert(name, field);
                        }
                    }
                    "method_definition" | "abstract_method_signature" => {
                        if let Some(method) = self.method(member) {
                            object.methods.insert(method.name.clone(), method);
                        }
                    }
                    _ => {}
                }
            }
        }

        tracing::debug!(
            "Found {class_name} with {} fields and {} methods",
            object.fields.len(),
            object.methods.len()
        );
        extraction.objects.push(object);
    }

    /// `@marker` or `@marker(...)`.
    fn is_marker(&self, decorator: Node<'_>) -> bool {
        let Some(expression) = named_children(decorator).into_iter().next() else {
            return false;
        };
        let callee = match expression.kind() {
            "call_expression" => expression.child_by_field_name("function"),
            _ => Some(expression),
        };
        callee.is_some_and(|node| {
            node.kind() == "identifier" && text(node, self.source) == self.options.marker
        })
    }

    fn extends_base_class(&self, class: Node<'_>) -> bool {
        children(class)
            .into_iter()
            .filter(|child| child.kind() == "class_heritage")
            .flat_map(children)
            .filter(|clause| clause.kind() == "extends_clause")
            .flat_map(named_children)
            .any(|base| {
                base.kind() == "identifier" && self.options.is_base_class(text(base, self.source))
            })
    }

    /// Reads the marker's single object-literal argument.
    ///
    /// A bare marker or an empty argument list yields the default
    /// configuration. Anything that is not a literal object, or that
    /// does not describe surfaces, yields a configuration diagnostic.
    fn feature_config(&self, marker: Node<'_>) -> Result<FeatureConfig, ScanDiagnostic> {
        let Some(call) = named_children(marker)
            .into_iter()
            .next()
            .filter(|expression| expression.kind() == "call_expression")
        else {
            return Ok(FeatureConfig::default());
        };
        let Some(argument) = call
            .child_by_field_name("arguments")
            .and_then(|arguments| named_children(arguments).into_iter().next())
        else {
            return Ok(FeatureConfig::default());
        };

        let diagnostic = |message: String| {
            let (line, column) = position(argument);
            ScanDiagnostic::at(DiagnosticKind::Configuration, message, line, column)
        };

        if argument.has_error() {
            return Err(diagnostic(
                "marker configuration contains syntax errors".to_string(),
            ));
        }
        if argument.kind() != "object" {
            return Err(diagnostic(format!(
                "marker configuration must be an object literal, found {}",
                argument.kind()
            )));
        }
        let value = literal::evaluate(argument, self.source).ok_or_else(|| {
            diagnostic("marker configuration may contain only literal values".to_string())
        })?;
        FeatureConfig::from_literal(&value).map_err(|e| diagnostic(e.to_string()))
    }

    fn field(&self, member: Node<'_>) -> Option<(String, FieldDescriptor)> {
        let name = self.member_name(member)?;
        if has_token(member, "static") {
            return None;
        }

        let annotation = member
            .child_by_field_name("type")
            .map(|node| type_text(node, self.source));
        let initializer = member.child_by_field_name("value");

        let kind = infer_kind(annotation.as_deref(), initializer, self.source);
        let required =
            !has_token(member, "?") && !annotation.as_deref().is_some_and(is_optional_type);
        let mut field = FieldDescriptor::new(kind, required);
        if let Some(default) = initializer.and_then(|node| literal::evaluate(node, self.source)) {
            field = field.with_default(default);
        }
        Some((name, field))
    }

    fn method(&self, member: Node<'_>) -> Option<MethodDescriptor> {
        let name = self.member_name(member)?;
        if name == "constructor" || has_token(member, "get") || has_token(member, "set") {
            return None;
        }

        let is_static = has_token(member, "static");
        let is_private = children(member).into_iter().any(|child| {
            child.kind() == "accessibility_modifier" && text(child, self.source) == "private"
        });
        if is_static && !self.options.include_static_methods {
            return None;
        }
        if is_private && !self.options.include_private_methods {
            return None;
        }

        let parameters = member
            .child_by_field_name("parameters")
            .map(|list| {
                named_children(list)
                    .into_iter()
                    .filter_map(|param| self.parameter(param))
                    .collect()
            })
            .unwrap_or_default();

        Some(MethodDescriptor {
            name,
            is_async: has_token(member, "async"),
            parameters,
            return_type: member
                .child_by_field_name("return_type")
                .map_or_else(|| "void".to_string(), |node| type_text(node, self.source)),
            is_static,
            is_public: !is_private,
        })
    }

    fn parameter(&self, param: Node<'_>) -> Option<ParameterDescriptor> {
        let optional = match param.kind() {
            "required_parameter" => false,
            "optional_parameter" => true,
            _ => return None,
        };
        let pattern = param.child_by_field_name("pattern")?;
        Some(ParameterDescriptor {
            name: text(pattern, self.source).to_string(),
            type_label: param
                .child_by_field_name("type")
                .map_or_else(|| "any".to_string(), |node| type_text(node, self.source)),
            optional,
            default: param
                .child_by_field_name("value")
                .and_then(|node| literal::evaluate(node, self.source)),
        })
    }

    /// Identifier or string-literal member name; computed and `#private`
    /// names are not supported.
    fn member_name(&self, member: Node<'_>) -> Option<String> {
        let name = member.child_by_field_name("name")?;
        match name.kind() {
            "property_identifier" => Some(text(name, self.source).to_string()),
            "string" => Some(string_value(name, self.source)),
            _ => None,
        }
    }
}

fn decorators(node: Node<'_>) -> Vec<Node<'_>> {
    children(node)
        .into_iter()
        .filter(|child| child.kind() == "decorator")
        .collect()
}
