//! Command catalogue for the command-line surface.

use serde_json::{Value, json};
use smrt_core::{Manifest, Operation, SourceObject, Surface};

/// One option of a generated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOption {
    /// Long flag, e.g. `--limit`
    pub flag: String,
    /// JSON Schema type of the value
    pub value_type: &'static str,
    /// Must be supplied
    pub required: bool,
    /// Value used when omitted
    pub default: Option<Value>,
}

/// One generated command, e.g. `product:list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliCommand {
    /// `<object>:<operation>`
    pub name: String,
    /// Short alternative names
    pub aliases: Vec<String>,
    /// Help text
    pub description: String,
    /// Manifest key of the object
    pub object: String,
    /// Operation the command performs
    pub operation: Operation,
    /// Positional arguments
    pub args: Vec<String>,
    /// Named options
    pub options: Vec<CliOption>,
}

impl CliCommand {
    /// JSON form of the command.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let options: Vec<Value> = self
            .options
            .iter()
            .map(|option| {
                let mut value = json!({
                    "flag": option.flag,
                    "type": option.value_type,
                    "required": option.required,
                });
                if let (Some(default), Value::Object(map)) = (&option.default, &mut value) {
                    map.insert("default".to_string(), default.clone());
                }
                value
            })
            .collect();
        json!({
            "name": self.name,
            "aliases": self.aliases,
            "description": self.description,
            "object": self.object,
            "operation": self.operation,
            "args": self.args,
            "options": options,
        })
    }
}

/// Commands for every object whose `cli` surface is enabled, one per
/// allowed operation.
///
/// # Examples
///
/// ```
/// use smrt_codegen::cli_commands;
/// use smrt_core::{build_manifest, ScanResult, SourceObject, SurfaceConfig};
///
/// let mut category = SourceObject::new("Category", "models.ts");
/// category.feature_config.cli = SurfaceConfig::EnabledAll;
/// let mut result = ScanResult::new("models.ts");
/// result.objects.push(category);
///
/// let commands = cli_commands(&build_manifest(&[result]));
/// assert_eq!(commands[0].name, "category:list");
/// assert_eq!(commands[0].aliases, vec!["category:ls"]);
/// assert_eq!(commands.len(), 5);
/// ```
#[must_use]
pub fn cli_commands(manifest: &Manifest) -> Vec<CliCommand> {
    manifest
        .objects_on(Surface::Cli)
        .flat_map(|object| {
            object
                .feature_config
                .cli
                .allowed_operations()
                .into_iter()
                .map(move |op| command(object, op))
        })
        .collect()
}

/// Emits the command catalogue as a pretty-printed JSON array.
#[must_use]
pub fn generate_cli_commands(manifest: &Manifest) -> String {
    let commands = cli_commands(manifest)
        .iter()
        .map(CliCommand::to_value)
        .collect();
    format!("{:#}", Value::Array(commands))
}

fn command(object: &SourceObject, op: Operation) -> CliCommand {
    let name = &object.name;
    let (alias, description) = match op {
        Operation::List => ("ls", format!("List {}", object.collection_name)),
        Operation::Get => ("show", format!("Show one {name}")),
        Operation::Create => ("new", format!("Create a {name}")),
        Operation::Update => ("edit", format!("Update a {name}")),
        Operation::Delete => ("rm", format!("Delete a {name}")),
    };
    let args = if op.targets_item() {
        vec!["id".to_string()]
    } else {
        Vec::new()
    };
    let options = match op {
        Operation::List => vec![
            option("--limit", "integer"),
            option("--offset", "integer"),
            option("--where", "object"),
            option("--order-by", "string"),
        ],
        Operation::Create | Operation::Update => object
            .fields
            .iter()
            .map(|(field_name, field)| CliOption {
                flag: format!("--{}", kebab_case(field_name)),
                value_type: field.kind.json_schema_type(),
                required: op == Operation::Create && field.required && field.default.is_none(),
                default: if op == Operation::Create {
                    field.default.clone()
                } else {
                    None
                },
            })
            .collect(),
        Operation::Get | Operation::Delete => Vec::new(),
    };

    CliCommand {
        name: format!("{name}:{op}"),
        aliases: vec![format!("{name}:{alias}")],
        description,
        object: name.clone(),
        operation: op,
        args,
        options,
    }
}

fn option(flag: &str, value_type: &'static str) -> CliOption {
    CliOption {
        flag: flag.to_string(),
        value_type,
        required: false,
        default: None,
    }
}

/// `inStock` becomes `in-stock`.
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use smrt_core::{FeatureConfig, FieldDescriptor, FieldKind, ManifestBuilder, SurfaceConfig};
    use std::collections::BTreeSet;

    fn manifest(cli: SurfaceConfig) -> Manifest {
        let mut product = SourceObject::new("Product", "p.ts");
        product
            .fields
            .insert("name".to_string(), FieldDescriptor::new(FieldKind::Text, true));
        product.fields.insert(
            "inStock".to_string(),
            FieldDescriptor::new(FieldKind::Boolean, true).with_default(json!(true)),
        );
        product.feature_config = FeatureConfig {
            cli,
            ..FeatureConfig::default()
        };
        let mut builder = ManifestBuilder::new();
        builder.insert(product);
        builder.build()
    }

    #[test]
    fn test_cli_disabled_by_default() {
        assert!(cli_commands(&manifest(FeatureConfig::default().cli)).is_empty());
        assert_eq!(generate_cli_commands(&manifest(SurfaceConfig::Disabled)), "[]");
    }

    #[test]
    fn test_exclude_removes_command() {
        let commands = cli_commands(&manifest(SurfaceConfig::rules(
            None,
            Some(BTreeSet::from([Operation::Delete, Operation::Update])),
        )));
        let names: Vec<_> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["product:list", "product:get", "product:create"]);
        assert_eq!(commands[1].aliases, vec!["product:show"]);
        assert_eq!(commands[1].args, vec!["id"]);
    }

    #[test]
    fn test_create_options_from_fields() {
        let commands = cli_commands(&manifest(SurfaceConfig::EnabledAll));
        let create = commands
            .iter()
            .find(|c| c.operation == Operation::Create)
            .unwrap();
        assert_eq!(create.options[0].flag, "--name");
        assert!(create.options[0].required);
        assert_eq!(create.options[1].flag, "--in-stock");
        assert!(!create.options[1].required);
        assert_eq!(create.options[1].default, Some(json!(true)));

        let update = commands
            .iter()
            .find(|c| c.operation == Operation::Update)
            .unwrap();
        assert!(update.options.iter().all(|o| !o.required && o.default.is_none()));
    }

    #[test]
    fn test_json_shape() {
        let commands = cli_commands(&manifest(SurfaceConfig::EnabledAll));
        let value = commands[0].to_value();
        assert_eq!(value["name"], json!("product:list"));
        assert_eq!(value["operation"], json!("list"));
        assert_eq!(value["options"][3]["flag"], json!("--order-by"));
        assert!(value["options"][0].get("default").is_none());
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("inStock"), "in-stock");
        assert_eq!(kebab_case("created_at"), "created-at");
        assert_eq!(kebab_case("name"), "name");
    }
}
