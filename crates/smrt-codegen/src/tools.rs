//! AI tool schemas (MCP tool descriptors).

use serde_json::{Map, Value, json};
use smrt_core::{FieldDescriptor, Manifest, Operation, SourceObject, Surface};

/// One tool descriptor: `{name, description, inputSchema}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    /// Tool name, e.g. `list_products` or `get_product`
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema of the tool input
    pub input_schema: Value,
}

impl ToolDefinition {
    /// JSON form with the `inputSchema` wire name.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema,
        })
    }
}

/// Tool descriptors for every object whose `mcp` surface is not disabled,
/// one per allowed operation, in manifest then operation order.
#[must_use]
pub fn tool_definitions(manifest: &Manifest) -> Vec<ToolDefinition> {
    manifest
        .objects_on(Surface::Tooling)
        .flat_map(|object| {
            object
                .feature_config
                .tooling
                .allowed_operations()
                .into_iter()
                .map(move |op| tool(object, op))
        })
        .collect()
}

/// Emits the tool descriptors as a pretty-printed JSON array.
///
/// # Examples
///
/// ```
/// use smrt_codegen::generate_tool_schemas;
/// use smrt_core::{build_manifest, ScanResult, SourceObject};
///
/// let mut result = ScanResult::new("models.ts");
/// result.objects.push(SourceObject::new("Category", "models.ts"));
///
/// let output = generate_tool_schemas(&build_manifest(&[result]));
/// let tools: serde_json::Value = serde_json::from_str(&output).unwrap();
/// assert_eq!(tools[0]["name"], "list_categories");
/// assert_eq!(tools[1]["name"], "get_category");
/// ```
#[must_use]
pub fn generate_tool_schemas(manifest: &Manifest) -> String {
    let tools = tool_definitions(manifest)
        .iter()
        .map(ToolDefinition::to_value)
        .collect();
    format!("{:#}", Value::Array(tools))
}

fn tool(object: &SourceObject, op: Operation) -> ToolDefinition {
    let SourceObject {
        name,
        collection_name: collection,
        ..
    } = object;
    let id = || json!({ "type": "string", "description": format!("The {name} ID") });

    let (tool_name, description, input_schema) = match op {
        Operation::List => (
            format!("list_{collection}"),
            format!("List {collection}"),
            json!({
                "type": "object",
                "properties": {
                    "limit": { "type": "number" },
                    "offset": { "type": "number" },
                    "where": { "type": "object" },
                    "orderBy": { "type": "string" },
                },
            }),
        ),
        Operation::Get => (
            format!("get_{name}"),
            format!("Get a {name} by ID"),
            json!({
                "type": "object",
                "properties": { "id": id() },
                "required": ["id"],
            }),
        ),
        Operation::Create => (
            format!("create_{name}"),
            format!("Create a new {name}"),
            json!({
                "type": "object",
                "properties": field_properties(object),
                "required": object.required_fields(),
            }),
        ),
        Operation::Update => {
            let mut properties = Map::new();
            properties.insert("id".to_string(), id());
            properties.extend(
                field_properties(object)
                    .into_iter()
                    .filter(|(field, _)| field != "id"),
            );
            (
                format!("update_{name}"),
                format!("Update a {name}"),
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": ["id"],
                }),
            )
        }
        Operation::Delete => (
            format!("delete_{name}"),
            format!("Delete a {name}"),
            json!({
                "type": "object",
                "properties": { "id": id() },
                "required": ["id"],
            }),
        ),
    };

    ToolDefinition {
        name: tool_name,
        description,
        input_schema,
    }
}

/// JSON Schema properties for the fields of `object`, in declaration order.
pub(crate) fn field_properties(object: &SourceObject) -> Map<String, Value> {
    object
        .fields
        .iter()
        .map(|(name, field)| (name.clone(), field_schema(name, field)))
        .collect()
}

fn field_schema(name: &str, field: &FieldDescriptor) -> Value {
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!(field.kind.json_schema_type()));
    if let Some(format) = field.kind.json_schema_format() {
        schema.insert("format".to_string(), json!(format));
    }
    schema.insert("description".to_string(), json!(format!("The {name} field")));
    if let Some(default) = &field.default {
        schema.insert("default".to_string(), default.clone());
    }
    Value::Object(schema)
}
