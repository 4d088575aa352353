//! OpenAPI 3.1 document for the REST surface.

use crate::tools::field_properties;
use serde_json::{Map, Value, json};
use smrt_core::{Manifest, Operation, SourceObject, Surface};

/// Document-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiOptions {
    /// `info.title`
    pub title: String,
    /// Server URL the paths are relative to
    pub base_path: String,
}

impl Default for OpenApiOptions {
    fn default() -> Self {
        Self {
            title: "smrt API".to_string(),
            base_path: crate::client::DEFAULT_API_BASE_PATH.to_string(),
        }
    }
}

/// Builds the OpenAPI document as a JSON value.
///
/// Paths are emitted only for operations allowed on the `api` surface;
/// `components.schemas` holds one schema per exposed object, keyed by class
/// name.
///
/// # Examples
///
/// ```
/// use smrt_codegen::{openapi_document, OpenApiOptions};
/// use smrt_core::{build_manifest, ScanResult, SourceObject};
///
/// let mut result = ScanResult::new("models.ts");
/// result.objects.push(SourceObject::new("Product", "models.ts"));
///
/// let doc = openapi_document(&build_manifest(&[result]), &OpenApiOptions::default());
/// assert_eq!(doc["openapi"], "3.1.0");
/// assert!(doc["paths"]["/products/{id}"]["delete"].is_object());
/// assert!(doc["components"]["schemas"]["Product"].is_object());
/// ```
#[must_use]
pub fn openapi_document(manifest: &Manifest, options: &OpenApiOptions) -> Value {
    let mut paths = Map::new();
    let mut schemas = Map::new();

    for object in manifest.objects_on(Surface::Api) {
        schemas.insert(object.class_name.clone(), object_schema(object));
        for op in object.feature_config.api.allowed_operations() {
            let path = openapi_path(&object.collection_name, op);
            let entry = paths
                .entry(path)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(methods) = entry {
                methods.insert(op.http_method().to_lowercase(), operation(object, op));
            }
        }
    }

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": options.title,
            "version": manifest.version,
        },
        "servers": [{ "url": options.base_path }],
        "paths": paths,
        "components": { "schemas": schemas },
    })
}

/// Pretty-printed form of [`openapi_document`].
#[must_use]
pub fn generate_openapi(manifest: &Manifest, options: &OpenApiOptions) -> String {
    format!("{:#}", openapi_document(manifest, options))
}

fn openapi_path(collection: &str, op: Operation) -> String {
    if op.targets_item() {
        format!("/{collection}/{{id}}")
    } else {
        format!("/{collection}")
    }
}

fn object_schema(object: &SourceObject) -> Value {
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(field_properties(object)));
    let required = object.required_fields();
    if !required.is_empty() {
        schema.insert("required".to_string(), json!(required));
    }
    Value::Object(schema)
}

fn operation(object: &SourceObject, op: Operation) -> Value {
    let SourceObject {
        name,
        class_name,
        collection_name,
        ..
    } = object;
    let reference = json!({ "$ref": format!("#/components/schemas/{class_name}") });
    let not_found = json!({ "description": format!("{class_name} not found") });
    let id_parameter = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" },
    });
    let body = json!({
        "required": true,
        "content": { "application/json": { "schema": reference } },
    });
    let ok = |description: String, schema: Value| {
        json!({
            "description": description,
            "content": { "application/json": { "schema": schema } },
        })
    };

    let subject = if op == Operation::List { collection_name } else { name };
    let mut map = Map::new();
    map.insert("operationId".into(), json!(format!("{op}_{subject}")));
    map.insert("tags".into(), json!([class_name]));
    match op {
        Operation::List => {
            map.insert("summary".into(), json!(format!("List {collection_name}")));
            map.insert(
                "parameters".into(),
                json!([
                    { "name": "limit", "in": "query", "schema": { "type": "integer" } },
                    { "name": "offset", "in": "query", "schema": { "type": "integer" } },
                    { "name": "where", "in": "query", "schema": { "type": "string" } },
                    { "name": "orderBy", "in": "query", "schema": { "type": "string" } },
                ]),
            );
            map.insert(
                "responses".into(),
                json!({ "200": ok(format!("List of {collection_name}"), json!({ "type": "array", "items": reference })) }),
            );
        }
        Operation::Get => {
            map.insert("summary".into(), json!(format!("Get {class_name}")));
            map.insert("parameters".into(), json!([id_parameter]));
            map.insert(
                "responses".into(),
                json!({ "200": ok(format!("The {name}"), reference), "404": not_found }),
            );
        }
        Operation::Create => {
            map.insert("summary".into(), json!(format!("Create {class_name}")));
            map.insert("requestBody".into(), body);
            map.insert(
                "responses".into(),
                json!({ "201": ok(format!("The created {name}"), reference) }),
            );
        }
        Operation::Update => {
            map.insert("summary".into(), json!(format!("Update {class_name}")));
            map.insert("parameters".into(), json!([id_parameter]));
            map.insert("requestBody".into(), body);
            map.insert(
                "responses".into(),
                json!({ "200": ok(format!("The updated {name}"), reference), "404": not_found }),
            );
        }
        Operation::Delete => {
            map.insert("summary".into(), json!(format!("Delete {class_name}")));
            map.insert("parameters".into(), json!([id_parameter]));
            map.insert(
                "responses".into(),
                json!({ "204": { "description": format!("{class_name} deleted") }, "404": not_found }),
            );
        }
    }
    Value::Object(map)
}
