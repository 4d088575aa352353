//! REST handler stubs.
//!
//! Each stub calls a `get<ClassName>Collection()` accessor that the host
//! application provides; the output is a template, not a working server.

use smrt_core::{Manifest, Operation, SourceObject, Surface};

/// Emits one commented endpoint block per object whose `api` surface is not
/// disabled, listing only the allowed operations.
///
/// List and create live at `/<collection>`; get, update and delete at
/// `/<collection>/:id`.
///
/// # Examples
///
/// ```
/// use smrt_codegen::generate_rest_endpoints;
/// use smrt_core::{build_manifest, ScanResult, SourceObject};
///
/// let mut result = ScanResult::new("models.ts");
/// result.objects.push(SourceObject::new("Category", "models.ts"));
///
/// let output = generate_rest_endpoints(&build_manifest(&[result]));
/// assert!(output.starts_with("// Category endpoints\n"));
/// assert!(output.contains("app.get('/categories/:id'"));
/// assert!(output.contains("app.delete('/categories/:id'"));
/// ```
#[must_use]
pub fn generate_rest_endpoints(manifest: &Manifest) -> String {
    manifest
        .objects_on(Surface::Api)
        .map(endpoint_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// HTTP path of `op` for a collection.
#[must_use]
pub fn route_path(collection: &str, op: Operation) -> String {
    if op.targets_item() {
        format!("/{collection}/:id")
    } else {
        format!("/{collection}")
    }
}

fn endpoint_block(object: &SourceObject) -> String {
    let lines: Vec<String> = object
        .feature_config
        .api
        .allowed_operations()
        .into_iter()
        .flat_map(|op| handler(object, op))
        .collect();
    format!("// {} endpoints\n{}", object.class_name, lines.join("\n"))
}

fn handler(object: &SourceObject, op: Operation) -> Vec<String> {
    let SourceObject {
        class_name,
        collection_name: collection,
        ..
    } = object;
    let path = route_path(collection, op);
    let summary = match op {
        Operation::List => format!("List {collection}"),
        Operation::Get => format!("Get {class_name}"),
        Operation::Create => format!("Create {class_name}"),
        Operation::Update => format!("Update {class_name}"),
        Operation::Delete => format!("Delete {class_name}"),
    };
    let body: &[&str] = match op {
        Operation::List => &[
            "    const items = await collection.list(req.query);",
            "    return Response.json(items);",
        ],
        Operation::Get => &[
            "    const item = await collection.get(req.params.id);",
            "    if (!item) return new Response('Not found', { status: 404 });",
            "    return Response.json(item);",
        ],
        Operation::Create => &[
            "    const data = await req.json();",
            "    const item = await collection.create(data);",
            "    return Response.json(item, { status: 201 });",
        ],
        Operation::Update => &[
            "    const data = await req.json();",
            "    const item = await collection.update(req.params.id, data);",
            "    if (!item) return new Response('Not found', { status: 404 });",
            "    return Response.json(item);",
        ],
        Operation::Delete => &[
            "    const success = await collection.delete(req.params.id);",
            "    if (!success) return new Response('Not found', { status: 404 });",
            "    return new Response('', { status: 204 });",
        ],
    };

    let mut lines = vec![
        format!("  // {} {path} - {summary}", op.http_method()),
        format!(
            "  app.{}('{path}', async (req: Request) => {{",
            op.http_method().to_lowercase()
        ),
        format!("    const collection = await get{class_name}Collection();"),
    ];
    lines.extend(body.iter().map(ToString::to_string));
    lines.push("  });".to_string());
    lines
}
