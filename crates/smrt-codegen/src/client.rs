//! Typed REST client module.

use serde_json::Value;
use smrt_core::{Manifest, Operation, SourceObject, Surface};

/// Default mount point of the generated REST API.
pub const DEFAULT_API_BASE_PATH: &str = "/api/v1";

const PRELUDE: &str = r"export interface ListOptions {
  limit?: number;
  offset?: number;
  where?: Record<string, unknown>;
  orderBy?: string;
}

async function request<T>(method: string, url: string, body?: unknown): Promise<T> {
  const response = await fetch(url, {
    method,
    headers: body === undefined ? undefined : { 'Content-Type': 'application/json' },
    body: body === undefined ? undefined : JSON.stringify(body),
  });
  if (!response.ok) {
    throw new Error(`${method} ${url} failed with status ${response.status}`);
  }
  return (response.status === 204 ? undefined : await response.json()) as T;
}

function query(options: ListOptions = {}): string {
  const params = new URLSearchParams();
  if (options.limit !== undefined) params.set('limit', String(options.limit));
  if (options.offset !== undefined) params.set('offset', String(options.offset));
  if (options.where !== undefined) params.set('where', JSON.stringify(options.where));
  if (options.orderBy !== undefined) params.set('orderBy', options.orderBy);
  const text = params.toString();
  return text ? `?${text}` : '';
}
";

/// Emits a `createClient(basePath)` module exposing, per object, only the
/// operations allowed on the `api` surface.
///
/// # Examples
///
/// ```
/// use smrt_codegen::generate_api_client;
/// use smrt_core::{build_manifest, ScanResult, SourceObject};
///
/// let mut result = ScanResult::new("models.ts");
/// result.objects.push(SourceObject::new("Category", "models.ts"));
///
/// let output = generate_api_client(&build_manifest(&[result]), "/api/v1");
/// assert!(output.contains("import type { CategoryData } from './types';"));
/// assert!(output.contains(r#"export function createClient(basePath = "/api/v1") {"#));
/// assert!(output.contains("    categories: {"));
/// ```
#[must_use]
pub fn generate_api_client(manifest: &Manifest, base_path: &str) -> String {
    let objects: Vec<&SourceObject> = manifest.objects_on(Surface::Api).collect();

    let mut out = String::new();
    for object in &objects {
        out.push_str(&format!(
            "import type {{ {}Data }} from './types';\n",
            object.class_name
        ));
    }
    if !objects.is_empty() {
        out.push('\n');
    }
    out.push_str(PRELUDE);
    out.push_str(&format!(
        "\nexport function createClient(basePath = {}) {{\n  return {{\n",
        Value::from(base_path)
    ));
    for object in &objects {
        out.push_str(&format!("    {}: {{\n", object.collection_name));
        for op in object.feature_config.api.allowed_operations() {
            out.push_str(&format!("      {},\n", client_method(object, op)));
        }
        out.push_str("    },\n");
    }
    out.push_str("  };\n}\n\nexport type Client = ReturnType<typeof createClient>;\n");
    out
}

fn client_method(object: &SourceObject, op: Operation) -> String {
    let data = format!("{}Data", object.class_name);
    let collection = format!("${{basePath}}/{}", object.collection_name);
    match op {
        Operation::List => format!(
            "list: (options?: ListOptions) => request<{data}[]>('GET', `{collection}${{query(options)}}`)"
        ),
        Operation::Get => {
            format!("get: (id: string) => request<{data}>('GET', `{collection}/${{id}}`)")
        }
        Operation::Create => format!(
            "create: (data: Partial<{data}>) => request<{data}>('POST', `{collection}`, data)"
        ),
        Operation::Update => format!(
            "update: (id: string, data: Partial<{data}>) => request<{data}>('PUT', `{collection}/${{id}}`, data)"
        ),
        Operation::Delete => {
            format!("delete: (id: string) => request<void>('DELETE', `{collection}/${{id}}`)")
        }
    }
}
