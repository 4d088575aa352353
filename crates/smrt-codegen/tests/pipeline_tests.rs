//! Scanner-to-generator scenarios over in-memory sources.

use serde_json::Value;
use smrt_codegen::{
    Artifact, CodeGenerator, generate_rest_endpoints, generate_tool_schemas,
    generate_type_definitions,
};
use smrt_core::{Manifest, ScanOptions, build_manifest};
use smrt_scanner::Scanner;

const CATALOG: &str = r"
@smrt({
  api: { exclude: ['delete'] },
  mcp: { include: ['list', 'get', 'create'] },
})
export class Product extends SmrtObject {
  name: string = '';
  price: number = 0;
  inStock: boolean = true;
}

@smrt()
export class Category extends SmrtObject {
  active: boolean;
}
";

fn catalog() -> Manifest {
    let scanner = Scanner::new(ScanOptions::default());
    build_manifest(&[scanner.scan_source("catalog.ts", CATALOG)])
}

#[test]
fn test_rest_stubs_respect_api_exclude() {
    let manifest = catalog();
    assert_eq!(manifest.objects.len(), 2);

    let rest = generate_rest_endpoints(&manifest);
    assert!(rest.contains("GET /products"));
    assert!(rest.contains("POST /products"));
    assert!(rest.contains("GET /products/:id"));
    assert!(!rest.contains("DELETE /products"));
    assert!(rest.contains("DELETE /categories/:id"));
}

#[test]
fn test_tool_schemas_respect_mcp_include() {
    let tools = generate_tool_schemas(&catalog());
    assert!(tools.contains("list_products"));
    assert!(tools.contains("get_product"));
    assert!(tools.contains("create_product"));
    assert!(!tools.contains("delete_product"));
    assert!(!tools.contains("update_product"));
    assert!(tools.contains("delete_category"));

    let parsed: Value = serde_json::from_str(&tools).unwrap();
    let create = parsed
        .as_array()
        .unwrap()
        .iter()
        .find(|tool| tool["name"] == "create_product")
        .unwrap();
    assert_eq!(
        create["inputSchema"]["required"],
        serde_json::json!(["name", "price", "inStock"])
    );
}

#[test]
fn test_type_definitions() {
    let types = generate_type_definitions(&catalog());
    assert_eq!(
        types,
        "export interface ProductData {\n  name: string;\n  price: number;\n  inStock: boolean;\n}\n\n\
         export interface CategoryData {\n  active: boolean;\n}"
    );
}

#[test]
fn test_generation_is_deterministic_across_rescans() {
    let generator = CodeGenerator::new().unwrap();
    let mut first = catalog();
    let mut second = catalog();
    first.timestamp = 0;
    second.timestamp = 0;

    let a = generator.generate(&first, &Artifact::ALL).unwrap();
    let b = generator.generate(&second, &Artifact::ALL).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_manifest_round_trip_feeds_generators() {
    let manifest = catalog();
    let reloaded = Manifest::from_json(&manifest.to_json_pretty().unwrap()).unwrap();
    assert_eq!(reloaded.objects, manifest.objects);
    assert_eq!(
        generate_rest_endpoints(&reloaded),
        generate_rest_endpoints(&manifest)
    );
}

#[test]
fn test_quoted_member_names_stay_valid_typescript() {
    let source = r"
@smrt()
export class Header extends SmrtObject {
  'content-type': string = '';
  value?: string;
}
";
    let scanner = Scanner::new(ScanOptions::default());
    let manifest = build_manifest(&[scanner.scan_source("header.ts", source)]);
    assert!(manifest.objects["header"].fields.contains_key("content-type"));

    assert_eq!(
        generate_type_definitions(&manifest),
        "export interface HeaderData {\n  'content-type': string;\n  value?: string;\n}"
    );

    let tools: Value = serde_json::from_str(&generate_tool_schemas(&manifest)).unwrap();
    assert!(tools[2]["inputSchema"]["properties"]["content-type"].is_object());
}
