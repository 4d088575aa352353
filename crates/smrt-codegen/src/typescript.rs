//! TypeScript type definitions.

use smrt_core::{Manifest, SourceObject};

/// Emits one `export interface <ClassName>Data` per object, in manifest
/// order, separated by a blank line.
///
/// Fields that are not required are marked optional (`?`).
///
/// # Examples
///
/// ```
/// use smrt_codegen::generate_type_definitions;
/// use smrt_core::{build_manifest, FieldDescriptor, FieldKind, ScanResult, SourceObject};
///
/// let mut product = SourceObject::new("Product", "models.ts");
/// product.fields.insert("name".into(), FieldDescriptor::new(FieldKind::Text, true));
/// product.fields.insert("createdAt".into(), FieldDescriptor::new(FieldKind::DateTime, false));
///
/// let mut result = ScanResult::new("models.ts");
/// result.objects.push(product);
///
/// let output = generate_type_definitions(&build_manifest(&[result]));
/// assert_eq!(
///     output,
///     "export interface ProductData {\n  name: string;\n  createdAt?: Date | string;\n}"
/// );
/// ```
#[must_use]
pub fn generate_type_definitions(manifest: &Manifest) -> String {
    manifest
        .objects
        .values()
        .map(interface)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn interface(object: &SourceObject) -> String {
    let mut out = format!("export interface {}Data {{\n", object.class_name);
    for (name, field) in &object.fields {
        let optional = if field.required { "" } else { "?" };
        out.push_str(&format!(
            "  {}{optional}: {};\n",
            property_key(name),
            field.kind.typescript_type()
        ));
    }
    out.push('}');
    out
}

/// Member name as a property key; names that are not identifiers are
/// written as single-quoted strings.
fn property_key(name: &str) -> String {
    if is_identifier(name) {
        return name.to_string();
    }
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
