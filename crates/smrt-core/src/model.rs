//! Structural description of scanned classes.
//!
//! These types are produced once per scan pass and never mutated
//! afterwards; a rescan rebuilds them from scratch.
//!
//! # Examples
//!
//! ```
//! use smrt_core::{FieldDescriptor, FieldKind, SourceObject};
//!
//! let mut product = SourceObject::new("Product", "src/models/product.ts");
//! product.fields.insert(
//!     "price".to_string(),
//!     FieldDescriptor::new(FieldKind::Decimal, true).with_default(0.into()),
//! );
//!
//! assert_eq!(product.name, "product");
//! assert_eq!(product.collection_name, "products");
//! assert_eq!(product.fields["price"].kind.typescript_type(), "number");
//! ```

use crate::FeatureConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Closed set of semantic field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free text
    #[serde(rename = "text")]
    Text,
    /// Whole number
    #[serde(rename = "integer")]
    Integer,
    /// Decimal number
    #[serde(rename = "decimal")]
    Decimal,
    /// `true` / `false`
    #[serde(rename = "boolean")]
    Boolean,
    /// Timestamp
    #[serde(rename = "datetime")]
    DateTime,
    /// Structured value (arrays, objects)
    #[serde(rename = "json")]
    Json,
    /// Identifier of another object
    #[serde(rename = "foreignKey")]
    ForeignKey,
}

impl FieldKind {
    /// TypeScript type used in generated declarations.
    ///
    /// # Examples
    ///
    /// ```
    /// use smrt_core::FieldKind;
    ///
    /// assert_eq!(FieldKind::DateTime.typescript_type(), "Date | string");
    /// assert_eq!(FieldKind::Json.typescript_type(), "any");
    /// ```
    #[must_use]
    pub const fn typescript_type(&self) -> &'static str {
        match self {
            Self::Text | Self::ForeignKey => "string",
            Self::Integer | Self::Decimal => "number",
            Self::Boolean => "boolean",
            Self::DateTime => "Date | string",
            Self::Json => "any",
        }
    }

    /// JSON Schema `type` keyword for this kind.
    #[must_use]
    pub const fn json_schema_type(&self) -> &'static str {
        match self {
            Self::Text | Self::DateTime | Self::ForeignKey => "string",
            Self::Integer => "integer",
            Self::Decimal => "number",
            Self::Boolean => "boolean",
            Self::Json => "object",
        }
    }

    /// JSON Schema `format` keyword, where one applies.
    #[must_use]
    pub const fn json_schema_format(&self) -> Option<&'static str> {
        match self {
            Self::DateTime => Some("date-time"),
            _ => None,
        }
    }
}

/// One data member of a scanned class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Inferred semantic type
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// `false` when declared with `?` or typed with `undefined`
    pub required: bool,

    /// Statically known literal default, if any
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub default: Option<Value>,
}

impl FieldDescriptor {
    /// Creates a field without a default value.
    #[must_use]
    pub const fn new(kind: FieldKind, required: bool) -> Self {
        Self {
            kind,
            required,
            default: None,
        }
    }

    /// Attaches a literal default value.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// One parameter of a scanned method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name as written (including destructuring or rest syntax)
    pub name: String,

    /// Type annotation text, `any` when absent
    #[serde(rename = "type")]
    pub type_label: String,

    /// Declared with `?`
    pub optional: bool,

    /// Statically known literal default, if any
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub default: Option<Value>,
}

/// One method of a scanned class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,

    /// Declared `async`
    #[serde(rename = "async")]
    pub is_async: bool,

    /// Parameters in declaration order
    pub parameters: Vec<ParameterDescriptor>,

    /// Return type annotation text, `void` when absent
    pub return_type: String,

    /// Declared `static`
    pub is_static: bool,

    /// Not declared `private`
    pub is_public: bool,
}

/// One qualifying class: the unit stored in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceObject {
    /// Lower-cased class name, the manifest key
    pub name: String,

    /// Class name as declared
    pub class_name: String,

    /// Pluralized lower-cased class name
    pub collection_name: String,

    /// File the class was found in
    pub file_path: String,

    /// Data members in declaration order
    #[serde(default)]
    pub fields: IndexMap<String, FieldDescriptor>,

    /// Methods in declaration order
    #[serde(default)]
    pub methods: IndexMap<String, MethodDescriptor>,

    /// Per-surface visibility rules
    #[serde(default)]
    pub feature_config: FeatureConfig,
}

impl SourceObject {
    /// Creates an empty descriptor for `class_name`, deriving the key and
    /// collection name.
    #[must_use]
    pub fn new(class_name: impl Into<String>, file_path: impl Into<String>) -> Self {
        let class_name = class_name.into();
        let name = class_name.to_lowercase();
        Self {
            collection_name: pluralize(&name),
            name,
            class_name,
            file_path: file_path.into(),
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            feature_config: FeatureConfig::default(),
        }
    }

    /// Names of fields marked required, in declaration order.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, field)| field.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Pluralizes a lower-cased word with a fixed heuristic.
///
/// Trailing `y` becomes `ies`; trailing `s`, `sh` or `ch` gets `es`;
/// everything else gets `s`. Irregular nouns are not handled
/// (`person` becomes `persons`), and changing that would rename existing
/// collections.
///
/// # Examples
///
/// ```
/// use smrt_core::pluralize;
///
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("product"), "products");
/// assert_eq!(pluralize("address"), "addresses");
/// assert_eq!(pluralize("batch"), "batches");
/// ```
#[must_use]
pub fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else if word.ends_with('s') || word.ends_with("sh") || word.ends_with("ch") {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}

/// Deserializes a present value, keeping an explicit `null` as `Some(Null)`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pluralize_rules() {
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("product"), "products");
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("wish"), "wishes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("person"), "persons");
        assert_eq!(pluralize("key"), "keies");
    }

    #[test]
    fn test_source_object_new_derives_names() {
        let obj = SourceObject::new("BlogPost", "post.ts");
        assert_eq!(obj.name, "blogpost");
        assert_eq!(obj.class_name, "BlogPost");
        assert_eq!(obj.collection_name, "blogposts");
        assert!(obj.fields.is_empty());
        assert_eq!(obj.feature_config, FeatureConfig::default());
    }

    #[test]
    fn test_field_kind_mappings() {
        assert_eq!(FieldKind::Text.typescript_type(), "string");
        assert_eq!(FieldKind::Integer.typescript_type(), "number");
        assert_eq!(FieldKind::ForeignKey.typescript_type(), "string");
        assert_eq!(FieldKind::Integer.json_schema_type(), "integer");
        assert_eq!(FieldKind::Json.json_schema_type(), "object");
        assert_eq!(FieldKind::DateTime.json_schema_format(), Some("date-time"));
        assert_eq!(FieldKind::Text.json_schema_format(), None);
    }

    #[test]
    fn test_field_kind_wire_names() {
        assert_eq!(
            serde_json::to_value(FieldKind::ForeignKey).unwrap(),
            json!("foreignKey")
        );
        assert_eq!(
            serde_json::to_value(FieldKind::DateTime).unwrap(),
            json!("datetime")
        );
    }

    #[test]
    fn test_field_null_default_survives_round_trip() {
        let field = FieldDescriptor::new(FieldKind::Text, true).with_default(Value::Null);
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(json, r#"{"type":"text","required":true,"default":null}"#);

        let back: FieldDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.default, Some(Value::Null));
    }

    #[test]
    fn test_field_without_default_omits_key() {
        let field = FieldDescriptor::new(FieldKind::Boolean, false);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value, json!({"type": "boolean", "required": false}));

        let back: FieldDescriptor = serde_json::from_value(value).unwrap();
        assert_eq!(back.default, None);
    }

    #[test]
    fn test_method_wire_names() {
        let method = MethodDescriptor {
            name: "calculateDiscount".to_string(),
            is_async: true,
            parameters: vec![ParameterDescriptor {
                name: "percentage".to_string(),
                type_label: "number".to_string(),
                optional: false,
                default: None,
            }],
            return_type: "Promise<number>".to_string(),
            is_static: false,
            is_public: true,
        };
        let value = serde_json::to_value(&method).unwrap();
        assert_eq!(value["async"], json!(true));
        assert_eq!(value["returnType"], json!("Promise<number>"));
        assert_eq!(value["parameters"][0]["type"], json!("number"));
        assert_eq!(value["isStatic"], json!(false));
    }

    #[test]
    fn test_required_fields_preserve_order() {
        let mut obj = SourceObject::new("Product", "p.ts");
        obj.fields
            .insert("name".to_string(), FieldDescriptor::new(FieldKind::Text, true));
        obj.fields.insert(
            "description".to_string(),
            FieldDescriptor::new(FieldKind::Text, false),
        );
        obj.fields
            .insert("price".to_string(), FieldDescriptor::new(FieldKind::Decimal, true));
        assert_eq!(obj.required_fields(), vec!["name", "price"]);
    }
}
