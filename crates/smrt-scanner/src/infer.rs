//! Field kind inference.
//!
//! Order of evidence: the type annotation text, then the initializer
//! literal, then the [`FieldKind::Text`] fallback.

use crate::literal;
use smrt_core::FieldKind;
use tree_sitter::Node;

/// Infers the kind of a field from whatever the declaration offers.
pub(crate) fn infer_kind(
    type_text: Option<&str>,
    initializer: Option<Node<'_>>,
    source: &str,
) -> FieldKind {
    type_text
        .and_then(kind_from_type)
        .or_else(|| initializer.and_then(|node| kind_from_initializer(node, source)))
        .unwrap_or(FieldKind::Text)
}

/// Pattern-matches annotation text. The first matching rule wins, so
/// `string[]` is text rather than structured.
pub(crate) fn kind_from_type(type_text: &str) -> Option<FieldKind> {
    let lower = type_text.to_lowercase();
    if lower.contains("string") {
        Some(FieldKind::Text)
    } else if lower.contains("number") {
        Some(FieldKind::Decimal)
    } else if lower.contains("boolean") {
        Some(FieldKind::Boolean)
    } else if lower.contains("date") {
        Some(FieldKind::DateTime)
    } else if lower.contains("[]") || lower.contains("array") {
        Some(FieldKind::Json)
    } else {
        None
    }
}

fn kind_from_initializer(node: Node<'_>, source: &str) -> Option<FieldKind> {
    match node.kind() {
        "string" => Some(FieldKind::Text),
        "true" | "false" => Some(FieldKind::Boolean),
        "array" | "object" => Some(FieldKind::Json),
        _ if literal::is_numeric(node, source) => Some(FieldKind::Decimal),
        _ => None,
    }
}

/// Returns `true` if the annotation admits a missing value.
pub(crate) fn is_optional_type(type_text: &str) -> bool {
    let lower = type_text.to_lowercase();
    lower.contains("undefined") || lower.contains('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_type() {
        assert_eq!(kind_from_type("string"), Some(FieldKind::Text));
        assert_eq!(kind_from_type("number | null"), Some(FieldKind::Decimal));
        assert_eq!(kind_from_type("Boolean"), Some(FieldKind::Boolean));
        assert_eq!(kind_from_type("Date"), Some(FieldKind::DateTime));
        assert_eq!(kind_from_type("Tag[]"), Some(FieldKind::Json));
        assert_eq!(kind_from_type("Array<Tag>"), Some(FieldKind::Json));
        assert_eq!(kind_from_type("string[]"), Some(FieldKind::Text));
        assert_eq!(kind_from_type("Record<K, V>"), None);
    }

    #[test]
    fn test_fallback_is_text() {
        assert_eq!(infer_kind(None, None, ""), FieldKind::Text);
        assert_eq!(infer_kind(Some("Metadata"), None, ""), FieldKind::Text);
    }

    #[test]
    fn test_optional_type() {
        assert!(is_optional_type("string | undefined"));
        assert!(!is_optional_type("string | null"));
    }
}
