//! Thin helpers over the tree-sitter TypeScript grammar.

use tree_sitter::{Language, Node, Parser, Tree};

/// Grammar flavour, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    TypeScript,
    Tsx,
}

impl Dialect {
    pub(crate) fn for_path(path: &str) -> Self {
        if path.ends_with(".tsx") || path.ends_with(".jsx") {
            Self::Tsx
        } else {
            Self::TypeScript
        }
    }

    fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Parses `source` into a syntax tree.
///
/// tree-sitter recovers from syntax errors, so a returned tree may still
/// contain `ERROR` or missing nodes.
pub(crate) fn parse(source: &str, dialect: Dialect) -> Result<Tree, String> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| format!("failed to load TypeScript grammar: {e}"))?;
    parser
        .parse(source, None)
        .ok_or_else(|| "parser produced no syntax tree".to_string())
}

/// Direct children of `node`, named and anonymous.
pub(crate) fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Named children of `node`, without comments.
pub(crate) fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Source text covered by `node`.
pub(crate) fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// 1-based line and column of the start of `node`.
pub(crate) fn position(node: Node<'_>) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}

/// Returns `true` if `node` has a direct child token of the given kind
/// (`static`, `async`, `?`, ...).
pub(crate) fn has_token(node: Node<'_>, kind: &str) -> bool {
    children(node).iter().any(|child| child.kind() == kind)
}

/// Text of the type inside a `type_annotation` (without the leading `:`).
pub(crate) fn type_text(annotation: Node<'_>, source: &str) -> String {
    named_children(annotation).first().map_or_else(
        || text(annotation, source).trim_start_matches(':').trim().to_string(),
        |ty| text(*ty, source).to_string(),
    )
}

/// First `ERROR` or missing node in document order.
pub(crate) fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    children(node)
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_source() {
        let tree = parse("class A extends B {}", Dialect::TypeScript).unwrap();
        assert!(!tree.root_node().has_error());
        assert_eq!(tree.root_node().kind(), "program");
    }

    #[test]
    fn test_first_error_position() {
        let source = "class A {\n  name: string = ;\n}\n";
        let tree = parse(source, Dialect::TypeScript).unwrap();
        let root = tree.root_node();
        assert!(root.has_error());
        let (line, _) = position(first_error(root).unwrap());
        assert_eq!(line, 2);
    }

    #[test]
    fn test_dialect_for_path() {
        assert_eq!(Dialect::for_path("a/b.tsx"), Dialect::Tsx);
        assert_eq!(Dialect::for_path("a/b.ts"), Dialect::TypeScript);
    }

    #[test]
    fn test_type_text_strips_colon() {
        let source = "let x: Array<string> = [];";
        let tree = parse(source, Dialect::TypeScript).unwrap();
        let declarator = tree
            .root_node()
            .child(0)
            .and_then(|decl| decl.named_child(0))
            .unwrap();
        let annotation = declarator.child_by_field_name("type").unwrap();
        assert_eq!(type_text(annotation, source), "Array<string>");
    }
}
