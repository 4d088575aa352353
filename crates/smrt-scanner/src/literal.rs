//! Restricted literal interpreter.
//!
//! Turns literal-only expressions (strings, numbers, booleans, `null`, and
//! arrays/objects built from them) into JSON values. Anything else, such as
//! identifiers, calls, spreads or template substitutions, makes the whole
//! expression non-literal. Source text is never executed.

use crate::syntax::{children, named_children, text};
use serde_json::{Map, Number, Value};
use tree_sitter::Node;

/// Evaluates `node` as a literal, or returns `None` if it is not one.
pub(crate) fn evaluate(node: Node<'_>, source: &str) -> Option<Value> {
    match node.kind() {
        "string" => Some(Value::String(string_value(node, source))),
        "template_string" => template_value(node, source).map(Value::String),
        "number" => number_value(text(node, source)),
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" => Some(Value::Null),
        "array" => named_children(node)
            .into_iter()
            .map(|element| evaluate(element, source))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        "object" => object_value(node, source),
        "unary_expression" => signed_number(node, source),
        "parenthesized_expression" | "as_expression" | "satisfies_expression" => {
            named_children(node)
                .first()
                .and_then(|inner| evaluate(*inner, source))
        }
        _ => None,
    }
}

/// Returns `true` for a numeric literal, including a signed one (`-1`).
pub(crate) fn is_numeric(node: Node<'_>, source: &str) -> bool {
    match node.kind() {
        "number" => true,
        "unary_expression" => signed_number(node, source).is_some(),
        _ => false,
    }
}

/// Decoded content of a `string` node.
pub(crate) fn string_value(node: Node<'_>, source: &str) -> String {
    let mut value = String::new();
    for part in children(node) {
        match part.kind() {
            "string_fragment" => value.push_str(text(part, source)),
            "escape_sequence" => value.push_str(&unescape(text(part, source))),
            _ => {}
        }
    }
    value
}

fn template_value(node: Node<'_>, source: &str) -> Option<String> {
    let mut value = String::new();
    for part in children(node) {
        match part.kind() {
            "template_substitution" => return None,
            "string_fragment" => value.push_str(text(part, source)),
            "escape_sequence" => value.push_str(&unescape(text(part, source))),
            _ => {}
        }
    }
    Some(value)
}

fn object_value(node: Node<'_>, source: &str) -> Option<Value> {
    let mut map = Map::new();
    for entry in named_children(node) {
        if entry.kind() != "pair" {
            return None;
        }
        let key = property_key(entry.child_by_field_name("key")?, source)?;
        let value = evaluate(entry.child_by_field_name("value")?, source)?;
        map.insert(key, value);
    }
    Some(Value::Object(map))
}

fn property_key(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "property_identifier" | "number" => Some(text(node, source).to_string()),
        "string" => Some(string_value(node, source)),
        _ => None,
    }
}

fn signed_number(node: Node<'_>, source: &str) -> Option<Value> {
    let operator = text(node.child_by_field_name("operator")?, source);
    let argument = node.child_by_field_name("argument")?;
    if argument.kind() != "number" {
        return None;
    }
    let value = number_value(text(argument, source))?;
    match operator {
        "+" => Some(value),
        "-" => negate(&value),
        _ => None,
    }
}

fn negate(value: &Value) -> Option<Value> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(Value::from(-int));
    }
    Number::from_f64(-number.as_f64()?).map(Value::Number)
}

/// Parses a numeric literal, honouring separators and radix prefixes.
fn number_value(literal: &str) -> Option<Value> {
    let cleaned = literal.replace('_', "");
    let lower = cleaned.to_ascii_lowercase();
    let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| lower.strip_prefix(prefix).map(|digits| (digits, radix)));
    if let Some((digits, radix)) = radix {
        return i64::from_str_radix(digits, radix).ok().map(Value::from);
    }
    if let Some(digits) = lower.strip_suffix('n') {
        // BigInt literal
        return digits.parse::<i64>().ok().map(Value::from);
    }
    if let Ok(int) = lower.parse::<i64>() {
        return Some(Value::from(int));
    }
    lower
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn unescape(sequence: &str) -> String {
    let Some(body) = sequence.strip_prefix('\\') else {
        return sequence.to_string();
    };
    let mut chars = body.chars();
    match chars.next() {
        Some('n') => "\n".to_string(),
        Some('t') => "\t".to_string(),
        Some('r') => "\r".to_string(),
        Some('b') => "\u{8}".to_string(),
        Some('f') => "\u{c}".to_string(),
        Some('v') => "\u{b}".to_string(),
        Some('0') if body.len() == 1 => "\0".to_string(),
        Some('x' | 'u') => {
            let hex = chars.as_str().trim_start_matches('{').trim_end_matches('}');
            u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map_or_else(|| sequence.to_string(), String::from)
        }
        Some('\n' | '\r') | None => String::new(),
        Some(other) => other.to_string(),
    }
}
