//! Output formatters for CLI commands.
//!
//! Every command builds a serializable report and hands it to
//! [`format_output`], so the three output modes stay consistent:
//!
//! - `json`: pretty-printed JSON for tools and scripts
//! - `text`: one `path = value` line per leaf, easy to `grep`
//! - `pretty`: indented, colorized tree for terminals

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use smrt_core::cli::OutputFormat;

/// Formats `data` in the requested output format.
///
/// # Errors
///
/// Returns an error if `data` cannot be serialized.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use smrt_cli::formatters::format_output;
/// use smrt_core::cli::OutputFormat;
///
/// #[derive(Serialize)]
/// struct Summary {
///     files: usize,
/// }
///
/// let output = format_output(&Summary { files: 3 }, OutputFormat::Text)?;
/// assert_eq!(output, "files = 3");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Formats data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Line-oriented plain text formatting.
pub mod text {
    use super::{Result, Serialize, Value};

    /// Flattens data into `path = value` lines.
    ///
    /// Object keys are joined with `.`, array items use `[index]`. Strings
    /// are printed without quotes; empty containers print as `[]` or `{}`.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten(&value, String::new(), &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(value: &Value, path: String, lines: &mut Vec<String>) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, item) in map {
                    let child = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    flatten(item, child, lines);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (index, item) in items.iter().enumerate() {
                    flatten(item, format!("{path}[{index}]"), lines);
                }
            }
            leaf => {
                let rendered = match leaf {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                if path.is_empty() {
                    lines.push(rendered);
                } else {
                    lines.push(format!("{path} = {rendered}"));
                }
            }
        }
    }
}

/// Human-readable, colorized formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize, Value};

    /// Formats data as an indented tree.
    ///
    /// Keys are bold, scalars are colored by type, and list items are
    /// bulleted. Colors are dropped automatically when stdout is not a
    /// terminal.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        write_value(&value, 0, &mut out);
        Ok(out.trim_end().to_string())
    }

    fn write_value(value: &Value, depth: usize, out: &mut String) {
        let pad = "  ".repeat(depth);
        match value {
            Value::Object(map) => {
                for (key, item) in map {
                    out.push_str(&pad);
                    out.push_str(&key.bold().to_string());
                    out.push(':');
                    if is_nested(item) {
                        out.push('\n');
                        write_value(item, depth + 1, out);
                    } else {
                        out.push(' ');
                        out.push_str(&scalar(item));
                        out.push('\n');
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    out.push_str(&pad);
                    out.push_str(&"-".dimmed().to_string());
                    if is_nested(item) {
                        out.push('\n');
                        write_value(item, depth + 1, out);
                    } else {
                        out.push(' ');
                        out.push_str(&scalar(item));
                        out.push('\n');
                    }
                }
            }
            other => {
                out.push_str(&pad);
                out.push_str(&scalar(other));
                out.push('\n');
            }
        }
    }

    fn is_nested(value: &Value) -> bool {
        match value {
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => false,
        }
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::Null => "none".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            Value::Array(_) => "[]".dimmed().to_string(),
            Value::Object(_) => "{}".dimmed().to_string(),
        }
    }
}
