//! Per-object feature configuration and visibility resolution.
//!
//! Every qualifying class carries a [`FeatureConfig`] read from its marker
//! annotation. Each surface (`api`, `mcp`, `cli`) is either disabled,
//! enabled for all operations, or gated by `include`/`exclude` lists.
//!
//! # Visibility rule
//!
//! `include` and `exclude` are combined with AND: an operation is visible
//! when it appears in `include` (if that list is present) **and** does not
//! appear in `exclude` (if that list is present). Neither list takes
//! precedence over the other. An empty `include` list therefore allows
//! nothing.
//!
//! # Examples
//!
//! ```
//! use smrt_core::{FeatureConfig, Operation, Surface};
//! use serde_json::json;
//!
//! let config = FeatureConfig::from_literal(&json!({
//!     "api": { "exclude": ["delete"] },
//!     "mcp": { "include": ["list", "get", "create"] },
//! }))
//! .unwrap();
//!
//! assert!(config.allows(Surface::Api, Operation::Update));
//! assert!(!config.allows(Surface::Api, Operation::Delete));
//! assert!(!config.allows(Surface::Tooling, Operation::Delete));
//! assert!(!config.allows(Surface::Cli, Operation::List));
//! ```

use crate::{Error, Operation, Result, Surface};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Visibility rule for one surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SurfaceRepr", into = "SurfaceRepr")]
pub enum SurfaceConfig {
    /// Surface is off (`false`).
    Disabled,
    /// Every operation is exposed (`true` or `{}`).
    EnabledAll,
    /// Operations are gated by include and/or exclude lists.
    Rules {
        /// When present, only these operations may be exposed
        include: Option<BTreeSet<Operation>>,
        /// When present, these operations are never exposed
        exclude: Option<BTreeSet<Operation>>,
    },
}

impl SurfaceConfig {
    /// Builds a rule set, collapsing "no lists at all" to [`Self::EnabledAll`].
    ///
    /// # Examples
    ///
    /// ```
    /// use smrt_core::SurfaceConfig;
    ///
    /// assert_eq!(SurfaceConfig::rules(None, None), SurfaceConfig::EnabledAll);
    /// ```
    #[must_use]
    pub fn rules(
        include: Option<BTreeSet<Operation>>,
        exclude: Option<BTreeSet<Operation>>,
    ) -> Self {
        if include.is_none() && exclude.is_none() {
            Self::EnabledAll
        } else {
            Self::Rules { include, exclude }
        }
    }

    /// Returns `true` unless the surface is fully disabled.
    ///
    /// A surface with an empty include list is still enabled: generators
    /// emit its (empty) block rather than skipping the object.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Resolves whether `op` is visible on this surface.
    ///
    /// # Examples
    ///
    /// ```
    /// use smrt_core::{Operation, SurfaceConfig};
    /// use std::collections::BTreeSet;
    ///
    /// let cfg = SurfaceConfig::rules(
    ///     Some(BTreeSet::from([Operation::List, Operation::Delete])),
    ///     Some(BTreeSet::from([Operation::Delete])),
    /// );
    /// assert!(cfg.allows(Operation::List));
    /// assert!(!cfg.allows(Operation::Delete));
    /// assert!(!cfg.allows(Operation::Get));
    /// ```
    #[must_use]
    pub fn allows(&self, op: Operation) -> bool {
        match self {
            Self::Disabled => false,
            Self::EnabledAll => true,
            Self::Rules { include, exclude } => {
                include.as_ref().is_none_or(|ops| ops.contains(&op))
                    && exclude.as_ref().is_none_or(|ops| !ops.contains(&op))
            }
        }
    }

    /// Visible operations in emission order.
    #[must_use]
    pub fn allowed_operations(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.allows(*op))
            .collect()
    }

    /// Interprets one surface entry of a marker configuration literal.
    ///
    /// Operation names outside the canonical five are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the value is neither a boolean nor
    /// an object, or when `include`/`exclude` is not an array of strings.
    pub fn from_literal(surface: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Bool(true) => Ok(Self::EnabledAll),
            Value::Bool(false) => Ok(Self::Disabled),
            Value::Object(map) => {
                let include = map
                    .get("include")
                    .map(|list| operation_list(surface, "include", list))
                    .transpose()?;
                let exclude = map
                    .get("exclude")
                    .map(|list| operation_list(surface, "exclude", list))
                    .transpose()?;
                Ok(Self::rules(include, exclude))
            }
            other => Err(Error::ConfigError {
                message: format!(
                    "surface '{surface}' must be a boolean or an object, found {}",
                    json_kind(other)
                ),
            }),
        }
    }
}

fn operation_list(surface: &str, list_name: &str, value: &Value) -> Result<BTreeSet<Operation>> {
    let Value::Array(items) = value else {
        return Err(Error::ConfigError {
            message: format!("'{surface}.{list_name}' must be an array of operation names"),
        });
    };

    let mut ops = BTreeSet::new();
    for item in items {
        let Value::String(name) = item else {
            return Err(Error::ConfigError {
                message: format!("'{surface}.{list_name}' contains a non-string entry"),
            });
        };
        match name.parse::<Operation>() {
            Ok(op) => {
                ops.insert(op);
            }
            Err(_) => {
                tracing::debug!("ignoring unknown operation '{name}' in {surface}.{list_name}");
            }
        }
    }
    Ok(ops)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Wire form of [`SurfaceConfig`]: `true`, `false`, or `{include?, exclude?}`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SurfaceRepr {
    Flag(bool),
    Rules {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        include: Option<Vec<Operation>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exclude: Option<Vec<Operation>>,
    },
}

impl From<SurfaceRepr> for SurfaceConfig {
    fn from(repr: SurfaceRepr) -> Self {
        match repr {
            SurfaceRepr::Flag(true) => Self::EnabledAll,
            SurfaceRepr::Flag(false) => Self::Disabled,
            SurfaceRepr::Rules { include, exclude } => Self::rules(
                include.map(|ops| ops.into_iter().collect()),
                exclude.map(|ops| ops.into_iter().collect()),
            ),
        }
    }
}

impl From<SurfaceConfig> for SurfaceRepr {
    fn from(config: SurfaceConfig) -> Self {
        match config {
            SurfaceConfig::Disabled => Self::Flag(false),
            SurfaceConfig::EnabledAll => Self::Flag(true),
            SurfaceConfig::Rules { include, exclude } => Self::Rules {
                include: include.map(|ops| ops.into_iter().collect()),
                exclude: exclude.map(|ops| ops.into_iter().collect()),
            },
        }
    }
}

/// Visibility rules for every surface of one object.
///
/// The default (also used when the marker argument is absent or malformed)
/// enables `api` and `mcp` for all operations and disables `cli`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// External REST API surface
    #[serde(default = "enabled_all")]
    pub api: SurfaceConfig,

    /// AI tool (MCP) surface
    #[serde(rename = "mcp", alias = "tooling", default = "enabled_all")]
    pub tooling: SurfaceConfig,

    /// Command-line surface
    #[serde(default = "disabled")]
    pub cli: SurfaceConfig,
}

const fn enabled_all() -> SurfaceConfig {
    SurfaceConfig::EnabledAll
}

const fn disabled() -> SurfaceConfig {
    SurfaceConfig::Disabled
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            api: enabled_all(),
            tooling: enabled_all(),
            cli: disabled(),
        }
    }
}

impl FeatureConfig {
    /// Returns the rule for one surface.
    #[must_use]
    pub const fn surface(&self, surface: Surface) -> &SurfaceConfig {
        match surface {
            Surface::Api => &self.api,
            Surface::Tooling => &self.tooling,
            Surface::Cli => &self.cli,
        }
    }

    /// Resolves whether `op` is visible on `surface`.
    #[must_use]
    pub fn allows(&self, surface: Surface, op: Operation) -> bool {
        self.surface(surface).allows(op)
    }

    /// Builds a configuration from the literal value of a marker argument.
    ///
    /// Surfaces missing from the object keep their defaults. Keys other
    /// than `api`, `mcp` (or `tooling`) and `cli` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the value is not an object or a
    /// surface entry has an unsupported shape. Callers fall back to
    /// [`FeatureConfig::default`].
    pub fn from_literal(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::ConfigError {
                message: format!(
                    "marker configuration must be an object, found {}",
                    json_kind(value)
                ),
            });
        };

        let mut config = Self::default();
        for (key, entry) in map {
            match key.as_str() {
                "api" => config.api = SurfaceConfig::from_literal(key, entry)?,
                "mcp" | "tooling" => config.tooling = SurfaceConfig::from_literal(key, entry)?,
                "cli" => config.cli = SurfaceConfig::from_literal(key, entry)?,
                other => tracing::debug!("ignoring marker configuration key '{other}'"),
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ops(list: &[Operation]) -> BTreeSet<Operation> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_default_config() {
        let config = FeatureConfig::default();
        assert_eq!(config.api, SurfaceConfig::EnabledAll);
        assert_eq!(config.tooling, SurfaceConfig::EnabledAll);
        assert_eq!(config.cli, SurfaceConfig::Disabled);
    }

    #[test]
    fn test_disabled_allows_nothing() {
        for op in Operation::ALL {
            assert!(!SurfaceConfig::Disabled.allows(op));
        }
        assert!(!SurfaceConfig::Disabled.is_enabled());
    }

    #[test]
    fn test_include_and_exclude_are_combined() {
        let cfg = SurfaceConfig::rules(
            Some(ops(&[Operation::List, Operation::Get, Operation::Delete])),
            Some(ops(&[Operation::Delete])),
        );
        assert_eq!(
            cfg.allowed_operations(),
            vec![Operation::List, Operation::Get]
        );
    }

    #[test]
    fn test_empty_include_allows_nothing_but_stays_enabled() {
        let cfg = SurfaceConfig::rules(Some(BTreeSet::new()), None);
        assert!(cfg.is_enabled());
        assert!(cfg.allowed_operations().is_empty());
    }

    #[test]
    fn test_exclude_is_monotonic() {
        let base = SurfaceConfig::rules(None, Some(ops(&[Operation::Delete])));
        let stricter = SurfaceConfig::rules(None, Some(ops(&[Operation::Delete, Operation::Get])));
        for op in Operation::ALL {
            if stricter.allows(op) {
                assert!(base.allows(op));
            }
        }
    }

    #[test]
    fn test_include_growth_respects_exclude() {
        let exclude = Some(ops(&[Operation::Delete]));
        let narrow = SurfaceConfig::rules(Some(ops(&[Operation::List])), exclude.clone());
        let wide = SurfaceConfig::rules(Some(ops(&[Operation::List, Operation::Delete])), exclude);
        for op in Operation::ALL {
            if narrow.allows(op) {
                assert!(wide.allows(op));
            }
        }
        assert!(!wide.allows(Operation::Delete));
    }

    #[test]
    fn test_from_literal_booleans_and_empty_object() {
        let config = FeatureConfig::from_literal(&json!({
            "api": false,
            "mcp": {},
            "cli": true,
        }))
        .unwrap();
        assert_eq!(config.api, SurfaceConfig::Disabled);
        assert_eq!(config.tooling, SurfaceConfig::EnabledAll);
        assert_eq!(config.cli, SurfaceConfig::EnabledAll);
    }

    #[test]
    fn test_from_literal_accepts_tooling_alias() {
        let config = FeatureConfig::from_literal(&json!({
            "tooling": { "include": ["list"] },
        }))
        .unwrap();
        assert!(config.allows(Surface::Tooling, Operation::List));
        assert!(!config.allows(Surface::Tooling, Operation::Get));
    }

    #[test]
    fn test_from_literal_ignores_unknown_operations_and_keys() {
        let config = FeatureConfig::from_literal(&json!({
            "api": { "exclude": ["search", "delete"] },
            "tableName": "products",
        }))
        .unwrap();
        assert!(!config.allows(Surface::Api, Operation::Delete));
        assert!(config.allows(Surface::Api, Operation::List));
    }

    #[test]
    fn test_from_literal_rejects_bad_shapes() {
        assert!(FeatureConfig::from_literal(&json!([1, 2])).is_err());
        assert!(FeatureConfig::from_literal(&json!({ "api": "yes" })).is_err());
        assert!(FeatureConfig::from_literal(&json!({ "api": { "include": "list" } })).is_err());
        assert!(FeatureConfig::from_literal(&json!({ "cli": { "exclude": [1] } })).is_err());
    }

    #[test]
    fn test_serde_wire_form() {
        let config = FeatureConfig {
            api: SurfaceConfig::rules(None, Some(ops(&[Operation::Delete]))),
            tooling: SurfaceConfig::EnabledAll,
            cli: SurfaceConfig::Disabled,
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({ "api": { "exclude": ["delete"] }, "mcp": true, "cli": false })
        );

        let back: FeatureConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_deserialize_missing_surfaces_use_defaults() {
        let config: FeatureConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, FeatureConfig::default());
    }
}
