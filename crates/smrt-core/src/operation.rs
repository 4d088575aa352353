//! CRUD operations and the downstream surfaces that expose them.
//!
//! # Examples
//!
//! ```
//! use smrt_core::{Operation, Surface};
//!
//! let op: Operation = "create".parse().unwrap();
//! assert_eq!(op, Operation::Create);
//! assert_eq!(Surface::Tooling.key(), "mcp");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five canonical actions gated per surface.
///
/// Ordering follows declaration order, which is also the order in which
/// generators emit artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// List a collection
    List,
    /// Fetch one object by id
    Get,
    /// Create an object
    Create,
    /// Update an object by id
    Update,
    /// Delete an object by id
    Delete,
}

impl Operation {
    /// All operations in emission order.
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Get,
        Self::Create,
        Self::Update,
        Self::Delete,
    ];

    /// Returns the lower-case operation name.
    ///
    /// # Examples
    ///
    /// ```
    /// use smrt_core::Operation;
    ///
    /// assert_eq!(Operation::Delete.as_str(), "delete");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns `true` for operations addressed by a single object id.
    #[must_use]
    pub const fn targets_item(&self) -> bool {
        matches!(self, Self::Get | Self::Update | Self::Delete)
    }

    /// HTTP verb used for this operation on the REST surface.
    #[must_use]
    pub const fn http_method(&self) -> &'static str {
        match self {
            Self::List | Self::Get => "GET",
            Self::Create => "POST",
            Self::Update => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "get" => Ok(Self::Get),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(crate::Error::InvalidArgument(format!(
                "unknown operation: '{s}' (expected: list, get, create, update, or delete)"
            ))),
        }
    }
}

/// A downstream consumption channel for generated artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// External REST API and API client
    Api,
    /// AI tool registry (MCP)
    Tooling,
    /// Command-line tooling
    Cli,
}

impl Surface {
    /// All surfaces.
    pub const ALL: [Self; 3] = [Self::Api, Self::Tooling, Self::Cli];

    /// Key used for this surface in the marker configuration object.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Tooling => "mcp",
            Self::Cli => "cli",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_round_trip_names() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_operation_parse_invalid() {
        assert!("search".parse::<Operation>().is_err());
        assert!("LIST".parse::<Operation>().is_err());
    }

    #[test]
    fn test_operation_http_mapping() {
        assert_eq!(Operation::List.http_method(), "GET");
        assert_eq!(Operation::Create.http_method(), "POST");
        assert_eq!(Operation::Update.http_method(), "PUT");
        assert!(Operation::Delete.targets_item());
        assert!(!Operation::Create.targets_item());
    }

    #[test]
    fn test_operation_serde() {
        let json = serde_json::to_string(&Operation::Update).unwrap();
        assert_eq!(json, "\"update\"");
        let op: Operation = serde_json::from_str("\"get\"").unwrap();
        assert_eq!(op, Operation::Get);
    }

    #[test]
    fn test_surface_keys() {
        assert_eq!(Surface::Api.key(), "api");
        assert_eq!(Surface::Tooling.to_string(), "mcp");
        assert_eq!(Surface::Cli.key(), "cli");
    }
}
