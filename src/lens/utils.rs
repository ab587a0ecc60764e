//! Common utility types for lens modules
//!
//! This module provides the output format shared between the library and the
//! command-line interface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unified output format for lookup results
///
/// The default renders the one-line summary. Other variants trade that for a
/// multi-line block, a table, or machine-readable JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Single summary line (default)
    #[default]
    Summary,
    /// Banner block with one field per line, coordinates included
    Details,
    /// Key/value table with borders
    ///
    /// Requires the `display` feature. Without it, the result is rendered as
    /// pretty-printed JSON instead.
    Table,
    /// Compact JSON (single line)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
}

impl OutputFormat {
    /// Get a list of all format names for help text
    pub fn all_names() -> &'static [&'static str] {
        &["summary", "details", "table", "json", "json-pretty"]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Details => write!(f, "details"),
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" | "line" | "default" => Ok(Self::Summary),
            "details" | "detail" | "long" => Ok(Self::Details),
            "table" | "pretty" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}
