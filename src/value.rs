//! Stored option values.

use serde::{Deserialize, Serialize};

/// A resolved option value as held by the variable store.
///
/// Untagged so that store snapshots serialize to natural TOML/JSON
/// (`true`, `"text"`, `["a", "b"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag value.
    Bool(bool),
    /// Single scalar value, kept as text.
    Text(String),
    /// Accumulated values of a repeated option.
    List(Vec<String>),
}

impl Value {
    /// Parse lenient boolean text (`true`/`false`, `yes`/`no`, `1`/`0`).
    ///
    /// Used for `--flag=<text>` forms and environment variables, where
    /// the source can only deliver strings.
    pub fn parse_bool(text: &str) -> Option<bool> {
        match text.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }

    /// The boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The text payload, if this is a `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The list payload, if this is a `List`.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}
