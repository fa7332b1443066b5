//! Option declarations — single source of truth for what a command recognizes.

use crate::value::Value;

/// How many value tokens an option consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Boolean flag, no value token (e.g. `--verbose`).
    Flag,
    /// Exactly one value (e.g. `--format <NAME>`).
    Scalar,
    /// Accumulates every occurrence; as the final positional slot it
    /// collects all remaining tokens.
    Repeated,
}

/// A single declared option or positional argument.
///
/// Created once per command at startup; read-only thereafter. The
/// engine never infers option shape — it only consumes declarations.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    key: String,
    short: Option<char>,
    kind: ValueKind,
    default: Option<Value>,
    positional: bool,
}

impl OptionSpec {
    /// Declare a boolean flag (`--<key>`).
    pub fn flag(key: impl Into<String>) -> Self {
        Self::new(key, ValueKind::Flag)
    }

    /// Declare a single-valued option (`--<key> <VALUE>`).
    pub fn scalar(key: impl Into<String>) -> Self {
        Self::new(key, ValueKind::Scalar)
    }

    /// Declare an option that may occur multiple times.
    pub fn repeated(key: impl Into<String>) -> Self {
        Self::new(key, ValueKind::Repeated)
    }

    /// Declare a positional argument slot, matched by declaration order.
    pub fn positional(key: impl Into<String>) -> Self {
        let mut spec = Self::new(key, ValueKind::Scalar);
        spec.positional = true;
        spec
    }

    /// Declare a trailing positional slot collecting all remaining tokens.
    pub fn positional_rest(key: impl Into<String>) -> Self {
        let mut spec = Self::new(key, ValueKind::Repeated);
        spec.positional = true;
        spec
    }

    fn new(key: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            key: key.into(),
            short: None,
            kind,
            default: None,
            positional: false,
        }
    }

    /// Attach a short form (e.g. `'c'` for `-c`).
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Attach a compiled-in default, applied by the notify pass.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Canonical key, also the long CLI form without the `--` prefix.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Short form, if declared.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// Value kind.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Compiled-in default, if declared.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether this spec fills a positional slot instead of a CLI flag.
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Check whether a long or short CLI name refers to this option.
    pub fn matches_long(&self, name: &str) -> bool {
        !self.positional && self.key == name
    }

    /// Check whether a short CLI name refers to this option.
    pub fn matches_short(&self, short: char) -> bool {
        !self.positional && self.short == Some(short)
    }
}
