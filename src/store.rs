//! The resolved variable table built up by the loaders.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::options::OptionSpec;
use crate::value::Value;

/// Relative priority of a configuration source.
///
/// Higher levels' values are never overwritten by lower levels.
/// Ordering follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Compiled-in default, applied by the notify pass.
    Default,
    /// Value read from the configuration file.
    ConfigFile,
    /// Value read from a prefixed environment variable.
    Environment,
    /// Value from command-line tokens (or the fallback hook).
    CommandLine,
}

/// Internal store invariant violations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A loader attempted to write over a higher-precedence value.
    /// Always a programming error in a loader, never user input.
    #[error(
        "precedence violation: '{key}' is bound at {existing:?}, rejected write at {attempted:?}"
    )]
    PrecedenceViolation {
        key: String,
        existing: Precedence,
        attempted: Precedence,
    },
}

#[derive(Debug, Clone)]
struct Variable {
    value: Value,
    precedence: Precedence,
}

/// The key→(value, precedence) table for one resolution attempt.
///
/// Created fresh per attempt, exclusively owned by it, and handed to
/// the caller only on success.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    entries: BTreeMap<String, Variable>,
}

impl VariableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` at `level` unless the key is already bound.
    ///
    /// Returns true if inserted. Loaders run from the highest
    /// precedence source downwards, so an existing entry always owns
    /// the key at the caller's level or above and the write is a no-op.
    pub fn set_if_absent(&mut self, key: &str, value: Value, level: Precedence) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(
            key.to_string(),
            Variable {
                value,
                precedence: level,
            },
        );
        true
    }

    /// Replace the binding for `key` at the same or a higher level.
    ///
    /// Fails with [`StoreError::PrecedenceViolation`] when `level` is
    /// strictly lower than the existing entry's level.
    pub fn overwrite(&mut self, key: &str, value: Value, level: Precedence) -> Result<(), StoreError> {
        if let Some(existing) = self.entries.get(key) {
            if existing.precedence > level {
                return Err(StoreError::PrecedenceViolation {
                    key: key.to_string(),
                    existing: existing.precedence,
                    attempted: level,
                });
            }
        }
        self.entries.insert(
            key.to_string(),
            Variable {
                value,
                precedence: level,
            },
        );
        Ok(())
    }

    /// Bind the compiled-in default of every still-unset declaration.
    ///
    /// Idempotent: a second pass with no intervening writes changes
    /// nothing, since every defaulted key is then already bound.
    pub fn notify<'a>(&mut self, specs: impl IntoIterator<Item = &'a OptionSpec>) {
        for spec in specs {
            if let Some(default) = spec.default() {
                self.set_if_absent(spec.key(), default.clone(), Precedence::Default);
            }
        }
    }

    /// Look up a bound value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|v| &v.value)
    }

    /// The precedence level that bound `key`, if bound.
    pub fn precedence_of(&self, key: &str) -> Option<Precedence> {
        self.entries.get(key).map(|v| v.precedence)
    }

    /// Boolean payload of a bound flag.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Text payload of a bound scalar.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    /// List payload of a bound repeated option.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_list)
    }

    /// Whether `key` is bound from any source.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordered copy of the bindings, for diagnostics and tests.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries
            .iter()
            .map(|(key, var)| (key.clone(), var.value.clone()))
            .collect()
    }
}
