//! Environment loader — prefixed variables from an injected snapshot.

use std::collections::BTreeMap;

use crate::loaders::{LoadError, Loader};
use crate::options::{OptionRegistry, ValueKind};
use crate::store::{Precedence, VariableStore};
use crate::value::Value;

/// Scans a snapshot of environment variables carrying a fixed prefix.
///
/// The snapshot is an injected map, never ambient process state —
/// resolution stays deterministic and testable. `PREFIX_OUTPUT_FORMAT`
/// maps to the option key `output-format`; names that map to nothing
/// declared as environment-mappable are ignored, not an error.
#[derive(Debug)]
pub struct EnvironmentLoader<'a> {
    prefix: &'a str,
    snapshot: &'a BTreeMap<String, String>,
}

impl<'a> EnvironmentLoader<'a> {
    pub fn new(prefix: &'a str, snapshot: &'a BTreeMap<String, String>) -> Self {
        Self { prefix, snapshot }
    }
}

impl Loader for EnvironmentLoader<'_> {
    fn load(
        &mut self,
        store: &mut VariableStore,
        registry: &OptionRegistry,
    ) -> Result<Vec<String>, LoadError> {
        let mut touched = Vec::new();

        for (name, raw) in self.snapshot {
            let Some(rest) = name.strip_prefix(self.prefix) else {
                continue;
            };
            let key = map_name(rest);
            let Some(spec) = registry.environment().find(&key) else {
                tracing::debug!(variable = %name, "no mapped option, ignored");
                continue;
            };

            let value = match spec.kind() {
                ValueKind::Flag => Value::parse_bool(raw).map(Value::Bool).ok_or_else(|| {
                    LoadError::malformed(raw, format!("expected a boolean in {name}"))
                })?,
                ValueKind::Scalar => Value::from(raw.clone()),
                // The snapshot has no splitting convention; one
                // variable binds a one-element list.
                ValueKind::Repeated => Value::List(vec![raw.clone()]),
            };

            if store.set_if_absent(spec.key(), value, Precedence::Environment) {
                touched.push(spec.key().to_string());
            } else {
                tracing::debug!(key = %spec.key(), "shadowed by a higher-precedence source");
            }
        }

        tracing::debug!(touched = touched.len(), "environment loaded");
        Ok(touched)
    }
}

/// `OUTPUT_FORMAT` → `output-format`.
fn map_name(rest: &str) -> String {
    rest.to_ascii_lowercase().replace('_', "-")
}
