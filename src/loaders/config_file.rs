//! Configuration-file loader — TOML at the already-resolved path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::loaders::{LoadError, Loader};
use crate::options::{OptionRegistry, ValueKind};
use crate::store::{Precedence, VariableStore};
use crate::value::Value;
use crate::CONFIG_KEY;

/// Parses the configuration file named by the `config` variable.
///
/// Runs last of the external sources, so the path it reads has already
/// been settled by command line, environment, or default — in that
/// order. The file is optional twice over: an unset/empty path and a
/// path that does not exist on disk are both skips, not errors. A file
/// that exists but cannot be read is [`LoadError::Io`]; one that
/// parses badly, names an undeclared setting, or carries an ill-shaped
/// value is [`LoadError::ConfigParse`] with the path.
#[derive(Debug, Default)]
pub struct ConfigFileLoader;

impl ConfigFileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for ConfigFileLoader {
    fn load(
        &mut self,
        store: &mut VariableStore,
        registry: &OptionRegistry,
    ) -> Result<Vec<String>, LoadError> {
        let Some(path) = store.get_text(CONFIG_KEY).filter(|p| !p.is_empty()) else {
            tracing::debug!("no config path bound, skipping");
            return Ok(Vec::new());
        };
        let path = PathBuf::from(path);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file absent, skipping");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            LoadError::ConfigParse {
                path: path.clone(),
                detail: e.to_string(),
            }
        })?;

        let mut entries = Vec::new();
        flatten(None, &table, &path, &mut entries)?;

        let mut touched = Vec::new();
        for (key, raw) in entries {
            let spec = registry
                .settings()
                .find(&key)
                .ok_or_else(|| LoadError::ConfigParse {
                    path: path.clone(),
                    detail: format!("unrecognized option '{key}'"),
                })?;
            let value = convert(&key, spec.kind(), raw, &path)?;
            if store.set_if_absent(spec.key(), value, Precedence::ConfigFile) {
                touched.push(spec.key().to_string());
            } else {
                tracing::debug!(key = %spec.key(), "shadowed by a higher-precedence source");
            }
        }

        tracing::debug!(path = %path.display(), touched = touched.len(), "config file loaded");
        Ok(touched)
    }
}

/// Flatten nested tables to dotted keys: `[server] port` → `server.port`.
fn flatten(
    prefix: Option<&str>,
    table: &toml::Table,
    path: &Path,
    out: &mut Vec<(String, toml::Value)>,
) -> Result<(), LoadError> {
    for (name, value) in table {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.clone(),
        };
        match value {
            toml::Value::Table(inner) => {
                if prefix.is_some() {
                    return Err(LoadError::ConfigParse {
                        path: path.to_path_buf(),
                        detail: format!("section '{key}' is nested too deeply"),
                    });
                }
                flatten(Some(&key), inner, path, out)?;
            }
            other => out.push((key, other.clone())),
        }
    }
    Ok(())
}

/// Convert a TOML value to the declared kind.
fn convert(
    key: &str,
    kind: ValueKind,
    raw: toml::Value,
    path: &Path,
) -> Result<Value, LoadError> {
    let mismatch = |expected: &str| LoadError::ConfigParse {
        path: path.to_path_buf(),
        detail: format!("invalid value for '{key}': expected {expected}"),
    };

    match kind {
        ValueKind::Flag => match raw {
            toml::Value::Boolean(b) => Ok(Value::Bool(b)),
            toml::Value::String(s) => Value::parse_bool(&s)
                .map(Value::Bool)
                .ok_or_else(|| mismatch("a boolean")),
            _ => Err(mismatch("a boolean")),
        },
        ValueKind::Scalar => match raw {
            toml::Value::String(s) => Ok(Value::Text(s)),
            toml::Value::Integer(i) => Ok(Value::Text(i.to_string())),
            toml::Value::Float(f) => Ok(Value::Text(f.to_string())),
            toml::Value::Boolean(b) => Ok(Value::Text(b.to_string())),
            _ => Err(mismatch("a scalar")),
        },
        ValueKind::Repeated => match raw {
            toml::Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    toml::Value::String(s) => Ok(s),
                    toml::Value::Integer(i) => Ok(i.to_string()),
                    toml::Value::Float(f) => Ok(f.to_string()),
                    _ => Err(mismatch("an array of scalars")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            toml::Value::String(s) => Ok(Value::List(vec![s])),
            _ => Err(mismatch("an array of scalars")),
        },
    }
}

/// Conventional default location for an application's config file.
///
/// `~/.config/<app>/config.toml` on Unix/macOS, the platform
/// equivalent elsewhere, falling back to the current directory when no
/// config directory is available. Suitable as the compiled-in default
/// of the `config` option.
pub fn default_config_path(app: &str) -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config_dir.join(app).join("config.toml")
}
