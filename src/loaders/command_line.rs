//! Command-line loader — argv tokens → highest-precedence bindings.

use crate::loaders::{LoadError, Loader};
use crate::options::{OptionRegistry, OptionSpec, ValueKind};
use crate::store::{Precedence, VariableStore};
use crate::value::Value;

/// Tokenizes argv against the declared options and positional slots.
///
/// Always runs first, unconditionally, before the help check. Two
/// phases: classify every token into a (key, value) binding, then
/// write the bindings into the store at [`Precedence::CommandLine`].
/// Any unrecognized token, malformed value, or positional overflow is
/// a hard [`LoadError::MalformedInput`] carrying the offending token.
#[derive(Debug)]
pub struct CommandLineLoader<'a> {
    argv: &'a [String],
}

impl<'a> CommandLineLoader<'a> {
    pub fn new(argv: &'a [String]) -> Self {
        Self { argv }
    }
}

impl Loader for CommandLineLoader<'_> {
    fn load(
        &mut self,
        store: &mut VariableStore,
        registry: &OptionRegistry,
    ) -> Result<Vec<String>, LoadError> {
        let mut bindings = Bindings::default();
        let mut positional_tokens: Vec<String> = Vec::new();
        let mut options_ended = false;

        let mut iter = self.argv.iter().peekable();
        while let Some(token) = iter.next() {
            if options_ended {
                positional_tokens.push(token.clone());
                continue;
            }
            if token == "--" {
                options_ended = true;
                continue;
            }

            if let Some(rest) = token.strip_prefix("--") {
                let (name, inline) = match rest.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (rest, None),
                };
                let spec = registry
                    .options()
                    .find_long(name)
                    .ok_or_else(|| LoadError::malformed(token, "unrecognized option"))?;
                let value = consume_value(token, spec, inline, &mut iter)?;
                bindings.bind(token, spec, value)?;
            } else if token.starts_with('-') && token.as_str() != "-" {
                let spec = short_name(token)
                    .and_then(|short| registry.options().find_short(short))
                    .ok_or_else(|| LoadError::malformed(token, "unrecognized option"))?;
                let value = consume_value(token, spec, None, &mut iter)?;
                bindings.bind(token, spec, value)?;
            } else {
                positional_tokens.push(token.clone());
            }
        }

        bind_positionals(&mut bindings, positional_tokens, registry.positionals())?;

        let mut touched = Vec::with_capacity(bindings.entries.len());
        for (key, value) in bindings.entries {
            if store.set_if_absent(&key, value, Precedence::CommandLine) {
                touched.push(key);
            }
        }
        tracing::debug!(touched = touched.len(), "command line loaded");
        Ok(touched)
    }
}

/// `-x` short forms only; a bare `-` stays positional (stdin marker),
/// anything longer is unrecognized rather than silently positional.
fn short_name(token: &str) -> Option<char> {
    let mut chars = token.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(short), None) => Some(short),
        _ => None,
    }
}

/// Pull the value tokens an option's kind demands.
fn consume_value<'t>(
    token: &str,
    spec: &OptionSpec,
    inline: Option<&str>,
    iter: &mut std::iter::Peekable<impl Iterator<Item = &'t String>>,
) -> Result<Value, LoadError> {
    match spec.kind() {
        ValueKind::Flag => match inline {
            None => Ok(Value::Bool(true)),
            Some(text) => Value::parse_bool(text)
                .map(Value::Bool)
                .ok_or_else(|| LoadError::malformed(token, "expected a boolean value")),
        },
        ValueKind::Scalar | ValueKind::Repeated => {
            if let Some(text) = inline {
                return Ok(Value::from(text));
            }
            // A value token must not look like another option.
            match iter.peek() {
                Some(next) if !next.starts_with('-') || next.as_str() == "-" => {
                    Ok(Value::from(iter.next().map(String::as_str).unwrap_or_default()))
                }
                _ => Err(LoadError::malformed(token, "missing required value")),
            }
        }
    }
}

/// Map loose positional tokens onto the declared slots, in order.
fn bind_positionals(
    bindings: &mut Bindings,
    tokens: Vec<String>,
    slots: &[OptionSpec],
) -> Result<(), LoadError> {
    let mut slots = slots.iter();
    let mut current = slots.next();

    for token in tokens {
        match current {
            Some(slot) if slot.kind() == ValueKind::Repeated => {
                bindings.bind(&token, slot, Value::Text(token.clone()))?;
            }
            Some(slot) => {
                bindings.bind(&token, slot, Value::Text(token.clone()))?;
                current = slots.next();
            }
            None => {
                return Err(LoadError::malformed(token, "unexpected positional argument"));
            }
        }
    }
    Ok(())
}

/// Bindings accumulated during classification, in encounter order.
#[derive(Debug, Default)]
struct Bindings {
    entries: Vec<(String, Value)>,
}

impl Bindings {
    /// Record one occurrence. Repeated-kind keys accumulate; any other
    /// kind bound twice on the same command line is malformed.
    fn bind(&mut self, token: &str, spec: &OptionSpec, value: Value) -> Result<(), LoadError> {
        let existing = self.entries.iter_mut().find(|(key, _)| key == spec.key());
        match (existing, spec.kind()) {
            (None, ValueKind::Repeated) => {
                let item = value.as_text().unwrap_or_default().to_string();
                self.entries.push((spec.key().to_string(), Value::List(vec![item])));
            }
            (None, _) => {
                self.entries.push((spec.key().to_string(), value));
            }
            (Some((_, Value::List(items))), ValueKind::Repeated) => {
                items.push(value.as_text().unwrap_or_default().to_string());
            }
            (Some(_), _) => {
                return Err(LoadError::malformed(token, "specified multiple times"));
            }
        }
        Ok(())
    }
}
