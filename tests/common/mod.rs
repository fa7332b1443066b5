//! Shared test command and fixtures.

#![allow(dead_code)]

use std::cell::Cell;
use std::io::BufRead;
use std::path::PathBuf;

use confstack::{
    Command, LoadError, OptionSet, OptionSpec, Precedence, Value, VariableStore, CONFIG_KEY,
};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber honoring `RUST_LOG`; idempotent.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Test double for the external command collaborator.
///
/// Declares a spread of option shapes: the `config` path option, a
/// short-formed scalar, a flag, a repeated option, positional slots,
/// a stream-fallback option, plus config-file settings (including a
/// dotted one) and environment mappings.
pub struct TestCommand {
    /// Compiled-in default for the `config` option, if any.
    pub config_default: Option<String>,
    /// Whether `load_fallbacks` reads the `token` option from the stream.
    pub stream_fallback: bool,
    /// Whether a trailing rest slot is declared after `command`.
    pub rest_slot: bool,
    /// Times `adopt_resolved_configuration` ran.
    pub adopted: usize,
    /// Times `load_fallbacks` ran.
    pub fallback_calls: Cell<usize>,
}

impl Default for TestCommand {
    fn default() -> Self {
        Self {
            config_default: None,
            stream_fallback: false,
            rest_slot: true,
            adopted: 0,
            fallback_calls: Cell::new(0),
        }
    }
}

impl TestCommand {
    pub fn with_config_default(path: impl Into<String>) -> Self {
        Self {
            config_default: Some(path.into()),
            ..Self::default()
        }
    }
}

impl Command for TestCommand {
    fn declared_options(&self) -> Vec<OptionSpec> {
        let config = match &self.config_default {
            Some(path) => OptionSpec::scalar(CONFIG_KEY).with_default(path.clone()),
            None => OptionSpec::scalar(CONFIG_KEY),
        };
        vec![
            config,
            OptionSpec::scalar("format").with_short('f').with_default("plain"),
            OptionSpec::flag("verbose").with_default(false),
            OptionSpec::repeated("include").with_short('I'),
            OptionSpec::scalar("timeout").with_default("30"),
            OptionSpec::scalar("token"),
        ]
    }

    fn declared_positionals(&self) -> Vec<OptionSpec> {
        let mut slots = vec![OptionSpec::positional("command")];
        if self.rest_slot {
            slots.push(OptionSpec::positional_rest("args"));
        }
        slots
    }

    fn populate_settings_defaults(&self, sink: &mut OptionSet) {
        sink.insert(OptionSpec::scalar("format").with_default("plain"));
        sink.insert(OptionSpec::flag("verbose").with_default(false));
        sink.insert(OptionSpec::scalar("timeout").with_default("30"));
        sink.insert(OptionSpec::repeated("include"));
        sink.insert(OptionSpec::scalar("server.port").with_default("8080"));
    }

    fn populate_environment_options(&self, sink: &mut OptionSet) {
        sink.insert(OptionSpec::scalar(CONFIG_KEY));
        sink.insert(OptionSpec::scalar("format"));
        sink.insert(OptionSpec::flag("verbose"));
    }

    fn load_fallbacks(
        &self,
        input: &mut dyn BufRead,
        store: &mut VariableStore,
    ) -> Result<Vec<String>, LoadError> {
        self.fallback_calls.set(self.fallback_calls.get() + 1);
        if !self.stream_fallback || store.contains("token") {
            return Ok(Vec::new());
        }
        let mut line = String::new();
        input.read_line(&mut line).map_err(|source| LoadError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
        let token = line.trim_end();
        if token.is_empty() {
            return Ok(Vec::new());
        }
        store.set_if_absent("token", Value::from(token), Precedence::CommandLine);
        Ok(vec!["token".to_string()])
    }

    fn adopt_resolved_configuration(&mut self, store: &VariableStore) {
        assert!(!store.is_empty(), "adopt ran before defaults were applied");
        self.adopted += 1;
    }
}

/// Write a config file into a fresh temp dir, returning (guard, path).
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("failed to write config fixture");
    (dir, path)
}

/// Owned argv from string literals.
pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
