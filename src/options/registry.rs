//! Per-attempt aggregation of everything a command declares.

use crate::command::Command;
use crate::options::set::OptionSet;
use crate::options::spec::OptionSpec;
use crate::{CONFIG_KEY, HELP_KEY, VERSION_KEY};

/// The read-only declarations driving one resolution attempt.
///
/// Four groups: CLI options (with the built-in `help`/`version` flags
/// injected), ordered positional slots, config-file settings, and
/// environment-mappable options. Built once from the command
/// collaborator and shared by every loader.
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    options: OptionSet,
    positionals: Vec<OptionSpec>,
    settings: OptionSet,
    environment: OptionSet,
}

impl OptionRegistry {
    /// Collect declarations from the command.
    ///
    /// Built-ins go in first so a command declaring its own `help` or
    /// `version` replaces them.
    pub fn from_command<C: Command + ?Sized>(command: &C) -> Self {
        let mut options = OptionSet::new();
        options.insert(OptionSpec::flag(HELP_KEY).with_short('h').with_default(false));
        options.insert(OptionSpec::flag(VERSION_KEY).with_short('v').with_default(false));
        for spec in command.declared_options() {
            options.insert(spec);
        }

        let mut settings = OptionSet::new();
        command.populate_settings_defaults(&mut settings);

        let mut environment = OptionSet::new();
        command.populate_environment_options(&mut environment);

        Self {
            options,
            positionals: command.declared_positionals(),
            settings,
            environment,
        }
    }

    /// CLI option declarations, built-ins included.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Positional slots in declaration order.
    pub fn positionals(&self) -> &[OptionSpec] {
        &self.positionals
    }

    /// Options the configuration file may set.
    pub fn settings(&self) -> &OptionSet {
        &self.settings
    }

    /// Options reachable through prefixed environment variables.
    pub fn environment(&self) -> &OptionSet {
        &self.environment
    }

    /// Declarations whose defaults must be bound before the
    /// environment and config-file loaders run (currently the
    /// config-path option, which those loaders consume as an input).
    pub fn infrastructure(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options
            .iter()
            .chain(self.settings.iter())
            .filter(|spec| spec.key() == CONFIG_KEY)
    }

    /// Every declaration that participates in the final notify pass.
    pub fn defaulted(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options
            .iter()
            .chain(self.positionals.iter())
            .chain(self.settings.iter())
    }
}
