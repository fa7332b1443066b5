//! Resolver — orchestrates the loaders in strict precedence order.

use std::collections::BTreeMap;
use std::io::BufRead;

use crate::command::Command;
use crate::loaders::{
    CommandLineLoader, ConfigFileLoader, EnvironmentLoader, FallbackLoader, LoadError, Loader,
};
use crate::options::OptionRegistry;
use crate::store::VariableStore;
use crate::{ENVIRONMENT_PREFIX, HELP_KEY};

/// Result of one resolution attempt.
#[derive(Debug)]
pub enum Outcome {
    /// Every source loaded; the finished store.
    Resolved(VariableStore),
    /// The help flag was set on the command line; no further source
    /// was loaded or validated.
    HelpRequested,
    /// A loader failed; no partial store is returned. The error's
    /// `Display` rendering is the human-readable message.
    Failed(LoadError),
}

enum Progress {
    HelpRequested,
    Complete,
}

/// Merges option values from argv, environment, configuration file,
/// and compiled-in defaults into one authoritative store.
///
/// A single deterministic pass over statically known sources: each
/// loader runs to completion before the next, the first failure aborts
/// the attempt, and nothing is retried. The store is created fresh per
/// attempt and handed back only on success, after the command adopts
/// it.
pub struct Resolver<'a, C: Command> {
    command: &'a mut C,
    prefix: String,
    help: bool,
}

impl<'a, C: Command> Resolver<'a, C> {
    pub fn new(command: &'a mut C) -> Self {
        Self {
            command,
            prefix: ENVIRONMENT_PREFIX.to_string(),
            help: false,
        }
    }

    /// Override the environment variable prefix (tests, embedding).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Whether the last attempt terminated on the help short-circuit.
    pub fn help_was_requested(&self) -> bool {
        self.help
    }

    /// Run one resolution attempt over the injected raw inputs.
    pub fn resolve(
        &mut self,
        argv: &[String],
        env: &BTreeMap<String, String>,
        input: &mut dyn BufRead,
    ) -> Outcome {
        self.help = false;
        let registry = OptionRegistry::from_command(&*self.command);
        let mut store = VariableStore::new();

        match self.run(&registry, &mut store, argv, env, input) {
            Ok(Progress::HelpRequested) => {
                self.help = true;
                Outcome::HelpRequested
            }
            Ok(Progress::Complete) => {
                self.command.adopt_resolved_configuration(&store);
                Outcome::Resolved(store)
            }
            Err(error) => {
                tracing::debug!(%error, "resolution aborted");
                Outcome::Failed(error)
            }
        }
    }

    fn run(
        &mut self,
        registry: &OptionRegistry,
        store: &mut VariableStore,
        argv: &[String],
        env: &BTreeMap<String, String>,
        input: &mut dyn BufRead,
    ) -> Result<Progress, LoadError> {
        // Command line first so its values (an override config path,
        // the help flag) are visible to everything after it.
        CommandLineLoader::new(argv).load(store, registry)?;

        if store.get_bool(HELP_KEY).unwrap_or(false) {
            tracing::debug!("help requested, remaining sources skipped");
            return Ok(Progress::HelpRequested);
        }

        self.apply_infrastructure_defaults(registry, store);

        FallbackLoader::new(&*self.command, input).load(store, registry)?;
        EnvironmentLoader::new(&self.prefix, env).load(store, registry)?;
        ConfigFileLoader::new().load(store, registry)?;

        self.apply_remaining_defaults(registry, store);
        Ok(Progress::Complete)
    }

    /// Notify pass 1: defaults consumed as inputs by later loaders
    /// (the config path) must be bound before those loaders run.
    fn apply_infrastructure_defaults(&self, registry: &OptionRegistry, store: &mut VariableStore) {
        store.notify(registry.infrastructure());
        tracing::debug!("infrastructure defaults applied");
    }

    /// Notify pass 2: every remaining unset declaration gets its
    /// compiled-in default.
    fn apply_remaining_defaults(&self, registry: &OptionRegistry, store: &mut VariableStore) {
        store.notify(registry.defaulted());
        tracing::debug!(bound = store.len(), "defaults applied, store resolved");
    }
}
