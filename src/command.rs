//! The external command collaborator boundary.

use std::io::BufRead;

use crate::loaders::LoadError;
use crate::options::{OptionSet, OptionSpec};
use crate::store::VariableStore;

/// What a command must expose for its configuration to be resolved.
///
/// The engine consumes these declarations verbatim; it never infers
/// option shape, executes the command, or validates option semantics.
pub trait Command {
    /// CLI options this command recognizes.
    fn declared_options(&self) -> Vec<OptionSpec>;

    /// Positional argument slots, in order. Defaults to none.
    fn declared_positionals(&self) -> Vec<OptionSpec> {
        Vec::new()
    }

    /// Declare the options the configuration file may set, with their
    /// compiled-in defaults. Defaults to none.
    fn populate_settings_defaults(&self, sink: &mut OptionSet) {
        let _ = sink;
    }

    /// Declare the options reachable through prefixed environment
    /// variables. Defaults to none.
    fn populate_environment_options(&self, sink: &mut OptionSet) {
        let _ = sink;
    }

    /// First refusal on still-unset options after the command-line
    /// pass: read values from the input stream or a secondary file.
    ///
    /// Per-option policy is entirely the command's business; writes
    /// must go through [`VariableStore::set_if_absent`] so already-set
    /// values survive. Returns the keys it bound. Defaults to a no-op.
    fn load_fallbacks(
        &self,
        input: &mut dyn BufRead,
        store: &mut VariableStore,
    ) -> Result<Vec<String>, LoadError> {
        let _ = (input, store);
        Ok(Vec::new())
    }

    /// Adopt the final values. Invoked exactly once, only on a fully
    /// resolved attempt. Defaults to a no-op.
    fn adopt_resolved_configuration(&mut self, store: &VariableStore) {
        let _ = store;
    }
}
