//! Fallback loader — first refusal for the command collaborator.

use std::io::BufRead;

use crate::command::Command;
use crate::loaders::{LoadError, Loader};
use crate::options::OptionRegistry;
use crate::store::VariableStore;

/// Hands the scoped input stream and the current store to the
/// command's `load_fallbacks` hook.
///
/// Which options may be read from the stream or a secondary file is
/// per-option policy decided by the command; the engine only exposes
/// the hook. Runs only when help is not requested, and hook writes go
/// through `set_if_absent`, so already-set values survive. A blocking
/// interactive read here is intended behavior.
pub struct FallbackLoader<'a, C: Command + ?Sized> {
    command: &'a C,
    input: &'a mut dyn BufRead,
}

impl<'a, C: Command + ?Sized> FallbackLoader<'a, C> {
    pub fn new(command: &'a C, input: &'a mut dyn BufRead) -> Self {
        Self { command, input }
    }
}

impl<C: Command + ?Sized> Loader for FallbackLoader<'_, C> {
    fn load(
        &mut self,
        store: &mut VariableStore,
        _registry: &OptionRegistry,
    ) -> Result<Vec<String>, LoadError> {
        let touched = self.command.load_fallbacks(self.input, store)?;
        tracing::debug!(touched = touched.len(), "fallbacks loaded");
        Ok(touched)
    }
}
