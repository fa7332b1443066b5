//! Source loaders — each reads one external input and writes into the store.

use std::path::PathBuf;

use thiserror::Error;

use crate::options::OptionRegistry;
use crate::store::{StoreError, VariableStore};

mod command_line;
mod config_file;
mod environment;
mod fallback;

pub use command_line::CommandLineLoader;
pub use config_file::{default_config_path, ConfigFileLoader};
pub use environment::EnvironmentLoader;
pub use fallback::FallbackLoader;

/// Errors that abort a resolution attempt.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Bad command-line token or environment value.
    #[error("malformed input '{token}': {reason}")]
    MalformedInput { token: String, reason: String },

    /// Configuration file present but invalid.
    #[error("failed to parse config file '{path}': {detail}")]
    ConfigParse { path: PathBuf, detail: String },

    /// A file or stream could not be opened or read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store invariant broken by a loader. Programming error.
    #[error(transparent)]
    Precedence(#[from] StoreError),
}

impl LoadError {
    pub(crate) fn malformed(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            token: token.into(),
            reason: reason.into(),
        }
    }
}

/// One configuration source.
///
/// A loader owns its injected raw input (argv slice, environment
/// snapshot, stream); none touches ambient process state, so a
/// resolution attempt is deterministic and testable. `load` runs to
/// completion before the next loader starts and returns the keys it
/// bound.
pub trait Loader {
    fn load(
        &mut self,
        store: &mut VariableStore,
        registry: &OptionRegistry,
    ) -> Result<Vec<String>, LoadError>;
}
