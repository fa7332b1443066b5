//! Layered configuration resolution for command-line tools.
//!
//! Option values arrive from four sources — command-line tokens,
//! environment variables, a configuration file, and compiled-in
//! defaults — and merge into a single authoritative [`VariableStore`]
//! under a fixed precedence order:
//!
//! ```text
//! command line > environment > configuration file > default
//! ```
//!
//! A command describes itself through the [`Command`] trait; the
//! [`Resolver`] runs the loaders in order, short-circuits when the
//! help flag shows up on the command line, and applies defaults in two
//! named notify passes so that infrastructure values (the config-file
//! path) are settled before the loaders that consume them.

pub mod command;
pub mod loaders;
pub mod options;
pub mod resolver;
pub mod store;
mod value;

pub use command::Command;
pub use loaders::{
    default_config_path, CommandLineLoader, ConfigFileLoader, EnvironmentLoader, FallbackLoader,
    LoadError, Loader,
};
pub use options::{OptionRegistry, OptionSet, OptionSpec, ValueKind};
pub use resolver::{Outcome, Resolver};
pub use store::{Precedence, StoreError, VariableStore};
pub use value::Value;

/// Canonical key of the built-in help flag.
pub const HELP_KEY: &str = "help";

/// Canonical key of the built-in version flag.
pub const VERSION_KEY: &str = "version";

/// Canonical key of the configuration-file path option.
pub const CONFIG_KEY: &str = "config";

/// Fixed prefix of recognized environment variables.
pub const ENVIRONMENT_PREFIX: &str = "CONFSTACK_";
