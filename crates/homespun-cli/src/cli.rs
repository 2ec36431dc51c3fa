//! Command definitions for the `homespun` binary.
//!
//! Configuration flags are handled by `homespun-config`; this parser only
//! sees the tokens that follow them.

use clap::{Parser, Subcommand};

/// Discover homespun plugins and print the registry.
#[derive(Parser, Debug)]
#[command(name = "homespun", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// What to print; defaults to `list`.
    #[command(subcommand)]
    pub(crate) command: Option<CliCommand>,
}

/// Registry queries.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Prints every registered plugin, grouped by category.
    List,
    /// Prints a single plugin.
    Show {
        /// Category directory name, for example `listeners`.
        category: String,
        /// Plugin name, for example `http`.
        name: String,
    },
}

impl Cli {
    /// Returns the requested command, falling back to `list`.
    pub(crate) fn command(&self) -> CliCommand {
        self.command.clone().unwrap_or(CliCommand::List)
    }
}
