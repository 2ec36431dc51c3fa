//! Command-line runtime for homespun plugin discovery.
//!
//! Loads configuration, runs discovery against the configured plugin root,
//! and prints the registry (or one plugin) as JSON on stdout. Logs go to
//! stderr. The runtime takes its IO streams as parameters so tests can
//! capture them.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use homespun_config::Config;
use homespun_discovery::{Category, Registry, discover};

mod cli;
mod config;
mod errors;
mod telemetry;

use cli::{Cli, CliCommand};
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

fn run_with_loader<I, W, E, L>(args: I, stdout: &mut W, stderr: &mut E, loader: &L) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);

    let result = Cli::try_parse_from(&split.command_arguments)
        .map_err(AppError::CliUsage)
        .and_then(|cli| {
            loader
                .load(&split.config_arguments)
                .map(|config| (cli, config))
        })
        .and_then(|(cli, config)| execute(&cli.command(), &config, stdout));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            // Help and version output.
            if write!(stdout, "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "homespun failed");
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(command: &CliCommand, config: &Config, stdout: &mut W) -> Result<(), AppError> {
    let log_format = telemetry::initialise(config)?;
    tracing::debug!(%log_format, root = %config.root(), "configuration loaded");
    let registry = discover(config.root().as_std_path(), &config.discovery_options())?;

    match command {
        CliCommand::List => write_json(stdout, &registry.snapshot()),
        CliCommand::Show { category, name } => show(stdout, &registry, category, name),
    }
}

fn show<W: Write>(
    stdout: &mut W,
    registry: &Registry,
    category: &str,
    name: &str,
) -> Result<(), AppError> {
    let parsed: Category = category
        .parse()
        .map_err(|_| AppError::UnknownCategory(category.to_owned()))?;
    let snapshot = registry.snapshot();
    let plugin = snapshot
        .plugin(parsed, name)
        .ok_or_else(|| AppError::PluginNotFound {
            category: parsed.to_string(),
            name: name.to_owned(),
        })?;
    write_json(stdout, plugin)
}

fn write_json<W: Write, T: serde::Serialize + ?Sized>(
    stdout: &mut W,
    value: &T,
) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *stdout, value).map_err(AppError::Serialise)?;
    writeln!(stdout).map_err(AppError::Write)
}
