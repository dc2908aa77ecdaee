//! `vikunja` is a command-line client for the Vikunja task management API.
//!
//! The binary is a wrapper around vikunja-lib, which provides the
//! rate-limited request pipeline and the typed error taxonomy.
//!
//! List all projects:
//! ```sh
//! vikunja --api-url https://tasks.example.org --token $TOKEN projects list
//! ```
//!
//! Connection settings can also come from the environment:
//! ```sh
//! export VIKUNJA_API_URL=https://tasks.example.org
//! export VIKUNJA_API_TOKEN=...
//! vikunja tasks get 42
//! ```
//!
//! or from a `vikunja.toml` in the current directory:
//! ```toml
//! api_url = "https://tasks.example.org"
//! token = "..."
//!
//! [rate_limit]
//! max_requests = 100
//! time_window = "1m"
//! ```
//!
//! Projects and tasks can be rendered as markdown checklists:
//! ```sh
//! vikunja --format markdown tasks list
//! ```
//!
//! Endpoints without a dedicated command are reachable with `request`:
//! ```sh
//! vikunja request put /projects/1/tasks --body '{"title": "Buy milk"}'
//! ```
#![warn(clippy::all, clippy::pedantic)]
#![warn(
    absolute_paths_not_starting_with_crate,
    rustdoc::invalid_html_tags,
    missing_copy_implementations,
    missing_debug_implementations,
    semicolon_in_expressions_from_macros,
    unreachable_pub,
    unused_extern_crates,
    variant_size_differences,
    clippy::missing_const_for_fn
)]
#![deny(anonymous_parameters, macro_use_extern_crate)]
#![deny(missing_docs)]

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use anyhow::{Error, Result, bail};
use clap::Parser;
use formatters::log::init_logging;
use log::error;
use vikunja_lib::DomainError;

mod commands;
mod formatters;
mod options;
mod parse;
mod verbosity;

use crate::options::{Config, VIKUNJA_CONFIG_FILE, VikunjaOptions};

/// A C-like enum that can be cast to `i32` and used as process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is used for any `Result::Err` bubbled up to `main()`
    // using the `?` operator.
    #[allow(unused)]
    UnexpectedFailure = 1,
    RequestFailure = 2,
    ConfigFile = 3,
}

fn main() -> Result<()> {
    // std::process::exit doesn't guarantee that all destructors will be run,
    // therefore we wrap the main code in another function to ensure that.
    // See: https://doc.rust-lang.org/stable/std/process/fn.exit.html
    let exit_code = run_main()?;
    std::process::exit(exit_code);
}

/// Merge all provided config options into one.
/// This includes a potential config file, command-line- and environment variables
fn load_config() -> Result<VikunjaOptions> {
    let mut opts = VikunjaOptions::parse();

    let merged = merge_config_file(&mut opts.config, opts.config_file.as_deref());

    // The config file may set the verbosity, so logging starts after the
    // merge. A failed merge is logged with the command-line verbosity.
    init_logging(&opts.config.verbose);

    merged.map(|()| opts)
}

/// Load a potentially existing config file and merge it into the config from
/// the CLI
fn merge_config_file(config: &mut Config, config_file: Option<&Path>) -> Result<()> {
    if let Some(config_file) = config_file {
        match Config::load_from_file(config_file) {
            Ok(c) => config.merge(c),
            Err(e) => {
                bail!(
                    "Cannot load configuration file `{}`: {e:?}",
                    config_file.display()
                );
            }
        }
    } else {
        // If no config file was explicitly provided, we try to load the default
        // config file from the current directory if the file exits. This will
        // raise an error if the file is invalid, just like the explicit provided
        // config file.
        let default_config = PathBuf::from(VIKUNJA_CONFIG_FILE);
        if default_config.is_file() {
            match Config::load_from_file(&default_config) {
                Ok(c) => config.merge(c),
                Err(e) => {
                    bail!(
                        "Cannot load default configuration file `{}`: {e:?}",
                        default_config.display()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Set up runtime and call the requested command
fn run_main() -> Result<i32> {
    let opts = match load_config() {
        Ok(opts) => opts,
        Err(e) => {
            error!("Error while loading config: {e}");
            return Ok(ExitCode::ConfigFile as i32);
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;

    match runtime.block_on(run(&opts)) {
        Err(e) if Some(ErrorKind::BrokenPipe) == underlying_io_error_kind(&e) => {
            Ok(ExitCode::Success as i32)
        }
        Err(e) => match underlying_domain_error(&e) {
            Some(domain) => {
                eprintln!("{}", formatters::format_domain_error(domain));
                Ok(ExitCode::RequestFailure as i32)
            }
            None => Err(e),
        },
        Ok(code) => Ok(code),
    }
}

/// Check if the given error can be traced back to an `io::ErrorKind`
/// This is helpful for troubleshooting the root cause of an error.
/// Code is taken from the anyhow documentation.
fn underlying_io_error_kind(error: &Error) -> Option<io::ErrorKind> {
    for cause in error.chain() {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
    }
    None
}

/// Find the failed request behind an error, if there is one
fn underlying_domain_error(error: &Error) -> Option<&DomainError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<DomainError>())
}

/// Connect and run the requested command
async fn run(opts: &VikunjaOptions) -> Result<i32> {
    let client = match opts.config.client() {
        Ok(client) => client,
        Err(e) => {
            error!("{e:#}");
            return Ok(ExitCode::ConfigFile as i32);
        }
    };

    let mut stdout = io::stdout().lock();
    commands::execute(&client, &opts.command, opts.config.format, &mut stdout).await?;

    Ok(ExitCode::Success as i32)
}
