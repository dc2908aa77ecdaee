use crate::parse::{parse_json, parse_method};
use crate::verbosity::Verbosity;
use anyhow::{Context, Result, anyhow};
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Parser, Subcommand};
use const_format::formatcp;
use http::Method;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::Path, path::PathBuf, time::Duration};
use strum::{Display, EnumString, VariantNames};
use vikunja_lib::{Client, ClientBuilder, RateLimitConfig};

pub(crate) const VIKUNJA_CONFIG_FILE: &str = "vikunja.toml";

// We use a custom help message here because we want to show the default
// value of the config file, but also be able to check if the user has
// provided a custom value. If they didn't, we won't throw an error if
// the file doesn't exist.
const HELP_MSG_CONFIG_FILE: &str = formatcp!(
    "Configuration file to use\n\n[default: {}]",
    VIKUNJA_CONFIG_FILE,
);

// Macro for generating default functions to be used by serde
macro_rules! default_function {
    ( $( $name:ident : $T:ty = $e:expr; )* ) => {
        $(
            #[allow(clippy::missing_const_for_fn)]
            fn $name() -> $T {
                $e
            }
        )*
    };
}

// Generate the functions for serde defaults
default_function! {
    verbosity: Verbosity = Verbosity::default();
}

// Macro for merging configuration values
macro_rules! fold_in {
    ($cli:ident , $toml:ident ; $ty:ident { $(..$ignore:ident,)* $( $key:ident : $default:expr, )* } ) => {
        if (false) {
            #[allow(dead_code, unused, clippy::diverging_sub_expression)]
            let _check_fold_in_exhaustivity = $ty {
                $($key: unreachable!(), )*
                $($ignore: unreachable!(), )*
            };
        };
        $(
            if $cli.$key == $default && $toml.$key != $default {
                $cli.$key = $toml.$key;
            }
        )*
    };
}

/// The output format of the `projects` and `tasks` commands
#[derive(
    Debug, Deserialize, Default, Clone, Copy, Display, EnumString, VariantNames, PartialEq, Eq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub(crate) enum OutputFormat {
    /// Pretty-printed JSON, exactly as returned by the API
    #[default]
    Json,
    /// Human readable markdown with links into the web interface
    Markdown,
}

/// vikunja talks to the API of a Vikunja task management server.
///
/// Requests are throttled client-side to a fixed number per time window.
/// Results are printed as JSON or markdown.
#[derive(Parser, Debug)]
#[command(version, about, next_display_order = None)]
pub(crate) struct VikunjaOptions {
    /// Configuration file to use
    #[arg(short, long = "config")]
    #[arg(help = HELP_MSG_CONFIG_FILE)]
    pub(crate) config_file: Option<PathBuf>,

    #[clap(flatten)]
    pub(crate) config: Config,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// What to do once connected
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub(crate) enum Command {
    /// Work with projects
    #[command(subcommand)]
    Projects(ResourceCommand),

    /// Work with tasks
    #[command(subcommand)]
    Tasks(ResourceCommand),

    /// Send a request to any API endpoint and print the response
    Request {
        /// HTTP method, e.g. GET or PUT
        #[arg(value_parser = parse_method)]
        method: Method,

        /// Path below `/api/v1`, e.g. `/labels`
        path: String,

        /// JSON request body
        #[arg(long, value_parser = parse_json)]
        body: Option<Value>,
    },
}

/// Operations shared by projects and tasks
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResourceCommand {
    /// List all entries
    List,
    /// Show a single entry
    Get {
        /// Numeric id
        id: u64,
    },
    /// Delete an entry
    Delete {
        /// Numeric id
        id: u64,
    },
}

/// Connection settings, from the command line, the environment or the
/// configuration file
#[derive(Parser, Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Verbose program output
    #[clap(flatten)]
    #[serde(default = "verbosity")]
    pub(crate) verbose: Verbosity,

    /// Base URL of the Vikunja instance. `/api/v1` is appended unless present.
    #[arg(long, value_name = "URL", env = "VIKUNJA_API_URL")]
    #[serde(default)]
    pub(crate) api_url: Option<String>,

    /// API token used for bearer authentication
    #[arg(long, env = "VIKUNJA_API_TOKEN", hide_env_values = true)]
    #[serde(default)]
    pub(crate) token: Option<SecretString>,

    /// Maximum number of requests per time window
    #[arg(long = "rate-limit", value_name = "N", env = "VIKUNJA_API_RATE_LIMIT")]
    #[serde(skip)]
    pub(crate) max_requests: Option<u32>,

    /// Length of the rate limiting time window in milliseconds
    #[arg(
        long = "rate-limit-window",
        value_name = "MS",
        env = "VIKUNJA_API_RATE_LIMIT_WINDOW"
    )]
    #[serde(skip)]
    pub(crate) window_ms: Option<u64>,

    /// Output format of the `projects` and `tasks` commands
    #[arg(
        short,
        long,
        default_value = "json",
        value_parser = PossibleValuesParser::new(OutputFormat::VARIANTS)
            .try_map(|s| s.parse::<OutputFormat>())
    )]
    #[serde(default)]
    pub(crate) format: OutputFormat,

    /// Rate limit table of the configuration file
    #[arg(skip)]
    #[serde(default)]
    pub(crate) rate_limit: Option<RateLimitConfig>,
}

impl Config {
    /// Load configuration from a file
    pub(crate) fn load_from_file(path: &Path) -> Result<Config> {
        // Read configuration file
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).with_context(|| "Failed to parse configuration file")
    }

    /// Merge the configuration from TOML into the CLI configuration
    pub(crate) fn merge(&mut self, toml: Config) {
        // This is outside of fold_in! because SecretBox doesn't implement Eq.
        if self.token.is_none() && toml.token.is_some() {
            self.token = toml.token;
        }

        // The rate limit is a table in TOML and two flat options on the
        // command line. Flags win per value in `rate_limit_config`.
        if toml.rate_limit.is_some() {
            self.rate_limit = toml.rate_limit;
        }

        // NOTE: if you see an error within this macro call, check to make sure that
        // that the fields provided to fold_in! match all the fields of the Config struct.
        fold_in! {
            // Destination and source configs
            self, toml;

            Config {
                // Keys which are handled outside of fold_in
                ..token,
                ..rate_limit,
                // Keys only available on the command line
                ..max_requests,
                ..window_ms,

                // Keys with defaults to assign
                api_url: None,
                verbose: Verbosity::default(),
                format: OutputFormat::default(),
            }
        }
    }

    /// The effective quota: command-line values over the configuration file
    /// over the defaults
    pub(crate) fn rate_limit_config(&self) -> RateLimitConfig {
        let file = self.rate_limit.unwrap_or_default();
        RateLimitConfig::from_options(
            Some(self.max_requests.unwrap_or(file.max_requests)),
            Some(
                self.window_ms
                    .map_or(file.time_window, Duration::from_millis),
            ),
        )
    }

    /// Create a client from the merged configuration
    pub(crate) fn client(&self) -> Result<Client> {
        let api_url = self.api_url.clone().ok_or_else(|| {
            anyhow!("No API URL given. Use `--api-url`, `VIKUNJA_API_URL` or `api_url` in {VIKUNJA_CONFIG_FILE}")
        })?;
        let token = self.token.clone().ok_or_else(|| {
            anyhow!("No API token given. Use `--token`, `VIKUNJA_API_TOKEN` or `token` in {VIKUNJA_CONFIG_FILE}")
        })?;

        ClientBuilder::builder()
            .api_url(api_url)
            .token(token)
            .rate_limit(self.rate_limit_config())
            .build()
            .client()
            .context("Invalid client configuration")
    }
}
