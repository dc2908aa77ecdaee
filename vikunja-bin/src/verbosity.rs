//! `-v`/`-q` flags controlling how much is logged to stderr.
//!
//! Without flags, info and above is shown.
//! - `-q` errors and warnings only, `-qq` errors only
//! - `-v` adds debug output (including every dispatched request)
//! - `-vv` adds trace output (including error classification)

use log::{Level, LevelFilter};
use serde::Deserialize;

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Verbosity {
    /// More output per occurrence
    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    verbose: u8,

    /// Less output per occurrence
    #[arg(
        long,
        short = 'q',
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "verbose"
    )]
    quiet: u8,
}

impl Verbosity {
    /// The most detailed level that is still shown
    pub(crate) const fn log_level(&self) -> Level {
        level_enum(self.verbosity())
    }

    pub(crate) fn log_level_filter(&self) -> LevelFilter {
        self.log_level().to_level_filter()
    }

    #[allow(clippy::cast_possible_wrap)]
    const fn verbosity(&self) -> i8 {
        level_value(Level::Info) - (self.quiet as i8) + (self.verbose as i8)
    }
}

// Accepts a level name such as "warn", "Warning" or "DEBUG", so the config
// file can say `verbose = "debug"`
impl<'de> Deserialize<'de> for Verbosity {
    #[allow(clippy::cast_sign_loss)]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let level = match s.to_lowercase().as_str() {
            "error" => Level::Error,
            "warn" | "warning" => Level::Warn,
            "info" => Level::Info,
            "debug" => Level::Debug,
            "trace" => Level::Trace,
            level => {
                return Err(serde::de::Error::custom(format!(
                    "invalid log level `{level}`"
                )));
            }
        };
        let relative = level_value(level) - level_value(Level::Info);
        Ok(Verbosity {
            verbose: relative.max(0) as u8,
            quiet: (-relative).max(0) as u8,
        })
    }
}

const fn level_value(level: Level) -> i8 {
    match level {
        Level::Error => 0,
        Level::Warn => 1,
        Level::Info => 2,
        Level::Debug => 3,
        Level::Trace => 4,
    }
}

const fn level_enum(verbosity: i8) -> Level {
    match verbosity {
        i8::MIN..=0 => Level::Error,
        1 => Level::Warn,
        2 => Level::Info,
        3 => Level::Debug,
        _ => Level::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IntoDeserializer;
    use serde::de::value::{Error as ValueError, StrDeserializer};

    fn from_name(name: &str) -> Result<Verbosity, ValueError> {
        let deserializer: StrDeserializer<'_, ValueError> = name.into_deserializer();
        Verbosity::deserialize(deserializer)
    }

    #[test]
    fn verify_app() {
        #[derive(Debug, clap::Parser)]
        struct Cli {
            #[clap(flatten)]
            verbose: Verbosity,
        }

        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(Verbosity::default().log_level(), Level::Info);
    }

    #[test]
    fn test_flag_counts() {
        let louder = Verbosity {
            verbose: 2,
            quiet: 0,
        };
        assert_eq!(louder.log_level(), Level::Trace);

        let quieter = Verbosity {
            verbose: 0,
            quiet: 5,
        };
        assert_eq!(quieter.log_level(), Level::Error);
    }

    #[test]
    fn test_deserialize_level_names() {
        assert_eq!(from_name("Warning").unwrap().log_level(), Level::Warn);
        assert_eq!(from_name("debug").unwrap().log_level(), Level::Debug);
        assert_eq!(from_name("ERROR").unwrap().log_level(), Level::Error);
        assert!(from_name("loud").is_err());
    }
}
