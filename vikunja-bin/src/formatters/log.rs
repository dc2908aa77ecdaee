use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

use crate::{formatters::color::color_for_level, verbosity::Verbosity};

/// Longest level name ("ERROR", "DEBUG", ...) plus brackets
const LEVEL_TEXT_WIDTH: usize = 7;

/// Initialize the logging system with the given verbosity level.
pub(crate) fn init_logging(verbose: &Verbosity) {
    // Set a base level for all modules to `warn`, which is a reasonable default.
    // It will be overridden by RUST_LOG if it's set.
    let env = Env::default().filter_or("RUST_LOG", "warn");

    let mut builder = Builder::from_env(env);
    builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if std::env::var("RUST_LOG").is_err() {
        let level_filter = verbose.log_level_filter();

        // Dependencies such as reqwest stay at `warn` unless RUST_LOG says otherwise
        builder.filter_level(LevelFilter::Warn);
        builder
            .filter_module("vikunja", level_filter)
            .filter_module("vikunja_lib", level_filter);
    }

    builder.format(|buf, record| {
        let level = record.level();
        let prefix = format!("{:>width$}", format!("[{level}]"), width = LEVEL_TEXT_WIDTH);
        writeln!(
            buf,
            "{} {}",
            color_for_level(level).apply_to(prefix),
            record.args()
        )
    });

    builder.init();
}
